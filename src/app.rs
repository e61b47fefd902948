//! 应用程序容器
//!
//! 负责命令注册、按名称分发以及把错误映射为退出码

use crate::commands::{Command, CommandDescriptor, HelpCommand, ListCommand};
use crate::error::{ConsoleError, Result};
use crate::input::{Input, InputOption, OptionMode};
use crate::output::{Output, Verbosity};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "UNKNOWN".to_string(),
            version: "UNKNOWN".to_string(),
        }
    }
}

impl AppConfig {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// 应用级选项，任何命令都可以使用，命令自身不得重名
pub(crate) fn application_options() -> Vec<InputOption> {
    vec![
        InputOption::new("help", Some('h'), OptionMode::None, "显示命令帮助"),
        InputOption::new("quiet", Some('q'), OptionMode::None, "不输出任何信息"),
        InputOption::new(
            "verbose",
            Some('v'),
            OptionMode::None,
            "提高输出详细程度：-v 详细，-vv 更详细，-vvv 调试",
        ),
        InputOption::new("no-interaction", Some('n'), OptionMode::None, "不询问任何交互问题"),
    ]
}

/// 从原始参数中剥离出的应用级开关
#[derive(Debug, Default, PartialEq, Eq)]
struct GlobalFlags {
    help: bool,
    quiet: bool,
    verbosity: u8,
    no_interaction: bool,
}

impl GlobalFlags {
    /// 扫描 `--` 之前的参数，剥离应用级开关，其余原样保留
    fn extract(tokens: Vec<String>) -> (Self, Vec<String>) {
        let mut flags = GlobalFlags::default();
        let mut rest = Vec::with_capacity(tokens.len());
        let mut passthrough = false;

        for token in tokens {
            if passthrough {
                rest.push(token);
                continue;
            }
            match token.as_str() {
                "--" => {
                    passthrough = true;
                    rest.push(token);
                }
                "-h" | "--help" => flags.help = true,
                "-q" | "--quiet" => flags.quiet = true,
                "-n" | "--no-interaction" => flags.no_interaction = true,
                "-v" | "--verbose" => flags.verbosity = flags.verbosity.max(1),
                "-vv" => flags.verbosity = flags.verbosity.max(2),
                "-vvv" => flags.verbosity = 3,
                _ => rest.push(token),
            }
        }
        (flags, rest)
    }

    fn verbosity(&self) -> Option<Verbosity> {
        if self.quiet {
            return Some(Verbosity::Quiet);
        }
        match self.verbosity {
            0 => None,
            1 => Some(Verbosity::Verbose),
            2 => Some(Verbosity::VeryVerbose),
            _ => Some(Verbosity::Debug),
        }
    }
}

/// 命令注册表与分发器
pub struct Application {
    config: AppConfig,
    commands: BTreeMap<String, Box<dyn Command>>,
    /// 注册顺序，`list` 按此顺序输出
    order: Vec<String>,
    aliases: BTreeMap<String, String>,
}

impl Default for Application {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            commands: BTreeMap::new(),
            order: Vec::new(),
            aliases: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 注册命令：先调用 `configure`，校验通过后按名称登记；同名命令被替换
    pub fn add<C>(&mut self, mut command: C) -> Result<()>
    where
        C: Command + 'static,
    {
        command.configure();
        let config = command.config();
        config.validate()?;

        for option in application_options() {
            let definition = config.definition();
            let shortcut_taken = option.shortcut().is_some_and(|c| definition.has_shortcut(c));
            if definition.has_option(option.name()) || shortcut_taken {
                return Err(ConsoleError::InvalidDefinition(format!(
                    "命令 \"{}\" 的选项与应用级选项 \"--{}\" 冲突",
                    config.name(),
                    option.name()
                )));
            }
        }

        let name = config.name().to_string();
        let aliases = config.aliases().to_vec();

        if self.commands.contains_key(&name) {
            warn!(command = %name, "replacing previously registered command");
            self.aliases.retain(|_, target| target != &name);
        } else {
            self.order.push(name.clone());
        }
        for alias in aliases {
            self.aliases.insert(alias, name.clone());
        }

        debug!(command = %name, "command registered");
        self.commands.insert(name, Box::new(command));
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// 按完整名称获取
    pub fn get(&mut self, name: &str) -> Result<&mut dyn Command> {
        match self.commands.get_mut(name) {
            Some(command) => {
                let command: &mut dyn Command = command.as_mut();
                Ok(command)
            }
            None => Err(ConsoleError::CommandNotFound(name.to_string())),
        }
    }

    /// 按名称或别名查找
    pub fn find(&mut self, name: &str) -> Result<&mut dyn Command> {
        let resolved = match self.aliases.get(name) {
            Some(target) if !self.commands.contains_key(name) => target.clone(),
            _ => name.to_string(),
        };
        self.get(&resolved)
    }

    /// 所有命令的描述，内置命令在前
    pub fn descriptors(&self) -> Vec<CommandDescriptor> {
        let mut descriptors = Vec::new();
        if !self.has(HelpCommand::NAME) {
            descriptors.push(HelpCommand::new(Vec::new()).config().descriptor());
        }
        if !self.has(ListCommand::NAME) {
            descriptors.push(ListCommand::new("", "", Vec::new()).config().descriptor());
        }
        descriptors.extend(
            self.order
                .iter()
                .filter_map(|name| self.commands.get(name))
                .map(|command| command.config().descriptor()),
        );
        descriptors
    }

    /// 运行并把错误渲染到输出，返回退出码（上限 255）
    pub fn run<I, S>(&mut self, args: I, output: &mut dyn Output) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.try_run(args, output) {
            Ok(code) => code.min(255),
            Err(err) => {
                if let Err(io_err) = err.render(output) {
                    warn!(error = %io_err, "failed to render error");
                }
                let code = err.exit_code();
                debug!(code, "command failed");
                code
            }
        }
    }

    /// 运行并原样返回错误
    pub fn try_run<I, S>(&mut self, args: I, output: &mut dyn Output) -> Result<i32>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
        let (flags, mut tokens) = GlobalFlags::extract(tokens);

        if let Some(verbosity) = flags.verbosity() {
            output.set_verbosity(verbosity);
        }

        let name = if tokens.first().is_some_and(|t| !t.starts_with('-')) {
            tokens.remove(0)
        } else {
            ListCommand::NAME.to_string()
        };

        // `cmd --help` 等价于 `help cmd`
        let (name, tokens) = if flags.help {
            (HelpCommand::NAME.to_string(), vec![name])
        } else {
            (name, tokens)
        };

        let mut input = Input::from_tokens(tokens);
        input.set_interactive(!flags.no_interaction);
        debug!(command = %name, "dispatching");

        if self.has(&name) || self.aliases.contains_key(&name) {
            return self.find(&name)?.run(&mut input, output);
        }

        match name.as_str() {
            HelpCommand::NAME => HelpCommand::new(self.descriptors()).run(&mut input, output),
            ListCommand::NAME => {
                let AppConfig { name, version } = self.config.clone();
                ListCommand::new(name, version, self.descriptors()).run(&mut input, output)
            }
            _ => Err(ConsoleError::CommandNotFound(name)),
        }
    }
}
