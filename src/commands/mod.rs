//! 命令契约
//!
//! 宿主只认识 `Command` trait：配置、初始化、交互、执行四个阶段，
//! 由 `Command::run` 按固定顺序驱动。

use crate::error::{ConsoleError, Result};
use crate::input::{ArgumentMode, Input, InputArgument, InputDefinition, InputOption, OptionMode};
use crate::output::Output;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

pub mod help;
pub mod lambda;
pub mod list;

pub use help::HelpCommand;
pub use lambda::LambdaCommand;
pub use list::ListCommand;

/// 执行成功
pub const SUCCESS: i32 = 0;
/// 执行失败
pub const FAILURE: i32 = 1;
/// 用法错误
pub const INVALID: i32 = 2;

/// 以冒号分隔的非空片段，如 `group:action`
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^:\s]+(:[^:\s]+)*$").expect("命令名称正则无效")
});

/// 命令的声明信息：名称、描述、参数与选项
#[derive(Debug, Clone)]
pub struct CommandConfig {
    name: String,
    description: String,
    help: String,
    aliases: Vec<String>,
    hidden: bool,
    definition: InputDefinition,
    /// 声明过程中遇到的第一个错误，由 `validate` 报告
    error: Option<String>,
}

impl CommandConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            help: String::new(),
            aliases: Vec::new(),
            hidden: false,
            definition: InputDefinition::default(),
            error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn definition(&self) -> &InputDefinition {
        &self.definition
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn set_help(&mut self, help: impl Into<String>) -> &mut Self {
        self.help = help.into();
        self
    }

    pub fn set_aliases<I, S>(&mut self, aliases: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_hidden(&mut self, hidden: bool) -> &mut Self {
        self.hidden = hidden;
        self
    }

    pub fn add_argument(
        &mut self,
        name: impl Into<String>,
        mode: ArgumentMode,
        description: impl Into<String>,
    ) -> &mut Self {
        self.push_argument(InputArgument::new(name, mode, description))
    }

    pub fn add_argument_with_default(
        &mut self,
        name: impl Into<String>,
        mode: ArgumentMode,
        description: impl Into<String>,
        default: impl Into<Value>,
    ) -> &mut Self {
        self.push_argument(InputArgument::new(name, mode, description).with_default(default))
    }

    /// 添加完整构造的参数，如数组参数
    pub fn push_argument(&mut self, argument: InputArgument) -> &mut Self {
        let result = self.definition.add_argument(argument);
        self.record(result)
    }

    pub fn add_option(
        &mut self,
        name: impl Into<String>,
        shortcut: Option<char>,
        mode: OptionMode,
        description: impl Into<String>,
    ) -> &mut Self {
        self.push_option(InputOption::new(name, shortcut, mode, description))
    }

    pub fn add_option_with_default(
        &mut self,
        name: impl Into<String>,
        shortcut: Option<char>,
        mode: OptionMode,
        description: impl Into<String>,
        default: impl Into<Value>,
    ) -> &mut Self {
        self.push_option(InputOption::new(name, shortcut, mode, description).with_default(default))
    }

    /// 添加完整构造的选项，如数组选项
    pub fn push_option(&mut self, option: InputOption) -> &mut Self {
        let result = self.definition.add_option(option);
        self.record(result)
    }

    fn record(&mut self, result: Result<()>) -> &mut Self {
        if let Err(err) = result {
            self.error.get_or_insert_with(|| err.to_string());
        }
        self
    }

    /// 校验名称、别名以及声明期间记录的错误
    pub fn validate(&self) -> Result<()> {
        for name in std::iter::once(&self.name).chain(self.aliases.iter()) {
            if !NAME_PATTERN.is_match(name) {
                return Err(ConsoleError::InvalidName(name.clone()));
            }
        }
        match &self.error {
            Some(message) => Err(ConsoleError::InvalidDefinition(message.clone())),
            None => Ok(()),
        }
    }

    /// 完整用法摘要，如 `test:llama-help [<items>]`
    pub fn synopsis(&self) -> String {
        format!("{} {}", self.name, self.definition.synopsis(false))
            .trim()
            .to_string()
    }

    /// 选项折叠为 `[options]` 的简短摘要
    pub fn short_synopsis(&self) -> String {
        format!("{} {}", self.name, self.definition.synopsis(true))
            .trim()
            .to_string()
    }

    pub fn descriptor(&self) -> CommandDescriptor {
        let mut usage = vec![self.synopsis()];
        usage.extend(
            self.aliases
                .iter()
                .map(|alias| format!("{} {}", alias, self.definition.synopsis(false)).trim().to_string()),
        );
        CommandDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            help: self.help.clone(),
            usage,
            aliases: self.aliases.clone(),
            hidden: self.hidden,
            definition: self.definition.clone(),
        }
    }
}

/// 命令的可序列化描述，供 `list` / `help` 输出
#[derive(Debug, Clone, Serialize)]
pub struct CommandDescriptor {
    pub name: String,
    pub description: String,
    pub help: String,
    pub usage: Vec<String>,
    pub aliases: Vec<String>,
    pub hidden: bool,
    pub definition: InputDefinition,
}

/// `list` / `help` 的输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Txt,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "txt" | "text" => Ok(OutputFormat::Txt),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConsoleError::InvalidFormat(s.to_string())),
        }
    }

    /// 从已解析输入的 `--format` 选项读取
    pub(crate) fn from_input(input: &Input) -> Result<Self> {
        match input.option("format")?.as_str() {
            Some(format) => Self::parse(format),
            None => Ok(OutputFormat::Txt),
        }
    }
}

/// 执行回调返回值到退出码的转换
pub trait IntoExitCode {
    fn into_exit_code(self) -> i32;
}

impl IntoExitCode for () {
    fn into_exit_code(self) -> i32 {
        SUCCESS
    }
}

impl IntoExitCode for i32 {
    fn into_exit_code(self) -> i32 {
        self
    }
}

impl IntoExitCode for Option<i32> {
    fn into_exit_code(self) -> i32 {
        self.unwrap_or(SUCCESS)
    }
}

/// 宿主框架要求命令实现的能力集
pub trait Command {
    fn config(&self) -> &CommandConfig;

    /// 声明描述、参数与选项；注册时调用
    fn configure(&mut self) {}

    /// 交互之前调用，用于设置默认值
    fn initialize(&mut self, _input: &mut Input, _output: &mut dyn Output) -> Result<()> {
        Ok(())
    }

    /// 解析之后、校验之前调用，用于补全缺失参数
    fn interact(&mut self, _input: &mut Input, _output: &mut dyn Output) -> Result<()> {
        Ok(())
    }

    /// 命令主体，返回退出码
    fn execute(&mut self, input: &Input, output: &mut dyn Output) -> Result<i32>;

    fn name(&self) -> &str {
        self.config().name()
    }

    fn synopsis(&self) -> String {
        self.config().synopsis()
    }

    /// 解析 → 初始化 → 交互 → 校验 → 执行
    fn run(&mut self, input: &mut Input, output: &mut dyn Output) -> Result<i32> {
        let name = self.config().name().to_string();
        let definition = self.config().definition().clone();
        input.bind(&name, &definition)?;

        self.initialize(input, output)?;
        if input.is_interactive() {
            self.interact(input, output)?;
        }
        input.validate()?;

        self.execute(input, output)
    }
}
