//! help 命令：显示单个命令的描述、用法、参数与选项

use super::{Command, CommandConfig, CommandDescriptor, OutputFormat, SUCCESS};
use crate::app::application_options;
use crate::error::{ConsoleError, Result};
use crate::input::{ArgumentMode, Input, InputOption, OptionMode};
use crate::output::Output;
use serde_json::Value;

pub struct HelpCommand {
    config: CommandConfig,
    commands: Vec<CommandDescriptor>,
}

impl HelpCommand {
    pub const NAME: &'static str = "help";

    pub fn new(commands: Vec<CommandDescriptor>) -> Self {
        let mut config = CommandConfig::new(Self::NAME);
        config
            .set_description("显示命令帮助")
            .set_help("显示指定命令的帮助，例如：help list；也可以在任意命令后加 --help")
            .add_argument_with_default(
                "command_name",
                ArgumentMode::Optional,
                "命令名称",
                Self::NAME,
            )
            .add_option_with_default(
                "format",
                None,
                OptionMode::Required,
                "输出格式 (txt/json)",
                "txt",
            );
        Self { config, commands }
    }

    fn find(&self, name: &str) -> Result<CommandDescriptor> {
        if name == Self::NAME {
            return Ok(self.config.descriptor());
        }
        self.commands
            .iter()
            .find(|c| c.name == name || c.aliases.iter().any(|a| a == name))
            .cloned()
            .ok_or_else(|| ConsoleError::CommandNotFound(name.to_string()))
    }
}

impl Command for HelpCommand {
    fn config(&self) -> &CommandConfig {
        &self.config
    }

    fn execute(&mut self, input: &Input, output: &mut dyn Output) -> Result<i32> {
        let name = input
            .argument("command_name")?
            .as_str()
            .unwrap_or(Self::NAME)
            .to_string();
        let descriptor = self.find(&name)?;

        match OutputFormat::from_input(input)? {
            OutputFormat::Txt => render_text(&descriptor, output)?,
            OutputFormat::Json => {
                output.writeln(&serde_json::to_string_pretty(&descriptor)?)?;
            }
        }
        Ok(SUCCESS)
    }
}

fn render_text(descriptor: &CommandDescriptor, output: &mut dyn Output) -> Result<()> {
    if !descriptor.description.is_empty() {
        output.writeln("描述:")?;
        output.writeln(&format!("  {}", descriptor.description))?;
        output.writeln("")?;
    }

    output.writeln("用法:")?;
    for usage in &descriptor.usage {
        output.writeln(&format!("  {}", usage))?;
    }

    let arguments: Vec<(String, String)> = descriptor
        .definition
        .arguments()
        .iter()
        .map(|a| (a.name().to_string(), describe(a.description(), a.default())))
        .collect();

    // 命令自身的选项在前，应用级选项在后
    let options: Vec<(String, String)> = descriptor
        .definition
        .options()
        .iter()
        .chain(application_options().iter())
        .map(|o| (option_label(o), describe(o.description(), o.default())))
        .collect();

    let width = arguments
        .iter()
        .chain(options.iter())
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0)
        + 2;

    for (title, rows) in [("参数:", &arguments), ("选项:", &options)] {
        if rows.is_empty() {
            continue;
        }
        output.writeln("")?;
        output.writeln(title)?;
        for (label, text) in rows {
            output.writeln(&format!("  {:<width$}{}", label, text, width = width).trim_end())?;
        }
    }

    if !descriptor.help.is_empty() {
        output.writeln("")?;
        output.writeln("帮助:")?;
        output.writeln(&format!("  {}", descriptor.help))?;
    }
    Ok(())
}

/// 形如 `-f, --format=FORMAT`
fn option_label(option: &InputOption) -> String {
    let shortcut = match option.shortcut() {
        Some(c) => format!("-{}, ", c),
        None => "    ".to_string(),
    };
    let value = match option.mode() {
        OptionMode::None => String::new(),
        OptionMode::Required => format!("={}", option.name().to_uppercase()),
        OptionMode::Optional => format!("[={}]", option.name().to_uppercase()),
    };
    format!("{}--{}{}", shortcut, option.name(), value)
}

fn describe(description: &str, default: &Value) -> String {
    let has_default = match default {
        Value::Null | Value::Bool(false) => false,
        Value::Array(items) => !items.is_empty(),
        _ => true,
    };
    if has_default {
        format!("{} [默认: {}]", description, default)
    } else {
        description.to_string()
    }
}
