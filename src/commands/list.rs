//! list 命令：按命名空间列出已注册命令

use super::{Command, CommandConfig, CommandDescriptor, OutputFormat, SUCCESS};
use crate::error::{ConsoleError, Result};
use crate::input::{ArgumentMode, Input, OptionMode};
use crate::output::Output;
use serde_json::json;
use std::collections::BTreeMap;

/// list 命令，持有调用时刻的命令快照
pub struct ListCommand {
    config: CommandConfig,
    application: (String, String),
    commands: Vec<CommandDescriptor>,
}

impl ListCommand {
    pub const NAME: &'static str = "list";

    pub fn new(
        app_name: impl Into<String>,
        version: impl Into<String>,
        commands: Vec<CommandDescriptor>,
    ) -> Self {
        let mut config = CommandConfig::new(Self::NAME);
        config
            .set_description("列出所有命令")
            .set_help("按命名空间分组列出命令，可只看某个命名空间：list demo")
            .add_argument("namespace", ArgumentMode::Optional, "命名空间")
            .add_option_with_default(
                "format",
                None,
                OptionMode::Required,
                "输出格式 (txt/json)",
                "txt",
            );

        Self {
            config,
            application: (app_name.into(), version.into()),
            commands,
        }
    }

    fn visible(&self, namespace: Option<&str>) -> Result<Vec<&CommandDescriptor>> {
        let commands: Vec<&CommandDescriptor> = self
            .commands
            .iter()
            .filter(|c| !c.hidden)
            .filter(|c| namespace.is_none_or(|ns| namespace_of(&c.name) == Some(ns)))
            .collect();

        match namespace {
            Some(ns) if commands.is_empty() => Err(ConsoleError::NamespaceNotFound(ns.to_string())),
            _ => Ok(commands),
        }
    }

    fn render_text(&self, commands: &[&CommandDescriptor], output: &mut dyn Output) -> Result<()> {
        let (name, version) = &self.application;
        output.writeln(&format!("{} {}", name, version))?;
        output.writeln("")?;
        output.writeln("用法:")?;
        output.writeln("  command [options] [arguments]")?;
        output.writeln("")?;
        output.writeln("可用命令:")?;

        let width = commands.iter().map(|c| c.name.len()).max().unwrap_or(0) + 2;

        // 无命名空间的命令在前，其余按命名空间分组
        let mut groups: BTreeMap<Option<&str>, Vec<&CommandDescriptor>> = BTreeMap::new();
        for command in commands {
            groups
                .entry(namespace_of(&command.name))
                .or_default()
                .push(command);
        }

        for (namespace, group) in groups {
            if let Some(ns) = namespace {
                output.writeln(&format!(" {}", ns))?;
            }
            for command in group {
                output.writeln(&format!(
                    "  {:<width$}{}",
                    command.name,
                    command.description,
                    width = width
                ))?;
            }
        }
        Ok(())
    }
}

/// `group:action` 的命名空间部分
fn namespace_of(name: &str) -> Option<&str> {
    name.rsplit_once(':').map(|(ns, _)| ns)
}

impl Command for ListCommand {
    fn config(&self) -> &CommandConfig {
        &self.config
    }

    fn execute(&mut self, input: &Input, output: &mut dyn Output) -> Result<i32> {
        let namespace = input.argument("namespace")?.as_str();
        let commands = self.visible(namespace)?;

        match OutputFormat::from_input(input)? {
            OutputFormat::Txt => self.render_text(&commands, output)?,
            OutputFormat::Json => {
                let (name, version) = &self.application;
                let document = json!({
                    "application": { "name": name, "version": version },
                    "commands": commands,
                });
                output.writeln(&serde_json::to_string_pretty(&document)?)?;
            }
        }
        Ok(SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::run_with;

    fn descriptor(name: &str, description: &str, hidden: bool) -> CommandDescriptor {
        let mut config = CommandConfig::new(name);
        config.set_description(description).set_hidden(hidden);
        config.descriptor()
    }

    fn list() -> ListCommand {
        ListCommand::new(
            "llama",
            "0.1.0",
            vec![
                descriptor("help", "显示帮助", false),
                descriptor("demo:greet", "打招呼", false),
                descriptor("demo:secret", "隐藏命令", true),
                descriptor("db:migrate", "迁移", false),
            ],
        )
    }

    #[test]
    fn test_text_groups_by_namespace() {
        let (result, text) = run_with(&mut list(), &[]);
        assert_eq!(result.unwrap(), SUCCESS);

        assert!(text.starts_with("llama 0.1.0\n"));
        assert!(text.contains("  help        显示帮助\n"));
        assert!(text.contains(" demo\n  demo:greet  打招呼\n"));
        assert!(!text.contains("demo:secret"));

        let help = text.find("  help").unwrap();
        let db = text.find(" db\n").unwrap();
        let demo = text.find(" demo\n").unwrap();
        assert!(help < db && db < demo);
    }

    #[test]
    fn test_namespace_filter() {
        let (result, text) = run_with(&mut list(), &["demo"]);
        assert_eq!(result.unwrap(), SUCCESS);
        assert!(text.contains("demo:greet"));
        assert!(!text.contains("db:migrate"));

        let (result, _) = run_with(&mut list(), &["nope"]);
        assert!(matches!(result, Err(ConsoleError::NamespaceNotFound(_))));
    }

    #[test]
    fn test_json_format() {
        let (result, text) = run_with(&mut list(), &["--format=json"]);
        assert_eq!(result.unwrap(), SUCCESS);

        let document: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(document["application"]["name"], "llama");
        let names: Vec<&str> = document["commands"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["help", "demo:greet", "db:migrate"]);
    }

    #[test]
    fn test_unknown_format() {
        let (result, _) = run_with(&mut list(), &["--format", "xml"]);
        assert!(matches!(result, Err(ConsoleError::InvalidFormat(_))));
    }
}
