//! 命令输入
//!
//! 原始参数在 `bind` 时按命令的 `InputDefinition` 解析，
//! 取值统一用 `serde_json::Value` 表示。

pub mod definition;

pub use definition::{ArgumentMode, InputArgument, InputDefinition, InputOption, OptionMode};

use crate::error::{ConsoleError, Result};
use definition::{BARE_OPTION, argument_id, option_id};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::trace;

/// 一次命令调用的输入
#[derive(Debug, Clone)]
pub struct Input {
    tokens: Vec<String>,
    definition: InputDefinition,
    arguments: BTreeMap<String, Value>,
    options: BTreeMap<String, Value>,
    interactive: bool,
}

impl Input {
    /// 由原始参数构造，参数中不含命令名
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            definition: InputDefinition::default(),
            arguments: BTreeMap::new(),
            options: BTreeMap::new(),
            interactive: true,
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// 按定义解析原始参数；未给出的值取定义中的默认值
    ///
    /// `name` 只用于解析错误中的用法行
    pub fn bind(&mut self, name: &str, definition: &InputDefinition) -> Result<()> {
        let matches = definition
            .to_clap(name)
            .try_get_matches_from(&self.tokens)?;

        self.arguments.clear();
        for argument in definition.arguments() {
            let id = argument_id(argument.name());
            let value = match matches.get_many::<String>(&id) {
                Some(values) if argument.is_array() => {
                    Value::Array(values.cloned().map(Value::String).collect())
                }
                Some(mut values) => values
                    .next()
                    .cloned()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
                None => argument.default().clone(),
            };
            self.arguments.insert(argument.name().to_string(), value);
        }

        self.options.clear();
        for option in definition.options() {
            let id = option_id(option.name());
            let value = if !option.accepts_value() {
                Value::Bool(matches.get_flag(&id))
            } else {
                match matches.get_many::<String>(&id) {
                    Some(values) => {
                        let mut values = values.map(|v| option_value(v));
                        if option.is_array() {
                            Value::Array(values.collect())
                        } else {
                            values.next_back().unwrap_or(Value::Null)
                        }
                    }
                    None => option.default().clone(),
                }
            };
            self.options.insert(option.name().to_string(), value);
        }

        self.definition = definition.clone();
        trace!(tokens = ?self.tokens, "input bound");
        Ok(())
    }

    /// 校验必填参数是否齐全
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<String> = self
            .definition
            .arguments()
            .iter()
            .filter(|argument| argument.is_required())
            .filter(|argument| match self.arguments.get(argument.name()) {
                None | Some(Value::Null) => true,
                Some(Value::Array(items)) => items.is_empty(),
                Some(_) => false,
            })
            .map(|argument| argument.name().to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConsoleError::MissingArguments(missing))
        }
    }

    pub fn argument(&self, name: &str) -> Result<&Value> {
        self.arguments
            .get(name)
            .ok_or_else(|| ConsoleError::UndefinedArgument(name.to_string()))
    }

    pub fn set_argument(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if !self.definition.has_argument(name) {
            return Err(ConsoleError::UndefinedArgument(name.to_string()));
        }
        self.arguments.insert(name.to_string(), value.into());
        Ok(())
    }

    pub fn has_argument(&self, name: &str) -> bool {
        self.definition.has_argument(name)
    }

    pub fn arguments(&self) -> &BTreeMap<String, Value> {
        &self.arguments
    }

    pub fn option(&self, name: &str) -> Result<&Value> {
        self.options
            .get(name)
            .ok_or_else(|| ConsoleError::UndefinedOption(name.to_string()))
    }

    pub fn set_option(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if !self.definition.has_option(name) {
            return Err(ConsoleError::UndefinedOption(name.to_string()));
        }
        self.options.insert(name.to_string(), value.into());
        Ok(())
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.definition.has_option(name)
    }

    pub fn options(&self) -> &BTreeMap<String, Value> {
        &self.options
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }
}

/// 可选值选项省略值时记为 `true`
fn option_value(raw: &str) -> Value {
    if raw == BARE_OPTION {
        Value::Bool(true)
    } else {
        Value::String(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition() -> InputDefinition {
        let mut definition = InputDefinition::new();
        definition
            .add_argument(InputArgument::new("name", ArgumentMode::Required, "名称"))
            .unwrap();
        definition
            .add_argument(
                InputArgument::new("greeting", ArgumentMode::Optional, "问候语")
                    .with_default("Hello"),
            )
            .unwrap();
        definition
            .add_option(InputOption::new("yell", Some('y'), OptionMode::None, "大写"))
            .unwrap();
        definition
            .add_option(InputOption::new("times", Some('t'), OptionMode::Required, "次数"))
            .unwrap();
        definition
            .add_option(InputOption::new("color", None, OptionMode::Optional, "颜色"))
            .unwrap();
        definition
            .add_option(InputOption::new("tag", None, OptionMode::Required, "标签").array())
            .unwrap();
        definition
    }

    #[test]
    fn test_bind_positional_and_defaults() {
        let mut input = Input::from_tokens(["Alice"]);
        input.bind("test:greet", &definition()).unwrap();

        assert_eq!(input.argument("name").unwrap(), &json!("Alice"));
        assert_eq!(input.argument("greeting").unwrap(), &json!("Hello"));
        assert_eq!(input.option("yell").unwrap(), &json!(false));
        assert_eq!(input.option("times").unwrap(), &Value::Null);
        assert_eq!(input.option("tag").unwrap(), &json!([]));
    }

    #[test]
    fn test_bind_options() {
        let mut input = Input::from_tokens([
            "-y", "--times", "3", "--tag", "a", "--tag=b", "Bob", "Hi", "--color",
        ]);
        input.bind("test:greet", &definition()).unwrap();

        assert_eq!(input.argument("name").unwrap(), &json!("Bob"));
        assert_eq!(input.argument("greeting").unwrap(), &json!("Hi"));
        assert_eq!(input.option("yell").unwrap(), &json!(true));
        assert_eq!(input.option("times").unwrap(), &json!("3"));
        assert_eq!(input.option("tag").unwrap(), &json!(["a", "b"]));
        assert_eq!(input.option("color").unwrap(), &json!(true));
    }

    #[test]
    fn test_bind_array_argument() {
        let mut definition = InputDefinition::new();
        definition
            .add_argument(InputArgument::new("items", ArgumentMode::Required, "").array())
            .unwrap();

        let mut input = Input::from_tokens(["a", "b", "c"]);
        input.bind("test:items", &definition).unwrap();
        assert_eq!(input.argument("items").unwrap(), &json!(["a", "b", "c"]));
    }

    #[test]
    fn test_bind_rejects_unknown_option() {
        let mut input = Input::from_tokens(["Alice", "--nope"]);
        assert!(matches!(
            input.bind("test:greet", &definition()),
            Err(ConsoleError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_error_shows_command_synopsis() {
        let mut input = Input::from_tokens(["Alice", "--nope"]);
        let message = match input.bind("test:greet", &definition()) {
            Err(e @ ConsoleError::Parse(_)) => e.to_string(),
            other => panic!("期望解析错误，实际: {:?}", other),
        };
        assert!(message.contains("test:greet [-y|--yell] [-t|--times TIMES]"), "{}", message);
        assert!(!message.contains("command [OPTIONS]"), "{}", message);
    }

    #[test]
    fn test_repeated_option_last_one_wins() {
        let mut input = Input::from_tokens([
            "Alice", "-y", "-y", "--times", "1", "--times", "2", "--color", "--color=red",
        ]);
        input.bind("test:greet", &definition()).unwrap();

        assert_eq!(input.option("yell").unwrap(), &json!(true));
        assert_eq!(input.option("times").unwrap(), &json!("2"));
        assert_eq!(input.option("color").unwrap(), &json!("red"));
    }

    #[test]
    fn test_bind_accepts_separator() {
        let mut input = Input::from_tokens(["--", "-y"]);
        input.bind("test:greet", &definition()).unwrap();
        assert_eq!(input.argument("name").unwrap(), &json!("-y"));
        assert_eq!(input.option("yell").unwrap(), &json!(false));
    }

    #[test]
    fn test_validate_reports_missing_required() {
        let mut input = Input::from_tokens(Vec::<String>::new());
        input.bind("test:greet", &definition()).unwrap();

        match input.validate() {
            Err(ConsoleError::MissingArguments(missing)) => assert_eq!(missing, vec!["name"]),
            other => panic!("期望缺少参数错误，实际: {:?}", other),
        }

        input.set_argument("name", "Carol").unwrap();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_undefined_names_are_errors() {
        let mut input = Input::from_tokens(["Alice"]);
        input.bind("test:greet", &definition()).unwrap();

        assert!(matches!(
            input.argument("missing"),
            Err(ConsoleError::UndefinedArgument(_))
        ));
        assert!(input.set_option("missing", true).is_err());
        assert!(input.has_option("yell"));
        assert!(!input.has_argument("yell"));
    }
}
