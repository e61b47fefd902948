//! 参数与选项的声明
//!
//! `InputDefinition` 同时负责声明校验、生成用法摘要，以及转换为 clap 的解析器。

use crate::error::{ConsoleError, Result};
use clap::{Arg, ArgAction, ColorChoice, value_parser};
use serde::Serialize;
use serde_json::Value;

/// 可选值选项未带值时 clap 填入的占位值
pub(crate) const BARE_OPTION: &str = "\u{0}";

/// 位置参数模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentMode {
    Required,
    Optional,
}

/// 选项取值模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionMode {
    /// 开关，不接受值
    None,
    /// 出现时必须带值
    Required,
    /// 值可以省略
    Optional,
}

/// 位置参数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputArgument {
    name: String,
    mode: ArgumentMode,
    is_array: bool,
    description: String,
    default: Value,
}

impl InputArgument {
    pub fn new(name: impl Into<String>, mode: ArgumentMode, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode,
            is_array: false,
            description: description.into(),
            default: Value::Null,
        }
    }

    /// 接收剩余所有位置值
    pub fn array(mut self) -> Self {
        self.is_array = true;
        if self.default.is_null() {
            self.default = Value::Array(Vec::new());
        }
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> ArgumentMode {
        self.mode
    }

    pub fn is_required(&self) -> bool {
        self.mode == ArgumentMode::Required
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    fn validate(&self) -> Result<()> {
        let has_default = match &self.default {
            Value::Null => false,
            Value::Array(items) => !items.is_empty(),
            _ => true,
        };
        if self.is_required() && has_default {
            return Err(ConsoleError::InvalidDefinition(format!(
                "必填参数 \"{}\" 不能设置默认值",
                self.name
            )));
        }
        if self.is_array && !self.default.is_array() {
            return Err(ConsoleError::InvalidDefinition(format!(
                "数组参数 \"{}\" 的默认值必须是数组",
                self.name
            )));
        }
        Ok(())
    }
}

/// 命名选项
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputOption {
    name: String,
    shortcut: Option<char>,
    mode: OptionMode,
    is_array: bool,
    description: String,
    default: Value,
}

impl InputOption {
    pub fn new(
        name: impl Into<String>,
        shortcut: Option<char>,
        mode: OptionMode,
        description: impl Into<String>,
    ) -> Self {
        let name: String = name.into();
        Self {
            name: name.trim_start_matches("--").to_string(),
            shortcut,
            mode,
            is_array: false,
            description: description.into(),
            default: match mode {
                OptionMode::None => Value::Bool(false),
                _ => Value::Null,
            },
        }
    }

    /// 可重复出现，值累积为数组
    pub fn array(mut self) -> Self {
        self.is_array = true;
        if self.default.is_null() {
            self.default = Value::Array(Vec::new());
        }
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shortcut(&self) -> Option<char> {
        self.shortcut
    }

    pub fn mode(&self) -> OptionMode {
        self.mode
    }

    pub fn accepts_value(&self) -> bool {
        self.mode != OptionMode::None
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ConsoleError::InvalidDefinition("选项名称不能为空".to_string()));
        }
        // 简写只接受单个 ASCII 字母或数字
        if let Some(shortcut) = self.shortcut {
            if !shortcut.is_ascii_alphanumeric() {
                return Err(ConsoleError::InvalidDefinition(format!(
                    "选项 \"{}\" 的简写 \"{}\" 无效",
                    self.name, shortcut
                )));
            }
        }
        if self.mode == OptionMode::None && self.is_array {
            return Err(ConsoleError::InvalidDefinition(format!(
                "开关选项 \"{}\" 不能是数组",
                self.name
            )));
        }
        if self.mode == OptionMode::None && self.default != Value::Bool(false) {
            return Err(ConsoleError::InvalidDefinition(format!(
                "开关选项 \"{}\" 不能设置默认值",
                self.name
            )));
        }
        if self.is_array && !self.default.is_array() {
            return Err(ConsoleError::InvalidDefinition(format!(
                "数组选项 \"{}\" 的默认值必须是数组",
                self.name
            )));
        }
        Ok(())
    }

    /// 用法摘要中的写法，如 `[-y|--yell]`、`[--format FORMAT]`
    fn synopsis(&self) -> String {
        let shortcut = self
            .shortcut
            .map(|c| format!("-{}|", c))
            .unwrap_or_default();
        let value = match self.mode {
            OptionMode::None => String::new(),
            OptionMode::Required => format!(" {}", self.name.to_uppercase()),
            OptionMode::Optional => format!(" [{}]", self.name.to_uppercase()),
        };
        let repeat = if self.is_array { "..." } else { "" };
        format!("[{}--{}{}]{}", shortcut, self.name, value, repeat)
    }
}

/// 参数与选项的有序集合
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputDefinition {
    arguments: Vec<InputArgument>,
    options: Vec<InputOption>,
}

impl InputDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_argument(&mut self, argument: InputArgument) -> Result<()> {
        argument.validate()?;
        if self.has_argument(argument.name()) {
            return Err(ConsoleError::InvalidDefinition(format!(
                "参数 \"{}\" 已存在",
                argument.name()
            )));
        }
        if let Some(last) = self.arguments.last() {
            if last.is_array() {
                return Err(ConsoleError::InvalidDefinition(format!(
                    "数组参数 \"{}\" 之后不能再添加参数",
                    last.name()
                )));
            }
            if argument.is_required() && !last.is_required() {
                return Err(ConsoleError::InvalidDefinition(format!(
                    "必填参数 \"{}\" 不能位于可选参数之后",
                    argument.name()
                )));
            }
        }
        self.arguments.push(argument);
        Ok(())
    }

    pub fn add_option(&mut self, option: InputOption) -> Result<()> {
        option.validate()?;
        if self.has_option(option.name()) {
            return Err(ConsoleError::InvalidDefinition(format!(
                "选项 \"{}\" 已存在",
                option.name()
            )));
        }
        if let Some(shortcut) = option.shortcut() {
            if self.options.iter().any(|o| o.shortcut() == Some(shortcut)) {
                return Err(ConsoleError::InvalidDefinition(format!(
                    "选项简写 \"-{}\" 已存在",
                    shortcut
                )));
            }
        }
        self.options.push(option);
        Ok(())
    }

    pub fn arguments(&self) -> &[InputArgument] {
        &self.arguments
    }

    pub fn options(&self) -> &[InputOption] {
        &self.options
    }

    pub fn argument(&self, name: &str) -> Option<&InputArgument> {
        self.arguments.iter().find(|a| a.name() == name)
    }

    pub fn option(&self, name: &str) -> Option<&InputOption> {
        self.options.iter().find(|o| o.name() == name)
    }

    pub fn has_argument(&self, name: &str) -> bool {
        self.argument(name).is_some()
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.option(name).is_some()
    }

    pub fn has_shortcut(&self, shortcut: char) -> bool {
        self.options.iter().any(|o| o.shortcut() == Some(shortcut))
    }

    /// 用法摘要；`short` 为真时所有选项合并为 `[options]`
    pub fn synopsis(&self, short: bool) -> String {
        let mut elements = Vec::new();

        if short && !self.options.is_empty() {
            elements.push("[options]".to_string());
        } else if !short {
            elements.extend(self.options.iter().map(InputOption::synopsis));
        }

        if !elements.is_empty() && !self.arguments.is_empty() {
            elements.push("[--]".to_string());
        }

        // 可选参数逐层嵌套，右括号统一追加在末尾
        let mut tail = String::new();
        for argument in &self.arguments {
            let mut element = format!("<{}>", argument.name());
            if argument.is_array() {
                element.push_str("...");
            }
            if !argument.is_required() {
                element = format!("[{}", element);
                tail.push(']');
            }
            elements.push(element);
        }

        format!("{}{}", elements.join(" "), tail)
    }

    /// 构造 clap 解析器；必填校验留给 `Input::validate`，以便交互阶段补全
    ///
    /// 解析错误中的用法行与 `help` 输出的用法摘要一致
    pub(crate) fn to_clap(&self, name: &str) -> clap::Command {
        let usage = format!("{} {}", name, self.synopsis(false));
        let mut command = clap::Command::new(name.to_string())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .color(ColorChoice::Never)
            .override_usage(usage.trim_end().to_string());

        for (index, argument) in self.arguments.iter().enumerate() {
            let mut arg = Arg::new(argument_id(argument.name()))
                .index(index + 1)
                .value_name(argument.name().to_string())
                .value_parser(value_parser!(String));
            arg = if argument.is_array() {
                arg.num_args(1..).action(ArgAction::Append)
            } else {
                arg.action(ArgAction::Set)
            };
            command = command.arg(arg);
        }

        for option in &self.options {
            let mut arg = Arg::new(option_id(option.name())).long(option.name().to_string());
            if let Some(shortcut) = option.shortcut() {
                arg = arg.short(shortcut);
            }
            // 非数组选项重复出现时以最后一次为准
            if !option.is_array() {
                arg = arg.overrides_with(option_id(option.name()));
            }
            let action = if option.is_array() {
                ArgAction::Append
            } else {
                ArgAction::Set
            };
            arg = match option.mode() {
                OptionMode::None => arg.action(ArgAction::SetTrue),
                OptionMode::Required => arg
                    .action(action)
                    .num_args(1)
                    .value_name(option.name().to_uppercase())
                    .value_parser(value_parser!(String)),
                OptionMode::Optional => arg
                    .action(action)
                    .num_args(0..=1)
                    .default_missing_value(BARE_OPTION)
                    .value_name(option.name().to_uppercase())
                    .value_parser(value_parser!(String)),
            };
            command = command.arg(arg);
        }

        command
    }
}

pub(crate) fn argument_id(name: &str) -> String {
    format!("arg:{}", name)
}

pub(crate) fn option_id(name: &str) -> String {
    format!("opt:{}", name)
}
