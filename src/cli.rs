//! 示例命令定义
//!
//! `llama` 二进制注册的命令，全部由 `LambdaCommand` 加闭包构成。

use crate::commands::LambdaCommand;
use crate::input::{ArgumentMode, InputArgument, OptionMode};
use crate::output::{Output, Verbosity};
use anyhow::{Context, bail};
use serde_json::Value;
use std::io::{BufRead, IsTerminal};

/// 所有示例命令
pub fn demo_commands() -> Vec<LambdaCommand> {
    vec![greet(), sum(), exit()]
}

/// demo:greet [-y|--yell] [--times TIMES] [--] [<name>]
pub fn greet() -> LambdaCommand {
    LambdaCommand::new("demo:greet")
        .with_configurator(|config| {
            config
                .set_description("向某人问好")
                .set_help("省略名字且在终端中运行时会询问名字；--no-interaction 时使用 World")
                .set_aliases(["greet"])
                .add_argument("name", ArgumentMode::Optional, "名字")
                .add_option("yell", Some('y'), OptionMode::None, "大写输出")
                .add_option_with_default("times", Some('t'), OptionMode::Required, "重复次数", "1");
        })
        .with_initializer(|input, _output| {
            if let Some(name) = input.argument("name")?.as_str() {
                let trimmed = name.trim().to_string();
                input.set_argument("name", trimmed)?;
            }
            Ok(())
        })
        .with_interactor(|input, output| {
            if !input.argument("name")?.is_null() || !std::io::stdin().is_terminal() {
                return Ok(());
            }
            output.write("你叫什么名字？ ")?;
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            let name = line.trim();
            if !name.is_empty() {
                input.set_argument("name", name)?;
            }
            Ok(())
        })
        .with_executor(|input, output| {
            let name = input.argument("name")?.as_str().unwrap_or("World");
            let times: usize = input
                .option("times")?
                .as_str()
                .unwrap_or("1")
                .parse()
                .context("--times 必须是非负整数")?;

            let mut line = format!("Hello, {}!", name);
            if input.option("yell")? == &Value::Bool(true) {
                line = line.to_uppercase();
            }
            for _ in 0..times {
                output.writeln(&line)?;
            }
            output.writeln_at(Verbosity::Verbose, &format!("已问候 {} 次", times))?;
            Ok(())
        })
}

/// demo:sum <numbers>...
pub fn sum() -> LambdaCommand {
    LambdaCommand::new("demo:sum")
        .with_configurator(|config| {
            config
                .set_description("对整数求和")
                .push_argument(InputArgument::new("numbers", ArgumentMode::Required, "整数").array());
        })
        .with_executor(|input, output| {
            let mut total: i64 = 0;
            for value in input.argument("numbers")?.as_array().into_iter().flatten() {
                let raw = value.as_str().unwrap_or_default();
                let number: i64 = match raw.parse() {
                    Ok(number) => number,
                    Err(_) => bail!("不是整数: {}", raw),
                };
                total = total.checked_add(number).context("求和溢出")?;
            }
            output.writeln(&total.to_string())?;
            Ok(())
        })
}

/// demo:exit <code>，以给定退出码结束
pub fn exit() -> LambdaCommand {
    LambdaCommand::new("demo:exit")
        .with_configurator(|config| {
            config
                .set_description("以指定退出码结束")
                .set_hidden(true)
                .add_argument("code", ArgumentMode::Required, "退出码");
        })
        .with_executor(|input, _output| {
            let raw = input.argument("code")?.as_str().unwrap_or_default();
            let code: i32 = raw
                .parse()
                .with_context(|| format!("无效的退出码: {}", raw))?;
            Ok(code)
        })
}
