//! Llama - 用闭包定义命令行命令
//!
//! `LambdaCommand` 把配置、初始化、交互、执行四个阶段交给普通闭包，
//! 无需为每个命令单独实现 `Command` trait。

// 错误类型
pub mod error;

// 输入与输出
pub mod input;
pub mod output;

// 命令契约与内置命令
pub mod commands;

// 应用程序容器
pub mod app;

// 示例命令
pub mod cli;

#[cfg(test)]
mod test_utils;

// 重新导出常用类型
pub use app::{AppConfig, Application};
pub use commands::{
    Command, CommandConfig, IntoExitCode, LambdaCommand, FAILURE, INVALID, SUCCESS,
};
pub use error::{ConsoleError, Result};
pub use input::{ArgumentMode, Input, InputArgument, InputOption, OptionMode};
pub use output::{BufferedOutput, ConsoleOutput, Output, StreamOutput, Verbosity};
pub use serde_json::Value;
