//! 错误处理模块 (原则：回调错误原样透传，宿主只负责映射退出码)

use crate::commands::{FAILURE, INVALID};
use crate::output::{Output, Verbosity};
use std::error::Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("参数解析错误: {0}")]
    Parse(#[from] clap::Error),

    #[error("命令未定义: {0}")]
    CommandNotFound(String),

    #[error("命名空间下没有命令: {0}")]
    NamespaceNotFound(String),

    #[error("无效的命令名称: \"{0}\"")]
    InvalidName(String),

    #[error("无效的命令定义: {0}")]
    InvalidDefinition(String),

    #[error("参数不存在: {0}")]
    UndefinedArgument(String),

    #[error("选项不存在: {0}")]
    UndefinedOption(String),

    #[error("缺少参数: {}", .0.join(", "))]
    MissingArguments(Vec<String>),

    #[error("不支持的输出格式: {0}")]
    InvalidFormat(String),

    #[error("JSON序列化错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 用户回调返回的错误，不做任何包装
    #[error(transparent)]
    Callback(#[from] anyhow::Error),
}

impl ConsoleError {
    /// 错误对应的退出码：用法错误为 INVALID，其余为 FAILURE
    pub fn exit_code(&self) -> i32 {
        match self {
            ConsoleError::Parse(_)
            | ConsoleError::CommandNotFound(_)
            | ConsoleError::NamespaceNotFound(_)
            | ConsoleError::UndefinedArgument(_)
            | ConsoleError::UndefinedOption(_)
            | ConsoleError::MissingArguments(_)
            | ConsoleError::InvalidFormat(_) => INVALID,
            _ => FAILURE,
        }
    }

    /// 报告错误到 stderr，用于应用尚未建立输出时（启动阶段）
    /// verbose = true: 详细错误链
    /// verbose = false: 仅错误本身
    pub fn report(&self, verbose: bool) {
        eprintln!("❌ 错误: {}", self);
        if verbose {
            for cause in self.causes() {
                eprintln!("  └─ 原因: {}", cause);
            }
        }
    }

    /// 把错误写入输出的错误流，详细模式下附带错误链
    pub fn render(&self, output: &mut dyn Output) -> std::io::Result<()> {
        output.error_line(&format!("❌ 错误: {}", self))?;
        if output.verbosity() >= Verbosity::Verbose {
            for cause in self.causes() {
                output.error_line(&format!("  └─ 原因: {}", cause))?;
            }
        }
        Ok(())
    }

    fn causes(&self) -> Vec<String> {
        let mut causes = Vec::new();
        let mut current = self.source();
        while let Some(next) = current {
            causes.push(next.to_string());
            current = next.source();
        }
        causes
    }
}

/// 简化 Result 类型别名
pub type Result<T> = std::result::Result<T, ConsoleError>;
