//! Llama 主程序入口
//!
//! 设计原则：
//! - 入口只负责日志初始化与命令注册，分发交给 `Application`
//! - 日志写 stderr，级别由 LLAMA_LOG 控制，默认只输出警告

use llama::{AppConfig, Application, ConsoleOutput, FAILURE, cli};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let mut app = Application::new(AppConfig::new("llama", env!("CARGO_PKG_VERSION")));
    for command in cli::demo_commands() {
        if let Err(e) = app.add(command) {
            // 注册失败属于编程错误，直接报告并退出
            e.report(true);
            std::process::exit(FAILURE);
        }
    }

    let mut output = ConsoleOutput::new();
    let code = app.run(std::env::args().skip(1), &mut output);
    std::process::exit(code);
}

/// 初始化日志
fn init_tracing() {
    let filter = EnvFilter::try_from_env("LLAMA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
