//! 输出抽象
//!
//! 命令只面向 `Output` trait 写入，测试使用 `BufferedOutput` 捕获内容，
//! 二进制使用 `ConsoleOutput` 写到 stdout/stderr。

use std::io::{self, Stderr, Stdout, Write};

/// 输出详细级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    VeryVerbose,
    Debug,
}

/// 输出目标
pub trait Output {
    /// 写入标准输出流
    fn write_raw(&mut self, message: &str) -> io::Result<()>;

    /// 写入错误流，默认与标准输出相同
    fn write_error_raw(&mut self, message: &str) -> io::Result<()> {
        self.write_raw(message)
    }

    fn verbosity(&self) -> Verbosity;

    fn set_verbosity(&mut self, verbosity: Verbosity);

    fn is_quiet(&self) -> bool {
        self.verbosity() == Verbosity::Quiet
    }

    /// 写入消息（不换行）；安静模式下丢弃
    fn write(&mut self, message: &str) -> io::Result<()> {
        if self.is_quiet() {
            return Ok(());
        }
        self.write_raw(message)
    }

    /// 写入一行
    fn writeln(&mut self, message: &str) -> io::Result<()> {
        if self.is_quiet() {
            return Ok(());
        }
        self.write_raw(message)?;
        self.write_raw("\n")
    }

    /// 仅当当前级别不低于 `level` 时写入一行
    fn writeln_at(&mut self, level: Verbosity, message: &str) -> io::Result<()> {
        if self.verbosity() < level {
            return Ok(());
        }
        self.writeln(message)
    }

    /// 写入错误流一行，安静模式也会输出
    fn error_line(&mut self, message: &str) -> io::Result<()> {
        self.write_error_raw(message)?;
        self.write_error_raw("\n")
    }
}

/// 内存缓冲输出
#[derive(Debug, Default)]
pub struct BufferedOutput {
    buffer: String,
    verbosity: Verbosity,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbosity(verbosity: Verbosity) -> Self {
        Self {
            buffer: String::new(),
            verbosity,
        }
    }

    /// 取出并清空已缓冲的内容
    pub fn fetch(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

impl Output for BufferedOutput {
    fn write_raw(&mut self, message: &str) -> io::Result<()> {
        self.buffer.push_str(message);
        Ok(())
    }

    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }
}

/// 任意 `Write` 之上的输出
#[derive(Debug)]
pub struct StreamOutput<W: Write> {
    stream: W,
    verbosity: Verbosity,
}

impl<W: Write> StreamOutput<W> {
    pub fn new(stream: W) -> Self {
        Self {
            stream,
            verbosity: Verbosity::default(),
        }
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}

impl<W: Write> Output for StreamOutput<W> {
    fn write_raw(&mut self, message: &str) -> io::Result<()> {
        self.stream.write_all(message.as_bytes())?;
        self.stream.flush()
    }

    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }
}

/// 终端输出：正常内容到 stdout，错误到 stderr
#[derive(Debug)]
pub struct ConsoleOutput {
    stdout: StreamOutput<Stdout>,
    stderr: StreamOutput<Stderr>,
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleOutput {
    pub fn new() -> Self {
        Self {
            stdout: StreamOutput::new(io::stdout()),
            stderr: StreamOutput::new(io::stderr()),
        }
    }
}

impl Output for ConsoleOutput {
    fn write_raw(&mut self, message: &str) -> io::Result<()> {
        self.stdout.write_raw(message)
    }

    fn write_error_raw(&mut self, message: &str) -> io::Result<()> {
        self.stderr.write_raw(message)
    }

    fn verbosity(&self) -> Verbosity {
        self.stdout.verbosity()
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.stdout.set_verbosity(verbosity);
        self.stderr.set_verbosity(verbosity);
    }
}
