//! 以闭包定义的命令
//!
//! `LambdaCommand` 把四个可选闭包接到宿主的四个生命周期阶段上，
//! 未设置的阶段什么也不做。
//!
//! ```
//! use llama::{Application, BufferedOutput, LambdaCommand, Output};
//!
//! let mut app = Application::default();
//! app.add(LambdaCommand::new("test:llama-command").with_executor(|_input, output| {
//!     output.writeln("works")?;
//!     Ok(())
//! }))
//! .unwrap();
//!
//! let mut output = BufferedOutput::new();
//! assert_eq!(app.run(["test:llama-command"], &mut output), 0);
//! assert_eq!(output.fetch(), "works\n");
//! ```

use super::{Command, CommandConfig, IntoExitCode, SUCCESS};
use crate::error::Result;
use crate::input::Input;
use crate::output::Output;
use std::fmt;
use tracing::{debug, trace};

/// 配置阶段回调，接收命令的声明面
pub type Configurator = Box<dyn FnMut(&mut CommandConfig)>;
/// 执行阶段回调，返回退出码
pub type Executor = Box<dyn FnMut(&Input, &mut dyn Output) -> anyhow::Result<i32>>;
/// 交互阶段回调
pub type Interactor = Box<dyn FnMut(&mut Input, &mut dyn Output) -> anyhow::Result<()>>;
/// 初始化阶段回调
pub type Initializer = Box<dyn FnMut(&mut Input, &mut dyn Output) -> anyhow::Result<()>>;

/// 由闭包提供各阶段行为的命令
pub struct LambdaCommand {
    config: CommandConfig,
    configurator: Option<Configurator>,
    executor: Option<Executor>,
    interactor: Option<Interactor>,
    initializer: Option<Initializer>,
}

impl LambdaCommand {
    /// 名称可带命名空间，如 `llama:run`；四个阶段均为空
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: CommandConfig::new(name),
            configurator: None,
            executor: None,
            interactor: None,
            initializer: None,
        }
    }

    pub fn with_configurator<F>(mut self, configurator: F) -> Self
    where
        F: FnMut(&mut CommandConfig) + 'static,
    {
        self.set_configurator(configurator);
        self
    }

    pub fn with_executor<F, R>(mut self, executor: F) -> Self
    where
        F: FnMut(&Input, &mut dyn Output) -> anyhow::Result<R> + 'static,
        R: IntoExitCode,
    {
        self.set_executor(executor);
        self
    }

    pub fn with_interactor<F>(mut self, interactor: F) -> Self
    where
        F: FnMut(&mut Input, &mut dyn Output) -> anyhow::Result<()> + 'static,
    {
        self.set_interactor(interactor);
        self
    }

    pub fn with_initializer<F>(mut self, initializer: F) -> Self
    where
        F: FnMut(&mut Input, &mut dyn Output) -> anyhow::Result<()> + 'static,
    {
        self.set_initializer(initializer);
        self
    }

    /// 声明描述、参数与选项的回调，例如：
    ///
    /// ```
    /// # use llama::LambdaCommand;
    /// let mut command = LambdaCommand::new("llama:stuff");
    /// command.set_configurator(|config| {
    ///     config.set_description("Do some stuff!");
    /// });
    /// ```
    pub fn set_configurator<F>(&mut self, configurator: F) -> &mut Self
    where
        F: FnMut(&mut CommandConfig) + 'static,
    {
        self.configurator = Some(Box::new(configurator));
        self
    }

    /// 命令主体。回调可返回 `()`、`i32` 或 `Option<i32>`，`()` 与 `None` 视为成功
    pub fn set_executor<F, R>(&mut self, mut executor: F) -> &mut Self
    where
        F: FnMut(&Input, &mut dyn Output) -> anyhow::Result<R> + 'static,
        R: IntoExitCode,
    {
        self.executor = Some(Box::new(move |input: &Input, output: &mut dyn Output| {
            executor(input, output).map(IntoExitCode::into_exit_code)
        }));
        self
    }

    /// 交互回调，在校验必填参数之前运行，可向用户询问缺失的值
    pub fn set_interactor<F>(&mut self, interactor: F) -> &mut Self
    where
        F: FnMut(&mut Input, &mut dyn Output) -> anyhow::Result<()> + 'static,
    {
        self.interactor = Some(Box::new(interactor));
        self
    }

    /// 初始化回调，在交互与执行之前运行
    pub fn set_initializer<F>(&mut self, initializer: F) -> &mut Self
    where
        F: FnMut(&mut Input, &mut dyn Output) -> anyhow::Result<()> + 'static,
    {
        self.initializer = Some(Box::new(initializer));
        self
    }

    pub fn clear_configurator(&mut self) -> &mut Self {
        self.configurator = None;
        self
    }

    pub fn clear_executor(&mut self) -> &mut Self {
        self.executor = None;
        self
    }

    pub fn clear_interactor(&mut self) -> &mut Self {
        self.interactor = None;
        self
    }

    pub fn clear_initializer(&mut self) -> &mut Self {
        self.initializer = None;
        self
    }

    pub fn has_configurator(&self) -> bool {
        self.configurator.is_some()
    }

    pub fn has_executor(&self) -> bool {
        self.executor.is_some()
    }

    pub fn has_interactor(&self) -> bool {
        self.interactor.is_some()
    }

    pub fn has_initializer(&self) -> bool {
        self.initializer.is_some()
    }
}

impl Command for LambdaCommand {
    fn config(&self) -> &CommandConfig {
        &self.config
    }

    /// 每次都从名称重建声明，重复调用结果一致
    fn configure(&mut self) {
        self.config = CommandConfig::new(self.config.name().to_string());
        match self.configurator.as_mut() {
            Some(configurator) => {
                debug!(command = %self.config.name(), "invoking configurator");
                configurator(&mut self.config);
            }
            None => trace!(command = %self.config.name(), "no configurator set"),
        }
    }

    fn initialize(&mut self, input: &mut Input, output: &mut dyn Output) -> Result<()> {
        match self.initializer.as_mut() {
            Some(initializer) => {
                debug!(command = %self.config.name(), "invoking initializer");
                initializer(input, output)?;
            }
            None => trace!(command = %self.config.name(), "no initializer set"),
        }
        Ok(())
    }

    fn interact(&mut self, input: &mut Input, output: &mut dyn Output) -> Result<()> {
        match self.interactor.as_mut() {
            Some(interactor) => {
                debug!(command = %self.config.name(), "invoking interactor");
                interactor(input, output)?;
            }
            None => trace!(command = %self.config.name(), "no interactor set"),
        }
        Ok(())
    }

    fn execute(&mut self, input: &Input, output: &mut dyn Output) -> Result<i32> {
        match self.executor.as_mut() {
            Some(executor) => {
                debug!(command = %self.config.name(), "invoking executor");
                Ok(executor(input, output)?)
            }
            None => {
                trace!(command = %self.config.name(), "no executor set");
                Ok(SUCCESS)
            }
        }
    }
}

impl fmt::Debug for LambdaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LambdaCommand")
            .field("name", &self.config.name())
            .field("configurator", &self.has_configurator())
            .field("executor", &self.has_executor())
            .field("interactor", &self.has_interactor())
            .field("initializer", &self.has_initializer())
            .finish()
    }
}
