//! 测试工具模块
//!
//! 记录回调调用顺序、以内存输出运行命令

use crate::commands::Command;
use crate::error::Result;
use crate::input::Input;
use crate::output::{BufferedOutput, Output};
use std::cell::RefCell;
use std::rc::Rc;

/// 共享的调用记录，可克隆进多个闭包
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    pub fn push(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// 生成只记录名称的 initializer / interactor
    pub fn hook_mut(
        &self,
        call: &'static str,
    ) -> impl FnMut(&mut Input, &mut dyn Output) -> anyhow::Result<()> + 'static {
        let log = self.clone();
        move |_input, _output| {
            log.push(call);
            Ok(())
        }
    }
}

/// 不含任何参数的输入
pub fn empty_input() -> Input {
    Input::from_tokens(Vec::<String>::new())
}

/// 以给定参数运行命令，返回结果与全部输出
pub fn run_with(command: &mut dyn Command, tokens: &[&str]) -> (Result<i32>, String) {
    let mut input = Input::from_tokens(tokens.iter().copied());
    let mut output = BufferedOutput::new();
    let result = command.run(&mut input, &mut output);
    (result, output.fetch())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_log_shared_between_clones() {
        let log = CallLog::default();
        let other = log.clone();
        other.push("a");
        log.push("b");
        assert_eq!(log.calls(), vec!["a", "b"]);
    }

    #[test]
    fn test_hook_records_call() {
        let log = CallLog::default();
        let mut hook = log.hook_mut("initialize");
        hook(&mut empty_input(), &mut BufferedOutput::new()).unwrap();
        assert_eq!(log.calls(), vec!["initialize"]);
    }
}
