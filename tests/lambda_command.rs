//! LambdaCommand 集成测试
//!
//! 通过公开 API 注册、查找并运行闭包命令

use llama::{
    Application, ArgumentMode, BufferedOutput, Command, ConsoleError, Input, LambdaCommand,
    Output, SUCCESS,
};
use std::cell::RefCell;
use std::rc::Rc;

mod basic {
    use super::*;

    #[test]
    fn test_basic_command() {
        let mut console = Application::default();
        console
            .add(LambdaCommand::new("test:llama-command").with_executor(
                |_input, output| {
                    output.writeln("works")?;
                    Ok(())
                },
            ))
            .unwrap();

        assert!(console.has("test:llama-command"));
        let command = console.get("test:llama-command").unwrap();
        assert_eq!(command.name(), "test:llama-command");

        let mut input = Input::from_tokens(Vec::<String>::new());
        let mut output = BufferedOutput::new();
        assert_eq!(command.run(&mut input, &mut output).unwrap(), SUCCESS);
        assert_eq!(output.fetch(), "works\n");
    }

    #[test]
    fn test_help() {
        let mut command = LambdaCommand::new("test:llama-help").with_configurator(|config| {
            config
                .set_description("Listen for stuff to do")
                .add_argument("items", ArgumentMode::Optional, "How much stuff to listen for");
        });
        command.configure();

        assert_eq!(command.config().description(), "Listen for stuff to do");
        assert_eq!(command.synopsis(), "test:llama-help [<items>]");
    }
}

mod optional_phases {
    use super::*;

    #[test]
    fn test_command_without_hooks_runs_cleanly() {
        let mut console = Application::default();
        console.add(LambdaCommand::new("test:nothing")).unwrap();

        let mut output = BufferedOutput::new();
        assert_eq!(console.run(["test:nothing"], &mut output), SUCCESS);
        assert_eq!(output.fetch(), "");
    }

    #[test]
    fn test_configurator_set_after_construction() {
        let mut command = LambdaCommand::new("test:late");
        command.set_configurator(|config| {
            config.add_argument("target", ArgumentMode::Required, "");
        });

        let mut console = Application::default();
        console.add(command).unwrap();
        assert_eq!(
            console.get("test:late").unwrap().synopsis(),
            "test:late <target>"
        );
    }
}

mod invocation {
    use super::*;

    #[test]
    fn test_each_run_gets_its_own_input_and_output() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut command = LambdaCommand::new("test:record")
            .with_configurator(|config| {
                config.add_argument("value", ArgumentMode::Required, "");
            })
            .with_executor({
                let seen = Rc::clone(&seen);
                move |input, output| {
                    let value = input.argument("value")?.as_str().unwrap_or_default().to_string();
                    output.writeln(&value)?;
                    seen.borrow_mut().push(value);
                    Ok(())
                }
            });
        command.configure();

        let mut first = BufferedOutput::new();
        let mut second = BufferedOutput::new();
        command
            .run(&mut Input::from_tokens(["one"]), &mut first)
            .unwrap();
        command
            .run(&mut Input::from_tokens(["two"]), &mut second)
            .unwrap();

        assert_eq!(first.fetch(), "one\n");
        assert_eq!(second.fetch(), "two\n");
        assert_eq!(*seen.borrow(), vec!["one", "two"]);
    }

    #[test]
    fn test_interactor_fills_missing_argument() {
        let mut console = Application::default();
        console
            .add(
                LambdaCommand::new("test:prompt")
                    .with_configurator(|config| {
                        config.add_argument("answer", ArgumentMode::Required, "");
                    })
                    .with_interactor(|input, output| {
                        output.writeln("answer?")?;
                        input.set_argument("answer", "42")?;
                        Ok(())
                    })
                    .with_executor(|input, output| {
                        output.writeln(input.argument("answer")?.as_str().unwrap_or_default())?;
                        Ok(())
                    }),
            )
            .unwrap();

        let mut output = BufferedOutput::new();
        assert_eq!(console.run(["test:prompt"], &mut output), SUCCESS);
        assert_eq!(output.fetch(), "answer?\n42\n");

        // 非交互模式下不会补全，校验失败
        let err = console
            .try_run(["test:prompt", "--no-interaction"], &mut output)
            .unwrap_err();
        assert!(matches!(err, ConsoleError::MissingArguments(_)));
    }

    #[test]
    fn test_hook_error_reaches_caller_unchanged() {
        #[derive(Debug)]
        struct Quota;
        impl std::fmt::Display for Quota {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "quota exceeded")
            }
        }
        impl std::error::Error for Quota {}

        let mut command = LambdaCommand::new("test:quota")
            .with_initializer(|_input, _output| Err(Quota.into()));
        command.configure();

        let err = command
            .run(&mut Input::from_tokens(Vec::<String>::new()), &mut BufferedOutput::new())
            .unwrap_err();
        match err {
            ConsoleError::Callback(inner) => assert!(inner.downcast_ref::<Quota>().is_some()),
            other => panic!("期望回调错误，实际: {:?}", other),
        }
    }
}
