//! Run-loop behaviour through the public API only.
use std::cell::RefCell;
use std::rc::Rc;

use cliframe::{
    AppConfig, Application, BufferLogger, Context, Error, ErrorKind, Logger, OptionRegistry,
    Result, Runner, Runtime, Severity, Value, context,
};

/// Test double: the body is a closure, exit and error handling are recorded.
struct Scripted {
    body: Box<dyn FnMut(&mut Runtime) -> Result<i32>>,
    exit_status: Option<i32>,
    handled: Rc<RefCell<Vec<(ErrorKind, String)>>>,
    swallow_errors: bool,
}

impl Scripted {
    fn new(body: impl FnMut(&mut Runtime) -> Result<i32> + 'static) -> Self {
        Self {
            body: Box::new(body),
            exit_status: None,
            handled: Rc::default(),
            swallow_errors: false,
        }
    }
}

impl Application for Scripted {
    fn main(&mut self, rt: &mut Runtime) -> Result<i32> {
        (self.body)(rt)
    }

    fn handle_error(&mut self, rt: &Runtime, error: Error) -> Option<i32> {
        self.handled.borrow_mut().push((error.kind(), error.to_string()));
        if self.swallow_errors {
            return None;
        }
        cliframe::ErrorTranslator::new().handle(rt, &error)
    }

    fn exit(&mut self, status: i32) {
        self.exit_status = Some(status);
    }
}

fn run_with(app: Scripted, argv: &[&str]) -> (Runner<Scripted>, Rc<BufferLogger>, Option<i32>) {
    let log = Rc::new(BufferLogger::new());
    let mut runner =
        Runner::with_logger(app, AppConfig::with_args(argv.iter().copied()), log.clone()).unwrap();
    let returned = runner.run();
    (runner, log, returned)
}

#[test]
fn debug_run_logs_begin_body_and_end() {
    let app = Scripted::new(|rt| {
        rt.debug("TEST_MESSAGE", Context::new());
        Ok(0)
    });
    let (runner, log, returned) = run_with(app, &["prog", "--debug"]);

    assert_eq!(returned, Some(0));
    assert_eq!(runner.app().exit_status, Some(0));
    let messages: Vec<String> = log.entries().iter().map(|e| e.message().to_string()).collect();
    assert_eq!(
        messages,
        vec!["application begins", "TEST_MESSAGE", "application ends with 0"]
    );
    assert!(log.entries().iter().all(|e| e.level() == Severity::Debug));
}

#[test]
fn quiet_run_logs_nothing() {
    let app = Scripted::new(|rt| {
        rt.debug("TEST_MESSAGE", Context::new());
        Ok(0)
    });
    let (runner, log, _) = run_with(app, &["prog"]);
    assert_eq!(runner.app().exit_status, Some(0));
    assert!(log.is_empty());
}

#[test]
fn failure_in_main_is_logged_once_and_exits_nonzero() {
    let app = Scripted::new(|_| Err(Error::bad_argument("TEST", "foo")));
    let (runner, log, returned) = run_with(app, &["prog"]);

    assert_eq!(returned, Some(1));
    assert_eq!(runner.app().exit_status, Some(cliframe::EXIT_FAILURE));
    assert_eq!(log.count(), 1);
    let entry = log.pop_oldest().unwrap();
    assert_eq!(entry.level(), Severity::Error);
    assert_eq!(entry.message(), "TEST");
    assert_eq!(entry.context().get("value"), Some(&Value::from("foo")));
    assert!(!entry.context().contains_key("backtrace"));
}

#[test]
fn unexpected_failure_carries_backtrace() {
    let app = Scripted::new(|_| {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
        Err(Error::unexpected_with_source("could not load settings", io))
    });
    let (_, log, _) = run_with(app, &["prog"]);
    let entry = log.pop_oldest().unwrap();
    assert_eq!(entry.message(), "could not load settings");
    assert!(entry.context().contains_key("backtrace"));
    match entry.context().get("cause") {
        Some(Value::Map(cause)) => {
            assert_eq!(cause.borrow().get("message"), Some(&Value::from("config.toml")));
        }
        other => panic!("expected a cause, got {:?}", other),
    }
}

#[test]
fn unknown_options_reach_the_error_handler() {
    let cases = [
        ("--foo=bar", "Unknown option \"foo(bar)\""),
        ("--no-foo", "Unknown option \"foo\""),
        ("--bar", "Unknown option \"bar\""),
    ];
    for (token, expected) in cases {
        let mut app = Scripted::new(|_| Ok(0));
        app.swallow_errors = true;
        let handled = app.handled.clone();
        let (runner, log, returned) = run_with(app, &["prog", token]);

        assert_eq!(returned, None, "{token}");
        assert_eq!(runner.app().exit_status, None);
        assert_eq!(
            *handled.borrow(),
            vec![(ErrorKind::UnknownOption, expected.to_string())]
        );
        assert!(log.is_empty());
    }
}

#[test]
fn command_and_path_come_from_argv() {
    let seen = Rc::new(RefCell::new(None));
    let probe = seen.clone();
    let app = Scripted::new(move |rt| {
        *probe.borrow_mut() = Some((rt.command().to_string(), rt.command_path().to_string()));
        Ok(0)
    });
    run_with(app, &["test/command", "foo"]);
    assert_eq!(
        seen.borrow().clone(),
        Some(("command".to_string(), "test/command".to_string()))
    );
}

#[test]
fn positionals_survive_option_handling() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let probe = seen.clone();
    let app = Scripted::new(move |rt| {
        let first = rt.args_mut().shift_string_ex()?;
        let second = rt.args_mut().shift_string_ex()?;
        rt.args().end()?;
        probe.borrow_mut().extend([first, second]);
        Ok(0)
    });
    let (runner, _, _) = run_with(app, &["prog", "foo", "--debug=no", "bar"]);
    assert_eq!(runner.app().exit_status, Some(0));
    assert_eq!(*seen.borrow(), vec!["foo", "bar"]);
}

#[test]
fn leftover_arguments_fail_with_the_extras() {
    let app = Scripted::new(|rt| {
        rt.args_mut().shift_string_ex()?;
        rt.args().end()?;
        Ok(0)
    });
    let (runner, log, _) = run_with(app, &["prog", "one", "two", "three"]);
    assert_eq!(runner.app().exit_status, Some(1));
    let entry = log.pop_oldest().unwrap();
    assert_eq!(entry.message(), "Unexpected extra arguments: two three");
    assert!(entry.context().contains_key("extra"));
}

/// An application with its own option, used through the registry.
#[derive(Default)]
struct Counter {
    verbose: u32,
    exit_status: Option<i32>,
}

impl Application for Counter {
    fn options(registry: &mut OptionRegistry<Self>) {
        registry.on("verbose", |app: &mut Counter, _rt, value| {
            if value.to_bool()? {
                app.verbose += 1;
            }
            Ok(())
        });
    }

    fn main(&mut self, rt: &mut Runtime) -> Result<i32> {
        rt.info("counted", context! { "verbose" => self.verbose });
        Ok(0)
    }

    fn exit(&mut self, status: i32) {
        self.exit_status = Some(status);
    }
}

#[test]
fn registered_options_are_case_insensitive_and_repeatable() {
    let log = Rc::new(BufferLogger::new());
    let mut runner = Runner::with_logger(
        Counter::default(),
        AppConfig::with_args(["prog", "--VERBOSE", "--verbose=on", "--no-verbose"]),
        log.clone(),
    )
    .unwrap();
    runner.run();

    assert_eq!(runner.app().verbose, 2);
    assert_eq!(runner.app().exit_status, Some(0));
    let entry = log.pop_oldest().unwrap();
    assert_eq!(entry.level(), Severity::Info);
    assert_eq!(entry.context().get("verbose"), Some(&Value::Int(2)));
}

#[test]
fn config_debug_preset_enables_debug_without_the_option() {
    let log = Rc::new(BufferLogger::new());
    let mut runner = Runner::with_logger(
        Counter::default(),
        AppConfig::with_args(["prog"]).debug(true),
        log.clone(),
    )
    .unwrap();
    runner.run();
    assert_eq!(log.count(), 3);
}
