//! What a run looks like through a formatting logger.
use std::rc::Rc;

use cliframe::{
    AppConfig, Application, Error, FormattingLogger, Logger, MemorySink, Object, Result, Runner,
    Runtime, Value, context, render,
};

struct Failing {
    error: Option<Error>,
    exit_status: Option<i32>,
}

impl Application for Failing {
    fn main(&mut self, _rt: &mut Runtime) -> Result<i32> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(0),
        }
    }

    fn exit(&mut self, status: i32) {
        self.exit_status = Some(status);
    }
}

fn run(error: Option<Error>, argv: &[&str]) -> (Option<i32>, String) {
    let log = Rc::new(FormattingLogger::new(MemorySink::new()));
    let app = Failing {
        error,
        exit_status: None,
    };
    let mut runner =
        Runner::with_logger(app, AppConfig::with_args(argv.iter().copied()), log.clone()).unwrap();
    runner.run();
    (runner.app().exit_status, log.sink().contents())
}

#[test]
fn user_error_line_names_the_kind() {
    let (status, written) = run(Some(Error::missing_argument("Missing argument")), &["prog"]);
    assert_eq!(status, Some(1));
    assert!(written.starts_with("ERROR(MissingArgument): Missing argument {\n"));
    assert!(written.contains("  file: "));
    assert!(written.contains("  line: "));
    assert!(!written.contains("code:"));
    assert!(!written.contains("backtrace"));
}

#[test]
fn debug_lines_have_the_debug_label() {
    let (status, written) = run(None, &["prog", "--debug"]);
    assert_eq!(status, Some(0));
    assert_eq!(
        written,
        "DEBUG: application beginsDEBUG: application ends with 0"
    );
}

#[test]
fn self_referencing_context_renders_once() {
    let log = FormattingLogger::new(MemorySink::new());
    let node = Rc::new(Object::new("Node"));
    node.set("name", "root");
    node.set("me", Value::Object(node.clone()));
    log.warning("cyclic", context! { "node" => Value::Object(node.clone()) });

    let written = log.sink().contents();
    assert!(written.starts_with("WARNING: cyclic {\n"));
    assert!(written.contains("  node: Node {\n"));
    assert!(written.contains("    name: root\n"));
    assert!(written.contains("    me: Node (already printed)\n"));
}

#[test]
fn free_render_matches_formatter_block() {
    let ctx = context! { "a" => 1, "b" => Value::list(vec![Value::from("x")]) };
    assert_eq!(render(&ctx), "{\n  a: 1\n  b: array {\n    0: x\n  }\n}\n");
}
