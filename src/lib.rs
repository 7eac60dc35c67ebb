#![doc = r#"
cliframe: a small application-lifecycle framework for command-line programs.

It standardizes the boring parts every tool repeats: taking the program path
and options off argv, dispatching options to handlers, logging with
syslog-style severities and structured context, suppressing debug output
unless asked for, and turning an uncaught failure into exactly one
error-level log line and an exit status.

Quick start
-----------
```rust,no_run
use cliframe::{AppConfig, Application, Logger, Result, Runner, Runtime, context};

struct Greeter {
    loud: bool,
}

impl Application for Greeter {
    fn options(registry: &mut cliframe::OptionRegistry<Self>) {
        registry.on("loud", |app: &mut Greeter, _rt, value| {
            app.loud = value.to_bool()?;
            Ok(())
        });
    }

    fn main(&mut self, rt: &mut Runtime) -> Result<i32> {
        let name = rt.args_mut().shift_string_ex()?;
        rt.args().end()?;
        rt.info("greeting", context! { "name" => name.as_str(), "loud" => self.loud });
        Ok(cliframe::EXIT_SUCCESS)
    }
}

fn main() -> Result<()> {
    let mut runner = Runner::new(Greeter { loud: false }, AppConfig::from_env()?)?;
    runner.run();
    Ok(())
}
```

Testing an application
----------------------
Override [`Application::exit`] to record the status and hand the runner a
[`BufferLogger`] to inspect what was logged.

```rust
use std::rc::Rc;
use cliframe::{AppConfig, Application, BufferLogger, Result, Runner, Runtime, Severity};

#[derive(Default)]
struct Probe {
    status: Option<i32>,
}

impl Application for Probe {
    fn main(&mut self, _rt: &mut Runtime) -> Result<i32> {
        Ok(0)
    }

    fn exit(&mut self, status: i32) {
        self.status = Some(status);
    }
}

let log = Rc::new(BufferLogger::new());
let mut runner = Runner::with_logger(
    Probe::default(),
    AppConfig::with_args(["prog", "--debug"]),
    log.clone(),
)
.unwrap();
runner.run();

assert_eq!(runner.app().status, Some(0));
assert_eq!(log.count(), 2);
assert_eq!(log.pop_oldest().unwrap().level(), Severity::Debug);
```

Failures
--------
Everything returns [`Result`]. [`Error`] has one variant per failure kind;
[`ErrorTranslator`] logs user-input kinds briefly and unexpected ones with a
backtrace and the cause chain.

Useful modules
--------------
- [`app`]: `Application`, `Runner`, `Runtime`, error translation.
- [`log`]: the `Logger` trait and its variants.
- [`core`]: configuration, context values, the structured renderer.
- [`io`]: argument tokens and output sinks.
- [`error`]: crate-level `Error` and `Result`.
"#]

pub mod app;
pub mod core;
pub mod error;
pub mod io;
pub mod log;
pub mod types;

// Curated public API surface
pub use crate::app::{
    Application, ApplicationState, ErrorTranslator, EXIT_FAILURE, EXIT_SUCCESS, FailureRecord,
    OptionHandler, OptionRegistry, Runner, Runtime,
};
pub use crate::core::config::AppConfig;
pub use crate::core::context::{Context, Object, Value};
pub use crate::core::render::{StructuredFormatter, render};
pub use crate::error::{Error, ErrorKind, Result, SourceLocation};
pub use crate::io::{Arguments, MemorySink, Sink, StderrSink, WriterSink, parse_bool};
pub use crate::log::{
    BufferLogger, FormattingLogger, LogEntry, Logger, RelayLogger, StderrLogger, TracingLogger,
};
pub use crate::types::{OptionValue, RawLevel, Severity};
