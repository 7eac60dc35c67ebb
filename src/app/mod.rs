//! Application lifecycle.
//!
//! An [`Application`] supplies hooks; a [`Runner`] owns it together with a
//! [`Runtime`] and drives the fixed sequence
//!
//! 1. `setup`
//! 2. option dispatch
//! 3. debug log "application begins"
//! 4. `debug_setup` (debug mode only)
//! 5. `main`
//! 6. `debug_cleanup` (debug mode only)
//! 7. debug log "application ends with <status>", flush
//! 8. `exit(status)`
//!
//! A failure anywhere in 1-7 skips the rest and goes to
//! [`Application::handle_error`]. If that returns a status, `exit` is
//! called with it; otherwise `run` simply returns.
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use crate::core::config::AppConfig;
use crate::core::context::Context;
use crate::error::{Error, Result};
use crate::io::args::Arguments;
use crate::log::{Logger, RelayLogger};
use crate::types::Severity;

pub mod runner;
pub mod translate;

pub use runner::{OptionHandler, OptionRegistry, Runner};
pub use translate::{ErrorTranslator, FailureRecord};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Hooks a concrete program plugs into the run loop.
///
/// Only [`Application::main`] is required. Every hook receives the
/// [`Runtime`], which is also the application's logger.
pub trait Application {
    /// The program body. Returns the exit status.
    fn main(&mut self, rt: &mut Runtime) -> Result<i32>;

    fn setup(&mut self, _rt: &mut Runtime) -> Result<()> {
        Ok(())
    }

    /// Runs before `main`, only in debug mode.
    fn debug_setup(&mut self, _rt: &mut Runtime) -> Result<()> {
        Ok(())
    }

    /// Runs after a successful `main`, only in debug mode.
    fn debug_cleanup(&mut self, _rt: &mut Runtime) -> Result<()> {
        Ok(())
    }

    /// Register option handlers. Called once, when the runner is built.
    fn options(_registry: &mut OptionRegistry<Self>)
    where
        Self: Sized,
    {
    }

    /// Log a failure and choose the exit status; `None` means return from
    /// `run` without exiting.
    fn handle_error(&mut self, rt: &Runtime, error: Error) -> Option<i32> {
        ErrorTranslator::new().handle(rt, &error)
    }

    /// Terminate the process. Override to observe the status instead.
    fn exit(&mut self, status: i32) {
        std::process::exit(status)
    }
}

/// Per-run state, fixed at construction except for `debug_enabled`, which
/// only option handling changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplicationState {
    pub debug_enabled: bool,
    pub command_path: String,
    pub command: String,
    pub pid: u32,
}

/// What hooks see of the running application: its state, the remaining
/// arguments, and the debug-filtered logger.
pub struct Runtime {
    state: ApplicationState,
    args: Arguments,
    log: RelayLogger,
}

impl Runtime {
    /// Takes the command path off the front of `config.argv`; an empty argv
    /// fails with `MissingArgument`.
    pub fn new(config: AppConfig, logger: Rc<dyn Logger>) -> Result<Self> {
        let mut args = Arguments::new(config.argv);
        let command_path = args.shift_string_ex()?;
        let command = command_name(&command_path);
        Ok(Self {
            state: ApplicationState {
                debug_enabled: config.debug,
                command_path,
                command,
                pid: config.pid,
            },
            args,
            log: RelayLogger::new(logger),
        })
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    pub fn args(&self) -> &Arguments {
        &self.args
    }

    pub fn args_mut(&mut self) -> &mut Arguments {
        &mut self.args
    }

    /// Final path segment of the command path.
    pub fn command(&self) -> &str {
        &self.state.command
    }

    pub fn command_path(&self) -> &str {
        &self.state.command_path
    }

    pub fn pid(&self) -> u32 {
        self.state.pid
    }

    pub fn debug_enabled(&self) -> bool {
        self.state.debug_enabled
    }

    pub(crate) fn set_debug_enabled(&mut self, enabled: bool) {
        self.state.debug_enabled = enabled;
    }

    /// The unfiltered logger behind this runtime.
    pub fn logger(&self) -> &RelayLogger {
        &self.log
    }
}

impl Logger for Runtime {
    /// Debug entries pass only while debug mode is on, checked per call.
    fn log(&self, level: Severity, message: &dyn fmt::Display, context: Context) {
        if level == Severity::Debug && !self.state.debug_enabled {
            return;
        }
        self.log.log(level, message, context);
    }

    fn flush(&self) {
        self.log.flush();
    }
}

fn command_name(command_path: &str) -> String {
    Path::new(command_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| command_path.to_string())
}
