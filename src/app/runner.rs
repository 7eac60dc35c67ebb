use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::app::{Application, Runtime};
use crate::core::config::AppConfig;
use crate::core::context::Context;
use crate::error::{Error, Result};
use crate::log::{Logger, StderrLogger};
use crate::types::OptionValue;

/// Handler for one named option.
pub type OptionHandler<A> = Box<dyn FnMut(&mut A, &mut Runtime, OptionValue) -> Result<()>>;

/// Option name to handler table, built once per runner.
///
/// Names are case-insensitive. The `debug` option is registered before the
/// application's own handlers, so an application may replace it.
pub struct OptionRegistry<A> {
    handlers: HashMap<String, OptionHandler<A>>,
}

impl<A> Default for OptionRegistry<A> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<A> OptionRegistry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: FnMut(&mut A, &mut Runtime, OptionValue) -> Result<()> + 'static,
    {
        self.handlers.insert(name.to_lowercase(), Box::new(handler));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(&name.to_lowercase())
    }

    /// Invoke the handler for `name`, or fail with `UnknownOption`.
    pub fn dispatch(
        &mut self,
        app: &mut A,
        rt: &mut Runtime,
        name: &str,
        value: OptionValue,
    ) -> Result<()> {
        match self.handlers.get_mut(&name.to_lowercase()) {
            Some(handler) => handler(app, rt, value),
            None => Err(Error::unknown_option(name, &value)),
        }
    }
}

fn handle_debug<A>(_app: &mut A, rt: &mut Runtime, value: OptionValue) -> Result<()> {
    let enabled = value.to_bool()?;
    rt.set_debug_enabled(enabled);
    Ok(())
}

/// Owns an application and drives its lifecycle.
pub struct Runner<A: Application> {
    app: A,
    runtime: Runtime,
    options: OptionRegistry<A>,
}

impl<A: Application + 'static> Runner<A> {
    /// Build a runner that logs to standard error.
    pub fn new(app: A, config: AppConfig) -> Result<Self> {
        Self::with_logger(app, config, Rc::new(StderrLogger::stderr()))
    }

    pub fn with_logger(app: A, config: AppConfig, logger: Rc<dyn Logger>) -> Result<Self> {
        let runtime = Runtime::new(config, logger)?;
        let mut options = OptionRegistry::new();
        options.on("debug", handle_debug::<A>);
        A::options(&mut options);
        Ok(Self {
            app,
            runtime,
            options,
        })
    }
}

impl<A: Application> Runner<A> {
    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut Runtime {
        &mut self.runtime
    }

    pub fn into_app(self) -> A {
        self.app
    }

    /// Run the full lifecycle once.
    ///
    /// Returns the status handed to [`Application::exit`], or `None` when
    /// the error handler chose not to exit. With the default `exit` this
    /// never returns.
    pub fn run(&mut self) -> Option<i32> {
        debug!(command = %self.runtime.command(), pid = self.runtime.pid(), "run loop starting");
        let status = match self.run_stages() {
            Ok(status) => Some(status),
            Err(error) => {
                debug!(kind = %error.kind(), "run loop failed");
                self.app.handle_error(&self.runtime, error)
            }
        };
        if let Some(status) = status {
            trace!(status, "exiting");
            self.app.exit(status);
        }
        status
    }

    fn run_stages(&mut self) -> Result<i32> {
        self.app.setup(&mut self.runtime)?;
        self.handle_options()?;
        self.runtime.debug("application begins", Context::new());
        if self.runtime.debug_enabled() {
            self.app.debug_setup(&mut self.runtime)?;
        }
        let status = self.app.main(&mut self.runtime)?;
        if self.runtime.debug_enabled() {
            self.app.debug_cleanup(&mut self.runtime)?;
        }
        self.runtime
            .debug(format!("application ends with {}", status), Context::new());
        self.runtime.flush();
        std::io::stdout().flush()?;
        Ok(status)
    }

    fn handle_options(&mut self) -> Result<()> {
        let parsed = self.runtime.args_mut().handle_options();
        for (name, value) in parsed {
            trace!(option = %name, value = %value, "dispatching option");
            self.options
                .dispatch(&mut self.app, &mut self.runtime, &name, value)?;
        }
        Ok(())
    }
}
