//! Logger abstraction and its variants.
//!
//! [`Logger`] has a single required method, [`Logger::log`]. The eight
//! per-severity methods are provided once, here, and route through it; no
//! variant overrides them.
//!
//! Variants:
//! - [`BufferLogger`]: keeps every entry in memory, oldest first.
//! - [`FormattingLogger`]: renders one line per call and hands it to a
//!   [`crate::io::sink::Sink`] (stderr, a file, a test buffer).
//! - [`RelayLogger`]: forwards to another logger.
//! - [`TracingLogger`]: forwards to the `tracing` facade.
use std::fmt;
use std::rc::Rc;

use crate::core::context::Context;
use crate::error::Result;
use crate::types::{RawLevel, Severity};

pub mod buffer;
pub mod entry;
pub mod facade;
pub mod formatted;
pub mod relay;

pub use buffer::BufferLogger;
pub use entry::LogEntry;
pub use facade::TracingLogger;
pub use formatted::{FormattingLogger, StderrLogger};
pub use relay::RelayLogger;

pub trait Logger {
    /// Record one event. The only method a variant implements.
    fn log(&self, level: Severity, message: &dyn fmt::Display, context: Context);

    /// Push out anything buffered downstream. No-op by default.
    fn flush(&self) {}

    /// Log with a level given as a syslog code, a name, or a [`Severity`].
    ///
    /// Fails with [`crate::Error::InvalidLevel`] before anything is logged
    /// if the level is not recognised.
    fn log_raw<L, M>(&self, level: L, message: M, context: Context) -> Result<()>
    where
        Self: Sized,
        L: Into<RawLevel>,
        M: fmt::Display,
    {
        let severity = Severity::normalize(level)?;
        self.log(severity, &message, context);
        Ok(())
    }

    fn emergency<M: fmt::Display>(&self, message: M, context: Context)
    where
        Self: Sized,
    {
        self.log(Severity::Emergency, &message, context);
    }

    fn alert<M: fmt::Display>(&self, message: M, context: Context)
    where
        Self: Sized,
    {
        self.log(Severity::Alert, &message, context);
    }

    fn critical<M: fmt::Display>(&self, message: M, context: Context)
    where
        Self: Sized,
    {
        self.log(Severity::Critical, &message, context);
    }

    fn error<M: fmt::Display>(&self, message: M, context: Context)
    where
        Self: Sized,
    {
        self.log(Severity::Error, &message, context);
    }

    fn warning<M: fmt::Display>(&self, message: M, context: Context)
    where
        Self: Sized,
    {
        self.log(Severity::Warning, &message, context);
    }

    fn notice<M: fmt::Display>(&self, message: M, context: Context)
    where
        Self: Sized,
    {
        self.log(Severity::Notice, &message, context);
    }

    fn info<M: fmt::Display>(&self, message: M, context: Context)
    where
        Self: Sized,
    {
        self.log(Severity::Info, &message, context);
    }

    fn debug<M: fmt::Display>(&self, message: M, context: Context)
    where
        Self: Sized,
    {
        self.log(Severity::Debug, &message, context);
    }
}

impl<L: Logger + ?Sized> Logger for Rc<L> {
    fn log(&self, level: Severity, message: &dyn fmt::Display, context: Context) {
        (**self).log(level, message, context);
    }

    fn flush(&self) {
        (**self).flush();
    }
}

impl<L: Logger + ?Sized> Logger for Box<L> {
    fn log(&self, level: Severity, message: &dyn fmt::Display, context: Context) {
        (**self).log(level, message, context);
    }

    fn flush(&self) {
        (**self).flush();
    }
}

impl<L: Logger + ?Sized> Logger for &L {
    fn log(&self, level: Severity, message: &dyn fmt::Display, context: Context) {
        (**self).log(level, message, context);
    }

    fn flush(&self) {
        (**self).flush();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::context;
    use crate::error::Error;

    /// Remembers only the last call.
    #[derive(Default)]
    struct LastCall {
        last: RefCell<Option<(Severity, String, Context)>>,
    }

    impl Logger for LastCall {
        fn log(&self, level: Severity, message: &dyn fmt::Display, context: Context) {
            *self.last.borrow_mut() = Some((level, message.to_string(), context));
        }
    }

    #[test]
    fn each_convenience_method_routes_through_log() {
        let logger = LastCall::default();
        let calls: [(Severity, fn(&LastCall, &str, Context)); 8] = [
            (Severity::Emergency, |l, m, c| l.emergency(m, c)),
            (Severity::Alert, |l, m, c| l.alert(m, c)),
            (Severity::Critical, |l, m, c| l.critical(m, c)),
            (Severity::Error, |l, m, c| l.error(m, c)),
            (Severity::Warning, |l, m, c| l.warning(m, c)),
            (Severity::Notice, |l, m, c| l.notice(m, c)),
            (Severity::Info, |l, m, c| l.info(m, c)),
            (Severity::Debug, |l, m, c| l.debug(m, c)),
        ];
        for (severity, call) in calls {
            call(&logger, "Test", context! { "foo" => "bar" });
            let last = logger.last.borrow_mut().take();
            assert_eq!(last, Some((severity, "Test".to_string(), context! { "foo" => "bar" })));
        }
    }

    #[test]
    fn log_raw_accepts_codes_and_names() {
        let logger = LastCall::default();
        logger.log_raw(4, "w", Context::new()).unwrap();
        assert_eq!(logger.last.borrow().as_ref().map(|c| c.0), Some(Severity::Warning));
        logger.log_raw("notice", "n", Context::new()).unwrap();
        assert_eq!(logger.last.borrow().as_ref().map(|c| c.0), Some(Severity::Notice));
    }

    #[test]
    fn log_raw_rejects_unknown_levels_without_logging() {
        let logger = LastCall::default();
        let result = logger.log_raw("loud", "x", Context::new());
        assert!(matches!(result, Err(Error::InvalidLevel { .. })));
        assert!(logger.last.borrow().is_none());
    }

    #[test]
    fn shared_handles_are_loggers_too() {
        let inner = Rc::new(LastCall::default());
        let shared: Rc<dyn Logger> = inner.clone();
        shared.info(format_args!("n={}", 3), Context::new());
        assert_eq!(
            inner.last.borrow().as_ref().map(|c| c.1.clone()),
            Some("n=3".to_string())
        );
    }
}
