use std::rc::Rc;

use cliframe::{Logger, StderrLogger, TracingLogger};
use tracing_subscriber::EnvFilter;

/// Environment variable choosing the log backend: `tracing` or `stderr`.
pub const LOG_ENV: &str = "CLIFRAME_LOG";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Stderr,
    Tracing,
}

impl Backend {
    /// Anything but `tracing` (case-insensitive) means stderr.
    pub fn from_setting(setting: Option<&str>) -> Self {
        match setting {
            Some(value) if value.eq_ignore_ascii_case("tracing") => Backend::Tracing,
            _ => Backend::Stderr,
        }
    }
}

/// Build the logger for this process, installing a `tracing` subscriber
/// when that backend is selected.
pub fn select_logger() -> Rc<dyn Logger> {
    let setting = std::env::var(LOG_ENV).ok();
    match Backend::from_setting(setting.as_deref()) {
        Backend::Tracing => {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("debug"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Rc::new(TracingLogger::new())
        }
        Backend::Stderr => Rc::new(StderrLogger::stderr()),
    }
}
