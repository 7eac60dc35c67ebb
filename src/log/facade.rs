use std::fmt;

use tracing::{debug, error, info, warn};

use crate::core::context::Context;
use crate::core::render::StructuredFormatter;
use crate::log::Logger;
use crate::types::Severity;

/// Relays calls to the `tracing` facade.
///
/// Emergency through error map to `ERROR`, warning to `WARN`, notice and
/// info to `INFO`, debug to `DEBUG`. The `Severity` itself travels as the
/// `severity` field and the rendered context, if any, as `context`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger {
    formatter: StructuredFormatter,
}

impl TracingLogger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: Severity, message: &dyn fmt::Display, context: Context) {
        let rendered = if context.is_empty() {
            String::new()
        } else {
            self.formatter.render(&context)
        };
        let severity = level.name();
        match level {
            Severity::Emergency | Severity::Alert | Severity::Critical | Severity::Error => {
                error!(severity, context = %rendered, "{}", message)
            }
            Severity::Warning => warn!(severity, context = %rendered, "{}", message),
            Severity::Notice | Severity::Info => info!(severity, context = %rendered, "{}", message),
            Severity::Debug => debug!(severity, context = %rendered, "{}", message),
        }
    }
}
