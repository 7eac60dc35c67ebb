use std::fmt;

use chrono::{DateTime, Utc};

use crate::core::context::Context;
use crate::error::Result;
use crate::types::{RawLevel, Severity};

/// One recorded log event. Immutable once built.
#[derive(Clone, Debug)]
pub struct LogEntry {
    level: Severity,
    message: String,
    context: Context,
    timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Build an entry from any accepted level form.
    ///
    /// Fails with [`crate::Error::InvalidLevel`] when `level` is neither a
    /// known syslog code nor an exact severity name.
    pub fn new(level: impl Into<RawLevel>, message: impl fmt::Display, context: Context) -> Result<Self> {
        Ok(Self::with_severity(Severity::normalize(level)?, message, context))
    }

    pub fn with_severity(level: Severity, message: impl fmt::Display, context: Context) -> Self {
        Self {
            level,
            message: message.to_string(),
            context,
            timestamp: Utc::now(),
        }
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context;
    use crate::error::Error;

    #[test]
    fn normalizes_level_on_construction() {
        let entry = LogEntry::new(3, "boom", context! { "foo" => "bar" }).unwrap();
        assert_eq!(entry.level(), Severity::Error);
        assert_eq!(entry.message(), "boom");
        assert_eq!(entry.context(), &context! { "foo" => "bar" });

        let entry = LogEntry::new("debug", "quiet", Context::new()).unwrap();
        assert_eq!(entry.level(), Severity::Debug);
    }

    #[test]
    fn rejects_invalid_levels() {
        let err = LogEntry::new(42, "x", Context::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidLevel { ref level, .. } if level == "42"));
    }

    #[test]
    fn stringifies_display_messages() {
        let entry = LogEntry::with_severity(Severity::Info, format_args!("{}-{}", "a", 1), Context::new());
        assert_eq!(entry.message(), "a-1");
        assert!(entry.timestamp() <= Utc::now());
    }
}
