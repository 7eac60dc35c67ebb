//! Shared types used across cliframe.
//! Includes the canonical `Severity` scale, the `RawLevel` input forms it
//! is normalized from, and the `OptionValue` carried by parsed options.
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Syslog-style log severity, ordered from most to least severe.
///
/// `Severity::Emergency < Severity::Debug`: comparisons follow declaration
/// order, so "at least as severe as" is `<=`.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl Severity {
    pub const ALL: [Severity; 8] = [
        Severity::Emergency,
        Severity::Alert,
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Notice,
        Severity::Info,
        Severity::Debug,
    ];

    /// Legacy syslog integer code (`LOG_EMERG` = 0 .. `LOG_DEBUG` = 7).
    pub fn code(self) -> i64 {
        match self {
            Severity::Emergency => 0,
            Severity::Alert => 1,
            Severity::Critical => 2,
            Severity::Error => 3,
            Severity::Warning => 4,
            Severity::Notice => 5,
            Severity::Info => 6,
            Severity::Debug => 7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Emergency => "emergency",
            Severity::Alert => "alert",
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }

    /// Upper-case label used by formatting sinks.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Emergency => "EMERGENCY",
            Severity::Alert => "ALERT",
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Notice => "NOTICE",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Normalize any accepted level representation to the canonical value.
    ///
    /// Normalization is idempotent: feeding the result back in yields the
    /// same severity. Anything that is not a known code or exact name fails
    /// with [`Error::InvalidLevel`].
    pub fn normalize(level: impl Into<RawLevel>) -> Result<Severity> {
        match level.into() {
            RawLevel::Canonical(severity) => Ok(severity),
            RawLevel::Code(code) => Severity::try_from(code),
            RawLevel::Name(name) => name.parse(),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.name() == s)
            .ok_or_else(|| Error::invalid_level(s))
    }
}

impl TryFrom<i64> for Severity {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.code() == code)
            .ok_or_else(|| Error::invalid_level(code))
    }
}

/// A level as supplied by a caller, before normalization.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RawLevel {
    Canonical(Severity),
    Code(i64),
    Name(String),
}

impl From<Severity> for RawLevel {
    fn from(severity: Severity) -> Self {
        RawLevel::Canonical(severity)
    }
}

impl From<i64> for RawLevel {
    fn from(code: i64) -> Self {
        RawLevel::Code(code)
    }
}

impl From<i32> for RawLevel {
    fn from(code: i32) -> Self {
        RawLevel::Code(i64::from(code))
    }
}

impl From<&str> for RawLevel {
    fn from(name: &str) -> Self {
        RawLevel::Name(name.to_string())
    }
}

impl From<String> for RawLevel {
    fn from(name: String) -> Self {
        RawLevel::Name(name)
    }
}

/// Value attached to a parsed command-line option.
///
/// `--name` yields `Flag(true)`, `--no-name` yields `Flag(false)` and
/// `--name=value` yields `Value("value")`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum OptionValue {
    Flag(bool),
    Value(String),
}

impl OptionValue {
    /// Coerce to a boolean, parsing string values with [`crate::parse_bool`].
    pub fn to_bool(&self) -> Result<bool> {
        match self {
            OptionValue::Flag(flag) => Ok(*flag),
            OptionValue::Value(token) => crate::io::args::parse_bool(token),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Flag(_) => None,
            OptionValue::Value(value) => Some(value),
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Flag(flag) => write!(f, "{}", flag),
            OptionValue::Value(value) => write!(f, "{}", value),
        }
    }
}
