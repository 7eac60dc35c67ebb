//! Crate-level error type and `Result` alias.
//!
//! Every failure the framework knows about is a variant of [`Error`], one per
//! kind in the failure taxonomy. User-input variants remember where they were
//! raised; `Unexpected` additionally carries a backtrace and an optional
//! underlying cause, which together drive how much context the error
//! translator logs.
use std::backtrace::Backtrace;
use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

use crate::types::OptionValue;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error type accepted as the cause of an unexpected failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Source position where a failure was constructed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Category of a failure, independent of its payload.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum ErrorKind {
    InvalidLevel,
    UnknownOption,
    InvalidArgument,
    MissingArgument,
    BadArgument,
    ExtraArguments,
    Unexpected,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::InvalidLevel => "InvalidLevel",
            ErrorKind::UnknownOption => "UnknownOption",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::MissingArgument => "MissingArgument",
            ErrorKind::BadArgument => "BadArgument",
            ErrorKind::ExtraArguments => "ExtraArguments",
            ErrorKind::Unexpected => "Unexpected",
        }
    }

    /// Kinds caused by user input rather than by a defect.
    pub fn is_user_input(self) -> bool {
        !matches!(self, ErrorKind::Unexpected)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid log level: {level}")]
    InvalidLevel {
        level: String,
        location: SourceLocation,
    },

    #[error("Unknown option \"{name}{}\"", option_suffix(.value))]
    UnknownOption {
        name: String,
        value: Option<String>,
        location: SourceLocation,
    },

    #[error("{message}")]
    InvalidArgument {
        message: String,
        location: SourceLocation,
    },

    #[error("{message}")]
    MissingArgument {
        message: String,
        location: SourceLocation,
    },

    #[error("{message}")]
    BadArgument {
        message: String,
        value: String,
        location: SourceLocation,
    },

    #[error("{message}")]
    ExtraArguments {
        message: String,
        extra: Vec<String>,
        location: SourceLocation,
    },

    #[error("{message}")]
    Unexpected {
        message: String,
        class: String,
        code: i64,
        location: SourceLocation,
        trace: String,
        #[source]
        source: Option<BoxError>,
    },
}

fn option_suffix(value: &Option<String>) -> String {
    match value {
        Some(value) if !value.is_empty() => format!("({})", value),
        _ => String::new(),
    }
}

impl Error {
    #[track_caller]
    pub fn invalid_level(level: impl ToString) -> Self {
        Error::InvalidLevel {
            level: level.to_string(),
            location: SourceLocation::caller(),
        }
    }

    /// Unknown option. Flag values are never echoed back; string values are.
    #[track_caller]
    pub fn unknown_option(name: impl Into<String>, value: &OptionValue) -> Self {
        Error::UnknownOption {
            name: name.into(),
            value: value.as_str().map(str::to_string),
            location: SourceLocation::caller(),
        }
    }

    #[track_caller]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
            location: SourceLocation::caller(),
        }
    }

    #[track_caller]
    pub fn missing_argument(message: impl Into<String>) -> Self {
        Error::MissingArgument {
            message: message.into(),
            location: SourceLocation::caller(),
        }
    }

    #[track_caller]
    pub fn bad_argument(message: impl Into<String>, value: impl Into<String>) -> Self {
        Error::BadArgument {
            message: message.into(),
            value: value.into(),
            location: SourceLocation::caller(),
        }
    }

    #[track_caller]
    pub fn extra_arguments(message: impl Into<String>, extra: Vec<String>) -> Self {
        Error::ExtraArguments {
            message: message.into(),
            extra,
            location: SourceLocation::caller(),
        }
    }

    /// An unexpected failure with no underlying cause.
    #[track_caller]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Error::Unexpected {
            message: message.into(),
            class: ErrorKind::Unexpected.name().to_string(),
            code: 0,
            location: SourceLocation::caller(),
            trace: Backtrace::force_capture().to_string(),
            source: None,
        }
    }

    /// An unexpected failure caused by `source`.
    #[track_caller]
    pub fn unexpected_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Unexpected {
            message: message.into(),
            class: ErrorKind::Unexpected.name().to_string(),
            code: 0,
            location: SourceLocation::caller(),
            trace: Backtrace::force_capture().to_string(),
            source: Some(source.into()),
        }
    }

    /// Wrap a foreign error, keeping its type name as the failure class and
    /// its own cause chain as ours.
    #[track_caller]
    pub fn external<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let message = error.to_string();
        let source = CauseLink::chain(error.source());
        Error::Unexpected {
            message,
            class: std::any::type_name::<E>().to_string(),
            code: 0,
            location: SourceLocation::caller(),
            trace: Backtrace::force_capture().to_string(),
            source: source.map(|link| Box::new(link) as BoxError),
        }
    }

    /// Replace the numeric code of an unexpected failure.
    pub fn with_code(mut self, new_code: i64) -> Self {
        if let Error::Unexpected { code, .. } = &mut self {
            *code = new_code;
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidLevel { .. } => ErrorKind::InvalidLevel,
            Error::UnknownOption { .. } => ErrorKind::UnknownOption,
            Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Error::MissingArgument { .. } => ErrorKind::MissingArgument,
            Error::BadArgument { .. } => ErrorKind::BadArgument,
            Error::ExtraArguments { .. } => ErrorKind::ExtraArguments,
            Error::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    /// Class name reported in log context.
    pub fn class(&self) -> &str {
        match self {
            Error::Unexpected { class, .. } => class,
            other => other.kind().name(),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Error::Unexpected { code, .. } => *code,
            _ => 0,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            Error::InvalidLevel { location, .. }
            | Error::UnknownOption { location, .. }
            | Error::InvalidArgument { location, .. }
            | Error::MissingArgument { location, .. }
            | Error::BadArgument { location, .. }
            | Error::ExtraArguments { location, .. }
            | Error::Unexpected { location, .. } => *location,
        }
    }

    /// Captured backtrace, present only for unexpected failures.
    pub fn trace(&self) -> Option<&str> {
        match self {
            Error::Unexpected { trace, .. } => Some(trace),
            _ => None,
        }
    }
}

/// Owned snapshot of a borrowed cause chain.
#[derive(Debug)]
struct CauseLink {
    message: String,
    next: Option<Box<CauseLink>>,
}

impl CauseLink {
    fn chain(first: Option<&(dyn std::error::Error + 'static)>) -> Option<CauseLink> {
        let mut messages = Vec::new();
        let mut current = first;
        while let Some(cause) = current {
            messages.push(cause.to_string());
            current = cause.source();
        }
        messages.into_iter().rev().fold(None, |next, message| {
            Some(CauseLink {
                message,
                next: next.map(Box::new),
            })
        })
    }
}

impl std::fmt::Display for CauseLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CauseLink {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.next.as_deref().map(|link| link as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    #[track_caller]
    fn from(error: std::io::Error) -> Self {
        let code = error.raw_os_error().map(i64::from).unwrap_or(0);
        Error::external(error).with_code(code)
    }
}
