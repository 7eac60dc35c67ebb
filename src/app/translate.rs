//! Turning a caught failure into one error-level log entry.
//!
//! User-input failures get a short context (class, code, location, plus the
//! offending value or leftover tokens where the kind carries one).
//! Unexpected failures get the backtrace and the whole cause chain.
use std::error::Error as StdError;

use crate::app::EXIT_FAILURE;
use crate::core::context::Context;
use crate::error::{Error, ErrorKind, SourceLocation};
use crate::log::Logger;
use crate::types::Severity;

/// Flattened view of a failure and, through `cause`, everything behind it.
#[derive(Clone, Debug, PartialEq)]
pub struct FailureRecord {
    pub kind: ErrorKind,
    pub class: String,
    pub message: String,
    pub code: i64,
    pub location: Option<SourceLocation>,
    pub extra: Context,
    pub trace: Option<String>,
    pub cause: Option<Box<FailureRecord>>,
}

impl FailureRecord {
    pub fn from_error(error: &Error) -> Self {
        let mut causes = Vec::new();
        let mut next = StdError::source(error);
        while let Some(cause) = next {
            causes.push(match cause.downcast_ref::<Error>() {
                Some(ours) => Self::single(ours),
                None => Self::foreign(cause),
            });
            next = cause.source();
        }
        let mut record = Self::single(error);
        record.cause = causes
            .into_iter()
            .rev()
            .fold(None, |inner, mut cause| {
                cause.cause = inner;
                Some(Box::new(cause))
            });
        record
    }

    fn single(error: &Error) -> Self {
        let mut extra = Context::new();
        match error {
            Error::BadArgument { value, .. } => {
                extra.insert("value", value.as_str());
            }
            Error::ExtraArguments { extra: tokens, .. } => {
                extra.insert("extra", tokens.clone());
            }
            _ => {}
        }
        Self {
            kind: error.kind(),
            class: error.class().to_string(),
            message: error.to_string(),
            code: error.code(),
            location: Some(error.location()),
            extra,
            trace: error.trace().map(str::to_string),
            cause: None,
        }
    }

    fn foreign(error: &(dyn StdError + 'static)) -> Self {
        Self {
            kind: ErrorKind::Unexpected,
            class: "error".to_string(),
            message: error.to_string(),
            code: 0,
            location: None,
            extra: Context::new(),
            trace: None,
            cause: None,
        }
    }

    /// Depth of the cause chain, counting this record.
    pub fn depth(&self) -> usize {
        std::iter::successors(Some(self), |record| record.cause.as_deref()).count()
    }

    /// Class, code, location and kind-specific extras.
    pub fn brief_context(&self) -> Context {
        let mut context = Context::new()
            .with("class", self.class.as_str())
            .with("code", self.code);
        if let Some(location) = self.location {
            context.insert("file", location.file);
            context.insert("line", location.line);
        }
        for (key, value) in self.extra.iter() {
            context.insert(key, value.clone());
        }
        context
    }

    /// Brief context plus message, backtrace and nested causes, built from
    /// the innermost cause outwards.
    pub fn full_context(&self) -> Context {
        let records: Vec<&FailureRecord> =
            std::iter::successors(Some(self), |record| record.cause.as_deref()).collect();
        let mut inner: Option<Context> = None;
        for (depth, record) in records.iter().enumerate().rev() {
            let mut context = record.brief_context();
            if depth > 0 {
                context.insert("message", record.message.as_str());
            }
            if let Some(trace) = &record.trace {
                context.insert("backtrace", trace.as_str());
            }
            if let Some(cause) = inner.take() {
                context.insert("cause", cause);
            }
            inner = Some(context);
        }
        inner.unwrap_or_default()
    }
}

/// Single policy point for failures: log at error severity and pick the
/// exit status. Nothing is retried.
#[derive(Clone, Copy, Debug)]
pub struct ErrorTranslator {
    failure_status: Option<i32>,
}

impl Default for ErrorTranslator {
    fn default() -> Self {
        Self {
            failure_status: Some(EXIT_FAILURE),
        }
    }
}

impl ErrorTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `status` instead of [`EXIT_FAILURE`]; `None` means do not exit.
    pub fn with_status(status: Option<i32>) -> Self {
        Self {
            failure_status: status,
        }
    }

    /// Message and context for `error`, sized by its kind.
    pub fn translate(&self, error: &Error) -> (String, Context) {
        let record = FailureRecord::from_error(error);
        let context = match record.kind {
            ErrorKind::Unexpected => record.full_context(),
            ErrorKind::InvalidLevel
            | ErrorKind::UnknownOption
            | ErrorKind::InvalidArgument
            | ErrorKind::MissingArgument
            | ErrorKind::BadArgument
            | ErrorKind::ExtraArguments => record.brief_context(),
        };
        (record.message, context)
    }

    /// Log `error` once at error severity and return the exit status.
    pub fn handle(&self, log: &dyn Logger, error: &Error) -> Option<i32> {
        let (message, context) = self.translate(error);
        log.log(Severity::Error, &message, context);
        self.failure_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Value;
    use crate::log::BufferLogger;

    #[test]
    fn bad_argument_carries_value_without_backtrace() {
        let (message, context) = ErrorTranslator::new().translate(&Error::bad_argument("TEST", "foo"));
        assert_eq!(message, "TEST");
        assert_eq!(context.get("value"), Some(&Value::from("foo")));
        assert_eq!(context.get("class"), Some(&Value::from("BadArgument")));
        assert_eq!(context.get("code"), Some(&Value::Int(0)));
        assert!(context.contains_key("file"));
        assert!(context.contains_key("line"));
        assert!(!context.contains_key("backtrace"));
        assert!(!context.contains_key("cause"));
    }

    #[test]
    fn invalid_and_missing_arguments_get_minimal_context() {
        for error in [Error::invalid_argument("bad"), Error::missing_argument("none")] {
            let (_, context) = ErrorTranslator::new().translate(&error);
            assert_eq!(context.keys().collect::<Vec<_>>(), vec!["class", "code", "file", "line"]);
        }
    }

    #[test]
    fn extra_arguments_list_the_leftovers() {
        let error = Error::extra_arguments("too many", vec!["a".to_string(), "b".to_string()]);
        let (_, context) = ErrorTranslator::new().translate(&error);
        match context.get("extra") {
            Some(Value::List(items)) => {
                assert_eq!(*items.borrow(), vec![Value::from("a"), Value::from("b")]);
            }
            other => panic!("expected list, got {:?}", other),
        }
        assert!(!context.contains_key("backtrace"));
    }

    #[test]
    fn unexpected_includes_backtrace_and_causes() {
        let error = Error::unexpected_with_source("outer", Error::bad_argument("inner", "v"));
        let (message, context) = ErrorTranslator::new().translate(&error);
        assert_eq!(message, "outer");
        assert!(context.contains_key("backtrace"));
        match context.get("cause") {
            Some(Value::Map(cause)) => {
                let cause = cause.borrow();
                assert_eq!(cause.get("message"), Some(&Value::from("inner")));
                assert_eq!(cause.get("value"), Some(&Value::from("v")));
                assert!(!cause.contains_key("backtrace"));
            }
            other => panic!("expected nested cause, got {:?}", other),
        }
    }

    #[test]
    fn cause_chain_is_walked_to_the_end() {
        let io = std::io::Error::other("disk gone");
        let middle = Error::unexpected_with_source("read failed", io);
        let top = Error::unexpected_with_source("load failed", middle);
        let record = FailureRecord::from_error(&top);
        assert_eq!(record.depth(), 3);
        let last = record.cause.as_ref().and_then(|c| c.cause.as_ref()).unwrap();
        assert_eq!(last.message, "disk gone");
        assert_eq!(last.kind, ErrorKind::Unexpected);
        assert!(last.location.is_none());
    }

    #[test]
    fn handle_logs_once_at_error_and_returns_failure_status() {
        let log = BufferLogger::new();
        let status = ErrorTranslator::new().handle(&log, &Error::invalid_argument("nope"));
        assert_eq!(status, Some(EXIT_FAILURE));
        assert_eq!(log.count(), 1);
        let entry = log.pop_oldest().unwrap();
        assert_eq!(entry.level(), Severity::Error);
        assert_eq!(entry.message(), "nope");
    }

    #[test]
    fn status_can_be_overridden() {
        let log = BufferLogger::new();
        let status = ErrorTranslator::with_status(None).handle(&log, &Error::unexpected("x"));
        assert_eq!(status, None);
        assert_eq!(log.count(), 1);
    }
}
