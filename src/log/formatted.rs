use std::fmt;

use crate::core::context::{Context, Value};
use crate::core::render::StructuredFormatter;
use crate::io::sink::{Sink, StderrSink};
use crate::log::Logger;
use crate::types::Severity;

/// Logger that turns each call into a single text line for a [`Sink`].
///
/// Line shape: `LABEL(class): message {rendered context}`. A `class` entry
/// in the context moves into the label; a `code` of exactly `0` is dropped.
/// Whatever remains is rendered with [`StructuredFormatter`].
#[derive(Debug, Default)]
pub struct FormattingLogger<S: Sink> {
    sink: S,
    formatter: StructuredFormatter,
}

/// The default application logger.
pub type StderrLogger = FormattingLogger<StderrSink>;

impl StderrLogger {
    pub fn stderr() -> Self {
        Self::new(StderrSink)
    }
}

impl<S: Sink> FormattingLogger<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            formatter: StructuredFormatter::new(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn format_line(&self, level: Severity, message: &str, mut context: Context) -> String {
        let mut label = level.label().to_string();
        let mut line = message.to_string();
        if context.is_empty() {
            return format!("{}: {}", label, line);
        }
        if matches!(context.get("class"), Some(class) if *class != Value::Null) {
            if let Some(class) = context.remove("class") {
                label.push('(');
                label.push_str(&class.scalar_string());
                label.push(')');
            }
        }
        if context.get("code") == Some(&Value::Int(0)) {
            context.remove("code");
        }
        if !context.is_empty() {
            line.push(' ');
            line.push_str(&self.formatter.render(&context));
        }
        format!("{}: {}", label, line)
    }
}

impl<S: Sink> Logger for FormattingLogger<S> {
    fn log(&self, level: Severity, message: &dyn fmt::Display, context: Context) {
        let line = self.format_line(level, &message.to_string(), context);
        self.sink.write(&line);
    }

    fn flush(&self) {
        self.sink.flush();
    }
}
