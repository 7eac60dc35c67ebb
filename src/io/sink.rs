//! Text sinks for formatting loggers.
use std::cell::RefCell;
use std::io::Write;

use tracing::warn;

/// Destination for fully formatted log lines.
///
/// Writes are synchronous. A sink that cannot write reports the failure
/// through `tracing` and carries on; logging never fails the caller.
pub trait Sink {
    fn write(&self, text: &str);

    fn flush(&self) {}
}

/// Process standard error, one line per write.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn write(&self, text: &str) {
        let mut stderr = std::io::stderr().lock();
        if let Err(e) = write_line(&mut stderr, text) {
            warn!(error = %e, "failed to write log line to stderr");
        }
    }

    fn flush(&self) {
        if let Err(e) = std::io::stderr().flush() {
            warn!(error = %e, "failed to flush stderr");
        }
    }
}

/// Any `std::io::Write`, e.g. a log file.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn write(&self, text: &str) {
        if let Err(e) = write_line(&mut *self.writer.borrow_mut(), text) {
            warn!(error = %e, "failed to write log line");
        }
    }

    fn flush(&self) {
        if let Err(e) = self.writer.borrow_mut().flush() {
            warn!(error = %e, "failed to flush log writer");
        }
    }
}

/// Accumulates everything written; meant for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySink {
    written: RefCell<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.written.borrow().clone()
    }

    pub fn take(&self) -> String {
        std::mem::take(&mut *self.written.borrow_mut())
    }
}

impl Sink for MemorySink {
    fn write(&self, text: &str) {
        self.written.borrow_mut().push_str(text);
    }
}

fn write_line<W: Write + ?Sized>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}
