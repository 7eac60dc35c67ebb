//! I/O edges of the framework: the command-line token source (`args`) and
//! the text sinks formatting loggers write to (`sink`).
pub mod args;
pub use args::{Arguments, parse_bool};

pub mod sink;
pub use sink::{MemorySink, Sink, StderrSink, WriterSink};
