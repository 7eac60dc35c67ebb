use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

use crate::core::context::Context;
use crate::log::{LogEntry, Logger};
use crate::types::Severity;

/// In-memory FIFO of log entries.
///
/// Stores every call, debug included; filtering belongs to whoever wraps
/// it. A bounded buffer drops its oldest entry once full.
#[derive(Debug, Default)]
pub struct BufferLogger {
    entries: RefCell<VecDeque<LogEntry>>,
    max_entries: Option<usize>,
}

impl BufferLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounded(max_entries: usize) -> Self {
        Self {
            entries: RefCell::new(VecDeque::with_capacity(max_entries)),
            max_entries: Some(max_entries),
        }
    }

    pub fn count(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Remove and return the oldest entry, or `None` when empty.
    pub fn pop_oldest(&self) -> Option<LogEntry> {
        self.entries.borrow_mut().pop_front()
    }

    /// Copy of the current contents, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Logger for BufferLogger {
    fn log(&self, level: Severity, message: &dyn fmt::Display, context: Context) {
        let mut entries = self.entries.borrow_mut();
        entries.push_back(LogEntry::with_severity(level, message, context));
        if let Some(max) = self.max_entries {
            while entries.len() > max {
                entries.pop_front();
            }
        }
    }
}
