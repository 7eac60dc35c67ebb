use std::fmt;
use std::rc::Rc;

use crate::core::context::Context;
use crate::log::Logger;
use crate::types::Severity;

/// Forwards every call to an injected logger.
///
/// The run loop keeps its base logger behind one of these so its own
/// filtering rule sits in front of the sink rather than inside it.
#[derive(Clone)]
pub struct RelayLogger {
    inner: Rc<dyn Logger>,
}

impl RelayLogger {
    pub fn new(inner: Rc<dyn Logger>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Rc<dyn Logger> {
        &self.inner
    }
}

impl Logger for RelayLogger {
    fn log(&self, level: Severity, message: &dyn fmt::Display, context: Context) {
        self.inner.log(level, message, context);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context;
    use crate::log::BufferLogger;

    #[test]
    fn forwards_every_severity_unchanged() {
        let buffer = Rc::new(BufferLogger::new());
        let relay = RelayLogger::new(buffer.clone());
        for severity in Severity::ALL {
            relay.log(severity, &"msg", context! { "k" => severity.name() });
        }
        let levels: Vec<Severity> = buffer.entries().iter().map(|e| e.level()).collect();
        assert_eq!(levels, Severity::ALL.to_vec());
        assert_eq!(buffer.entries()[7].context(), &context! { "k" => "debug" });
    }
}
