//! Fan-out diagnostic logging.
//!
//! The gateway only logs diagnostics (stream aborts, ingest failures); it
//! never depends on a log call's outcome. Sinks are fire-and-forget and a
//! log call never fails or panics.

use std::sync::{Arc, RwLock};

/// Severity accepted by the diagnostic sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// A single diagnostic destination. Implementations must not panic.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

/// Fans each diagnostic message out to an ordered list of sinks.
///
/// Sinks may be added or removed while other tasks are logging; the list is
/// locked only for the duration of a single call.
pub struct FanoutLogger {
    sinks: RwLock<Vec<Arc<dyn LogSink>>>,
}

impl FanoutLogger {
    pub fn new() -> Self {
        Self {
            sinks: RwLock::new(Vec::new()),
        }
    }

    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        let logger = Self::new();
        logger.add(sink);
        logger
    }

    /// Append a sink; it receives every subsequent message, after the sinks
    /// added before it.
    pub fn add(&self, sink: Arc<dyn LogSink>) {
        if let Ok(mut sinks) = self.sinks.write() {
            sinks.push(sink);
        }
    }

    /// Detach a previously added sink.
    pub fn remove(&self, sink: &Arc<dyn LogSink>) {
        if let Ok(mut sinks) = self.sinks.write() {
            sinks.retain(|existing| !Arc::ptr_eq(existing, sink));
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        // a poisoned sink list drops the message rather than panic
        let Ok(sinks) = self.sinks.read() else {
            return;
        };
        for sink in sinks.iter() {
            sink.log(level, message);
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

impl Default for FanoutLogger {
    fn default() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }
}

/// Forwards diagnostics to the ambient `tracing` subscriber.
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warning => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CaptureSink {
        name: &'static str,
        seen: Mutex<Vec<(LogLevel, String)>>,
    }

    impl CaptureSink {
        fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn messages(&self) -> Vec<(LogLevel, String)> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl LogSink for CaptureSink {
        fn log(&self, level: LogLevel, message: &str) {
            self.seen
                .lock()
                .unwrap()
                .push((level, format!("{}:{}", self.name, message)));
        }
    }

    #[test]
    fn every_sink_sees_every_message() {
        let first = CaptureSink::new("a");
        let second = CaptureSink::new("b");

        let logger = FanoutLogger::new();
        logger.add(first.clone());
        logger.add(second.clone());

        logger.info("one");
        logger.error("two");

        for sink in [&first, &second] {
            let seen = sink.messages();
            assert_eq!(seen.len(), 2);
            assert_eq!(seen[0].0, LogLevel::Info);
            assert_eq!(seen[1].0, LogLevel::Error);
        }
    }

    #[test]
    fn removed_sink_stops_receiving() {
        let kept = CaptureSink::new("kept");
        let dropped = CaptureSink::new("dropped");

        let logger = FanoutLogger::new();
        logger.add(kept.clone());
        let handle: Arc<dyn LogSink> = dropped.clone();
        logger.add(handle.clone());

        logger.warning("before");
        logger.remove(&handle);
        logger.warning("after");

        assert_eq!(kept.messages().len(), 2);
        assert_eq!(dropped.messages().len(), 1);
    }

    #[test]
    fn logging_with_no_sinks_is_a_no_op() {
        let logger = FanoutLogger::new();
        logger.debug("nobody listening");
        logger.error("still nobody");
    }
}
