//! The event stream.
//!
//! Each observed event becomes one line `<microseconds>,<OP>,<class name>`, written and
//! flushed immediately. The JVM delivers events on many threads at once, so the sink sits
//! behind a lock and every line is written while holding it; lines never interleave.

use std::{
    fmt,
    io::{self, Write},
    sync::Mutex,
};

use strum::{Display, EnumString, IntoStaticStr};

/// The kind of event a record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum Operation {
    /// An object was allocated.
    #[strum(serialize = "ADD")]
    Add,
    /// An object was freed.
    #[strum(serialize = "DELETE")]
    Delete,
}

/// A single observed event, serialised as `<timestamp>,<operation>,<class name>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventRecord<'a> {
    /// What happened
    pub operation: Operation,
    /// Microseconds since the Unix epoch
    pub timestamp: i64,
    /// Display name of the class involved
    pub class_name: &'a str,
}

impl<'a> EventRecord<'a> {
    /// A record of `operation` on `class_name`, stamped with the current time.
    #[must_use]
    pub fn now(operation: Operation, class_name: &'a str) -> Self {
        EventRecord {
            operation,
            timestamp: chrono::Utc::now().timestamp_micros(),
            class_name,
        }
    }
}

impl fmt::Display for EventRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.timestamp, self.operation, self.class_name)
    }
}

/// Writes [`EventRecord`]s to a shared sink, one flushed line per record.
pub struct EventRecorder {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl EventRecorder {
    /// Create a recorder writing to `sink`.
    pub fn new<W: Write + Send + 'static>(sink: W) -> Self {
        EventRecorder {
            sink: Mutex::new(Box::new(sink)),
        }
    }

    /// Record `operation` on `class_name` at the current time.
    pub fn emit(&self, operation: Operation, class_name: &str) {
        self.record(&EventRecord::now(operation, class_name));
    }

    /// Write `record` as one line and flush.
    ///
    /// A failing sink is logged and otherwise ignored: losing an event line must never take
    /// the JVM down.
    pub fn record(&self, record: &EventRecord<'_>) {
        let mut sink = lock!(self.sink);
        if let Err(error) = writeln!(sink, "{record}").and_then(|()| sink.flush()) {
            tracing::warn!(%error, "failed to write event record");
        }
    }
}

impl fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRecorder").finish_non_exhaustive()
    }
}
