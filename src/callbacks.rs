//! The per-event handlers.
//!
//! [`Tracker`] holds everything an event needs (the host and the event recorder) and
//! implements the allocation and free handlers as plain methods, so they can be exercised
//! against any [`Host`]. The loaded agent forwards the JVM's `VMObjectAlloc` and `ObjectFree`
//! events to [`Tracker::vm_object_alloc`] and [`Tracker::object_free`].
//!
//! Handlers run synchronously on whichever JVM thread allocates or frees an object, possibly
//! on many threads at once. They keep no state between calls: every host buffer acquired
//! during an event is released before the handler returns.

use crate::{
    agent, descriptor,
    host::Host,
    jvmti::jni::{jclass, jlong},
    recorder::{EventRecorder, Operation},
    registry::CallbackTable,
    reporter, Result,
};

/// The allocation and free handlers, bound to a host and an output.
#[derive(Debug)]
pub struct Tracker<H> {
    host: H,
    recorder: EventRecorder,
}

impl<H: Host> Tracker<H> {
    /// Create a tracker for `host`, recording to `recorder`.
    pub fn new(host: H, recorder: EventRecorder) -> Self {
        Tracker { host, recorder }
    }

    /// The host this tracker observes.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The event stream of this tracker.
    pub fn recorder(&self) -> &EventRecorder {
        &self.recorder
    }

    /// Handle the allocation of an object of class `class`.
    ///
    /// Emits one `ADD` record for reference types; primitive allocations are skipped
    /// silently. The decoded name is released before returning.
    ///
    /// # Errors
    /// Returns [`crate::Error::Jvmti`] if the signature lookup, the allocation of the class
    /// name, or its release fails
    pub fn object_allocated(&self, class: jclass) -> Result<()> {
        let signature = reporter::check(
            self.host.class_signature(class),
            "Unable to get class signature",
        )?;

        let Some(name) = descriptor::decode(&self.host, signature.as_bytes())? else {
            return Ok(());
        };

        self.recorder.emit(Operation::Add, &name.to_str());
        reporter::check(name.release(), "Unable to deallocate class name")
    }

    /// Handle the collection of the object tagged `tag`.
    ///
    /// The class of a freed object may already be gone, so no name is resolved and nothing
    /// is written to the event stream.
    pub fn object_free(&self, tag: jlong) {
        tracing::trace!(tag, "Object Freed");
    }

    /// The `VMObjectAlloc` handler: [`Tracker::object_allocated`], terminating the process
    /// on failure.
    pub fn vm_object_alloc(&self, class: jclass) {
        if let Err(error) = self.object_allocated(class) {
            agent::abort(&error);
        }
    }
}

impl CallbackTable {
    /// The table binding both channels to this agent's handlers.
    #[must_use]
    pub fn agent() -> Self {
        CallbackTable {
            object_free: true,
            vm_object_alloc: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        jvmti::StatusCode,
        registry::EventChannel,
        test::{Call, MockHost, SharedBuffer},
    };

    fn tracker(classes: &[&str]) -> (Tracker<MockHost>, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let tracker = Tracker::new(
            MockHost::with_classes(classes),
            EventRecorder::new(buffer.clone()),
        );
        (tracker, buffer)
    }

    fn assert_add_line(line: &str, class_name: &str) {
        let (timestamp, rest) = line.split_once(',').unwrap();
        assert!(!timestamp.is_empty() && timestamp.bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(rest, format!("ADD,{class_name}"));
    }

    #[test]
    fn reference_allocation_emits_add() {
        let (tracker, buffer) = tracker(&["Ljava/util/ArrayList;"]);
        tracker.object_allocated(MockHost::class(0)).unwrap();

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert_add_line(&lines[0], "java.util.ArrayList");
    }

    #[test]
    fn array_allocation_emits_suffix() {
        let (tracker, buffer) = tracker(&["[Ljava/lang/String;"]);
        tracker.object_allocated(MockHost::class(0)).unwrap();

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert_add_line(&lines[0], "java.lang.String[]");
    }

    #[test]
    fn primitive_allocation_is_silent() {
        let (tracker, buffer) = tracker(&["I"]);
        tracker.object_allocated(MockHost::class(0)).unwrap();

        assert!(buffer.lines().is_empty());
        assert_eq!(tracker.host().allocations(), 0);
        assert_eq!(tracker.host().live(), 0);
    }

    #[test]
    fn every_buffer_is_released() {
        let (tracker, _buffer) = tracker(&["Ljava/lang/Object;", "J", "[Lpkg/Name;"]);
        for class in 0..3 {
            tracker.object_allocated(MockHost::class(class)).unwrap();
        }

        let host = tracker.host();
        // one class name per reference type
        assert_eq!(host.allocations(), 2);
        assert_eq!(host.signature_lookups(), 3);
        assert_eq!(host.deallocations(), 2);
        assert_eq!(host.live(), 0);
    }

    #[test]
    fn signature_failure_is_fatal() {
        let (tracker, buffer) = tracker(&["Ljava/lang/Object;"]);
        tracker.host().fail(Call::GetClassSignature, StatusCode::INVALID_CLASS);

        let error = tracker.object_allocated(MockHost::class(0)).unwrap_err();
        assert_eq!(error.status(), Some(StatusCode::INVALID_CLASS));
        assert!(buffer.lines().is_empty());
    }

    #[test]
    fn name_allocation_failure_is_fatal() {
        let (tracker, buffer) = tracker(&["Ljava/lang/Object;"]);
        tracker.host().fail(Call::Allocate, StatusCode::OUT_OF_MEMORY);

        let error = tracker.object_allocated(MockHost::class(0)).unwrap_err();
        assert_eq!(error.status(), Some(StatusCode::OUT_OF_MEMORY));
        assert!(buffer.lines().is_empty());
        assert_eq!(tracker.host().live(), 0);
    }

    #[test]
    fn free_resolves_nothing() {
        let (tracker, buffer) = tracker(&["Ljava/lang/Object;"]);
        tracker.object_free(42);

        assert!(buffer.lines().is_empty());
        assert_eq!(tracker.host().signature_lookups(), 0);
        assert_eq!(tracker.host().allocations(), 0);
    }

    #[test]
    fn release_failure_is_fatal() {
        let (tracker, buffer) = tracker(&["Ljava/lang/Object;"]);
        tracker.host().fail(Call::Deallocate, StatusCode::INTERNAL);

        let error = tracker.object_allocated(MockHost::class(0)).unwrap_err();
        assert_eq!(error.status(), Some(StatusCode::INTERNAL));
        assert!(error.to_string().ends_with("Unable to deallocate class name"));
        assert_eq!(buffer.lines().len(), 1);
    }

    #[test]
    fn concurrent_allocations() {
        let (tracker, buffer) = tracker(&["Ljava/util/ArrayList;", "[Ljava/lang/String;", "Z"]);

        std::thread::scope(|scope| {
            for thread in 0..6 {
                let tracker = &tracker;
                scope.spawn(move || {
                    for _ in 0..100 {
                        tracker.object_allocated(MockHost::class(thread % 3)).unwrap();
                    }
                });
            }
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 4 * 100);
        let known = |line: &String| {
            line.ends_with(",ADD,java.util.ArrayList") || line.ends_with(",ADD,java.lang.String[]")
        };
        assert!(lines.iter().all(known));
        assert_eq!(tracker.host().live(), 0);
    }

    #[test]
    fn agent_table_binds_both_channels() {
        let table = CallbackTable::agent();

        assert!(table.is_bound(EventChannel::ObjectFreed));
        assert!(table.is_bound(EventChannel::ObjectAllocated));
        assert_eq!(table.channels().count(), 2);
    }
}
