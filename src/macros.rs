#![allow(unused_macros)]

/// Helper macro for locking items, recovering the guard from a poisoned lock
///
/// Callbacks run on JVM threads where a panic must not escape, so a poisoned
/// lock is taken over instead of unwrapped.
///
/// ```rust, ignore
///  let mut sink = lock!(self.sink);
///  sink.flush()?;
/// ```
macro_rules! lock {
    ($lock:expr) => {
        match $lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    };
}
