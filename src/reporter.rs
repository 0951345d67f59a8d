//! Turning JVMTI failures into fatal diagnostics.
//!
//! Every fallible host call in the agent goes through [`check`] or [`report`]. There is no
//! retry and no partial success: a failed call becomes an [`Error::Jvmti`], which propagates
//! to the callback or load boundary where [`terminate`] writes the diagnostic and hands back
//! the exit code the host process is terminated with.
//!
//! The diagnostic has the fixed shape
//!
//! ```text
//! ERROR: JVMTI: <code>(<name>): <message>
//! ```

use std::io::Write;

use crate::{host::HostResult, jvmti::StatusCode, Error, Result};

/// Fallback for statuses `jvmti.h` does not define.
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Resolve a printable name for `status`, e.g. `JVMTI_ERROR_NOT_AVAILABLE`.
#[must_use]
pub fn status_name(status: StatusCode) -> String {
    status.name().unwrap_or_else(|| UNKNOWN_STATUS.to_string())
}

/// Check the status of a host call.
///
/// A successful status is a no-op; anything else becomes a fatal [`Error::Jvmti`] carrying
/// the resolved status name and `context`.
///
/// # Errors
/// Returns [`Error::Jvmti`] for any status other than `JVMTI_ERROR_NONE`
pub fn report(status: StatusCode, context: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }

    Err(failure(status, context))
}

/// [`report`] for a host call that produces a value.
///
/// # Errors
/// Returns [`Error::Jvmti`] if `result` holds a failure status
pub fn check<T>(result: HostResult<T>, context: &str) -> Result<T> {
    result.map_err(|status| failure(status, context))
}

fn failure(status: StatusCode, context: &str) -> Error {
    Error::Jvmti {
        status,
        name: status_name(status),
        context: context.to_string(),
    }
}

/// Write the single diagnostic line for `error` and return the exit code to terminate with.
///
/// The caller passes the code to [`std::process::exit`]; see [`crate::agent::abort`].
pub fn terminate(error: &Error, stream: &mut dyn Write) -> i32 {
    let _ = writeln!(stream, "ERROR: {error}");
    let _ = stream.flush();
    tracing::error!(%error, "agent failure, terminating");
    error.exit_code()
}
