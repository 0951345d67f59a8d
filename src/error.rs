use thiserror::Error;

use crate::jvmti::StatusCode;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// Exit code the agent terminates the host process with on any fatal condition.
pub const FATAL_EXIT_CODE: i32 = 3;

/// The generic Error type, which provides coverage for all errors this agent can
/// potentially encounter.
///
/// Decoding a primitive or malformed class signature is *not* an error; the decoder reports
/// that case as "no value". Everything in here is fatal to the agent, and by extension to
/// the host process it is loaded into.
///
/// # Error Categories
///
/// - [`Error::Jvmti`] - A JVMTI call returned a status other than `JVMTI_ERROR_NONE`
/// - [`Error::Malformed`] - The agent option string could not be parsed
/// - [`Error::FileError`] - The configured output sink could not be opened
/// - [`Error::AlreadyLoaded`] - The agent was loaded twice into the same process
///
/// # Examples
///
/// ```rust
/// use countagent::{Error, jvmti::StatusCode};
///
/// let error = Error::Jvmti {
///     status: StatusCode::NOT_AVAILABLE,
///     name: "JVMTI_ERROR_NOT_AVAILABLE".to_string(),
///     context: "Unable to get necessary JVMTI capabilities.".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "JVMTI: 98(JVMTI_ERROR_NOT_AVAILABLE): Unable to get necessary JVMTI capabilities."
/// );
/// assert_eq!(error.exit_code(), 3);
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A JVMTI function returned a failure status.
    ///
    /// # Fields
    ///
    /// * `status` - The raw status the JVM returned
    /// * `name` - The resolved name of the status, or `Unknown`
    /// * `context` - What the agent was attempting when the call failed
    #[error("JVMTI: {status}({name}): {context}")]
    Jvmti {
        /// The status code returned by the JVM
        status: StatusCode,
        /// The human readable name of `status`
        name: String,
        /// The operation that failed, may be empty
        context: String,
    },

    /// The agent options are malformed.
    ///
    /// The error includes the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// File I/O error while opening the event output.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// A second `Agent_OnLoad` was attempted in a process that already runs the agent.
    #[error("The agent has already been loaded into this process")]
    AlreadyLoaded,
}

impl Error {
    /// The process exit code associated with this error.
    ///
    /// Every error kind is fatal and maps to the same code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        FATAL_EXIT_CODE
    }

    /// The status code carried by a [`Error::Jvmti`], if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Jvmti { status, .. } => Some(*status),
            _ => None,
        }
    }
}
