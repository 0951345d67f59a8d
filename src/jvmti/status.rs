//! JVMTI status codes.
//!
//! Every JVMTI function returns a `jvmtiError`. [`StatusCode`] wraps the raw value so that
//! unknown codes (e.g. ones introduced by newer JVMs) survive untouched, while [`ErrorKind`]
//! names the codes defined by `jvmti.h`.

use std::fmt;

use strum::{EnumIter, FromRepr, IntoStaticStr};

/// The raw result of a JVMTI call. [`StatusCode::NONE`] is success.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u32);

impl StatusCode {
    /// `JVMTI_ERROR_NONE`
    pub const NONE: StatusCode = StatusCode(ErrorKind::None as u32);
    /// `JVMTI_ERROR_INVALID_CLASS`
    pub const INVALID_CLASS: StatusCode = StatusCode(ErrorKind::InvalidClass as u32);
    /// `JVMTI_ERROR_NOT_AVAILABLE`
    pub const NOT_AVAILABLE: StatusCode = StatusCode(ErrorKind::NotAvailable as u32);
    /// `JVMTI_ERROR_MUST_POSSESS_CAPABILITY`
    pub const MUST_POSSESS_CAPABILITY: StatusCode =
        StatusCode(ErrorKind::MustPossessCapability as u32);
    /// `JVMTI_ERROR_NULL_POINTER`
    pub const NULL_POINTER: StatusCode = StatusCode(ErrorKind::NullPointer as u32);
    /// `JVMTI_ERROR_ILLEGAL_ARGUMENT`
    pub const ILLEGAL_ARGUMENT: StatusCode = StatusCode(ErrorKind::IllegalArgument as u32);
    /// `JVMTI_ERROR_OUT_OF_MEMORY`
    pub const OUT_OF_MEMORY: StatusCode = StatusCode(ErrorKind::OutOfMemory as u32);
    /// `JVMTI_ERROR_WRONG_PHASE`
    pub const WRONG_PHASE: StatusCode = StatusCode(ErrorKind::WrongPhase as u32);
    /// `JVMTI_ERROR_INTERNAL`
    pub const INTERNAL: StatusCode = StatusCode(ErrorKind::Internal as u32);

    /// Returns `true` for `JVMTI_ERROR_NONE`.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == StatusCode::NONE
    }

    /// The `jvmti.h` error this status corresponds to, if it is a known one.
    #[must_use]
    pub fn kind(self) -> Option<ErrorKind> {
        ErrorKind::from_repr(self.0)
    }

    /// The `JVMTI_ERROR_*` constant name of a known status.
    #[must_use]
    pub fn name(self) -> Option<String> {
        self.kind().map(|kind| {
            let suffix: &'static str = kind.into();
            format!("JVMTI_ERROR_{suffix}")
        })
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        StatusCode(value)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The error codes defined by `jvmti.h`.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromRepr, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorKind {
    None = 0,
    InvalidThread = 10,
    InvalidThreadGroup = 11,
    InvalidPriority = 12,
    ThreadNotSuspended = 13,
    ThreadSuspended = 14,
    ThreadNotAlive = 15,
    InvalidObject = 20,
    InvalidClass = 21,
    ClassNotPrepared = 22,
    InvalidMethodid = 23,
    InvalidLocation = 24,
    InvalidFieldid = 25,
    InvalidModule = 26,
    NoMoreFrames = 31,
    OpaqueFrame = 32,
    TypeMismatch = 34,
    InvalidSlot = 35,
    Duplicate = 40,
    NotFound = 41,
    InvalidMonitor = 50,
    NotMonitorOwner = 51,
    Interrupt = 52,
    InvalidClassFormat = 60,
    CircularClassDefinition = 61,
    FailsVerification = 62,
    UnsupportedRedefinitionMethodAdded = 63,
    UnsupportedRedefinitionSchemaChanged = 64,
    InvalidTypestate = 65,
    UnsupportedRedefinitionHierarchyChanged = 66,
    UnsupportedRedefinitionMethodDeleted = 67,
    UnsupportedVersion = 68,
    NamesDontMatch = 69,
    UnsupportedRedefinitionClassModifiersChanged = 70,
    UnsupportedRedefinitionMethodModifiersChanged = 71,
    UnsupportedRedefinitionClassAttributeChanged = 72,
    UnsupportedOperation = 73,
    UnmodifiableClass = 79,
    UnmodifiableModule = 80,
    NotAvailable = 98,
    MustPossessCapability = 99,
    NullPointer = 100,
    AbsentInformation = 101,
    InvalidEventType = 102,
    IllegalArgument = 103,
    NativeMethod = 104,
    ClassLoaderUnsupported = 106,
    OutOfMemory = 110,
    AccessDenied = 111,
    WrongPhase = 112,
    Internal = 113,
    UnattachedThread = 115,
    InvalidEnvironment = 116,
}
