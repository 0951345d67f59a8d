//! # countagent Prelude
//!
//! Convenient re-exports of the types most code working with the agent needs.
//!
//! ```rust
//! use countagent::prelude::*;
//!
//! assert_eq!(display_name(b"Ljava/lang/Object;").as_deref(), Some("java.lang.Object"));
//! assert_eq!(Operation::Add.to_string(), "ADD");
//! ```

pub use crate::{Error, Result};

// ================================================================================================
// Host boundary
// ================================================================================================

pub use crate::host::{Host, HostBuffer, HostResult};
pub use crate::jvmti::{CapabilitySet, JvmtiEnv, StatusCode};

// ================================================================================================
// Agent pieces
// ================================================================================================

pub use crate::callbacks::Tracker;
pub use crate::descriptor::{decode, display_name, ClassName, Descriptor};
pub use crate::negotiator::{negotiate, REQUIRED_CAPABILITIES};
pub use crate::options::{AgentOptions, Output};
pub use crate::recorder::{EventRecord, EventRecorder, Operation};
pub use crate::registry::{register, CallbackTable, EventChannel};
