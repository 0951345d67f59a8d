//! The JVM Tool Interface.
//!
//! The raw JNI types come from `jvmti-bindings` and are re-exported as [`jni`]. On top of
//! them, [`JvmtiEnv`] implements [`crate::host::Host`] for a live JVM, and [`StatusCode`] /
//! [`CapabilitySet`] give the raw integers and bitfields proper types.

mod capabilities;
mod env;
mod status;

pub use capabilities::CapabilitySet;
pub use env::JvmtiEnv;
pub use jvmti_bindings::prelude::jni;
pub use status::{ErrorKind, StatusCode};
