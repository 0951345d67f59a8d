//! Capability negotiation.
//!
//! Before any callback can be registered the JVM has to grant the capabilities the agent
//! relies on. [`negotiate`] requests exactly [`REQUIRED_CAPABILITIES`] in a single
//! `AddCapabilities` call. A JVM that refuses them will refuse them again, so there is no
//! retry: failure is fatal.

use crate::{host::Host, jvmti::CapabilitySet, reporter, Result};

/// The capabilities the agent requests, and nothing else.
pub const REQUIRED_CAPABILITIES: CapabilitySet = CapabilitySet::TAG_OBJECTS
    .union(CapabilitySet::GENERATE_OBJECT_FREE_EVENTS)
    .union(CapabilitySet::GENERATE_VM_OBJECT_ALLOC_EVENTS)
    .union(CapabilitySet::GET_SOURCE_FILE_NAME);

/// Request [`REQUIRED_CAPABILITIES`] from `host`.
///
/// # Errors
/// Returns [`crate::Error::Jvmti`] if the host does not grant them
pub fn negotiate<H: Host>(host: &H) -> Result<()> {
    reporter::check(
        host.add_capabilities(REQUIRED_CAPABILITIES),
        "Unable to get necessary JVMTI capabilities.",
    )?;

    tracing::debug!(capabilities = ?REQUIRED_CAPABILITIES, "capabilities granted");
    Ok(())
}
