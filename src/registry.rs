//! Binding the agent's event handlers and enabling their events.
//!
//! A [`CallbackTable`] records which [`EventChannel`]s have a handler. [`register`] installs
//! the table and then enables delivery on every bound channel, so a channel is either unbound
//! and disabled, or bound and enabled.

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::{host::Host, reporter, Result};

/// The JVMTI events this agent can observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum EventChannel {
    /// `JVMTI_EVENT_OBJECT_FREE`, delivered when a tagged object is collected.
    #[strum(serialize = "OBJECT_FREED")]
    ObjectFreed,
    /// `JVMTI_EVENT_VM_OBJECT_ALLOC`, delivered when the VM allocates an object.
    #[strum(serialize = "OBJECT_ALLOCATED")]
    ObjectAllocated,
}

/// The channels that have a handler. Unbound channels stay disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallbackTable {
    /// Handle [`EventChannel::ObjectFreed`].
    pub object_free: bool,
    /// Handle [`EventChannel::ObjectAllocated`].
    pub vm_object_alloc: bool,
}

impl CallbackTable {
    /// Returns `true` if `channel` has a handler.
    #[must_use]
    pub fn is_bound(&self, channel: EventChannel) -> bool {
        match channel {
            EventChannel::ObjectFreed => self.object_free,
            EventChannel::ObjectAllocated => self.vm_object_alloc,
        }
    }

    /// The bound channels, in the order they are enabled.
    pub fn channels(&self) -> impl Iterator<Item = EventChannel> + '_ {
        EventChannel::iter().filter(|channel| self.is_bound(*channel))
    }
}

/// Install `table` and enable every channel it binds.
///
/// Binding happens before any channel is enabled; channels are enabled in
/// [`EventChannel`] declaration order. Runs once per agent lifetime.
///
/// # Errors
/// Returns [`crate::Error::Jvmti`] for the first step the host rejects
pub fn register<H: Host>(host: &H, table: &CallbackTable) -> Result<()> {
    reporter::check(host.set_event_callbacks(table), "Cannot set jvmti callbacks")?;

    for channel in table.channels() {
        reporter::check(host.enable_event(channel), "Cannot set event notification")?;
        tracing::debug!(%channel, "event notification enabled");
    }

    Ok(())
}
