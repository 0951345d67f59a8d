//! The boundary between the agent and the JVM it is loaded into.
//!
//! Everything the agent needs from the JVM is expressed by the [`Host`] trait: capability
//! negotiation, callback registration, event enablement, class signature lookup and the
//! JVMTI allocator. [`crate::jvmti::JvmtiEnv`] implements it on top of a real JVMTI
//! environment; unit tests implement it with a simulated host.
//!
//! Buffers handed out by the host must be returned to it. [`HostBuffer`] owns such a buffer
//! and guarantees it is released exactly once, either explicitly via [`HostBuffer::release`]
//! (which surfaces the status of the `Deallocate` call) or implicitly on drop.

use std::{ptr::NonNull, slice};

use crate::{
    jvmti::{jni::jclass, CapabilitySet, StatusCode},
    registry::{CallbackTable, EventChannel},
};

/// Result of a single host call; the error side is never [`StatusCode::NONE`].
pub type HostResult<T> = std::result::Result<T, StatusCode>;

/// The operations the agent requires from the JVM.
///
/// Implementations must be callable from any thread: the JVM invokes the agent's callbacks on
/// whichever thread performs an allocation.
pub trait Host {
    /// Request `capabilities` from the JVM (`AddCapabilities`).
    fn add_capabilities(&self, capabilities: CapabilitySet) -> HostResult<()>;

    /// Install the handlers `table` binds as the environment's callbacks (`SetEventCallbacks`).
    fn set_event_callbacks(&self, table: &CallbackTable) -> HostResult<()>;

    /// Turn on delivery of `channel` for all threads (`SetEventNotificationMode`).
    fn enable_event(&self, channel: EventChannel) -> HostResult<()>;

    /// Allocate `size` bytes through the JVMTI allocator (`Allocate`).
    fn allocate(&self, size: usize) -> HostResult<NonNull<u8>>;

    /// Return memory obtained from this host (`Deallocate`).
    ///
    /// # Safety
    ///
    /// `ptr` must have been produced by this host and must not have been released already.
    unsafe fn deallocate(&self, ptr: NonNull<u8>) -> HostResult<()>;

    /// Look up the type descriptor of `class` (`GetClassSignature`).
    ///
    /// The JVM's signature buffer is released before this returns; the caller owns the copy.
    fn class_signature(&self, class: jclass) -> HostResult<String>;
}

/// A buffer allocated by a [`Host`], released back to it exactly once.
pub struct HostBuffer<'h, H: Host> {
    host: &'h H,
    ptr: Option<NonNull<u8>>,
    len: usize,
}

impl<'h, H: Host> HostBuffer<'h, H> {
    /// Allocate `len` bytes from `host`.
    ///
    /// ## Arguments
    /// * 'host'    - The host to allocate from and later release to
    /// * 'len'     - Number of bytes
    ///
    /// # Errors
    /// Returns the host status if the allocation is refused
    pub fn allocate(host: &'h H, len: usize) -> HostResult<Self> {
        let ptr = host.allocate(len)?;
        Ok(HostBuffer {
            host,
            ptr: Some(ptr),
            len,
        })
    }

    /// The buffer contents.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self.ptr {
            // SAFETY: ptr is live for `len` bytes until released
            Some(ptr) => unsafe { slice::from_raw_parts(ptr.as_ptr(), self.len) },
            None => &[],
        }
    }

    /// The buffer contents, writable.
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        match self.ptr {
            // SAFETY: ptr is live for `len` bytes and uniquely owned by `self`
            Some(ptr) => unsafe { slice::from_raw_parts_mut(ptr.as_ptr(), self.len) },
            None => &mut [],
        }
    }

    /// Release the buffer now, reporting the status of the `Deallocate` call.
    ///
    /// # Errors
    /// Returns the host status if the deallocation is refused
    pub fn release(mut self) -> HostResult<()> {
        match self.ptr.take() {
            // SAFETY: ptr came from `self.host` and is released only here or in drop
            Some(ptr) => unsafe { self.host.deallocate(ptr) },
            None => Ok(()),
        }
    }
}

impl<H: Host> Drop for HostBuffer<'_, H> {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            // SAFETY: ptr came from `self.host` and was not released through `release`
            if let Err(status) = unsafe { self.host.deallocate(ptr) } {
                tracing::error!(%status, "failed to release a JVMTI buffer");
            }
        }
    }
}
