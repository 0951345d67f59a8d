use std::ptr::NonNull;

use jvmti_bindings::prelude::*;

use crate::{
    host::{Host, HostResult},
    jvmti::{CapabilitySet, StatusCode},
    registry::{CallbackTable, EventChannel},
};

/// A JVMTI environment of a running JVM.
///
/// The environment is valid for the lifetime of the JVM and JVMTI functions may be called
/// from any thread, so the handle can be shared freely.
pub struct JvmtiEnv {
    jvmti: Jvmti,
}

// SAFETY: JVMTI environments are usable from every thread of the VM
unsafe impl Send for JvmtiEnv {}
// SAFETY: see above; the agent only calls thread-safe JVMTI functions
unsafe impl Sync for JvmtiEnv {}

impl JvmtiEnv {
    /// Obtain the JVMTI environment of `vm`.
    ///
    /// Failures are logged; the caller refuses the load.
    pub fn new(vm: *mut jni::JavaVM) -> Option<Self> {
        match Jvmti::new(vm) {
            Ok(jvmti) => Some(JvmtiEnv { jvmti }),
            Err(error) => {
                tracing::error!(?error, "unable to obtain a JVMTI environment");
                None
            }
        }
    }
}

impl std::fmt::Debug for JvmtiEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JvmtiEnv").finish_non_exhaustive()
    }
}

impl Host for JvmtiEnv {
    fn add_capabilities(&self, capabilities: CapabilitySet) -> HostResult<()> {
        self.jvmti
            .add_capabilities_with(|caps| {
                if capabilities.contains(CapabilitySet::TAG_OBJECTS) {
                    caps.set_can_tag_objects(true);
                }
                if capabilities.contains(CapabilitySet::GET_SOURCE_FILE_NAME) {
                    caps.set_can_get_source_file_name(true);
                }
                if capabilities.contains(CapabilitySet::GENERATE_VM_OBJECT_ALLOC_EVENTS) {
                    caps.set_can_generate_vm_object_alloc_events(true);
                }
                if capabilities.contains(CapabilitySet::GENERATE_OBJECT_FREE_EVENTS) {
                    caps.set_can_generate_object_free_events(true);
                }
            })
            .map_err(|error| StatusCode(error as u32))?;
        Ok(())
    }

    fn set_event_callbacks(&self, table: &CallbackTable) -> HostResult<()> {
        // The dispatching table forwards every event to the loaded agent; only the channels
        // `table` binds are ever enabled, so the others never fire.
        tracing::trace!(?table, "installing event callbacks");
        self.jvmti
            .set_event_callbacks(get_default_callbacks())
            .map_err(|error| StatusCode(error as u32))?;
        Ok(())
    }

    fn enable_event(&self, channel: EventChannel) -> HostResult<()> {
        let event = match channel {
            EventChannel::ObjectFreed => jvmti::JVMTI_EVENT_OBJECT_FREE,
            EventChannel::ObjectAllocated => jvmti::JVMTI_EVENT_VM_OBJECT_ALLOC,
        };
        self.jvmti
            .enable_events_global(&[event])
            .map_err(|error| StatusCode(error as u32))?;
        Ok(())
    }

    fn allocate(&self, size: usize) -> HostResult<NonNull<u8>> {
        let size = jni::jlong::try_from(size).map_err(|_| StatusCode::ILLEGAL_ARGUMENT)?;
        let mem = self
            .jvmti
            .allocate(size)
            .map_err(|error| StatusCode(error as u32))?;
        NonNull::new(mem.cast()).ok_or(StatusCode::OUT_OF_MEMORY)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>) -> HostResult<()> {
        self.jvmti
            .deallocate(ptr.as_ptr().cast())
            .map_err(|error| StatusCode(error as u32))?;
        Ok(())
    }

    fn class_signature(&self, class: jni::jclass) -> HostResult<String> {
        let (signature, _generic) = self
            .jvmti
            .get_class_signature(class)
            .map_err(|error| StatusCode(error as u32))?;
        Ok(signature)
    }
}
