//! JVMTI capability flags.

use bitflags::bitflags;

bitflags! {
    /// A set of JVMTI capabilities, named after the `can_*` fields of `jvmtiCapabilities`.
    ///
    /// Only the capabilities the agent may request are named.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CapabilitySet: u32 {
        /// `can_tag_objects`
        const TAG_OBJECTS = 1 << 0;
        /// `can_get_source_file_name`
        const GET_SOURCE_FILE_NAME = 1 << 1;
        /// `can_generate_vm_object_alloc_events`
        const GENERATE_VM_OBJECT_ALLOC_EVENTS = 1 << 2;
        /// `can_generate_object_free_events`
        const GENERATE_OBJECT_FREE_EVENTS = 1 << 3;
    }
}
