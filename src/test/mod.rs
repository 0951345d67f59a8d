use std::{
    alloc::{self, Layout},
    collections::HashMap,
    io::{self, Write},
    ptr::NonNull,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use crate::{
    host::{Host, HostResult},
    jvmti::{
        jni::{jclass, jobject},
        CapabilitySet, StatusCode,
    },
    registry::{CallbackTable, EventChannel},
};

/// The host calls a [`MockHost`] records and can be told to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Call {
    AddCapabilities,
    SetEventCallbacks,
    EnableEvent(EventChannel),
    Allocate,
    Deallocate,
    GetClassSignature,
}

/// A simulated JVM.
///
/// Classes are registered up front and addressed through [`MockHost::class`]. Its allocator
/// tracks every live buffer, so leaks and double releases show up in the counters.
pub struct MockHost {
    classes: Vec<String>,
    buffers: Mutex<HashMap<usize, Layout>>,
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
    signature_lookups: AtomicUsize,
    failures: Mutex<HashMap<Call, StatusCode>>,
    capabilities: Mutex<Option<CapabilitySet>>,
    bound: Mutex<Option<CallbackTable>>,
    enabled: Mutex<Vec<EventChannel>>,
    calls: Mutex<Vec<Call>>,
}

impl MockHost {
    pub fn new() -> Self {
        MockHost::with_classes(&[])
    }

    /// A host knowing one class per entry of `signatures`; class `i` is [`MockHost::class`]`(i)`.
    pub fn with_classes(signatures: &[&str]) -> Self {
        MockHost {
            classes: signatures.iter().map(|s| s.to_string()).collect(),
            buffers: Mutex::new(HashMap::new()),
            allocations: AtomicUsize::new(0),
            deallocations: AtomicUsize::new(0),
            signature_lookups: AtomicUsize::new(0),
            failures: Mutex::new(HashMap::new()),
            capabilities: Mutex::new(None),
            bound: Mutex::new(None),
            enabled: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The handle of the `index`-th registered class.
    pub fn class(index: usize) -> jclass {
        (index + 1) as jobject
    }

    /// Make every future `call` return `status`.
    pub fn fail(&self, call: Call, status: StatusCode) {
        self.failures.lock().unwrap().insert(call, status);
    }

    /// Successful `Allocate` calls.
    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::SeqCst)
    }

    /// Successful `Deallocate` calls, for any buffer this host handed out.
    pub fn deallocations(&self) -> usize {
        self.deallocations.load(Ordering::SeqCst)
    }

    /// `GetClassSignature` calls.
    pub fn signature_lookups(&self) -> usize {
        self.signature_lookups.load(Ordering::SeqCst)
    }

    /// Buffers handed out and not yet released.
    pub fn live(&self) -> usize {
        self.buffers.lock().unwrap().len()
    }

    pub fn capabilities(&self) -> Option<CapabilitySet> {
        *self.capabilities.lock().unwrap()
    }

    pub fn bound(&self) -> Option<CallbackTable> {
        *self.bound.lock().unwrap()
    }

    pub fn enabled(&self) -> Vec<EventChannel> {
        self.enabled.lock().unwrap().clone()
    }

    /// Capability, callback and event calls, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, call: Call) -> HostResult<()> {
        if !matches!(call, Call::Allocate | Call::Deallocate | Call::GetClassSignature) {
            self.calls.lock().unwrap().push(call);
        }

        match self.failures.lock().unwrap().get(&call) {
            Some(status) => Err(*status),
            None => Ok(()),
        }
    }
}

impl Host for MockHost {
    fn add_capabilities(&self, capabilities: CapabilitySet) -> HostResult<()> {
        self.enter(Call::AddCapabilities)?;
        *self.capabilities.lock().unwrap() = Some(capabilities);
        Ok(())
    }

    fn set_event_callbacks(&self, table: &CallbackTable) -> HostResult<()> {
        self.enter(Call::SetEventCallbacks)?;
        *self.bound.lock().unwrap() = Some(*table);
        Ok(())
    }

    fn enable_event(&self, channel: EventChannel) -> HostResult<()> {
        self.enter(Call::EnableEvent(channel))?;
        self.enabled.lock().unwrap().push(channel);
        Ok(())
    }

    fn allocate(&self, size: usize) -> HostResult<NonNull<u8>> {
        self.enter(Call::Allocate)?;
        let layout =
            Layout::from_size_align(size.max(1), 8).map_err(|_| StatusCode::ILLEGAL_ARGUMENT)?;
        // SAFETY: layout has a non-zero size
        let ptr = NonNull::new(unsafe { alloc::alloc(layout) }).ok_or(StatusCode::OUT_OF_MEMORY)?;
        self.buffers.lock().unwrap().insert(ptr.as_ptr() as usize, layout);
        self.allocations.fetch_add(1, Ordering::SeqCst);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>) -> HostResult<()> {
        self.enter(Call::Deallocate)?;
        let layout = self
            .buffers
            .lock()
            .unwrap()
            .remove(&(ptr.as_ptr() as usize))
            .ok_or(StatusCode::ILLEGAL_ARGUMENT)?;
        alloc::dealloc(ptr.as_ptr(), layout);
        self.deallocations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn class_signature(&self, class: jclass) -> HostResult<String> {
        self.enter(Call::GetClassSignature)?;
        self.signature_lookups.fetch_add(1, Ordering::SeqCst);

        (class as usize)
            .checked_sub(1)
            .and_then(|index| self.classes.get(index))
            .cloned()
            .ok_or(StatusCode::INVALID_CLASS)
    }
}

impl Drop for MockHost {
    fn drop(&mut self) {
        let buffers = match self.buffers.get_mut() {
            Ok(buffers) => buffers,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (ptr, layout) in buffers.drain() {
            // SAFETY: every entry is a live allocation made with its layout
            unsafe { alloc::dealloc(ptr as *mut u8, layout) };
        }
    }
}

/// An in-memory sink that can be cloned into an [`crate::recorder::EventRecorder`] and
/// inspected afterwards.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
