//! Agent lifecycle and the exported entry points.
//!
//! [`CountAgent`] is exported to the JVM as the agent of this library: `Agent_OnLoad` runs
//! [`CountAgent::load`] once, when the JVM starts with `-agentpath:`. It parses the agent
//! options, obtains a JVMTI environment, installs the process-wide [`Tracker`] and then
//! [`launch`]es it: capabilities first, callbacks second. From then on the agent only runs
//! inside the event handlers, until the JVM exits. There is no unload path.
//!
//! A failure after the JVMTI environment exists is fatal to the whole process, see
//! [`abort`]. Failures before that point (bad options, no JVMTI) are reported with
//! `JNI_ERR`, which makes the JVM refuse to start by itself.

use std::{
    io::{self, Write},
    process,
    sync::OnceLock,
};

use jvmti_bindings::prelude::*;

use crate::{
    callbacks::Tracker,
    host::Host,
    jvmti::JvmtiEnv,
    logging, negotiator,
    options::AgentOptions,
    recorder::EventRecorder,
    registry::{self, CallbackTable},
    reporter, Error, Result,
};

/// The allocation tracking agent.
#[derive(Debug, Default)]
pub struct CountAgent {
    tracker: OnceLock<Tracker<JvmtiEnv>>,
}

impl CountAgent {
    /// The tracker of this agent, once [`CountAgent::load`] has installed it.
    pub fn tracker(&self) -> Option<&Tracker<JvmtiEnv>> {
        self.tracker.get()
    }

    /// The body of `Agent_OnLoad`.
    ///
    /// Returns `JNI_OK` once allocation tracking is enabled, and `JNI_ERR` if the options
    /// are malformed, no JVMTI environment is available or the agent was already loaded.
    pub fn load(&self, vm: *mut jni::JavaVM, options: &str) -> jni::jint {
        let options = match AgentOptions::parse(Some(options)) {
            Ok(options) => options,
            Err(error) => return refuse(&error),
        };

        logging::init(options.log.as_deref());
        tracing::info!("Agent Started");

        let Some(env) = JvmtiEnv::new(vm) else {
            return jni::JNI_ERR;
        };

        let sink = match options.output.open() {
            Ok(sink) => sink,
            Err(error) => return refuse(&error),
        };

        if self.tracker.set(Tracker::new(env, EventRecorder::new(sink))).is_err() {
            return refuse(&Error::AlreadyLoaded);
        }

        if let Some(tracker) = self.tracker() {
            launch(tracker.host(), &CallbackTable::agent());
        }

        jni::JNI_OK
    }
}

impl Agent for CountAgent {
    fn on_load(&self, vm: *mut jni::JavaVM, options: &str) -> jni::jint {
        self.load(vm, options)
    }

    fn vm_object_alloc(
        &self,
        _jni: *mut jni::JNIEnv,
        _thread: jni::jthread,
        _object: jni::jobject,
        klass: jni::jclass,
        _size: jni::jlong,
    ) {
        if let Some(tracker) = self.tracker() {
            tracker.vm_object_alloc(klass);
        }
    }

    fn object_free(&self, tag: jni::jlong) {
        if let Some(tracker) = self.tracker() {
            tracker.object_free(tag);
        }
    }
}

#[allow(missing_docs)]
mod exports {
    use jvmti_bindings::export_agent;

    use super::CountAgent;

    export_agent!(CountAgent);
}

/// Negotiate capabilities with `host`, then bind and enable the handlers in `table`.
///
/// # Errors
/// Returns [`Error::Jvmti`] for the first host call that fails
pub fn start<H: Host>(host: &H, table: &CallbackTable) -> Result<()> {
    negotiator::negotiate(host)?;
    registry::register(host, table)?;
    tracing::info!("allocation tracking enabled");
    Ok(())
}

/// [`start`] `host`, terminating the process if any step fails.
pub fn launch<H: Host>(host: &H, table: &CallbackTable) {
    if let Err(error) = start(host, table) {
        abort(&error);
    }
}

/// Write the diagnostic for `error` to stderr and terminate the process.
pub fn abort(error: &Error) -> ! {
    let code = reporter::terminate(error, &mut io::stderr().lock());
    process::exit(code)
}

fn refuse(error: &Error) -> jni::jint {
    let _ = writeln!(io::stderr(), "ERROR: {error}");
    jni::JNI_ERR
}

/// Native half of `count.agent.NewEvent.newEvent(Object)`.
///
/// The hook carries no state; it only marks the event in the agent's diagnostics.
///
/// # Safety
///
/// Called by the JVM only.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn Java_count_agent_NewEvent_nativeNewEvent(
    _env: *mut jni::JNIEnv,
    _class: jni::jclass,
    _object: jni::jobject,
) {
    tracing::debug!("New Event");
}
