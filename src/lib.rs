// Copyright 2025 Karl Bennett
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # countagent
//!
//! A JVMTI agent that observes object allocations inside a running JVM and writes one
//! timestamped line per allocated object to its event stream.
//!
//! ```text
//! java -agentpath:/path/to/libcountagent.so=log=info,output=/tmp/allocs.csv MyApp
//! ```
//!
//! Every line has the shape `<microseconds>,ADD,<class name>`, e.g.
//! `1712345678901234,ADD,java.util.ArrayList`.
//!
//! ## Architecture
//!
//! The agent is a handful of small pieces, wired together once at load time:
//!
//! - [`negotiator`] - requests the JVMTI capabilities the agent needs
//! - [`registry`] - binds the allocation and free callbacks and enables their events
//! - [`descriptor`] - decodes class signatures (`Ljava/lang/String;`) into display names
//! - [`recorder`] - serialises one [`recorder::EventRecord`] per observed event
//! - [`reporter`] - turns failed JVMTI status codes into fatal diagnostics
//! - [`callbacks`] - the per-event handlers the JVM invokes on its own threads
//!
//! All interaction with the JVM goes through the [`host::Host`] trait. The production
//! implementation is [`jvmti::JvmtiEnv`]; tests drive the same code against a simulated host.
//!
//! ## Error Handling
//!
//! Every failed JVMTI call is fatal: the diagnostic
//! `ERROR: JVMTI: <code>(<name>): <message>` is written to stderr and the process exits with
//! code 3. The only non-error "failure" is a primitive or otherwise undecodable class
//! signature, which is skipped silently.
#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

pub mod agent;
pub mod callbacks;
pub mod descriptor;
pub mod host;
pub mod jvmti;
pub mod logging;
pub mod negotiator;
pub mod options;
pub mod recorder;
pub mod registry;
pub mod reporter;

/// Convenient re-exports of the most commonly used types.
pub mod prelude;

/// The generic Error type of this crate.
pub use error::Error;

/// Result alias used across the agent.
pub type Result<T> = std::result::Result<T, Error>;
