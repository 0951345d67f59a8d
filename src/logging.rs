//! Diagnostics of the agent itself.
//!
//! The agent logs through `tracing`, always to stderr so the event stream stays clean. The
//! filter comes from the `log` option, then from the `COUNT_AGENT_LOG` environment
//! variable, and defaults to `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted when no `log` option is given.
pub const LOG_ENV: &str = "COUNT_AGENT_LOG";

/// Filter used when neither the option nor the environment sets one.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter for `directive`, falling back to [`LOG_ENV`] and then [`DEFAULT_FILTER`].
#[must_use]
pub fn filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_from_env(LOG_ENV).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the stderr subscriber.
///
/// Does nothing if the process already has a global subscriber, e.g. when the JVM loads
/// the agent a second time.
pub fn init(directive: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(directive))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
