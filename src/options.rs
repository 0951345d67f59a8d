//! Agent options.
//!
//! The JVM passes everything after `=` in `-agentpath:<lib>=<options>` to `Agent_OnLoad`.
//! The agent understands a comma separated list of `key=value` pairs:
//!
//! | Key      | Value                              | Default        |
//! |----------|------------------------------------|----------------|
//! | `log`    | a `tracing` filter, e.g. `debug`   | `warn`         |
//! | `output` | `stdout`, `stderr` or a file path  | `stdout`       |
//!
//! ```rust
//! use countagent::options::{AgentOptions, Output};
//!
//! let options: AgentOptions = "log=debug,output=stderr".parse()?;
//! assert_eq!(options.log.as_deref(), Some("debug"));
//! assert_eq!(options.output, Output::Stderr);
//! # Ok::<(), countagent::Error>(())
//! ```

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
    str::FromStr,
};

use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

/// Where event lines are written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Output {
    /// The JVM process' standard output
    #[default]
    Stdout,
    /// The JVM process' standard error
    Stderr,
    /// A file, created or truncated at load time
    File(PathBuf),
}

impl Output {
    /// Open the sink.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] if the output file cannot be created
    pub fn open(&self) -> Result<Box<dyn Write + Send>> {
        Ok(match self {
            Output::Stdout => Box::new(io::stdout()),
            Output::Stderr => Box::new(io::stderr()),
            Output::File(path) => Box::new(BufWriter::new(File::create(path)?)),
        })
    }
}

impl FromStr for Output {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "" => Err(malformed_error!("Empty output")),
            "stdout" | "-" => Ok(Output::Stdout),
            "stderr" => Ok(Output::Stderr),
            path => Ok(Output::File(PathBuf::from(path))),
        }
    }
}

/// The parsed agent option string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentOptions {
    /// `tracing` filter directive for the agent's own diagnostics
    pub log: Option<String>,
    /// Destination of the event stream
    pub output: Output,
}

impl AgentOptions {
    /// Parse the raw option string; `None` (no options given) yields the defaults.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] for pairs without `=`, unknown keys, empty values or an
    /// invalid log filter
    pub fn parse(options: Option<&str>) -> Result<Self> {
        options.map_or_else(|| Ok(AgentOptions::default()), str::parse)
    }
}

impl FromStr for AgentOptions {
    type Err = Error;

    fn from_str(options: &str) -> Result<Self> {
        let mut parsed = AgentOptions::default();

        for pair in options.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(malformed_error!("Option '{}' is not a key=value pair", pair));
            };

            match key.trim() {
                "log" => parsed.log = Some(log_filter(value.trim())?),
                "output" => parsed.output = value.trim().parse()?,
                other => return Err(malformed_error!("Unknown option '{}'", other)),
            }
        }

        Ok(parsed)
    }
}

fn log_filter(directive: &str) -> Result<String> {
    if directive.is_empty() {
        return Err(malformed_error!("Empty log filter"));
    }

    match EnvFilter::try_new(directive) {
        Ok(_) => Ok(directive.to_string()),
        Err(error) => Err(malformed_error!("Invalid log filter '{}' - {}", directive, error)),
    }
}
