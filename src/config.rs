//! Logging configuration read from the environment.
//!
//! Writing logs to the terminal corrupts the TUI (alternate screen), so an
//! interactive session logs to a file unless told otherwise.

use std::path::PathBuf;

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "cardiorisk.log";

/// Default `EnvFilter` directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Where formatted log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    File(PathBuf),
    Stdout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub sink: LogSink,
    pub filter: String,
}

impl LogSettings {
    /// Read `CARDIORISK_LOG_MODE`, `CARDIORISK_LOG_FILE` and `RUST_LOG`.
    #[must_use]
    pub fn from_env(interactive: bool) -> Self {
        Self::resolve(
            std::env::var("CARDIORISK_LOG_MODE").ok().as_deref(),
            std::env::var("CARDIORISK_LOG_FILE").ok(),
            std::env::var("RUST_LOG").ok(),
            interactive,
        )
    }

    /// `mode` is `file`, `stdout` or anything else for auto.
    #[must_use]
    pub fn resolve(
        mode: Option<&str>,
        file: Option<String>,
        filter: Option<String>,
        interactive: bool,
    ) -> Self {
        let use_file = match mode {
            Some("file") => true,
            Some("stdout") => false,
            _ => interactive,
        };

        let sink = if use_file {
            LogSink::File(PathBuf::from(
                file.filter(|f| !f.is_empty())
                    .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            ))
        } else {
            LogSink::Stdout
        };

        Self {
            sink,
            filter: filter
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FILTER.to_string()),
        }
    }
}
