#![forbid(unsafe_code)]

//! Subscriber installation for hosts that do not bring their own.
//!
//! The engine only emits `tracing` events under the `kanban.*` targets:
//!
//! | Target | Level | Events |
//! |--------|-------|--------|
//! | `kanban.drag` | debug | pick, swap, transfer, drop |
//! | `kanban.store` | trace/debug/warn | reductions, persistence |
//! | `kanban.coalescer` | trace | batch flushes |
//! | `kanban.layout` | trace | layout observations |
//!
//! Filtering follows the `KANBAN_LOG` environment variable using
//! `EnvFilter` directive syntax (`KANBAN_LOG=kanban.drag=debug,info`).

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "KANBAN_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Failure to install the global subscriber.
#[derive(Debug)]
pub struct LoggingError(String);

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to install tracing subscriber: {}", self.0)
    }
}

impl std::error::Error for LoggingError {}

/// Filter built from `KANBAN_LOG`, falling back to `info`.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install a global subscriber. Fails if one is already installed.
pub fn init(format: LogFormat) -> Result<(), LoggingError> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());
    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|err| LoggingError(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails() {
        // Whichever call wins, the other reports the conflict.
        let first = init(LogFormat::Pretty);
        let second = init(LogFormat::Json);
        assert!(first.is_ok() || second.is_err());
        assert!(second.is_err());
    }

    #[test]
    fn error_display() {
        let err = LoggingError("already set".into());
        assert_eq!(
            err.to_string(),
            "failed to install tracing subscriber: already set"
        );
    }
}
