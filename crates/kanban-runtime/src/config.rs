#![forbid(unsafe_code)]

//! Engine configuration as data.
//!
//! ```toml
//! # kanban-engine.toml
//! [coalescer]
//! throttle_interval_ms = 16
//! debounce_delay_ms = 200
//! ```
//!
//! ```rust,ignore
//! let config = EngineConfig::from_toml_file("kanban-engine.toml")?.validated()?;
//! let pipeline = LayoutPipeline::new(store, config.to_coalescer_config());
//! ```
//!
//! Omitted fields keep their defaults, which match the built-in constants in
//! `kanban_core::update_coalescer`.

#[cfg(feature = "engine-config")]
use std::path::Path;
use std::time::Duration;

use kanban_core::update_coalescer::{
    CoalescerConfig, DEFAULT_DEBOUNCE_DELAY, DEFAULT_THROTTLE_INTERVAL,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Layout update coalescing.
    pub coalescer: CoalescerPolicy,
}

/// Timing for layout batch coalescing, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoalescerPolicy {
    /// Minimum spacing between flushes while a drag is active.
    pub throttle_interval_ms: u64,
    /// Quiet period before a flush while idle.
    pub debounce_delay_ms: u64,
}

impl Default for CoalescerPolicy {
    fn default() -> Self {
        Self {
            throttle_interval_ms: duration_ms(DEFAULT_THROTTLE_INTERVAL),
            debounce_delay_ms: duration_ms(DEFAULT_DEBOUNCE_DELAY),
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl EngineConfig {
    /// Load from a TOML string.
    #[cfg(feature = "engine-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, EngineConfigError> {
        toml::from_str(s).map_err(EngineConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "engine-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, EngineConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(EngineConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "engine-config")]
    pub fn from_json_str(s: &str) -> Result<Self, EngineConfigError> {
        serde_json::from_str(s).map_err(EngineConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "engine-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EngineConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(EngineConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Range-check every parameter. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let c = &self.coalescer;
        if c.throttle_interval_ms == 0 {
            errors.push("coalescer.throttle_interval_ms must be > 0".into());
        }
        if c.debounce_delay_ms == 0 {
            errors.push("coalescer.debounce_delay_ms must be > 0".into());
        }
        if c.debounce_delay_ms < c.throttle_interval_ms {
            errors.push(format!(
                "coalescer.debounce_delay_ms ({}) must be >= throttle_interval_ms ({})",
                c.debounce_delay_ms, c.throttle_interval_ms
            ));
        }
        errors
    }

    /// `self` if [`validate`](Self::validate) reports nothing.
    pub fn validated(self) -> Result<Self, EngineConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(EngineConfigError::Validation(errors))
        }
    }

    #[must_use]
    pub fn to_coalescer_config(&self) -> CoalescerConfig {
        CoalescerConfig {
            throttle_interval: Duration::from_millis(self.coalescer.throttle_interval_ms),
            debounce_delay: Duration::from_millis(self.coalescer.debounce_delay_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading an engine configuration.
#[derive(Debug)]
pub enum EngineConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "engine-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "engine-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for EngineConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "engine-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "engine-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for EngineConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "engine-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "engine-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_coalescer_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.coalescer.throttle_interval_ms, 16);
        assert_eq!(config.coalescer.debounce_delay_ms, 200);
        assert_eq!(config.to_coalescer_config(), CoalescerConfig::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn zero_intervals_rejected() {
        let mut config = EngineConfig::default();
        config.coalescer.throttle_interval_ms = 0;
        config.coalescer.debounce_delay_ms = 0;
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("throttle_interval_ms"));
    }

    #[test]
    fn debounce_shorter_than_throttle_rejected() {
        let mut config = EngineConfig::default();
        config.coalescer.debounce_delay_ms = 10;
        let err = config.validated().unwrap_err();
        assert!(err.to_string().starts_with("validation errors: "));
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"coalescer":{"debounce_delay_ms":300}}"#).unwrap();
        assert_eq!(config.coalescer.debounce_delay_ms, 300);
        assert_eq!(config.coalescer.throttle_interval_ms, 16);

        let empty: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(empty, EngineConfig::default());
    }
}
