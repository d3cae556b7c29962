//! Typed errors

use thiserror::Error;

use crate::types::Direction;

/// Rejected hysteresis configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    #[error("thresholds must be finite (down_enter={down_enter}, up_enter={up_enter})")]
    NotFinite { down_enter: f64, up_enter: f64 },
    #[error("dead zone {width} is narrower than {min}; the counter would chatter")]
    DeadZoneTooNarrow { width: f64, min: f64 },
    #[error("down_enter={down_enter} is not deeper than up_enter={up_enter} for a signal that is {expected:?} with depth")]
    WrongDirection {
        down_enter: f64,
        up_enter: f64,
        expected: Direction,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("min_visibility must be within [0, 1], got {0}")]
    Visibility(f64),
    #[error(transparent)]
    Thresholds(#[from] ThresholdError),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("session history storage error at {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("session history at {path} is not valid JSON: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
