//! TOML configuration
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! strategy = "knee-angle"
//! min_visibility = 0.5
//!
//! [thresholds]
//! down_enter = 100.0
//! up_enter = 165.0
//!
//! [posture]
//! back_min_deg = 160.0
//! deep_knee_deg = 90.0
//!
//! [server]
//! addr = "127.0.0.1:8000"
//!
//! [history]
//! path = "./sessions.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::coach::PostureLimits;
use crate::core::signal::SignalStrategy;
use crate::error::ConfigError;
use crate::types::{SignalStrategyKind, Thresholds};
use crate::{BACK_MIN_ANGLE_DEG, DEEP_KNEE_ANGLE_DEG, MIN_VISIBILITY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub strategy: SignalStrategyKind,
    /// Overrides the strategy's default band
    pub thresholds: Option<Thresholds>,
    pub min_visibility: f64,
    pub posture: PostureConfig,
    pub server: ServerConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    pub back_min_deg: f64,
    pub deep_knee_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: SignalStrategyKind::default(),
            thresholds: None,
            min_visibility: MIN_VISIBILITY,
            posture: PostureConfig::default(),
            server: ServerConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            back_min_deg: BACK_MIN_ANGLE_DEG,
            deep_knee_deg: DEEP_KNEE_ANGLE_DEG,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".to_string(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: "./sessions.json".to_string(),
        }
    }
}

impl Config {
    /// Read and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(ConfigError::Visibility(self.min_visibility));
        }
        self.effective_thresholds()
            .validate_for(self.strategy.direction())?;
        Ok(())
    }

    /// Configured band, or the strategy's default
    pub fn effective_thresholds(&self) -> Thresholds {
        self.thresholds
            .unwrap_or_else(|| SignalStrategy::new(self.strategy).default_thresholds())
    }

    pub fn posture_limits(&self) -> PostureLimits {
        PostureLimits {
            back_min_deg: self.posture.back_min_deg,
            deep_knee_deg: self.posture.deep_knee_deg,
        }
    }
}
