// engine/src/config.rs
#![forbid(unsafe_code)]

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::policy::{BeamConfig, HeuristicWeights, PairWeights};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("weight `{name}` must be finite, got {value}")]
    NonFiniteWeight { name: &'static str, value: f64 },
}

pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteWeight { name, value })
    }
}

/// Search weights for both variants. Missing sections and fields keep their defaults.
///
/// ```json
/// { "tetris": { "holes": -0.5 }, "puyo": { "dead_zone": -20.0 } }
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightsConfig {
    pub tetris: HeuristicWeights,
    pub puyo: PairWeights,
    /// Second-ply breadth of the pair search.
    pub lookahead: BeamConfig,
}

impl WeightsConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tetris.validate()?;
        self.puyo.validate()
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
