//! Scoring configuration with the documented defaults compiled in,
//! optionally overridden from a TOML file. Weight groups that do not sum
//! to 1.0 are rejected at load time rather than silently renormalized.
//!
//! TOML shape (all tables optional, omitted fields keep their defaults):
//!
//! ```toml
//! [conversational]
//! vagueness = 0.25
//! lack_of_specificity = 0.25
//! hedging = 0.20
//! avoiding_help = 0.20
//! overconfidence = 0.10
//!
//! [emotional]
//! negative_affect = 0.4
//! lack_of_positive = 0.3
//! anxiety = 0.3
//!
//! [blend]
//! conversational = 0.7
//! emotional = 0.3
//!
//! [session]
//! max_exchanges = 5
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use tracing::debug;

use crate::engine::{BlendWeights, ConversationalWeights, EmotionalWeights, ScoringWeights};
use crate::session::DEFAULT_MAX_EXCHANGES;

pub const ENV_CONFIG_PATH: &str = "STANDUP_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/scoring.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub max_exchanges: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_exchanges: DEFAULT_MAX_EXCHANGES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub conversational: ConversationalWeights,
    pub emotional: EmotionalWeights,
    pub blend: BlendWeights,
    pub session: SessionConfig,
}

impl ScoringConfig {
    /// Resolve configuration the way the service does at startup:
    /// `STANDUP_CONFIG_PATH` if set (the file must then exist and parse),
    /// else `config/scoring.toml` when present, else compiled defaults.
    pub fn load() -> Result<Self> {
        if let Ok(path) = env::var(ENV_CONFIG_PATH) {
            return Self::load_from_file(&path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::load_from_file(default_path);
        }
        debug!("no scoring config file, using compiled defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read scoring config {}", path.display()))?;
        let cfg: ScoringConfig = toml::from_str(&raw)
            .with_context(|| format!("parse scoring config {}", path.display()))?;
        cfg.weights()
            .validate()
            .with_context(|| format!("invalid weights in {}", path.display()))?;
        Ok(cfg)
    }

    /// Weight view for `score_with_weights`.
    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights {
            conversational: self.conversational,
            emotional: self.emotional,
            blend: self.blend,
        }
    }
}
