//! # Standup Store
//! JSON file-backed persistence for analyzed standups. This is the
//! serialize/deserialize boundary around the core: scoring logic never
//! touches the filesystem, and a deployment that persists elsewhere can
//! ignore this module entirely.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::engine::ScoringResult;
use crate::signals::ConversationalSignals;

/// One analyzed standup, as stored on disk. Fields the pipeline may not
/// have produced yet are optional and tolerated on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandupEntry {
    /// Assigned by the store on append.
    #[serde(default)]
    pub id: u64,
    /// Calendar date of the standup, YYYY-MM-DD.
    pub date: String,
    pub day_number: u32,
    /// Full conversation text, used for keyword analysis.
    pub transcript: String,
    /// Dominant emotion strength from the emotion API, 0-100.
    #[serde(default)]
    pub emotion_score: f64,
    #[serde(default)]
    pub dominant_emotion: String,
    #[serde(default)]
    pub emotions: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversational_signals: Option<ConversationalSignals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ScoringResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Append-oriented store over a single pretty-printed JSON array file.
#[derive(Debug, Clone)]
pub struct StandupStorage {
    data_file: PathBuf,
}

impl StandupStorage {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    pub fn data_file(&self) -> &std::path::Path {
        &self.data_file
    }

    /// All stored standups, oldest first. A missing file is an empty store.
    pub fn load(&self) -> Result<Vec<StandupEntry>> {
        if !self.data_file.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.data_file)
            .with_context(|| format!("read standup store {}", self.data_file.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parse standup store {}", self.data_file.display()))
    }

    /// Append one standup, assigning the next id and stamping `created_at`
    /// when absent. Returns the entry as stored.
    pub fn append(&self, mut entry: StandupEntry) -> Result<StandupEntry> {
        let mut entries = self.load()?;
        entry.id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        if entry.created_at.is_none() {
            entry.created_at = Some(Utc::now());
        }
        entries.push(entry.clone());
        self.save(&entries)?;
        Ok(entry)
    }

    pub fn save(&self, entries: &[StandupEntry]) -> Result<()> {
        if let Some(parent) = self.data_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create store directory {}", parent.display()))?;
            }
        }
        let raw = serde_json::to_vec_pretty(entries).context("serialize standup store")?;
        fs::write(&self.data_file, raw)
            .with_context(|| format!("write standup store {}", self.data_file.display()))
    }

    /// Highest day number seen so far, if any.
    pub fn latest_day(&self) -> Result<Option<u32>> {
        Ok(self.load()?.iter().map(|e| e.day_number).max())
    }
}
