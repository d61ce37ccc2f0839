//! signals.rs — data model for the per-exchange inputs produced by the
//! upstream transcription/emotion and conversation-analysis collaborators.
//!
//! Everything here is already normalized: fractional fields sit in [0,1]
//! and the core emotion keys are guaranteed present. Raw collaborator
//! output goes through `normalize` first.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Emotion keys the scoring formula reads. The normalizer guarantees these
/// exist in every `EmotionalSignals` (missing keys are filled with 0.0).
pub const CORE_EMOTIONS: [&str; 5] = [
    "happiness",
    "excitement",
    "sadness",
    "frustration",
    "anxiety",
];

/// Language-level signals extracted from one question/answer exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationalSignals {
    /// Degree of non-specific language, [0,1].
    pub vagueness: f64,
    /// Independently supplied by the analyzer; not required to sum to 1
    /// with `vagueness`.
    pub specificity: f64,
    /// Count of hedging tokens ("um", "I think", "kind of", ...) observed.
    pub hedging_count: u32,
    /// Whether the speaker solicited assistance.
    pub help_seeking: bool,
    /// Same unfinished task repeated across exchanges without completion
    /// evidence, despite articulate and specific answers.
    pub overconfident_pattern: bool,
}

impl Default for ConversationalSignals {
    /// The lenient defaults the upstream analyzer assumes for missing
    /// fields: nothing vague, fully specific, no hedging, open to help.
    fn default() -> Self {
        Self {
            vagueness: 0.0,
            specificity: 1.0,
            hedging_count: 0,
            help_seeking: true,
            overconfident_pattern: false,
        }
    }
}

/// Per-exchange emotion probabilities from the voice-emotion collaborator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionalSignals {
    /// Emotion name → value in [0,1]. Values are independent probabilities,
    /// not a distribution; they need not sum to 1.
    pub emotions: BTreeMap<String, f64>,
}

impl EmotionalSignals {
    /// Value for a single emotion, 0.0 when absent.
    pub fn get(&self, name: &str) -> f64 {
        self.emotions.get(name).copied().unwrap_or(0.0)
    }
}
