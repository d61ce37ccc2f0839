//! # Insight Engine
//! Multi-day pattern detection over stored standups, plus display
//! formatting for the per-exchange hybrid result. Works on whatever the
//! store hands it; no I/O of its own. Output strings stay ASCII for stable
//! console rendering.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::engine::ScoringResult;
use crate::storage::StandupEntry;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid keyword regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "is", "was", "are", "been", "be", "have", "has", "had", "do", "does", "did",
        "will", "would", "could", "should", "can", "may", "might", "must", "that", "this",
        "these", "those", "i", "you", "he", "she", "it", "we", "they", "my", "your", "his",
        "her", "its", "our", "their", "me", "him", "us", "them", "myself", "got", "get", "now",
    ]
    .into_iter()
    .collect()
});

/// Words shorter than this never count as keywords.
pub const MIN_KEYWORD_LENGTH: usize = 3;
/// A keyword must recur this often across standups to flag a pattern.
pub const MIN_KEYWORD_OCCURRENCES: usize = 3;
/// Emotion-score decline (percentage points) that flags a pattern.
pub const EMOTION_DECLINE_THRESHOLD: f64 = 10.0;

/// Patterns need a few days of history before they mean anything.
const MIN_STANDUPS_FOR_PATTERN: usize = 3;

/// Lowercased keywords of a transcript, stop-word filtered.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|&w| w.len() >= MIN_KEYWORD_LENGTH && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Keywords recurring at least `min_occurrences` times across all
/// transcripts, most frequent first (ties broken alphabetically).
pub fn find_repeated_keywords(
    standups: &[StandupEntry],
    min_occurrences: usize,
) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for standup in standups {
        for keyword in extract_keywords(&standup.transcript) {
            *counts.entry(keyword).or_default() += 1;
        }
    }

    let mut repeated: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= min_occurrences)
        .collect();
    repeated.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    repeated
}

/// Emotion-score change from the baseline day to the latest standup.
/// Negative means decline. Falls back to the first entry when the baseline
/// day is absent; an empty slice is a delta of 0.
pub fn emotion_delta(standups: &[StandupEntry], baseline_day: u32) -> f64 {
    let (Some(first), Some(current)) = (standups.first(), standups.last()) else {
        return 0.0;
    };
    let baseline = standups
        .iter()
        .find(|s| s.day_number == baseline_day)
        .unwrap_or(first);
    current.emotion_score - baseline.emotion_score
}

/// A detected multi-day stuck pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StuckPattern {
    pub repeated_keyword: String,
    pub keyword_count: usize,
    pub emotion_delta: f64,
    pub days_affected: usize,
    pub recommendation: String,
}

/// Flag an engineer as stuck when the same keyword keeps recurring AND the
/// emotion score declined past the threshold. Needs at least three
/// standups of history; either signal alone is not enough.
pub fn detect_stuck_pattern(
    standups: &[StandupEntry],
    min_keyword_occurrences: usize,
    emotion_decline_threshold: f64,
) -> Option<StuckPattern> {
    if standups.len() < MIN_STANDUPS_FOR_PATTERN {
        return None;
    }

    let repeated = find_repeated_keywords(standups, min_keyword_occurrences);
    let delta = emotion_delta(standups, 1);

    let (top_keyword, count) = repeated.into_iter().next()?;
    if delta > -emotion_decline_threshold {
        return None;
    }

    Some(StuckPattern {
        repeated_keyword: top_keyword,
        keyword_count: count,
        emotion_delta: delta,
        days_affected: standups.len(),
        recommendation: "Consider pairing session or escalation".to_string(),
    })
}

/// Human-readable message for a detection outcome.
pub fn insight_message(pattern: Option<&StuckPattern>) -> String {
    let Some(p) = pattern else {
        return "No stuck pattern detected.".to_string();
    };
    format!(
        "Stuck pattern detected: working on '{}' for {} mentions across {} days; \
         emotion declined by {:.1} points. Recommendation: {}",
        p.repeated_keyword,
        p.keyword_count,
        p.days_affected,
        p.emotion_delta.abs(),
        p.recommendation
    )
}

/// Per-exchange hybrid result formatted for console display, component
/// terms included so any score can be explained at a glance.
pub fn format_hybrid_insight(exchange_index: u32, result: &ScoringResult) -> String {
    let status = result.status().as_str().to_uppercase().replace('_', " ");
    let c = &result.breakdown.conversational;
    let e = &result.breakdown.emotional;

    let mut out = format!("Exchange {}: {}\n", exchange_index, status);
    out.push_str(&format!(
        "  Stuck probability: {:.1}%\n",
        result.stuck_probability * 100.0
    ));
    out.push_str(&format!(
        "  - Conversational: {:.1}%\n",
        result.conversational_score * 100.0
    ));
    out.push_str(&format!(
        "  - Emotional: {:.1}%\n",
        result.emotional_score * 100.0
    ));
    out.push_str(&format!(
        "  Conversational terms: vagueness {:.3}, lack of specificity {:.3}, hedging {:.3}, avoiding help {:.3}, overconfidence {:.3}\n",
        c.vagueness, c.lack_of_specificity, c.hedging, c.avoiding_help, c.overconfidence
    ));
    out.push_str(&format!(
        "  Emotional terms: negative affect {:.3}, lack of positive {:.3}, anxiety {:.3}",
        e.negative_affect, e.lack_of_positive, e.anxiety
    ));
    out
}
