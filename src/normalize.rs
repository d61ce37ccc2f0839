//! # Signal Normalizer
//! Validates and clamps raw collaborator output before it reaches the
//! scoring engine. Upstream analyzers are not trusted to respect bounds,
//! and partially filled payloads are an expected degraded-input case — the
//! normalizer coerces and continues, logging what it had to fix. The only
//! hard failure is input that is not a JSON object at all.

use serde_json::{Map, Value};
use tracing::warn;

use crate::signals::{ConversationalSignals, EmotionalSignals, CORE_EMOTIONS};

/// Raw input was structurally invalid (not a mapping). The caller must
/// reject the originating request; there is nothing to coerce.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a JSON object for {section} signals, got {found}")]
pub struct InputShapeError {
    pub section: &'static str,
    pub found: &'static str,
}

/// Normalize one exchange's raw conversational and emotional payloads.
pub fn normalize(
    raw_conversational: &Value,
    raw_emotional: &Value,
) -> Result<(ConversationalSignals, EmotionalSignals), InputShapeError> {
    Ok((
        normalize_conversational(raw_conversational)?,
        normalize_emotional(raw_emotional)?,
    ))
}

pub fn normalize_conversational(raw: &Value) -> Result<ConversationalSignals, InputShapeError> {
    let map = as_object(raw, "conversational")?;

    // The conversation analyzer has shipped both key spellings; accept
    // either, preferring the bare name.
    let vagueness = fraction(map, &["vagueness", "vagueness_score"], 0.0);
    let specificity = fraction(map, &["specificity", "specificity_score"], 1.0);

    Ok(ConversationalSignals {
        vagueness,
        specificity,
        hedging_count: hedging_count(map),
        help_seeking: flag(map, "help_seeking", true),
        overconfident_pattern: flag(map, "overconfident_pattern", false),
    })
}

pub fn normalize_emotional(raw: &Value) -> Result<EmotionalSignals, InputShapeError> {
    let map = as_object(raw, "emotional")?;

    // The emotion API wraps its mapping in an "emotions" envelope; bare
    // mappings are accepted too.
    let map = match map.get("emotions") {
        Some(inner) => as_object(inner, "emotional")?,
        None => map,
    };

    let mut signals = EmotionalSignals::default();
    for (name, value) in map {
        match value.as_f64() {
            Some(v) => {
                signals.emotions.insert(name.clone(), clamp01(v));
            }
            None => warn!(emotion = %name, "dropping non-numeric emotion value"),
        }
    }
    // Partial emotional data is normal operation, not an error.
    for name in CORE_EMOTIONS {
        signals.emotions.entry(name.to_string()).or_insert(0.0);
    }
    Ok(signals)
}

fn as_object<'a>(
    value: &'a Value,
    section: &'static str,
) -> Result<&'a Map<String, Value>, InputShapeError> {
    value.as_object().ok_or(InputShapeError {
        section,
        found: json_type(value),
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// First present key wins; non-numeric values fall back to the default and
/// out-of-range values are clamped into [0,1].
fn fraction(map: &Map<String, Value>, keys: &[&'static str], default: f64) -> f64 {
    for key in keys {
        let Some(value) = map.get(*key) else { continue };
        match value.as_f64() {
            Some(v) => return clamp01(v),
            None => {
                warn!(field = key, "non-numeric fractional signal, using default");
                return default;
            }
        }
    }
    default
}

/// Coerce to a non-negative integer count. Negative or non-numeric input
/// becomes 0 and is logged; a missing field is simply 0.
fn hedging_count(map: &Map<String, Value>) -> u32 {
    let Some(value) = map.get("hedging_count") else {
        return 0;
    };
    match value.as_f64() {
        Some(v) if v < 0.0 => {
            warn!(value = v, "negative hedging_count coerced to 0");
            0
        }
        Some(v) => v.trunc().min(f64::from(u32::MAX)) as u32,
        None => {
            warn!("non-numeric hedging_count coerced to 0");
            0
        }
    }
}

fn flag(map: &Map<String, Value>, key: &'static str, default: bool) -> bool {
    match map.get(key) {
        None => default,
        Some(value) => match value.as_bool() {
            Some(b) => b,
            None => {
                warn!(field = key, "non-boolean signal, using default");
                default
            }
        },
    }
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}
