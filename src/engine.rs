//! # Stuck Scoring Engine
//! Pure, testable logic that maps normalized signals → `ScoringResult`.
//! No I/O, no shared state; identical inputs and weights always produce
//! identical output, so any score can be reproduced and explained later.
//!
//! Policy: five weighted conversational terms and three weighted emotional
//! terms, blended 70/30 by default. Each weight group must sum to 1.0 —
//! silently renormalizing would make the documented formula diverge from
//! the computed score.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::signals::{ConversationalSignals, EmotionalSignals};

/// Hedging occurrences at or above this count score as maximal severity,
/// so one rambling answer cannot dominate the conversational score.
pub const HEDGING_CEILING: f64 = 20.0;

/// Probability strictly above this classifies as `Stuck`.
pub const STUCK_THRESHOLD: f64 = 0.70;
/// Probability at or above this (and not above `STUCK_THRESHOLD`)
/// classifies as `Warning`.
pub const WARNING_THRESHOLD: f64 = 0.40;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weights for the five conversational terms. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationalWeights {
    pub vagueness: f64,
    pub lack_of_specificity: f64,
    pub hedging: f64,
    pub avoiding_help: f64,
    pub overconfidence: f64,
}

impl Default for ConversationalWeights {
    fn default() -> Self {
        Self {
            vagueness: 0.25,
            lack_of_specificity: 0.25,
            hedging: 0.20,
            avoiding_help: 0.20,
            overconfidence: 0.10,
        }
    }
}

impl ConversationalWeights {
    fn sum(&self) -> f64 {
        self.vagueness + self.lack_of_specificity + self.hedging + self.avoiding_help
            + self.overconfidence
    }
}

/// Weights for the three emotional terms. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionalWeights {
    /// sadness + frustration
    pub negative_affect: f64,
    /// 1 - (happiness + excitement), floored at 0
    pub lack_of_positive: f64,
    pub anxiety: f64,
}

impl Default for EmotionalWeights {
    fn default() -> Self {
        Self {
            negative_affect: 0.4,
            lack_of_positive: 0.3,
            anxiety: 0.3,
        }
    }
}

impl EmotionalWeights {
    fn sum(&self) -> f64 {
        self.negative_affect + self.lack_of_positive + self.anxiety
    }
}

/// Blend between the two component scores. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    pub conversational: f64,
    pub emotional: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            conversational: 0.7,
            emotional: 0.3,
        }
    }
}

impl BlendWeights {
    fn sum(&self) -> f64 {
        self.conversational + self.emotional
    }
}

/// Full weighting policy for one scoring call. The defaults match the
/// documented formula; callers override per call for tuning or testing,
/// never through global state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub conversational: ConversationalWeights,
    pub emotional: EmotionalWeights,
    pub blend: BlendWeights,
}

impl ScoringWeights {
    /// Reject any weight group that does not sum to 1.0 (within 1e-6).
    pub fn validate(&self) -> Result<(), WeightConfigurationError> {
        for (group, sum) in [
            ("conversational", self.conversational.sum()),
            ("emotional", self.emotional.sum()),
            ("blend", self.blend.sum()),
        ] {
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(WeightConfigurationError { group, sum });
            }
        }
        Ok(())
    }
}

/// A supplied weight group does not sum to 1.0. Configuration bug at the
/// call site; fatal to that call, never retried or renormalized.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("{group} weights sum to {sum}, expected 1.0")]
pub struct WeightConfigurationError {
    pub group: &'static str,
    pub sum: f64,
}

/// Three-band classification of a stuck probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StuckStatus {
    OnTrack,
    Warning,
    Stuck,
}

impl StuckStatus {
    /// Sole source of truth for the classification. Status is always
    /// derived from the probability, never stored alongside it.
    pub fn from_probability(p: f64) -> Self {
        if p > STUCK_THRESHOLD {
            StuckStatus::Stuck
        } else if p >= WARNING_THRESHOLD {
            StuckStatus::Warning
        } else {
            StuckStatus::OnTrack
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StuckStatus::OnTrack => "on_track",
            StuckStatus::Warning => "warning",
            StuckStatus::Stuck => "stuck",
        }
    }
}

/// Each individually weighted conversational term, kept for explainability.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConversationalBreakdown {
    pub vagueness: f64,
    pub lack_of_specificity: f64,
    pub hedging: f64,
    pub avoiding_help: f64,
    pub overconfidence: f64,
}

/// Each individually weighted emotional term.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionalBreakdown {
    pub negative_affect: f64,
    pub lack_of_positive: f64,
    pub anxiety: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub conversational: ConversationalBreakdown,
    pub emotional: EmotionalBreakdown,
}

/// Immutable result of one scoring call.
///
/// `status` is not a field: it is recomputed from `stuck_probability` on
/// every access and injected at serialization time, so a stored label can
/// never drift from the probability it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringResult {
    pub conversational_score: f64,
    pub emotional_score: f64,
    pub stuck_probability: f64,
    pub breakdown: ScoreBreakdown,
}

impl ScoringResult {
    pub fn status(&self) -> StuckStatus {
        StuckStatus::from_probability(self.stuck_probability)
    }
}

impl Serialize for ScoringResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut st = serializer.serialize_struct("ScoringResult", 5)?;
        st.serialize_field("conversational_score", &self.conversational_score)?;
        st.serialize_field("emotional_score", &self.emotional_score)?;
        st.serialize_field("stuck_probability", &self.stuck_probability)?;
        st.serialize_field("status", &self.status())?;
        st.serialize_field("breakdown", &self.breakdown)?;
        st.end()
    }
}

impl<'de> Deserialize<'de> for ScoringResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Any stored `status` label is ignored and re-derived from the
        // probability on access.
        #[derive(Deserialize)]
        struct Wire {
            conversational_score: f64,
            emotional_score: f64,
            stuck_probability: f64,
            #[serde(default)]
            breakdown: ScoreBreakdown,
        }
        let w = Wire::deserialize(deserializer)?;
        Ok(ScoringResult {
            conversational_score: w.conversational_score,
            emotional_score: w.emotional_score,
            stuck_probability: w.stuck_probability,
            breakdown: w.breakdown,
        })
    }
}

/// Score one exchange with the documented default weights.
pub fn score(conv: &ConversationalSignals, emo: &EmotionalSignals) -> ScoringResult {
    // The defaults sum to 1.0 by construction; validation cannot fail here.
    score_unchecked(conv, emo, &ScoringWeights::default())
}

/// Score one exchange with caller-supplied weights.
pub fn score_with_weights(
    conv: &ConversationalSignals,
    emo: &EmotionalSignals,
    weights: &ScoringWeights,
) -> Result<ScoringResult, WeightConfigurationError> {
    weights.validate()?;
    Ok(score_unchecked(conv, emo, weights))
}

fn score_unchecked(
    conv: &ConversationalSignals,
    emo: &EmotionalSignals,
    w: &ScoringWeights,
) -> ScoringResult {
    // Conversational: five weighted terms. The overconfidence term catches
    // engineers who are articulate (low vagueness, high specificity) yet
    // stalled on the same task; without it that class under-scores.
    let hedging_normalized = (f64::from(conv.hedging_count) / HEDGING_CEILING).min(1.0);
    let avoiding_help = if conv.help_seeking { 0.0 } else { 1.0 };
    let overconfidence = if conv.overconfident_pattern { 1.0 } else { 0.0 };

    let conversational = ConversationalBreakdown {
        vagueness: conv.vagueness * w.conversational.vagueness,
        lack_of_specificity: (1.0 - conv.specificity) * w.conversational.lack_of_specificity,
        hedging: hedging_normalized * w.conversational.hedging,
        avoiding_help: avoiding_help * w.conversational.avoiding_help,
        overconfidence: overconfidence * w.conversational.overconfidence,
    };
    let conversational_score = conversational.vagueness
        + conversational.lack_of_specificity
        + conversational.hedging
        + conversational.avoiding_help
        + conversational.overconfidence;

    // Emotional: happiness and excitement are independent probabilities, so
    // their sum can exceed 1 and the lack-of-positive term must be floored
    // at 0 before weighting — otherwise strong positive affect would cancel
    // negative-affect evidence elsewhere.
    let negative_affect = emo.get("sadness") + emo.get("frustration");
    let lack_of_positive = (1.0 - (emo.get("happiness") + emo.get("excitement"))).max(0.0);

    let emotional = EmotionalBreakdown {
        negative_affect: negative_affect * w.emotional.negative_affect,
        lack_of_positive: lack_of_positive * w.emotional.lack_of_positive,
        anxiety: emo.get("anxiety") * w.emotional.anxiety,
    };
    // negative_affect alone can reach 2.0, so cap the component total.
    let emotional_score = (emotional.negative_affect
        + emotional.lack_of_positive
        + emotional.anxiety)
        .min(1.0);

    let stuck_probability = (conversational_score * w.blend.conversational
        + emotional_score * w.blend.emotional)
        .clamp(0.0, 1.0);

    ScoringResult {
        conversational_score,
        emotional_score,
        stuck_probability,
        breakdown: ScoreBreakdown {
            conversational,
            emotional,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn emotions(pairs: &[(&str, f64)]) -> EmotionalSignals {
        EmotionalSignals {
            emotions: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn status_bands_at_boundaries() {
        assert_eq!(StuckStatus::from_probability(0.70), StuckStatus::Warning);
        assert_eq!(
            StuckStatus::from_probability(0.700_000_01),
            StuckStatus::Stuck
        );
        assert_eq!(StuckStatus::from_probability(0.40), StuckStatus::Warning);
        assert_eq!(
            StuckStatus::from_probability(0.399_999),
            StuckStatus::OnTrack
        );
        assert_eq!(StuckStatus::from_probability(0.0), StuckStatus::OnTrack);
        assert_eq!(StuckStatus::from_probability(1.0), StuckStatus::Stuck);
    }

    #[test]
    fn documented_example_scores() {
        let conv = ConversationalSignals {
            vagueness: 0.3,
            specificity: 0.7,
            hedging_count: 6,
            help_seeking: true,
            overconfident_pattern: false,
        };
        let emo = emotions(&[
            ("happiness", 0.365),
            ("excitement", 0.05),
            ("sadness", 0.1),
            ("frustration", 0.05),
            ("anxiety", 0.1),
        ]);

        let r = score(&conv, &emo);
        assert!((r.conversational_score - 0.21).abs() < 1e-9);
        assert!((r.emotional_score - 0.2655).abs() < 1e-9);
        assert!((r.stuck_probability - 0.22665).abs() < 1e-9);
        assert_eq!(r.status(), StuckStatus::OnTrack);

        // Weighted terms survive individually for explainability.
        assert!((r.breakdown.conversational.vagueness - 0.075).abs() < 1e-9);
        assert!((r.breakdown.conversational.hedging - 0.06).abs() < 1e-9);
        assert_eq!(r.breakdown.conversational.avoiding_help, 0.0);
        assert!((r.breakdown.emotional.lack_of_positive - 0.1755).abs() < 1e-9);
    }

    #[test]
    fn overconfident_pattern_raises_articulate_answers() {
        let articulate = ConversationalSignals {
            vagueness: 0.1,
            specificity: 0.9,
            hedging_count: 2,
            help_seeking: false,
            overconfident_pattern: false,
        };
        let stalled = ConversationalSignals {
            overconfident_pattern: true,
            ..articulate.clone()
        };
        let emo = EmotionalSignals::default();

        let base = score(&articulate, &emo);
        let flagged = score(&stalled, &emo);
        assert!(
            (flagged.conversational_score - base.conversational_score - 0.10).abs() < 1e-9,
            "overconfidence term contributes its full weight"
        );
    }

    #[test]
    fn strong_positive_affect_cannot_go_negative() {
        let emo = emotions(&[
            ("happiness", 0.9),
            ("excitement", 0.8),
            ("sadness", 0.2),
            ("frustration", 0.1),
        ]);
        let r = score(&ConversationalSignals::default(), &emo);
        assert_eq!(r.breakdown.emotional.lack_of_positive, 0.0);
        assert!(r.emotional_score >= 0.0);
        assert!(r.stuck_probability >= 0.0);
    }

    #[test]
    fn hedging_is_capped_at_the_ceiling() {
        let mut conv = ConversationalSignals {
            hedging_count: 20,
            ..Default::default()
        };
        let at_ceiling = score(&conv, &EmotionalSignals::default());
        conv.hedging_count = 500;
        let way_past = score(&conv, &EmotionalSignals::default());
        assert_eq!(
            at_ceiling.breakdown.conversational.hedging,
            way_past.breakdown.conversational.hedging
        );
    }

    #[test]
    fn identical_inputs_give_bit_identical_results() {
        let conv = ConversationalSignals {
            vagueness: 0.55,
            specificity: 0.45,
            hedging_count: 12,
            help_seeking: false,
            overconfident_pattern: true,
        };
        let emo = emotions(&[("sadness", 0.3), ("anxiety", 0.25), ("happiness", 0.1)]);

        let a = score(&conv, &emo);
        let b = score(&conv, &emo);
        assert_eq!(a.stuck_probability.to_bits(), b.stuck_probability.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_weight_group_is_rejected() {
        let weights = ScoringWeights {
            emotional: EmotionalWeights {
                negative_affect: 0.5,
                lack_of_positive: 0.5,
                anxiety: 0.5,
            },
            ..Default::default()
        };
        let err = score_with_weights(
            &ConversationalSignals::default(),
            &EmotionalSignals::default(),
            &weights,
        )
        .unwrap_err();
        assert_eq!(err.group, "emotional");
        assert!((err.sum - 1.5).abs() < 1e-9);
    }

    #[test]
    fn default_weights_validate() {
        assert!(ScoringWeights::default().validate().is_ok());
    }
}
