// tests/scoring_properties.rs
//
// Property-style coverage for the scoring pipeline: the final probability
// stays in [0,1] for arbitrary (even hostile) analyzer output, statuses
// match the documented bands exactly at the boundaries, and scoring is
// deterministic.

use rand::Rng;
use serde_json::json;

use standup_insight::{
    normalize, score, score_with_weights, ScoringWeights, StuckStatus, WeightConfigurationError,
};
use standup_insight::engine::{BlendWeights, ConversationalWeights, EmotionalWeights};

#[test]
fn probability_stays_clamped_for_random_raw_input() {
    let mut rng = rand::rng();

    for _ in 0..500 {
        // Raw analyzer output is not trusted to respect bounds.
        let raw_conv = json!({
            "vagueness": rng.random_range(-2.0..3.0),
            "specificity": rng.random_range(-2.0..3.0),
            "hedging_count": rng.random_range(-50..200),
            "help_seeking": rng.random::<bool>(),
            "overconfident_pattern": rng.random::<bool>(),
        });
        let raw_emo = json!({
            "happiness": rng.random_range(-1.0..2.0),
            "excitement": rng.random_range(-1.0..2.0),
            "sadness": rng.random_range(-1.0..2.0),
            "frustration": rng.random_range(-1.0..2.0),
            "anxiety": rng.random_range(-1.0..2.0),
        });

        let (conv, emo) = normalize(&raw_conv, &raw_emo).unwrap();
        let result = score(&conv, &emo);
        assert!(
            (0.0..=1.0).contains(&result.stuck_probability),
            "probability {} escaped [0,1] for conv {:?}",
            result.stuck_probability,
            conv
        );
        assert!(result.emotional_score >= 0.0);
    }
}

#[test]
fn positive_affect_overflow_still_clamps() {
    // happiness + excitement > 1 must not push anything negative.
    let (conv, emo) = normalize(
        &json!({ "vagueness": 0.0, "specificity": 1.0 }),
        &json!({ "happiness": 1.0, "excitement": 1.0 }),
    )
    .unwrap();
    let result = score(&conv, &emo);
    assert!(result.stuck_probability >= 0.0);
    assert_eq!(result.breakdown.emotional.lack_of_positive, 0.0);
}

#[test]
fn status_bands_match_documented_boundaries() {
    assert_eq!(StuckStatus::from_probability(0.70), StuckStatus::Warning);
    assert_eq!(StuckStatus::from_probability(0.700_000_01), StuckStatus::Stuck);
    assert_eq!(StuckStatus::from_probability(0.40), StuckStatus::Warning);
    assert_eq!(StuckStatus::from_probability(0.399_999), StuckStatus::OnTrack);
}

#[test]
fn scoring_is_deterministic_from_raw_payloads() {
    let raw_conv = json!({
        "vagueness": 0.62, "specificity": 0.31, "hedging_count": 14,
        "help_seeking": false, "overconfident_pattern": true
    });
    let raw_emo = json!({ "sadness": 0.27, "frustration": 0.33, "anxiety": 0.41 });

    let (conv_a, emo_a) = normalize(&raw_conv, &raw_emo).unwrap();
    let (conv_b, emo_b) = normalize(&raw_conv, &raw_emo).unwrap();
    let a = score(&conv_a, &emo_a);
    let b = score(&conv_b, &emo_b);

    assert_eq!(a.stuck_probability.to_bits(), b.stuck_probability.to_bits());
    assert_eq!(
        a.conversational_score.to_bits(),
        b.conversational_score.to_bits()
    );
    assert_eq!(a, b);
}

#[test]
fn every_weight_group_is_validated() {
    let conv = ConversationalWeights {
        vagueness: 0.5,
        lack_of_specificity: 0.5,
        hedging: 0.5,
        avoiding_help: 0.0,
        overconfidence: 0.0,
    };
    let err = ScoringWeights {
        conversational: conv,
        ..Default::default()
    }
    .validate()
    .unwrap_err();
    assert_eq!(err.group, "conversational");

    let emo = EmotionalWeights {
        negative_affect: 0.5,
        lack_of_positive: 0.5,
        anxiety: 0.5,
    };
    let err = ScoringWeights {
        emotional: emo,
        ..Default::default()
    }
    .validate()
    .unwrap_err();
    assert_eq!(err.group, "emotional");

    let blend = BlendWeights {
        conversational: 0.9,
        emotional: 0.3,
    };
    let err: WeightConfigurationError = ScoringWeights {
        blend,
        ..Default::default()
    }
    .validate()
    .unwrap_err();
    assert_eq!(err.group, "blend");
}

#[test]
fn custom_weights_change_the_blend() {
    let (conv, emo) = normalize(
        &json!({ "vagueness": 1.0, "specificity": 0.0, "hedging_count": 20,
                 "help_seeking": false, "overconfident_pattern": true }),
        &json!({ "happiness": 1.0, "excitement": 1.0 }),
    )
    .unwrap();

    // All conversational evidence, zero emotional evidence.
    let weights = ScoringWeights {
        blend: BlendWeights {
            conversational: 1.0,
            emotional: 0.0,
        },
        ..Default::default()
    };
    let result = score_with_weights(&conv, &emo, &weights).unwrap();
    assert!((result.stuck_probability - 1.0).abs() < 1e-9);
}

#[test]
fn documented_example_end_to_end() {
    // The README's worked example, fed through the normalizer first.
    let (conv, emo) = normalize(
        &json!({
            "vagueness": 0.3, "specificity": 0.7, "hedging_count": 6,
            "help_seeking": true, "overconfident_pattern": false
        }),
        &json!({
            "happiness": 0.365, "excitement": 0.05, "sadness": 0.1,
            "frustration": 0.05, "anxiety": 0.1
        }),
    )
    .unwrap();

    let result = score(&conv, &emo);
    assert!((result.conversational_score - 0.21).abs() < 1e-9);
    assert!((result.emotional_score - 0.2655).abs() < 1e-9);
    assert!((result.stuck_probability - 0.22665).abs() < 1e-9);
    assert_eq!(result.status(), StuckStatus::OnTrack);
}
