//! Standup Insight — Demo Entrypoint
//! Replays a five-exchange standup using canned analyzer output (what the
//! transcription, emotion and conversation-analysis collaborators would
//! return) and prints the hybrid scoring progression.
//!
//! Env:
//!   STANDUP_CONFIG_PATH — scoring config TOML (optional)
//!   STANDUP_DATA_FILE   — when set, persist the session to this JSON store
//!   RUST_LOG            — tracing filter (default: standup_insight=info)

use anyhow::Result;
use serde_json::{json, Value};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use standup_insight::insight::{
    detect_stuck_pattern, format_hybrid_insight, insight_message, EMOTION_DECLINE_THRESHOLD,
    MIN_KEYWORD_OCCURRENCES,
};
use standup_insight::{
    normalize, score_with_weights, ExchangeRecord, NextStep, QuestionSelector, ScoringConfig,
    SessionProgressTracker, StandupEntry, StandupStorage,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("standup_insight=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// Five days of analyzer output for an engineer sliding from healthy to
/// stuck: (conversational payload, emotional payload, transcript line).
fn demo_days() -> Vec<(Value, Value, &'static str)> {
    vec![
        (
            json!({
                "vagueness": 0.3, "specificity": 0.7, "hedging_count": 6,
                "help_seeking": true, "overconfident_pattern": false
            }),
            json!({
                "happiness": 0.365, "excitement": 0.05, "sadness": 0.1,
                "frustration": 0.05, "anxiety": 0.1
            }),
            "Finished the token refresh path for the authentication feature, starting on session expiry next.",
        ),
        (
            json!({
                "vagueness": 0.4, "specificity": 0.6, "hedging_count": 8,
                "help_seeking": true, "overconfident_pattern": false
            }),
            json!({
                "happiness": 0.3, "excitement": 0.05, "sadness": 0.12,
                "frustration": 0.08, "anxiety": 0.12
            }),
            "Still on the authentication feature, session expiry is trickier than expected.",
        ),
        (
            json!({
                "vagueness_score": 0.55, "specificity_score": 0.45, "hedging_count": 12,
                "help_seeking": true, "overconfident_pattern": false
            }),
            json!({ "emotions": {
                "happiness": 0.2, "excitement": 0.03, "sadness": 0.2,
                "frustration": 0.15, "anxiety": 0.2
            }}),
            "Um, mostly authentication stuff again, trying a few different approaches.",
        ),
        (
            json!({
                "vagueness": 0.7, "specificity": 0.3, "hedging_count": 16,
                "help_seeking": false, "overconfident_pattern": false
            }),
            json!({
                "happiness": 0.1, "excitement": 0.02, "sadness": 0.3,
                "frustration": 0.25, "anxiety": 0.3
            }),
            "Kind of still working through the authentication edge cases, I think.",
        ),
        (
            json!({
                "vagueness": 0.85, "specificity": 0.15, "hedging_count": 22,
                "help_seeking": false, "overconfident_pattern": true
            }),
            json!({
                "happiness": 0.05, "excitement": 0.01, "sadness": 0.4,
                "frustration": 0.35, "anxiety": 0.4
            }),
            "Just, you know, the usual authentication stuff. I'll figure it out myself.",
        ),
    ]
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ScoringConfig::load()?;
    let weights = config.weights();
    let selector = QuestionSelector::new(config.session.max_exchanges);
    let tracker = SessionProgressTracker::new(config.session.max_exchanges);

    let days = demo_days();
    let mut entries = Vec::new();

    for (i, (raw_conv, raw_emo, transcript)) in days.iter().enumerate() {
        let exchange_index = i as u32 + 1;
        let (conv, emo) = normalize(raw_conv, raw_emo)?;
        let result = score_with_weights(&conv, &emo, &weights)?;

        println!("{}", format_hybrid_insight(exchange_index, &result));

        entries.push(StandupEntry {
            id: 0,
            date: format!("2025-11-{:02}", exchange_index),
            day_number: exchange_index,
            transcript: transcript.to_string(),
            emotion_score: emo.get("happiness") * 100.0,
            dominant_emotion: "happiness".to_string(),
            emotions: emo.emotions.clone(),
            conversational_signals: Some(conv.clone()),
            result: Some(result.clone()),
            created_at: None,
        });

        tracker.append(ExchangeRecord {
            exchange_index,
            conversational: conv,
            emotional: emo,
            result: result.clone(),
        })?;

        match selector.select_next(exchange_index, &result, &tracker.snapshot()) {
            NextStep::Ask(choice) => println!("  Next question: {}\n", choice.default_prompt()),
            NextStep::SessionComplete => println!("  Session complete.\n"),
        }
    }

    let summary = tracker.summary();
    if let (Some(first), Some(last)) = (summary.first_probability, summary.last_probability) {
        println!(
            "Progression: {:.1}% -> {:.1}% over {} exchanges (monotonic: {})",
            first * 100.0,
            last * 100.0,
            summary.exchanges.len(),
            summary.monotonic_trend
        );
    }

    let pattern = detect_stuck_pattern(&entries, MIN_KEYWORD_OCCURRENCES, EMOTION_DECLINE_THRESHOLD);
    println!("{}", insight_message(pattern.as_ref()));

    if let Ok(path) = std::env::var("STANDUP_DATA_FILE") {
        let storage = StandupStorage::new(&path);
        for entry in entries {
            storage.append(entry)?;
        }
        println!("Session saved to {path}");
    }

    Ok(())
}
