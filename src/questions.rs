//! # Adaptive Question Selector
//! Picks the next follow-up question variant from the latest scoring
//! result. Deliberately a two-variant decision table, not a general state
//! machine: a vague answer gets the specificity probe, anything else gets
//! the neutral current-focus prompt. Question text/audio rendering belongs
//! to an external collaborator; this module only returns the variant.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::ScoringResult;
use crate::session::{SessionProgression, DEFAULT_MAX_EXCHANGES};

/// Answers with raw vagueness above this get the specificity probe.
pub const VAGUENESS_PROBE_THRESHOLD: f64 = 0.5;

/// Opaque question variant for the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionChoice {
    /// Probe for concrete detail after a vague answer.
    AskForSpecificity,
    /// Neutral continuation when the answer was concrete enough.
    AskAboutCurrentFocus,
}

impl QuestionChoice {
    /// Fallback text for callers without a richer renderer.
    pub fn default_prompt(&self) -> &'static str {
        match self {
            QuestionChoice::AskForSpecificity => {
                "Can you be more specific about what you accomplished?"
            }
            QuestionChoice::AskAboutCurrentFocus => "What are you working on today?",
        }
    }
}

/// Outcome of one selection: either the next question or the end of the
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    Ask(QuestionChoice),
    SessionComplete,
}

#[derive(Debug, Clone, Copy)]
pub struct QuestionSelector {
    max_exchanges: u32,
}

impl Default for QuestionSelector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EXCHANGES)
    }
}

impl QuestionSelector {
    pub fn new(max_exchanges: u32) -> Self {
        Self { max_exchanges }
    }

    /// Pick what happens after the exchange `latest` was scored for.
    /// `exchange_index` is that exchange's 1-based index; once it reaches
    /// the session budget the session is complete regardless of score.
    ///
    /// The branching signal is the raw vagueness of the most recent answer,
    /// kept next to its result in the progression. With no recorded
    /// exchange yet there is no vagueness evidence and the neutral prompt
    /// wins.
    pub fn select_next(
        &self,
        exchange_index: u32,
        latest: &ScoringResult,
        history: &SessionProgression,
    ) -> NextStep {
        if exchange_index >= self.max_exchanges {
            return NextStep::SessionComplete;
        }

        let vagueness = history.last().map_or(0.0, |r| r.conversational.vagueness);
        let choice = if vagueness > VAGUENESS_PROBE_THRESHOLD {
            QuestionChoice::AskForSpecificity
        } else {
            QuestionChoice::AskAboutCurrentFocus
        };
        debug!(
            exchange_index,
            vagueness,
            probability = latest.stuck_probability,
            status = latest.status().as_str(),
            ?choice,
            "selected follow-up"
        );
        NextStep::Ask(choice)
    }
}
