//! # Session Progression
//! Append-only record of one standup session's exchanges, plus the tracker
//! that serializes appends behind a mutex. A progression is owned by
//! exactly one session; indices are 1-based, strictly increasing and
//! gap-free, and the sequence becomes read-only once the session completes
//! (exchange budget used up, or the caller ends it explicitly).

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::engine::{ScoringResult, StuckStatus};
use crate::signals::{ConversationalSignals, EmotionalSignals};

/// Sessions run a fixed number of exchanges by default.
pub const DEFAULT_MAX_EXCHANGES: u32 = 5;

/// One exchange's inputs paired with the result they scored to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    /// 1-based, strictly increasing within a session.
    pub exchange_index: u32,
    pub conversational: ConversationalSignals,
    pub emotional: EmotionalSignals,
    pub result: ScoringResult,
}

/// Append called out of sequence — a caller bug in session sequencing,
/// fatal to that append and never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OutOfOrderExchangeError {
    #[error("exchange index {got} out of order, expected {expected}")]
    NonConsecutive { expected: u32, got: u32 },
    #[error("exchange index {got} appended after session completion")]
    SessionComplete { got: u32 },
}

/// Ordered exchange history for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionProgression {
    records: Vec<ExchangeRecord>,
    max_exchanges: u32,
    complete: bool,
}

impl Default for SessionProgression {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EXCHANGES)
    }
}

impl SessionProgression {
    pub fn new(max_exchanges: u32) -> Self {
        Self {
            records: Vec::new(),
            max_exchanges,
            complete: false,
        }
    }

    /// Append the next exchange. The incoming index must be exactly one
    /// past the current length, and the session must still be active.
    pub fn append(&mut self, record: ExchangeRecord) -> Result<(), OutOfOrderExchangeError> {
        if self.complete {
            return Err(OutOfOrderExchangeError::SessionComplete {
                got: record.exchange_index,
            });
        }
        let expected = self.records.len() as u32 + 1;
        if record.exchange_index != expected {
            return Err(OutOfOrderExchangeError::NonConsecutive {
                expected,
                got: record.exchange_index,
            });
        }
        self.records.push(record);
        if self.records.len() as u32 >= self.max_exchanges {
            self.complete = true;
        }
        Ok(())
    }

    /// End the session before the exchange budget is used up.
    pub fn finish(&mut self) {
        self.complete = true;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max_exchanges(&self) -> u32 {
        self.max_exchanges
    }

    pub fn records(&self) -> &[ExchangeRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&ExchangeRecord> {
        self.records.last()
    }

    /// Derive the progression summary. Pure read: calling it repeatedly
    /// without intervening appends returns identical output, and it works
    /// on partial sessions too.
    pub fn summary(&self) -> ProgressionSummary {
        let exchanges = self
            .records
            .iter()
            .map(|r| ExchangeSummary {
                exchange_index: r.exchange_index,
                stuck_probability: r.result.stuck_probability,
                status: r.result.status(),
            })
            .collect();
        let monotonic_trend = self
            .records
            .windows(2)
            .all(|w| w[1].result.stuck_probability >= w[0].result.stuck_probability);

        ProgressionSummary {
            first_probability: self.records.first().map(|r| r.result.stuck_probability),
            last_probability: self.records.last().map(|r| r.result.stuck_probability),
            exchanges,
            monotonic_trend,
        }
    }
}

/// One line of the summary: (index, probability, status).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeSummary {
    pub exchange_index: u32,
    pub stuck_probability: f64,
    pub status: StuckStatus,
}

/// Serializable progression rollup for display or persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSummary {
    pub first_probability: Option<f64>,
    pub last_probability: Option<f64>,
    pub exchanges: Vec<ExchangeSummary>,
    /// True when the probability never decreased across the sequence.
    pub monotonic_trend: bool,
}

/// Serializes appends for one session so concurrent callers cannot break
/// the strictly-increasing index invariant. Deployments where a session is
/// only ever touched by one caller can use `SessionProgression` directly.
#[derive(Debug)]
pub struct SessionProgressTracker {
    inner: Mutex<SessionProgression>,
}

impl Default for SessionProgressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EXCHANGES)
    }
}

impl SessionProgressTracker {
    pub fn new(max_exchanges: u32) -> Self {
        Self {
            inner: Mutex::new(SessionProgression::new(max_exchanges)),
        }
    }

    pub fn append(&self, record: ExchangeRecord) -> Result<(), OutOfOrderExchangeError> {
        self.inner.lock().expect("session mutex poisoned").append(record)
    }

    pub fn summary(&self) -> ProgressionSummary {
        self.inner.lock().expect("session mutex poisoned").summary()
    }

    pub fn finish(&self) {
        self.inner.lock().expect("session mutex poisoned").finish()
    }

    pub fn is_complete(&self) -> bool {
        self.inner.lock().expect("session mutex poisoned").is_complete()
    }

    /// Clone of the current progression, for consumers that read history
    /// (question selection, persistence) without holding the lock.
    pub fn snapshot(&self) -> SessionProgression {
        self.inner.lock().expect("session mutex poisoned").clone()
    }

    pub fn into_inner(self) -> SessionProgression {
        self.inner.into_inner().expect("session mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ScoreBreakdown;

    fn record(index: u32, probability: f64) -> ExchangeRecord {
        ExchangeRecord {
            exchange_index: index,
            conversational: ConversationalSignals::default(),
            emotional: EmotionalSignals::default(),
            result: ScoringResult {
                conversational_score: probability,
                emotional_score: probability,
                stuck_probability: probability,
                breakdown: ScoreBreakdown::default(),
            },
        }
    }

    #[test]
    fn appends_must_be_consecutive_from_one() {
        let mut session = SessionProgression::default();
        session.append(record(1, 0.2)).unwrap();

        let err = session.append(record(3, 0.3)).unwrap_err();
        assert_eq!(
            err,
            OutOfOrderExchangeError::NonConsecutive { expected: 2, got: 3 }
        );

        // A failed append leaves the progression untouched.
        assert_eq!(session.len(), 1);
        session.append(record(2, 0.3)).unwrap();
    }

    #[test]
    fn completes_at_the_exchange_budget() {
        let mut session = SessionProgression::new(2);
        session.append(record(1, 0.2)).unwrap();
        assert!(!session.is_complete());
        session.append(record(2, 0.3)).unwrap();
        assert!(session.is_complete());

        let err = session.append(record(3, 0.4)).unwrap_err();
        assert_eq!(err, OutOfOrderExchangeError::SessionComplete { got: 3 });
    }

    #[test]
    fn explicit_finish_freezes_the_progression() {
        let mut session = SessionProgression::default();
        session.append(record(1, 0.2)).unwrap();
        session.finish();
        assert!(session.append(record(2, 0.3)).is_err());
        assert_eq!(session.summary().exchanges.len(), 1);
    }

    #[test]
    fn summary_reports_trend_and_endpoints() {
        let mut session = SessionProgression::default();
        for (i, p) in [0.28, 0.35, 0.48, 0.62, 0.73].into_iter().enumerate() {
            session.append(record(i as u32 + 1, p)).unwrap();
        }
        let summary = session.summary();
        assert_eq!(summary.first_probability, Some(0.28));
        assert_eq!(summary.last_probability, Some(0.73));
        assert!(summary.monotonic_trend);
        assert_eq!(summary.exchanges.len(), 5);
        assert_eq!(summary.exchanges[4].status, StuckStatus::Stuck);
    }

    #[test]
    fn any_decrease_clears_the_trend_flag() {
        let mut session = SessionProgression::default();
        for (i, p) in [0.28, 0.35, 0.30].into_iter().enumerate() {
            session.append(record(i as u32 + 1, p)).unwrap();
        }
        assert!(!session.summary().monotonic_trend);
    }

    #[test]
    fn summary_is_idempotent_and_available_mid_session() {
        let tracker = SessionProgressTracker::default();
        tracker.append(record(1, 0.2)).unwrap();
        let a = tracker.summary();
        let b = tracker.summary();
        assert_eq!(a, b);
        assert_eq!(a.exchanges.len(), 1);
        assert!(a.monotonic_trend);
    }

    #[test]
    fn empty_summary_has_no_endpoints() {
        let summary = SessionProgression::default().summary();
        assert_eq!(summary.first_probability, None);
        assert_eq!(summary.last_probability, None);
        assert!(summary.monotonic_trend);
        assert!(summary.exchanges.is_empty());
    }
}
