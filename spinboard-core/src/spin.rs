use crate::api::ScoringService;
use crate::leaderboard::{ApplyOutcome, SharedLeaderboard, SnapshotOrigin};
use crate::outcome::{Outcome, OutcomeSource};
use crate::types::Session;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifecycle of one spin. The outcome drawn on entering `Spinning` is carried
/// through `Resolving` unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinState {
    Idle,
    Spinning { outcome: Outcome },
    Resolving { outcome: Outcome },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinPhase {
    Idle,
    Spinning,
    Resolving,
}

impl SpinState {
    pub fn phase(&self) -> SpinPhase {
        match self {
            SpinState::Idle => SpinPhase::Idle,
            SpinState::Spinning { .. } => SpinPhase::Spinning,
            SpinState::Resolving { .. } => SpinPhase::Resolving,
        }
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            SpinState::Idle => None,
            SpinState::Spinning { outcome } | SpinState::Resolving { outcome } => Some(outcome),
        }
    }
}

impl SpinPhase {
    /// Whether the spin control should be enabled.
    pub fn accepts_spin(self) -> bool {
        matches!(self, SpinPhase::Idle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinResolution {
    Scored {
        outcome: Outcome,
        applied: ApplyOutcome,
    },
    Failed {
        outcome: Outcome,
        reason: String,
    },
    /// No spin was waiting on its animation.
    Ignored,
}

pub struct SpinController {
    outcomes: Arc<dyn OutcomeSource>,
    service: Arc<dyn ScoringService>,
    board: SharedLeaderboard,
    state: Mutex<SpinState>,
}

impl SpinController {
    pub fn new(
        outcomes: Arc<dyn OutcomeSource>,
        service: Arc<dyn ScoringService>,
        board: SharedLeaderboard,
    ) -> Self {
        Self {
            outcomes,
            service,
            board,
            state: Mutex::new(SpinState::Idle),
        }
    }

    pub fn state(&self) -> SpinState {
        self.state.lock().clone()
    }

    pub fn phase(&self) -> SpinPhase {
        self.state.lock().phase()
    }

    /// Starts a spin if none is in flight and returns the outcome the wheel
    /// must land on. Returns `None` while a spin is already running.
    pub fn request_spin(&self) -> Option<Outcome> {
        let mut state = self.state.lock();
        if !matches!(*state, SpinState::Idle) {
            tracing::debug!("Spin requested while {:?}; ignoring", state.phase());
            return None;
        }

        let outcome = self.outcomes.next();
        tracing::info!(
            "Spinning towards segment {} ({})",
            outcome.index,
            outcome.value
        );
        *state = SpinState::Spinning {
            outcome: outcome.clone(),
        };
        Some(outcome)
    }

    /// Called once the wheel animation has stopped. Reports the recorded
    /// outcome and applies the returned standings. Failures leave the shared
    /// leaderboard untouched and are not retried; the controller returns to
    /// `Idle` either way.
    pub async fn animation_complete(&self, session: &Session) -> SpinResolution {
        let outcome = {
            let mut state = self.state.lock();
            match std::mem::replace(&mut *state, SpinState::Idle) {
                SpinState::Spinning { outcome } => {
                    *state = SpinState::Resolving {
                        outcome: outcome.clone(),
                    };
                    outcome
                }
                other => {
                    *state = other;
                    return SpinResolution::Ignored;
                }
            }
        };
        // Frees the controller even if this future is dropped mid-request
        let _reset = ResetToIdle(&self.state);

        match self
            .service
            .increment_score(&session.credential, &outcome.value)
            .await
        {
            Ok(snapshot) => {
                let applied = self.board.apply_snapshot(
                    snapshot,
                    Some(session.username.as_str()),
                    SnapshotOrigin::Response,
                );
                tracing::info!("Reported {} for '{}'", outcome.value, session.username);
                SpinResolution::Scored { outcome, applied }
            }
            Err(e) => {
                tracing::error!("Error updating score: {}", e);
                SpinResolution::Failed {
                    outcome,
                    reason: e.to_string(),
                }
            }
        }
    }
}

struct ResetToIdle<'a>(&'a Mutex<SpinState>);

impl Drop for ResetToIdle<'_> {
    fn drop(&mut self) {
        *self.0.lock() = SpinState::Idle;
    }
}
