//! Spinboard SDK - client core for roulette sessions on a shared leaderboard
//!
//! Holds the session credential, drives one wheel spin at a time against the
//! scoring service and keeps a single leaderboard in sync with both score
//! responses and pushed broadcasts.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod outcome;
pub mod realtime;
pub mod session;
pub mod spin;
pub mod storage;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{HttpScoringClient, ScoringService};
pub use client::GameClient;
pub use config::ClientConfig;
pub use error::{Result, SpinboardError};
pub use leaderboard::{BoardState, LeaderboardView, SharedLeaderboard};
pub use outcome::{Outcome, OutcomeSource, RandomOutcomes, WHEEL};
pub use realtime::RealtimeChannel;
pub use session::SessionStore;
pub use spin::{SpinController, SpinPhase, SpinResolution, SpinState};
pub use types::{Credential, Leaderboard, LeaderboardEntry, Session, Snapshot};
