//! Request/response contract with the scoring service.

pub mod http;

pub use http::HttpScoringClient;

use crate::error::{Result, SpinboardError};
use crate::types::{Credential, Leaderboard, Snapshot};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Credential issued for a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub credential: Credential,
    pub username: String,
}

/// The four authoritative operations of the scoring service.
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn fetch_leaderboard(&self) -> Result<Leaderboard>;

    async fn fetch_user_rank(&self, credential: &Credential) -> Result<u32>;

    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant>;

    /// Reports a wheel outcome; the service computes the new score and ranks.
    async fn increment_score(&self, credential: &Credential, value: &str) -> Result<Snapshot>;
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct RankResponse {
    pub rank: u32,
}

#[derive(Debug, Serialize)]
pub struct IncrementRequest<'a> {
    pub increment: &'a str,
}

/// Body shared by increment-score responses and leaderboard broadcasts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotPayload {
    #[serde(default)]
    pub leaderboard: Option<Leaderboard>,
    #[serde(default)]
    pub seq: Option<u64>,
}

impl SnapshotPayload {
    pub fn into_snapshot(self) -> Result<Snapshot> {
        let leaderboard = self
            .leaderboard
            .ok_or_else(|| SpinboardError::protocol("Snapshot payload has no leaderboard"))?;
        Ok(Snapshot {
            leaderboard,
            seq: self.seq,
        })
    }
}
