use crate::error::SpinboardError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Opaque bearer token issued by the scoring service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub credential: Credential,
    pub username: String,
    pub authenticated: bool,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(credential: Credential, username: impl Into<String>) -> Self {
        Self {
            credential,
            username: username.into(),
            authenticated: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u64,
    pub rank: u32,
}

impl LeaderboardEntry {
    pub fn new(username: impl Into<String>, score: u64, rank: u32) -> Self {
        Self {
            username: username.into(),
            score,
            rank,
        }
    }
}

/// Ranked standings exactly as issued by the scoring service.
///
/// Ranks are never computed or reordered locally. Construction only checks
/// that the sequence is well formed: every rank is at least 1, ranks strictly
/// ascend in sequence order and usernames are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LeaderboardEntry>", into = "Vec<LeaderboardEntry>")]
pub struct Leaderboard(Vec<LeaderboardEntry>);

impl Leaderboard {
    pub fn new(entries: Vec<LeaderboardEntry>) -> crate::Result<Self> {
        validate_ranking(&entries)?;
        Ok(Self(entries))
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, username: &str) -> Option<&LeaderboardEntry> {
        self.0.iter().find(|entry| entry.username == username)
    }

    pub fn rank_of(&self, username: &str) -> Option<u32> {
        self.get(username).map(|entry| entry.rank)
    }
}

fn validate_ranking(entries: &[LeaderboardEntry]) -> crate::Result<()> {
    let mut previous_rank = 0u32;
    let mut seen = HashSet::with_capacity(entries.len());

    for entry in entries {
        if entry.rank == 0 {
            return Err(SpinboardError::protocol(format!(
                "Entry '{}' has rank 0",
                entry.username
            )));
        }
        if entry.rank <= previous_rank {
            return Err(SpinboardError::protocol(format!(
                "Entry '{}' has rank {} after rank {}",
                entry.username, entry.rank, previous_rank
            )));
        }
        if !seen.insert(entry.username.as_str()) {
            return Err(SpinboardError::protocol(format!(
                "Duplicate leaderboard entry for '{}'",
                entry.username
            )));
        }
        previous_rank = entry.rank;
    }

    Ok(())
}

impl TryFrom<Vec<LeaderboardEntry>> for Leaderboard {
    type Error = SpinboardError;

    fn try_from(entries: Vec<LeaderboardEntry>) -> crate::Result<Self> {
        Self::new(entries)
    }
}

impl From<Leaderboard> for Vec<LeaderboardEntry> {
    fn from(leaderboard: Leaderboard) -> Self {
        leaderboard.0
    }
}

/// A complete leaderboard as known at one instant.
///
/// `seq` is only present when the service stamps its snapshots; unstamped
/// snapshots are applied last-write-wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub leaderboard: Leaderboard,
    pub seq: Option<u64>,
}

impl Snapshot {
    pub fn new(leaderboard: Leaderboard) -> Self {
        Self {
            leaderboard,
            seq: None,
        }
    }

    pub fn with_seq(leaderboard: Leaderboard, seq: u64) -> Self {
        Self {
            leaderboard,
            seq: Some(seq),
        }
    }
}
