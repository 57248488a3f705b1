//! Shared leaderboard state written by score responses and broadcasts.

pub mod view;

pub use view::{rank_label, LeaderboardView, ViewEntry};

use crate::types::{Leaderboard, Snapshot};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    pub leaderboard: Leaderboard,
    /// Highest snapshot sequence number applied so far.
    pub seq: Option<u64>,
    /// Current user's rank; `None` until known.
    pub user_rank: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrigin {
    Response,
    Broadcast,
    Fetch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Stale { incoming: u64, current: u64 },
}

/// Cloneable handle to the one leaderboard every writer and view shares.
#[derive(Debug, Clone)]
pub struct SharedLeaderboard {
    tx: Arc<watch::Sender<BoardState>>,
}

impl Default for SharedLeaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedLeaderboard {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(BoardState::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> BoardState {
        self.tx.borrow().clone()
    }

    pub fn leaderboard(&self) -> Leaderboard {
        self.tx.borrow().leaderboard.clone()
    }

    pub fn user_rank(&self) -> Option<u32> {
        self.tx.borrow().user_rank
    }

    /// Replaces the leaderboard wholesale and re-derives the user's rank.
    ///
    /// When both the incoming and the applied snapshot carry sequence numbers,
    /// an incoming snapshot that is not newer is discarded. Unsequenced
    /// snapshots always win.
    pub fn apply_snapshot(
        &self,
        snapshot: Snapshot,
        username: Option<&str>,
        origin: SnapshotOrigin,
    ) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::Applied;

        self.tx.send_if_modified(|state| {
            if let (Some(incoming), Some(current)) = (snapshot.seq, state.seq) {
                if incoming <= current {
                    outcome = ApplyOutcome::Stale { incoming, current };
                    return false;
                }
            }

            state.user_rank = username.and_then(|name| snapshot.leaderboard.rank_of(name));
            state.seq = snapshot.seq.or(state.seq);
            state.leaderboard = snapshot.leaderboard;
            true
        });

        match outcome {
            ApplyOutcome::Applied => {
                tracing::debug!("Applied {:?} snapshot (seq {:?})", origin, snapshot.seq);
            }
            ApplyOutcome::Stale { incoming, current } => {
                tracing::warn!(
                    "Discarded stale {:?} snapshot: seq {} is not newer than {}",
                    origin,
                    incoming,
                    current
                );
            }
        }

        outcome
    }

    /// Installs a plain leaderboard fetch; the stored rank is left alone.
    pub fn replace_leaderboard(&self, leaderboard: Leaderboard) {
        self.tx.send_modify(|state| state.leaderboard = leaderboard);
    }

    pub fn set_user_rank(&self, rank: Option<u32>) {
        self.tx.send_if_modified(|state| {
            if state.user_rank == rank {
                return false;
            }
            state.user_rank = rank;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LeaderboardEntry;

    fn board(entries: &[(&str, u64, u32)]) -> Leaderboard {
        Leaderboard::new(
            entries
                .iter()
                .map(|(name, score, rank)| LeaderboardEntry::new(*name, *score, *rank))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_apply_replaces_wholesale_and_derives_rank() {
        let shared = SharedLeaderboard::new();
        shared.apply_snapshot(
            Snapshot::new(board(&[("alice", 21, 1), ("bob", 4, 2)])),
            Some("bob"),
            SnapshotOrigin::Response,
        );
        assert_eq!(shared.user_rank(), Some(2));

        shared.apply_snapshot(
            Snapshot::new(board(&[("carol", 36, 1)])),
            Some("bob"),
            SnapshotOrigin::Broadcast,
        );
        let state = shared.current();
        assert_eq!(state.leaderboard.len(), 1);
        assert_eq!(state.user_rank, None);
    }

    #[test]
    fn test_last_write_wins_without_sequence_numbers() {
        let shared = SharedLeaderboard::new();
        let s2 = board(&[("alice", 21, 1)]);
        let s1 = board(&[("alice", 21, 1), ("bob", 15, 2)]);

        shared.apply_snapshot(Snapshot::new(s2), Some("alice"), SnapshotOrigin::Response);
        let outcome =
            shared.apply_snapshot(Snapshot::new(s1.clone()), Some("alice"), SnapshotOrigin::Broadcast);

        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(shared.leaderboard(), s1);
    }

    #[test]
    fn test_stale_sequenced_snapshot_is_discarded() {
        let shared = SharedLeaderboard::new();
        let newer = board(&[("alice", 42, 1)]);
        let older = board(&[("alice", 21, 1)]);

        shared.apply_snapshot(
            Snapshot::with_seq(newer.clone(), 8),
            Some("alice"),
            SnapshotOrigin::Response,
        );
        let outcome = shared.apply_snapshot(
            Snapshot::with_seq(older, 7),
            Some("alice"),
            SnapshotOrigin::Broadcast,
        );

        assert_eq!(outcome, ApplyOutcome::Stale { incoming: 7, current: 8 });
        assert_eq!(shared.leaderboard(), newer);
        assert_eq!(shared.current().seq, Some(8));
    }

    #[test]
    fn test_subscribers_see_changes() {
        let shared = SharedLeaderboard::new();
        let mut rx = shared.subscribe();
        assert!(!rx.has_changed().unwrap());

        shared.set_user_rank(Some(3));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().user_rank, Some(3));

        shared.set_user_rank(Some(3));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_fetch_keeps_rank() {
        let shared = SharedLeaderboard::new();
        shared.set_user_rank(Some(5));
        shared.replace_leaderboard(board(&[("alice", 1, 1)]));
        assert_eq!(shared.user_rank(), Some(5));
        assert_eq!(shared.leaderboard().len(), 1);
    }
}
