use crate::types::{Leaderboard, LeaderboardEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEntry<'a> {
    pub entry: &'a LeaderboardEntry,
    pub is_current_user: bool,
}

/// Display projection of a leaderboard for one user. Borrows the entries it
/// shows and never alters their order or ranks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardView<'a> {
    pub entries: Vec<ViewEntry<'a>>,
    pub rank: Option<u32>,
}

impl<'a> LeaderboardView<'a> {
    pub fn project(leaderboard: &'a Leaderboard, username: Option<&str>) -> Self {
        let entries = leaderboard
            .entries()
            .iter()
            .map(|entry| ViewEntry {
                entry,
                is_current_user: username == Some(entry.username.as_str()),
            })
            .collect();

        Self {
            entries,
            rank: username.and_then(|name| leaderboard.rank_of(name)),
        }
    }

    pub fn rank_label(&self) -> String {
        rank_label(self.rank)
    }
}

pub fn rank_label(rank: Option<u32>) -> String {
    match rank {
        Some(rank) => format!("#{}", rank),
        None => "Loading...".to_string(),
    }
}
