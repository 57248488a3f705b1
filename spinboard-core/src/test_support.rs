//! Scripted collaborators for unit tests.

use crate::api::{LoginGrant, ScoringService};
use crate::error::{Result, SpinboardError};
use crate::outcome::{Outcome, OutcomeSource};
use crate::realtime::Transport;
use crate::types::{Credential, Leaderboard, LeaderboardEntry, Session, Snapshot};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Notify};

/// In-process scoring service that ranks players by descending score.
pub struct MockScoringService {
    passwords: HashMap<String, String>,
    scores: Mutex<Vec<(String, u64)>>,
    tokens: Mutex<HashMap<String, String>>,
    logins: AtomicUsize,
    pub increments: Mutex<Vec<String>>,
    pub rank_calls: AtomicUsize,
    pub leaderboard_calls: AtomicUsize,
    pub unreachable: AtomicBool,
    pub fail_increments: AtomicBool,
    gate: Option<Arc<Notify>>,
}

impl MockScoringService {
    pub fn new(users: &[(&str, &str)]) -> Self {
        Self {
            passwords: users
                .iter()
                .map(|(name, password)| (name.to_string(), password.to_string()))
                .collect(),
            scores: Mutex::new(Vec::new()),
            tokens: Mutex::new(HashMap::new()),
            logins: AtomicUsize::new(0),
            increments: Mutex::new(Vec::new()),
            rank_calls: AtomicUsize::new(0),
            leaderboard_calls: AtomicUsize::new(0),
            unreachable: AtomicBool::new(false),
            fail_increments: AtomicBool::new(false),
            gate: None,
        }
    }

    /// Holds every increment response until the returned notifier fires.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn with_score(self, username: &str, score: u64) -> Self {
        self.scores.lock().push((username.to_string(), score));
        self
    }

    pub fn increment_count(&self) -> usize {
        self.increments.lock().len()
    }

    fn standings(&self) -> Leaderboard {
        let mut scores = self.scores.lock().clone();
        scores.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let entries = scores
            .into_iter()
            .enumerate()
            .map(|(i, (name, score))| LeaderboardEntry::new(name, score, i as u32 + 1))
            .collect();
        Leaderboard::new(entries).expect("mock standings are well formed")
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(SpinboardError::network("connection refused"));
        }
        Ok(())
    }

    fn user_for(&self, credential: &Credential) -> Result<String> {
        self.tokens
            .lock()
            .get(credential.as_str())
            .cloned()
            .ok_or_else(|| SpinboardError::auth("invalid token"))
    }
}

#[async_trait]
impl ScoringService for MockScoringService {
    async fn fetch_leaderboard(&self) -> Result<Leaderboard> {
        self.leaderboard_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        Ok(self.standings())
    }

    async fn fetch_user_rank(&self, credential: &Credential) -> Result<u32> {
        self.rank_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        let username = self.user_for(credential)?;
        self.standings()
            .rank_of(&username)
            .ok_or_else(|| SpinboardError::protocol("user has no rank"))
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant> {
        self.check_reachable()?;
        if self.passwords.get(username).map(String::as_str) != Some(password) {
            return Err(SpinboardError::auth("Login rejected with status 401"));
        }

        let token = format!("T{}", self.logins.fetch_add(1, Ordering::SeqCst) + 1);
        self.tokens.lock().insert(token.clone(), username.to_string());
        {
            let mut scores = self.scores.lock();
            if !scores.iter().any(|(name, _)| name == username) {
                scores.push((username.to_string(), 0));
            }
        }

        Ok(LoginGrant {
            credential: Credential::new(token),
            username: username.to_string(),
        })
    }

    async fn increment_score(&self, credential: &Credential, value: &str) -> Result<Snapshot> {
        self.increments.lock().push(value.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.check_reachable()?;
        if self.fail_increments.load(Ordering::SeqCst) {
            return Err(SpinboardError::protocol("Score increment failed with status 500"));
        }

        let username = self.user_for(credential)?;
        let amount: u64 = value
            .parse()
            .map_err(|_| SpinboardError::protocol("increment is not a number"))?;
        {
            let mut scores = self.scores.lock();
            match scores.iter_mut().find(|(name, _)| *name == username) {
                Some((_, score)) => *score += amount,
                None => scores.push((username, amount)),
            }
        }

        Ok(Snapshot::new(self.standings()))
    }
}

/// Yields scripted wheel indices in order, then index 0.
pub struct FixedOutcomes {
    indices: Mutex<VecDeque<usize>>,
    pub draws: AtomicUsize,
}

impl FixedOutcomes {
    pub fn new(indices: &[usize]) -> Self {
        Self {
            indices: Mutex::new(indices.iter().copied().collect()),
            draws: AtomicUsize::new(0),
        }
    }
}

impl OutcomeSource for FixedOutcomes {
    fn next(&self) -> Outcome {
        self.draws.fetch_add(1, Ordering::SeqCst);
        let index = self.indices.lock().pop_front().unwrap_or(0);
        Outcome::from_index(index).expect("scripted index is on the wheel")
    }
}

/// Transport fed from a channel; dropping the sender ends the stream.
pub struct MockTransport {
    incoming: mpsc::UnboundedReceiver<Result<String>>,
    pub closed: Arc<AtomicBool>,
}

impl MockTransport {
    pub fn new() -> (Self, mpsc::UnboundedSender<Result<String>>, Arc<AtomicBool>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        let transport = Self {
            incoming: rx,
            closed: closed.clone(),
        };
        (transport, tx, closed)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn recv(&mut self) -> Option<Result<String>> {
        self.incoming.recv().await
    }

    async fn close(&mut self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Session channel as published by a `SessionStore`, logged in as `username`.
pub fn session_channel(
    username: Option<&str>,
) -> (
    watch::Sender<Option<Session>>,
    watch::Receiver<Option<Session>>,
) {
    watch::channel(username.map(|name| Session::new(Credential::new("T1"), name)))
}

/// Socket.IO event packet carrying a leaderboard broadcast.
pub fn broadcast_packet(entries: &[(&str, u64, u32)]) -> String {
    let leaderboard: Vec<serde_json::Value> = entries
        .iter()
        .map(|(name, score, rank)| {
            serde_json::json!({ "username": name, "score": score, "rank": rank })
        })
        .collect();
    format!(
        "42{}",
        serde_json::json!(["leaderboard-update", { "leaderboard": leaderboard }])
    )
}
