use crate::api::{HttpScoringClient, ScoringService};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::leaderboard::{BoardState, SharedLeaderboard};
use crate::outcome::{Outcome, OutcomeSource, RandomOutcomes};
use crate::realtime::{RealtimeChannel, Transport, WebSocketTransport};
use crate::session::SessionStore;
use crate::spin::{SpinController, SpinPhase, SpinResolution};
use crate::storage::Storage;
use crate::types::{Leaderboard, Session};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

pub const DATABASE_FILE: &str = "spinboard.db";

/// One player's view of the game: session, wheel and live leaderboard.
pub struct GameClient {
    config: ClientConfig,
    service: Arc<dyn ScoringService>,
    sessions: SessionStore,
    board: SharedLeaderboard,
    spinner: SpinController,
}

impl GameClient {
    /// Opens the client for `scope` against the HTTP scoring service,
    /// restoring any session saved for that scope.
    pub async fn open(config: ClientConfig, data_dir: &Path, scope: &str) -> Result<Self> {
        let storage = Arc::new(Storage::new(&data_dir.join(DATABASE_FILE)).await?);
        let service = Arc::new(HttpScoringClient::new(config.clone())?);
        Self::with_parts(config, storage, scope, service, Arc::new(RandomOutcomes)).await
    }

    pub async fn with_parts(
        config: ClientConfig,
        storage: Arc<Storage>,
        scope: &str,
        service: Arc<dyn ScoringService>,
        outcomes: Arc<dyn OutcomeSource>,
    ) -> Result<Self> {
        let board = SharedLeaderboard::new();
        let sessions = SessionStore::new(storage, scope, service.clone());
        let spinner = SpinController::new(outcomes, service.clone(), board.clone());

        let client = Self {
            config,
            service,
            sessions,
            board,
            spinner,
        };

        if client.sessions.restore().await?.is_some() {
            client.refresh().await;
        }

        Ok(client)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> Option<Session> {
        self.sessions.current()
    }

    pub fn username(&self) -> Option<String> {
        self.sessions.username()
    }

    pub fn scope(&self) -> &str {
        self.sessions.scope()
    }

    pub fn board(&self) -> &SharedLeaderboard {
        &self.board
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.board.subscribe()
    }

    pub fn spin_phase(&self) -> SpinPhase {
        self.spinner.phase()
    }

    /// Logs in, then loads the leaderboard and the new user's rank.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let session = self.sessions.login(username, password).await?;
        self.refresh().await;
        Ok(session)
    }

    pub async fn logout(&self) -> Result<bool> {
        let removed = self.sessions.forget().await?;
        self.board.set_user_rank(None);
        Ok(removed)
    }

    /// Fetches the leaderboard and, when logged in, the user's rank.
    /// Failures are logged and the previous state is kept.
    pub async fn refresh(&self) {
        tokio::join!(self.refresh_leaderboard(), self.refresh_rank());
    }

    pub async fn refresh_leaderboard(&self) -> Option<Leaderboard> {
        match self.service.fetch_leaderboard().await {
            Ok(leaderboard) => {
                self.board.replace_leaderboard(leaderboard.clone());
                Some(leaderboard)
            }
            Err(e) => {
                tracing::error!("Error fetching leaderboard: {}", e);
                None
            }
        }
    }

    pub async fn refresh_rank(&self) -> Option<u32> {
        let session = self.sessions.current()?;
        match self.service.fetch_user_rank(&session.credential).await {
            Ok(rank) => {
                self.board.set_user_rank(Some(rank));
                Some(rank)
            }
            Err(e) => {
                tracing::error!("Error fetching user rank: {}", e);
                None
            }
        }
    }

    /// Starts a spin. `Ok(None)` means a spin is already in flight.
    pub fn spin(&self) -> Result<Option<Outcome>> {
        self.sessions.require()?;
        Ok(self.spinner.request_spin())
    }

    /// Resolves the running spin once its animation has finished.
    pub async fn finish_spin(&self) -> Result<SpinResolution> {
        let session = self.sessions.require()?;
        Ok(self.spinner.animation_complete(&session).await)
    }

    /// Subscribes the shared leaderboard to broadcasts over `transport`.
    /// Ranks are derived for whoever is logged in when each broadcast lands.
    pub fn attach_realtime(&self, transport: impl Transport) -> RealtimeChannel {
        RealtimeChannel::start(transport, self.board.clone(), self.sessions.watch())
    }

    pub async fn connect_realtime(&self) -> Result<RealtimeChannel> {
        let transport = WebSocketTransport::connect(&self.config).await?;
        Ok(self.attach_realtime(transport))
    }
}
