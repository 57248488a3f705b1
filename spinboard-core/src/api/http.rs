use crate::api::{
    IncrementRequest, LoginGrant, LoginRequest, LoginResponse, RankResponse, ScoringService,
    SnapshotPayload,
};
use crate::config::ClientConfig;
use crate::error::{Result, SpinboardError};
use crate::types::{Credential, Leaderboard, Snapshot};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// `ScoringService` over HTTP with JSON bodies.
pub struct HttpScoringClient {
    http: Client,
    config: ClientConfig,
}

impl HttpScoringClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| SpinboardError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(SpinboardError::from_status(status, context));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| SpinboardError::protocol(format!("{}: malformed response: {}", context, e)))
}

#[async_trait]
impl ScoringService for HttpScoringClient {
    async fn fetch_leaderboard(&self) -> Result<Leaderboard> {
        let response = self
            .http
            .get(self.config.endpoint("/leaderboard"))
            .send()
            .await?;

        read_json(response, "Leaderboard fetch").await
    }

    async fn fetch_user_rank(&self, credential: &Credential) -> Result<u32> {
        let response = self
            .http
            .get(self.config.endpoint("/user-rank"))
            .header(AUTHORIZATION, credential.bearer())
            .send()
            .await?;

        let body: RankResponse = read_json(response, "Rank fetch").await?;
        Ok(body.rank)
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant> {
        let response = self
            .http
            .post(self.config.endpoint("/login"))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let body: LoginResponse = read_json(response, "Login").await?;
        if body.token.is_empty() {
            return Err(SpinboardError::protocol("Login returned an empty token"));
        }

        tracing::debug!("Login accepted for '{}'", username);
        Ok(LoginGrant {
            credential: Credential::new(body.token),
            username: username.to_string(),
        })
    }

    async fn increment_score(&self, credential: &Credential, value: &str) -> Result<Snapshot> {
        let response = self
            .http
            .post(self.config.endpoint("/increment-score"))
            .header(AUTHORIZATION, credential.bearer())
            .json(&IncrementRequest { increment: value })
            .send()
            .await?;

        let payload: SnapshotPayload = read_json(response, "Score increment").await?;
        payload.into_snapshot()
    }
}
