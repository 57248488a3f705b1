use crate::error::{Result, SpinboardError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable carrying the scoring service's base address.
pub const SERVICE_URL_ENV: &str = "SPINBOARD_SERVICE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub service_url: String,
    /// Broadcast endpoint; falls back to `service_url` when unset.
    pub realtime_url: Option<String>,
    /// Per-request timeout. Requests wait indefinitely when unset.
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Duration,
    /// How long the front end lets the wheel animate before resolving a spin.
    pub animation_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:3005".to_string(),
            realtime_url: None,
            request_timeout: None,
            connect_timeout: Duration::from_secs(10),
            animation_delay: Duration::from_millis(100),
        }
    }
}

impl ClientConfig {
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        match std::env::var(SERVICE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn with_realtime_url(mut self, url: impl Into<String>) -> Self {
        self.realtime_url = Some(url.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn realtime_url(&self) -> &str {
        self.realtime_url.as_deref().unwrap_or(&self.service_url)
    }

    /// Joins a request path onto the service base address.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.service_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.service_url.is_empty() {
            return Err(SpinboardError::config("Service URL cannot be empty"));
        }

        for url in [self.service_url.as_str(), self.realtime_url()] {
            let parsed = reqwest::Url::parse(url)
                .map_err(|e| SpinboardError::config(format!("Invalid URL '{}': {}", url, e)))?;
            if !matches!(parsed.scheme(), "http" | "https" | "ws" | "wss") {
                return Err(SpinboardError::config(format!(
                    "Unsupported URL scheme '{}'",
                    parsed.scheme()
                )));
            }
        }

        if self.connect_timeout.is_zero() {
            return Err(SpinboardError::config(
                "Connect timeout must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joining() {
        let config = ClientConfig::new("http://scores.local:3005/");
        assert_eq!(config.endpoint("/login"), "http://scores.local:3005/login");
        assert_eq!(
            config.endpoint("increment-score"),
            "http://scores.local:3005/increment-score"
        );
    }

    #[test]
    fn test_realtime_url_falls_back_to_service() {
        let config = ClientConfig::new("http://scores.local:3005");
        assert_eq!(config.realtime_url(), "http://scores.local:3005");

        let config = config.with_realtime_url("ws://push.local");
        assert_eq!(config.realtime_url(), "ws://push.local");
    }

    #[test]
    fn test_validate() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::new("").validate().is_err());
        assert!(ClientConfig::new("not a url").validate().is_err());
        assert!(ClientConfig::new("ftp://scores.local").validate().is_err());
    }
}
