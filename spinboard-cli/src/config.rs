use serde::{Deserialize, Serialize};
use spinboard_core::ClientConfig;
use std::path::PathBuf;

pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub profile: String,
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("spinboard"),
            profile: DEFAULT_PROFILE.to_string(),
            verbose: false,
        }
    }
}

/// Client settings from the environment, with `--server` taking precedence.
pub fn client_config(server: Option<String>) -> ClientConfig {
    match server {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::from_env(),
    }
}
