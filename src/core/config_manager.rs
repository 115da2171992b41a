// src/core/config_manager.rs
//! Server and client configuration loaded in one place

use anyhow::Result;
use std::time::Duration;
use tracing::info;

use crate::environment::EnvironmentConfig;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ConfigManager {
    pub fn load() -> Result<Self> {
        let environment = EnvironmentConfig::load()?;
        let client = Self::load_client();

        Ok(Self {
            environment,
            client,
        })
    }

    fn load_client() -> ClientConfig {
        let api_url = std::env::var("JOB_BOARD_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        info!("Job board API URL: {}", api_url);

        ClientConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            ..ClientConfig::default()
        }
    }

    pub async fn ensure_directories(&self) -> Result<()> {
        self.environment.ensure_directories().await
    }
}
