// src/web/types.rs
use rocket::FromForm;

use crate::core::query::DEFAULT_PAGE_SIZE;
use crate::environment::{AppMode, EnvironmentConfig};

/// Server settings managed as Rocket state
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub mode: AppMode,
    pub address: String,
    pub port: u16,
    pub default_page_size: u32,
}

impl ServerConfig {
    pub fn from_environment(environment: &EnvironmentConfig) -> Self {
        Self {
            mode: environment.mode,
            address: environment.address.clone(),
            port: environment.port,
            default_page_size: environment.default_page_size,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mode: AppMode::Development,
            address: "127.0.0.1".to_string(),
            port: 5000,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, FromForm)]
pub struct StatsParams {
    #[field(name = "activeOnly")]
    pub active_only: Option<bool>,
}
