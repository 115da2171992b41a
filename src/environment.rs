// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    #[default]
    Development,
    Production,
}

impl AppMode {
    pub fn from_env() -> Self {
        let name = std::env::var("JOB_BOARD_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_default();
        Self::from_name(&name)
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => AppMode::Production,
            _ => AppMode::Development,
        }
    }

    /// Internal error details are only sent to clients outside production
    pub fn exposes_error_details(&self) -> bool {
        *self != AppMode::Production
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(skip)]
    pub mode: AppMode,
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    development: Option<EnvironmentConfig>,
    production: Option<EnvironmentConfig>,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data/jobs.db")
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_file() -> PathBuf {
    PathBuf::from("logs/job-board.log")
}

fn default_page_size() -> u32 {
    crate::core::query::DEFAULT_PAGE_SIZE
}

impl EnvironmentConfig {
    pub fn defaults(mode: AppMode) -> Self {
        Self {
            mode,
            database_path: default_database_path(),
            address: default_address(),
            port: default_port(),
            log_file: default_log_file(),
            default_page_size: default_page_size(),
        }
    }

    /// Load configuration for the current environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mode = AppMode::from_env();
        info!("Loading configuration for environment: {:?}", mode);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::from_yaml_str(&content, mode)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else {
            info!(
                "{} not found, using built-in defaults",
                config_path.display()
            );
            Self::defaults(mode)
        };

        config.apply_env_overrides()?;
        config.database_path = Self::resolve_path(&config.database_path)?;
        config.log_file = Self::resolve_path(&config.log_file)?;
        Ok(config)
    }

    /// Pick the section for `mode`; a missing section falls back to defaults
    pub fn from_yaml_str(content: &str, mode: AppMode) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        let section = match mode {
            AppMode::Development => file.development,
            AppMode::Production => file.production,
        };

        let mut config = section.unwrap_or_else(|| Self::defaults(mode));
        config.mode = mode;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("JOB_BOARD_PORT").or_else(|_| std::env::var("ROCKET_PORT"))
        {
            self.port = port
                .parse::<u16>()
                .with_context(|| format!("Port must be a valid port number, got '{}'", port))?;
        }

        if let Ok(path) = std::env::var("JOB_BOARD_DATABASE") {
            self.database_path = PathBuf::from(path);
        }

        Ok(())
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Ensure parent directories of the database and log file exist
    pub async fn ensure_directories(&self) -> Result<()> {
        for file in [&self.database_path, &self.log_file] {
            if let Some(parent) = file.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        info!("All configured directories ensured to exist");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
development:
  database_path: data/dev.db
  port: 5050
production:
  database_path: /var/lib/job-board/jobs.db
  address: 127.0.0.1
  default_page_size: 20
"#;

    #[test]
    fn test_mode_names() {
        assert_eq!(AppMode::from_name("production"), AppMode::Production);
        assert_eq!(AppMode::from_name(" PROD "), AppMode::Production);
        assert_eq!(AppMode::from_name("local"), AppMode::Development);
        assert_eq!(AppMode::from_name(""), AppMode::Development);
        assert!(AppMode::Development.exposes_error_details());
        assert!(!AppMode::Production.exposes_error_details());
    }

    #[test]
    fn test_sections_are_selected_by_mode() {
        let dev = EnvironmentConfig::from_yaml_str(SAMPLE, AppMode::Development).unwrap();
        assert_eq!(dev.mode, AppMode::Development);
        assert_eq!(dev.port, 5050);
        assert_eq!(dev.database_path, PathBuf::from("data/dev.db"));
        assert_eq!(dev.default_page_size, 10);

        let prod = EnvironmentConfig::from_yaml_str(SAMPLE, AppMode::Production).unwrap();
        assert_eq!(prod.mode, AppMode::Production);
        assert_eq!(prod.port, 5000);
        assert_eq!(prod.address, "127.0.0.1");
        assert_eq!(prod.default_page_size, 20);
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let config =
            EnvironmentConfig::from_yaml_str("development:\n  port: 6000\n", AppMode::Production)
                .unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_path, PathBuf::from("data/jobs.db"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(EnvironmentConfig::from_yaml_str("development: [", AppMode::Development).is_err());
    }
}
