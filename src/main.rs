use anyhow::{Context, Result};
use clap::Parser;
use job_board::app_log;
use job_board::cli::{handle_command, JobsCli};
use job_board::core::ConfigManager;
use std::fs::OpenOptions;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "job_board=info,rocket=warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Human-readable console output, used on its own until the log file is known
fn console_subscriber<W>(writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(writer))
        .with(env_filter())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = JobsCli::parse();

    // Configuration decides where the log file lives, so it is loaded with console logging only
    let config = {
        let _console = tracing::subscriber::set_default(console_subscriber(std::io::stderr));
        let config = ConfigManager::load()?;
        config.ensure_directories().await?;
        config
    };

    let log_path = &config.environment.log_file;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(env_filter())
        .init();

    app_log!(info, "Environment: {:?}", config.environment.mode);
    app_log!(
        info,
        "Database: {}",
        config.environment.database_path.display()
    );
    app_log!(info, "API URL: {}", config.client.api_url);
    app_log!(info, "Log file: {}", log_path.display());

    handle_command(cli, config).await
}
