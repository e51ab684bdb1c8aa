mod app;
mod client;
mod config;
mod error;
mod mint;
mod session;
mod ui;

use std::{fs, path::Path, sync::Arc};

use crate::{config::AppConfig, error::Result};

const LOG_PATH: &str = "config/minter_tui.log";

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}

/// Logs go to a file: the terminal belongs to the UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    if let Some(parent) = Path::new(LOG_PATH).parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_PATH)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("minter_tui={}", config.log_level))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
