//! Log setup
//!
//! The dashboard owns the terminal, so logs go to ~/.roster/logs/roster.log.
//! `ROSTER_LOG` overrides the configured level with any `EnvFilter` directive.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, RosterPaths};

pub const LOG_ENV: &str = "ROSTER_LOG";

pub fn init(paths: &RosterPaths, config: &Config) -> Result<()> {
    fs::create_dir_all(&paths.logs).context("Failed to create logs directory")?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.log_file)
        .context("Failed to open roster.log")?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))
}
