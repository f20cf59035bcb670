//! Configuración del tablero en terminal

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuración del cliente de tablero
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub server_url: String,
    pub backup_dir: PathBuf,
    pub poll_interval: Duration,
    pub refresh_interval: Duration,
    pub http_timeout: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000/".to_string(),
            backup_dir: PathBuf::from("."),
            poll_interval: Duration::from_secs(10),
            refresh_interval: Duration::from_millis(1000),
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl BoardConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            server_url: env::var("BOARD_SERVER_URL").unwrap_or(defaults.server_url),
            backup_dir: env::var("BOARD_BACKUP_DIR").map(PathBuf::from).unwrap_or(defaults.backup_dir),
            poll_interval: read_duration("BOARD_POLL_SECS", Duration::from_secs)?
                .unwrap_or(defaults.poll_interval),
            refresh_interval: read_duration("BOARD_REFRESH_MS", Duration::from_millis)?
                .unwrap_or(defaults.refresh_interval),
            http_timeout: read_duration("BOARD_HTTP_TIMEOUT_SECS", Duration::from_secs)?
                .unwrap_or(defaults.http_timeout),
        })
    }
}

fn read_duration(key: &str, unit: fn(u64) -> Duration) -> Result<Option<Duration>> {
    match env::var(key) {
        Ok(raw) => {
            let value: u64 = raw
                .parse()
                .with_context(|| format!("{} must be a positive number, got '{}'", key, raw))?;
            if value == 0 {
                anyhow::bail!("{} must be greater than zero", key);
            }
            Ok(Some(unit(value)))
        }
        Err(_) => Ok(None),
    }
}
