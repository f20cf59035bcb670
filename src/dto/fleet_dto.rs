use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{stamp, TimerDefaults, Unit};

// Request de POST /api/trucks; clientTimestamp se acepta pero no se guarda
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFleetRequest {
    pub trucks: Vec<Unit>,
    pub timer_defaults: Option<TimerDefaults>,
    pub client_timestamp: Option<i64>,
}

// Response de POST /api/trucks
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFleetResponse {
    pub success: bool,
    pub message: String,
    #[serde(with = "stamp")]
    pub last_updated: DateTime<Utc>,
}

// Request de POST /api/restore: un documento completo exportado por /api/backup
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreRequest {
    pub trucks: Vec<Unit>,
    pub timer_defaults: Option<TimerDefaults>,
}

// Response genérica sin datos
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// Response de GET /api/status
#[derive(Debug, Serialize, Deserialize)]
pub struct ServerStatusResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: f64,
}
