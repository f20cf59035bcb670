use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::dto::fleet_dto::{MessageResponse, RestoreRequest, SaveFleetRequest, SaveFleetResponse};
use crate::models::{FleetDocument, TimerDefaults};
use crate::repositories::fleet_repository::FleetRepository;
use crate::utils::errors::{bad_request_error, AppError, AppResult};

pub struct FleetController {
    repository: Arc<FleetRepository>,
}

impl FleetController {
    pub fn new(repository: Arc<FleetRepository>) -> Self {
        Self { repository }
    }

    pub async fn load(&self) -> AppResult<FleetDocument> {
        self.repository.load().await
    }

    pub async fn save(&self, body: Value) -> AppResult<SaveFleetResponse> {
        let request: SaveFleetRequest = parse_fleet_body(body, "Invalid truck data")?;
        tracing::debug!(
            "📥 Guardando {} unidades (clientTimestamp {:?})",
            request.trucks.len(),
            request.client_timestamp
        );

        let last_updated = self
            .repository
            .save(request.trucks, request.timer_defaults.unwrap_or_default())
            .await?;

        Ok(SaveFleetResponse {
            success: true,
            message: "Truck data saved successfully".to_string(),
            last_updated,
        })
    }

    pub async fn restore(&self, body: Value) -> AppResult<MessageResponse> {
        let request: RestoreRequest = parse_fleet_body(body, "Invalid backup data")?;
        tracing::info!("♻️ Restaurando respaldo con {} unidades", request.trucks.len());

        self.repository
            .save(
                request.trucks,
                request.timer_defaults.unwrap_or_else(TimerDefaults::default),
            )
            .await?;

        Ok(MessageResponse {
            success: true,
            message: "Data restored from backup successfully".to_string(),
        })
    }
}

/// Rechaza el cuerpo antes de cualquier escritura si `trucks` falta, no es un
/// array o contiene unidades mal formadas.
fn parse_fleet_body<T: DeserializeOwned>(body: Value, message: &str) -> AppResult<T> {
    if !body.get("trucks").map_or(false, Value::is_array) {
        return Err(bad_request_error(message));
    }
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("{}: {}", message, e)))
}
