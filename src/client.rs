//! Cliente HTTP del servicio de persistencia
//!
//! Este módulo contiene el cliente que usa el tablero para leer y guardar la
//! flota completa en `/api/trucks`.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::dto::fleet_dto::{SaveFleetResponse, ServerStatusResponse};
use crate::models::{FleetDocument, FleetSnapshot};
use crate::utils::errors::SyncError;

/// Backend de la flota visto desde el controlador de sincronización
#[async_trait]
pub trait FleetBackend: Send + Sync {
    /// Leer el documento completo con su sello
    async fn fetch_fleet(&self) -> Result<FleetDocument, SyncError>;

    /// Enviar la flota completa; devuelve el nuevo sello
    async fn save_fleet(&self, snapshot: &FleetSnapshot) -> Result<SaveFleetResponse, SyncError>;
}

/// Cliente HTTP para la API de flota
pub struct HttpFleetBackend {
    client: Client,
    base_url: String,
}

impl HttpFleetBackend {
    /// Crear nuevo cliente; `base_url` es el origen del servidor (`http://host:3000/`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Estado del servidor (`GET /api/status`)
    pub async fn server_status(&self) -> Result<ServerStatusResponse, SyncError> {
        let response = self.client.get(self.endpoint("api/status")).send().await?;
        parse_response(response).await
    }
}

#[async_trait]
impl FleetBackend for HttpFleetBackend {
    async fn fetch_fleet(&self) -> Result<FleetDocument, SyncError> {
        let response = self
            .client
            .get(self.endpoint("api/trucks"))
            .header("Accept", "application/json")
            .send()
            .await?;
        parse_response(response).await
    }

    async fn save_fleet(&self, snapshot: &FleetSnapshot) -> Result<SaveFleetResponse, SyncError> {
        let response = self
            .client
            .post(self.endpoint("api/trucks"))
            .json(snapshot)
            .send()
            .await?;
        parse_response(response).await
    }
}

/// Respuestas no-2xx o con forma inesperada se tratan como fallo de red
async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, SyncError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SyncError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| SyncError::Malformed(e.to_string()))
}
