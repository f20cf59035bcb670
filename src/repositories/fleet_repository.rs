//! Repositorio de la flota
//!
//! Un único documento JSON en disco es todo el almacenamiento. Cada escritura
//! reemplaza el archivo completo (archivo temporal + rename) y lo sella con un
//! `lastUpdated` estrictamente creciente.

use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{FleetDocument, TimerDefaults, Unit};
use crate::utils::errors::{internal_error, AppResult};

pub struct FleetRepository {
    path: PathBuf,
    // Serializa lecturas y escrituras; guarda el último sello emitido
    last_stamp: Mutex<Option<DateTime<Utc>>>,
}

impl FleetRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_stamp: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Leer el documento actual; si no existe se crea con la flota por defecto
    pub async fn load(&self) -> AppResult<FleetDocument> {
        let mut last_stamp = self.last_stamp.lock().await;

        match self.read_document().await? {
            Some(document) => {
                remember_stamp(&mut last_stamp, document.last_updated);
                Ok(document)
            }
            None => {
                tracing::info!("📄 {} no existe, creando flota por defecto", self.path.display());
                self.persist(&mut last_stamp, FleetDocument::default_fleet()).await
            }
        }
    }

    /// Reemplazar la flota completa y devolver el nuevo sello
    pub async fn save(&self, trucks: Vec<Unit>, timer_defaults: TimerDefaults) -> AppResult<DateTime<Utc>> {
        let mut last_stamp = self.last_stamp.lock().await;
        self.seed_stamp(&mut last_stamp).await;

        let document = self
            .persist(&mut last_stamp, FleetDocument::new(trucks, timer_defaults))
            .await?;
        Ok(document.last_updated)
    }

    async fn read_document(&self) -> AppResult<Option<FleetDocument>> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // Tras un reinicio el sello previo sólo vive en el archivo
    async fn seed_stamp(&self, last_stamp: &mut Option<DateTime<Utc>>) {
        if last_stamp.is_some() {
            return;
        }
        match self.read_document().await {
            Ok(Some(document)) => *last_stamp = Some(document.last_updated),
            Ok(None) => {}
            Err(e) => tracing::warn!("⚠️ No se pudo leer el sello previo: {}", e),
        }
    }

    async fn persist(
        &self,
        last_stamp: &mut Option<DateTime<Utc>>,
        mut document: FleetDocument,
    ) -> AppResult<FleetDocument> {
        document.last_updated = next_stamp(*last_stamp, Utc::now());

        let body = serde_json::to_string_pretty(&document)?;
        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| internal_error("DATA_FILE must name a file"))?;
        let temp_path = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        fs::write(&temp_path, body).await?;
        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        *last_stamp = Some(document.last_updated);
        tracing::debug!(
            "💾 {} unidades guardadas, sello {}",
            document.trucks.len(),
            document.last_updated
        );
        Ok(document)
    }
}

fn remember_stamp(last_stamp: &mut Option<DateTime<Utc>>, stamp: DateTime<Utc>) {
    if last_stamp.map_or(true, |last| stamp > last) {
        *last_stamp = Some(stamp);
    }
}

/// Sello con precisión de milisegundos, siempre posterior al anterior
fn next_stamp(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    let now = truncate_to_millis(now);
    match previous {
        Some(previous) if now <= previous => previous + Duration::milliseconds(1),
        _ => now,
    }
}

fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(value.timestamp_millis()).unwrap_or(value)
}
