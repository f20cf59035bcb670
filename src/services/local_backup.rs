//! Respaldo local
//!
//! Un único slot con nombre que guarda la última flota conocida (flota +
//! duraciones + sello del cliente). Se lee cuando falla la carga y se escribe
//! en cada intento de guardado, tenga éxito o no.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;

use crate::models::FleetSnapshot;
use crate::utils::errors::BackupError;

/// Nombre del slot
pub const BACKUP_SLOT: &str = "truckDispatchBackup";

#[async_trait]
pub trait BackupStore: Send + Sync {
    async fn load(&self) -> Result<Option<FleetSnapshot>, BackupError>;
    async fn save(&self, snapshot: &FleetSnapshot) -> Result<(), BackupError>;
}

/// Slot guardado como `<dir>/truckDispatchBackup.json`
pub struct FileBackupStore {
    path: PathBuf,
}

impl FileBackupStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", BACKUP_SLOT)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BackupStore for FileBackupStore {
    async fn load(&self) -> Result<Option<FleetSnapshot>, BackupError> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, snapshot: &FleetSnapshot) -> Result<(), BackupError> {
        let body = serde_json::to_string(snapshot)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, body).await?;
        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

/// Slot en memoria; `failing` simula un almacenamiento lleno
#[derive(Debug, Default)]
pub struct MemoryBackupStore {
    slot: Mutex<Option<FleetSnapshot>>,
    failing: bool,
}

impl MemoryBackupStore {
    pub fn with_snapshot(snapshot: FleetSnapshot) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot)),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            slot: Mutex::new(None),
            failing: true,
        }
    }

    pub fn stored(&self) -> Option<FleetSnapshot> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn unavailable() -> BackupError {
        BackupError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "backup storage unavailable",
        ))
    }
}

#[async_trait]
impl BackupStore for MemoryBackupStore {
    async fn load(&self) -> Result<Option<FleetSnapshot>, BackupError> {
        if self.failing {
            return Err(Self::unavailable());
        }
        Ok(self.stored())
    }

    async fn save(&self, snapshot: &FleetSnapshot) -> Result<(), BackupError> {
        if self.failing {
            return Err(Self::unavailable());
        }
        let mut slot = self.slot.lock().map_err(|_| Self::unavailable())?;
        *slot = Some(snapshot.clone());
        Ok(())
    }
}
