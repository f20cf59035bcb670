//! Tablero: une el motor de flota con el controlador de sincronización
//!
//! Cada interacción del usuario corre hasta el final (mutación + push) antes
//! de atender el siguiente evento. Las acciones destructivas quedan
//! pendientes de una confirmación que se resuelve con un booleano.

use std::path::Path;
use std::sync::Arc;

use crate::services::data_transfer::{export_fleet, parse_import, ImportedFleet};
use crate::services::display::BoardView;
use crate::services::fleet_engine::{FleetEngine, UnitForm};
use crate::services::notifier::Notifier;
use crate::services::sync_controller::{DataSource, PollOutcome, PushOutcome, SyncController};
use crate::utils::errors::{EngineError, ExportError, ImportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Sync,
    Remove(String),
    Import(ImportedFleet),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub message: String,
    pub action: PendingAction,
}

pub struct Board {
    engine: FleetEngine,
    sync: SyncController,
    notifier: Arc<dyn Notifier>,
    pending: Option<Confirmation>,
}

impl Board {
    pub fn new(engine: FleetEngine, sync: SyncController, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            engine,
            sync,
            notifier,
            pending: None,
        }
    }

    pub fn engine(&self) -> &FleetEngine {
        &self.engine
    }

    pub fn sync(&self) -> &SyncController {
        &self.sync
    }

    pub fn view(&self) -> BoardView {
        self.engine.view()
    }

    pub fn pending_confirmation(&self) -> Option<&Confirmation> {
        self.pending.as_ref()
    }

    /// Carga inicial
    pub async fn start(&mut self) -> DataSource {
        self.sync.load(&mut self.engine).await
    }

    /// Click izquierdo sobre una tarjeta
    pub async fn click(&mut self, unit_id: &str) -> bool {
        let changed = self.engine.cycle_status(unit_id);
        if changed {
            self.sync.push(&self.engine).await;
        }
        changed
    }

    /// Selección explícita desde el menú contextual
    pub async fn select_status(&mut self, unit_id: &str, status: &str) -> Result<bool, EngineError> {
        let result = self.engine.apply_status_name(unit_id, status);
        let changed = self.report(result)?;
        if changed {
            self.sync.push(&self.engine).await;
        }
        Ok(changed)
    }

    pub fn begin_edit(&mut self, unit_id: &str) -> Option<UnitForm> {
        self.engine.begin_edit(unit_id)
    }

    pub fn cancel_edit(&mut self) {
        self.engine.cancel_edit();
    }

    /// Botón "Add Truck" / "Update Truck"
    pub async fn submit_form(&mut self, form: &UnitForm) -> Result<(), EngineError> {
        let result = self.engine.submit_form(form);
        self.report(result)?;
        self.sync.push(&self.engine).await;
        Ok(())
    }

    pub async fn save_timer_defaults(&mut self, at_destination: &str, logistics: &str) -> Result<(), EngineError> {
        let result = self.engine.set_timer_defaults(at_destination, logistics);
        self.report(result)?;
        self.sync.push(&self.engine).await;
        self.notifier.notice("Timer defaults saved!");
        Ok(())
    }

    /// "Take Down": pide confirmación antes de retirar la unidad
    pub fn request_remove(&mut self, unit_id: &str) -> bool {
        if !self.engine.state().contains(unit_id) {
            return false;
        }
        self.pending = Some(Confirmation {
            message: format!(
                "Are you sure you want to take down {}? This cannot be undone.",
                unit_id
            ),
            action: PendingAction::Remove(unit_id.to_string()),
        });
        true
    }

    /// Sincronización manual: descarta el estado local no confirmado
    pub fn request_sync(&mut self) {
        self.pending = Some(Confirmation {
            message: "Sync with server? This will reload data from the server.".to_string(),
            action: PendingAction::Sync,
        });
    }

    /// Valida el archivo y deja la importación pendiente de confirmación
    pub fn request_import(&mut self, raw: &str) -> Result<(), ImportError> {
        match parse_import(raw) {
            Ok(imported) => {
                self.pending = Some(Confirmation {
                    message: "Importing new data will overwrite current truck data. Continue?"
                        .to_string(),
                    action: PendingAction::Import(imported),
                });
                Ok(())
            }
            Err(e) => {
                self.notifier.alert(&e.to_string());
                Err(e)
            }
        }
    }

    /// Lee un archivo exportado y deja la importación pendiente
    pub async fn request_import_file(&mut self, path: &Path) -> Result<(), ImportError> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => self.request_import(&raw),
            Err(e) => {
                log::error!("❌ No se pudo leer {}: {}", path.display(), e);
                let e = ImportError::from(e);
                self.notifier.alert(&e.to_string());
                Err(e)
            }
        }
    }

    pub fn export(&self) -> Result<String, serde_json::Error> {
        export_fleet(self.engine.state())
    }

    /// Escribe la flota en un archivo. Un fallo se avisa y no corta el tablero.
    pub async fn export_to_file(&self, path: &Path) -> Result<(), ExportError> {
        let result = match self.export() {
            Ok(contents) => tokio::fs::write(path, contents).await.map_err(ExportError::from),
            Err(e) => Err(e.into()),
        };

        match &result {
            Ok(()) => self.notifier.notice("Truck data exported successfully!"),
            Err(e) => {
                log::error!("❌ No se pudo exportar a {}: {}", path.display(), e);
                self.notifier.alert(&e.to_string());
            }
        }
        result
    }

    /// Resuelve la confirmación pendiente. Devuelve `true` si se ejecutó una acción.
    pub async fn resolve_confirmation(&mut self, confirmed: bool) -> bool {
        let Some(confirmation) = self.pending.take() else {
            return false;
        };
        if !confirmed {
            log::debug!("🚫 Acción cancelada: {:?}", confirmation.action);
            return false;
        }

        match confirmation.action {
            PendingAction::Sync => {
                self.sync.load(&mut self.engine).await;
            }
            PendingAction::Remove(unit_id) => {
                if self.engine.remove_unit(&unit_id) {
                    self.sync.push(&self.engine).await;
                }
            }
            PendingAction::Import(imported) => {
                self.engine
                    .replace_fleet(imported.trucks, imported.timer_defaults);
                self.notifier.notice("Truck data imported successfully!");
                self.sync.push(&self.engine).await;
            }
        }
        true
    }

    /// Un intervalo de sondeo de fondo
    pub async fn poll(&mut self) -> PollOutcome {
        self.sync.poll(&mut self.engine).await
    }

    /// Reintento manual del push (p. ej. tras "Polling paused")
    pub async fn save_now(&mut self) -> PushOutcome {
        self.sync.push(&self.engine).await
    }

    fn report<T>(&self, result: Result<T, EngineError>) -> Result<T, EngineError> {
        if let Err(e) = &result {
            self.notifier.alert(&e.to_string());
        }
        result
    }
}
