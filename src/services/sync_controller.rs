//! Controlador de sincronización
//!
//! Mantiene la flota local alineada con el servidor:
//!
//! ```text
//! Initializing ──load ok──▶ Synced ◀──push ok / poll adopt / sync ok──┐
//!      │                      │                                        │
//!      └──load falla──▶ Diverged (respaldo local) ──────────────────────┘
//! ```
//!
//! No hay fusión ni detección de conflictos: sólo se compara el sello
//! `lastUpdated` y gana la última lectura o escritura observada.

use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::sync::Arc;

use crate::client::FleetBackend;
use crate::services::fleet_engine::FleetEngine;
use crate::services::local_backup::BackupStore;
use crate::services::notifier::{LoadingGuard, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Initializing,
    Synced,
    /// Trabajando con datos locales que el servidor no tiene confirmados
    Diverged,
}

/// De dónde salió la flota tras una carga
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Server,
    LocalBackup,
    Defaults,
}

/// Insignia de "última sincronización"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncIndicator {
    Pending,
    LastSync(DateTime<Utc>),
    JustNow,
    LocalBackup,
    UsingDefaults,
    PollingPaused,
}

impl fmt::Display for SyncIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncIndicator::Pending => write!(f, "Last sync: pending"),
            SyncIndicator::LastSync(stamp) => write!(
                f,
                "Last sync: {}",
                stamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
            ),
            SyncIndicator::JustNow => write!(f, "Last sync: Just now"),
            SyncIndicator::LocalBackup => write!(f, "Last sync: Local backup"),
            SyncIndicator::UsingDefaults => write!(f, "Last sync: Using defaults"),
            SyncIndicator::PollingPaused => write!(f, "Polling paused"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Saved,
    SavedLocally,
    /// Ni servidor ni respaldo local: la flota sólo vive en memoria
    Unsaved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Unchanged,
    Adopted,
    Failed,
}

pub struct SyncController {
    backend: Arc<dyn FleetBackend>,
    backup: Arc<dyn BackupStore>,
    notifier: Arc<dyn Notifier>,
    state: SyncState,
    last_stamp: Option<DateTime<Utc>>,
    indicator: SyncIndicator,
}

impl SyncController {
    pub fn new(
        backend: Arc<dyn FleetBackend>,
        backup: Arc<dyn BackupStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            backup,
            notifier,
            state: SyncState::Initializing,
            last_stamp: None,
            indicator: SyncIndicator::Pending,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn last_stamp(&self) -> Option<DateTime<Utc>> {
        self.last_stamp
    }

    pub fn indicator(&self) -> &SyncIndicator {
        &self.indicator
    }

    pub fn polling_paused(&self) -> bool {
        self.indicator == SyncIndicator::PollingPaused
    }

    /// Carga inicial y sincronización manual: trae la flota del servidor y,
    /// si falla, la del respaldo local o la de fábrica.
    pub async fn load(&mut self, engine: &mut FleetEngine) -> DataSource {
        let _loading = LoadingGuard::show(self.notifier.clone(), "Loading data...");

        match self.backend.fetch_fleet().await {
            Ok(document) => {
                log::info!(
                    "✅ Flota cargada del servidor: {} unidades, sello {}",
                    document.trucks.len(),
                    document.last_updated
                );
                engine.replace_fleet(document.trucks, document.timer_defaults);
                self.mark_synced(document.last_updated);
                self.indicator = SyncIndicator::LastSync(document.last_updated);
                DataSource::Server
            }
            Err(e) => {
                log::error!("❌ Error cargando la flota del servidor: {}", e);
                self.state = SyncState::Diverged;
                self.load_fallback(engine).await
            }
        }
    }

    async fn load_fallback(&mut self, engine: &mut FleetEngine) -> DataSource {
        match self.backup.load().await {
            Ok(Some(snapshot)) => {
                log::warn!("💾 Usando respaldo local con {} unidades", snapshot.trucks.len());
                engine.replace_fleet(snapshot.trucks, snapshot.timer_defaults);
                self.indicator = SyncIndicator::LocalBackup;
                self.notifier
                    .notice("Server unavailable. Loaded backup data from this device.");
                DataSource::LocalBackup
            }
            Ok(None) => {
                self.indicator = SyncIndicator::UsingDefaults;
                self.notifier
                    .notice("Could not load data from server. Using defaults.");
                DataSource::Defaults
            }
            Err(e) => {
                log::error!("❌ No se pudo leer el respaldo local: {}", e);
                self.indicator = SyncIndicator::UsingDefaults;
                self.notifier.notice("Could not load data. Using default values.");
                DataSource::Defaults
            }
        }
    }

    /// Empuja la flota completa tras cada mutación. El respaldo local se
    /// escribe siempre, haya respondido el servidor o no.
    pub async fn push(&mut self, engine: &FleetEngine) -> PushOutcome {
        let snapshot = engine.snapshot();
        let _saving = LoadingGuard::show(self.notifier.clone(), "Saving data...");

        match self.backend.save_fleet(&snapshot).await {
            Ok(response) => {
                log::info!("✅ Flota guardada, sello {}", response.last_updated);
                self.mark_synced(response.last_updated);
                self.indicator = SyncIndicator::JustNow;
                if let Err(e) = self.backup.save(&snapshot).await {
                    log::warn!("⚠️ No se pudo guardar el respaldo local: {}", e);
                }
                PushOutcome::Saved
            }
            Err(e) => {
                log::error!("❌ Error guardando la flota en el servidor: {}", e);
                self.state = SyncState::Diverged;
                match self.backup.save(&snapshot).await {
                    Ok(()) => {
                        self.indicator = SyncIndicator::LocalBackup;
                        self.notifier
                            .notice("Server unavailable. Data saved locally as backup.");
                        PushOutcome::SavedLocally
                    }
                    Err(backup_error) => {
                        log::error!("❌ Tampoco se pudo guardar localmente: {}", backup_error);
                        self.notifier
                            .alert("Failed to save data to server and locally. Please try again.");
                        PushOutcome::Unsaved
                    }
                }
            }
        }
    }

    /// Sondeo de fondo: adopta la flota remota si su sello cambió.
    /// Un fallo sólo pausa el indicador; el siguiente intervalo vuelve a probar.
    pub async fn poll(&mut self, engine: &mut FleetEngine) -> PollOutcome {
        match self.backend.fetch_fleet().await {
            Ok(document) => {
                if self.polling_paused() {
                    self.indicator = match self.last_stamp {
                        Some(stamp) => SyncIndicator::LastSync(stamp),
                        None => SyncIndicator::Pending,
                    };
                }
                if self.last_stamp == Some(document.last_updated) {
                    return PollOutcome::Unchanged;
                }

                log::info!("🔄 Cambios remotos detectados (sello {})", document.last_updated);
                engine.replace_fleet(document.trucks, document.timer_defaults);
                self.mark_synced(document.last_updated);
                self.indicator = SyncIndicator::LastSync(document.last_updated);
                PollOutcome::Adopted
            }
            Err(e) => {
                log::warn!("⏸️ Sondeo fallido: {}", e);
                self.indicator = SyncIndicator::PollingPaused;
                PollOutcome::Failed
            }
        }
    }

    fn mark_synced(&mut self, stamp: DateTime<Utc>) {
        self.last_stamp = Some(stamp);
        self.state = SyncState::Synced;
    }
}
