//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;
use std::time::Instant;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::fleet_repository::FleetRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub repository: Arc<FleetRepository>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: EnvironmentConfig) -> Self {
        let repository = Arc::new(FleetRepository::new(config.data_file.clone()));
        Self {
            config,
            repository,
            started_at: Instant::now(),
        }
    }

    /// Segundos desde que arrancó el proceso
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
