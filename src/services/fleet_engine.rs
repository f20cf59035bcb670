//! Motor de estado de la flota
//!
//! Dueño único de `FleetState`: toda mutación pasa por aquí. Las operaciones
//! devuelven si hubo cambio para que el llamador decida cuándo empujar la
//! flota al servidor.

use std::sync::Arc;
use validator::Validate;

use crate::models::{FleetSnapshot, FleetState, TimerDefaults, Unit, UnitStatus};
use crate::services::clock::Clock;
use crate::services::display::{derive_board, BoardView};
use crate::utils::errors::EngineError;
use crate::utils::validation::validate_positive_minutes;

/// Formulario de alta/edición de unidad
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct UnitForm {
    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub id: String,
    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub name: String,
    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub location: String,
    pub status: UnitStatus,
}

impl Default for UnitForm {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            location: String::new(),
            status: UnitStatus::Available,
        }
    }
}

impl UnitForm {
    pub fn new(id: &str, name: &str, location: &str, status: UnitStatus) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            location: location.to_string(),
            status,
        }
    }

    fn trimmed(&self) -> Self {
        Self {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            location: self.location.trim().to_string(),
            status: self.status,
        }
    }

    fn checked(&self) -> Result<Self, EngineError> {
        let form = self.trimmed();
        form.validate().map_err(|_| EngineError::MissingFields)?;
        Ok(form)
    }
}

impl From<&Unit> for UnitForm {
    fn from(unit: &Unit) -> Self {
        Self::new(&unit.id, &unit.name, &unit.location, unit.status)
    }
}

pub struct FleetEngine {
    state: FleetState,
    clock: Arc<dyn Clock>,
    // Unidad abierta en el formulario de edición
    editing: Option<String>,
}

impl FleetEngine {
    pub fn new(state: FleetState, clock: Arc<dyn Clock>) -> Self {
        Self {
            state,
            clock,
            editing: None,
        }
    }

    pub fn state(&self) -> &FleetState {
        &self.state
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Cambia el estado de una unidad y arma/desarma su temporizador.
    /// Devuelve `false` (sin efectos) si la unidad no existe.
    pub fn apply_status_transition(&mut self, unit_id: &str, status: UnitStatus) -> bool {
        let now = self.clock.now_ms();
        let defaults = self.state.timer_defaults;
        match self.state.find_mut(unit_id) {
            Some(unit) => {
                unit.set_status(status, &defaults, now);
                log::debug!("🔁 {} → {}", unit_id, status);
                true
            }
            None => false,
        }
    }

    /// Variante para estados que llegan como texto (menú contextual, comandos)
    pub fn apply_status_name(&mut self, unit_id: &str, status: &str) -> Result<bool, EngineError> {
        let status: UnitStatus = status
            .parse()
            .map_err(|_| EngineError::UnknownStatus(status.to_string()))?;
        Ok(self.apply_status_transition(unit_id, status))
    }

    /// Click izquierdo: avanza por el ciclo primario; `logistics` no se mueve
    pub fn cycle_status(&mut self, unit_id: &str) -> bool {
        let next = self
            .state
            .find(unit_id)
            .and_then(|unit| unit.status.next_in_cycle());

        match next {
            Some(status) => self.apply_status_transition(unit_id, status),
            None => false,
        }
    }

    pub fn add_unit(&mut self, form: &UnitForm) -> Result<(), EngineError> {
        let form = form.checked()?;
        if self.state.contains(&form.id) {
            return Err(EngineError::DuplicateId(form.id));
        }

        self.state
            .units
            .push(Unit::new(&form.id, &form.name, &form.location, form.status));
        if form.status.is_timed() {
            self.apply_status_transition(&form.id, form.status);
        }
        log::info!("➕ Unidad {} añadida", form.id);
        Ok(())
    }

    /// Edita nombre, base e id en sitio. Un cambio de estado pasa por
    /// `apply_status_transition` para que se apliquen los temporizadores.
    /// El nuevo id no puede chocar con otra unidad.
    pub fn edit_unit(&mut self, unit_id: &str, form: &UnitForm) -> Result<(), EngineError> {
        let form = form.checked()?;
        if form.id != unit_id && self.state.contains(&form.id) {
            return Err(EngineError::DuplicateId(form.id));
        }

        let unit = self
            .state
            .find_mut(unit_id)
            .ok_or_else(|| EngineError::UnitNotFound(unit_id.to_string()))?;
        unit.id = form.id.clone();
        unit.name = form.name;
        unit.location = form.location;
        let status_changed = unit.status != form.status;

        if status_changed {
            self.apply_status_transition(&form.id, form.status);
        }
        if self.editing.as_deref() == Some(unit_id) {
            self.editing = None;
        }
        log::info!("✏️ Unidad {} actualizada", form.id);
        Ok(())
    }

    pub fn remove_unit(&mut self, unit_id: &str) -> bool {
        let before = self.state.units.len();
        self.state.units.retain(|unit| unit.id != unit_id);
        if self.editing.as_deref() == Some(unit_id) {
            self.cancel_edit();
        }
        let removed = self.state.units.len() != before;
        if removed {
            log::info!("🗑️ Unidad {} retirada", unit_id);
        }
        removed
    }

    /// Abre el formulario en modo edición con los datos de la unidad
    pub fn begin_edit(&mut self, unit_id: &str) -> Option<UnitForm> {
        let form = self.state.find(unit_id).map(UnitForm::from)?;
        self.editing = Some(unit_id.to_string());
        Some(form)
    }

    /// Vuelve al formulario vacío en modo alta
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Enviar el formulario: alta o edición según el modo actual
    pub fn submit_form(&mut self, form: &UnitForm) -> Result<(), EngineError> {
        match self.editing.clone() {
            Some(unit_id) => {
                let result = self.edit_unit(&unit_id, form);
                if matches!(result, Err(EngineError::UnitNotFound(_))) {
                    self.cancel_edit();
                }
                result
            }
            None => self.add_unit(form),
        }
    }

    /// Acción de administración; no afecta a temporizadores ya en marcha
    pub fn set_timer_defaults(&mut self, at_destination: &str, logistics: &str) -> Result<(), EngineError> {
        let at_destination =
            validate_positive_minutes(at_destination).map_err(|_| EngineError::InvalidTimerDefaults)?;
        let logistics = validate_positive_minutes(logistics).map_err(|_| EngineError::InvalidTimerDefaults)?;

        self.state.timer_defaults = TimerDefaults {
            at_destination,
            logistics,
        };
        Ok(())
    }

    /// Reemplaza la flota entera (carga, sondeo, respaldo, importación)
    pub fn replace_fleet(&mut self, units: Vec<Unit>, timer_defaults: TimerDefaults) {
        let now = self.clock.now_ms();
        self.state.replace(units, timer_defaults, now);
        if let Some(editing) = self.editing.clone() {
            if !self.state.contains(&editing) {
                self.cancel_edit();
            }
        }
    }

    pub fn snapshot(&self) -> FleetSnapshot {
        self.state.snapshot(self.clock.now_ms())
    }

    pub fn view(&self) -> BoardView {
        derive_board(&self.state, self.clock.now_ms())
    }
}
