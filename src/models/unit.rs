//! Modelo de Unit
//!
//! Una unidad de la flota (ambulancia, camión) tal como viaja por el cable
//! y como se guarda en el documento JSON: `{ id, name, location, status, timerEndTime }`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::timer_defaults::TimerDefaults;

/// Milisegundos por minuto
pub const MS_PER_MINUTE: i64 = 60_000;

/// Estado operativo de una unidad - orden fijo, igual que el menú contextual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitStatus {
    Available,
    Dispatched,
    OnScene,
    EnRouteToDestination,
    AtDestination,
    Logistics,
    Unavailable,
}

impl UnitStatus {
    /// Todos los estados, en el orden del menú contextual
    pub const ALL: [UnitStatus; 7] = [
        UnitStatus::Available,
        UnitStatus::Dispatched,
        UnitStatus::OnScene,
        UnitStatus::EnRouteToDestination,
        UnitStatus::AtDestination,
        UnitStatus::Logistics,
        UnitStatus::Unavailable,
    ];

    /// Ciclo primario del click izquierdo
    pub const CYCLE: [UnitStatus; 5] = [
        UnitStatus::Available,
        UnitStatus::Dispatched,
        UnitStatus::OnScene,
        UnitStatus::EnRouteToDestination,
        UnitStatus::AtDestination,
    ];

    /// Nombre en el cable (camelCase)
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::Available => "available",
            UnitStatus::Dispatched => "dispatched",
            UnitStatus::OnScene => "onScene",
            UnitStatus::EnRouteToDestination => "enRouteToDestination",
            UnitStatus::AtDestination => "atDestination",
            UnitStatus::Logistics => "logistics",
            UnitStatus::Unavailable => "unavailable",
        }
    }

    /// Etiqueta visible en el tablero
    pub fn label(&self) -> &'static str {
        match self {
            UnitStatus::Available => "Available",
            UnitStatus::Dispatched => "En Route",
            UnitStatus::OnScene => "On Scene",
            UnitStatus::EnRouteToDestination => "En Route to Destination",
            UnitStatus::AtDestination => "At Destination",
            UnitStatus::Logistics => "Logistics",
            UnitStatus::Unavailable => "Unavailable",
        }
    }

    /// Los estados con temporizador automático
    pub fn is_timed(&self) -> bool {
        matches!(self, UnitStatus::AtDestination | UnitStatus::Logistics)
    }

    /// Siguiente estado para el click izquierdo.
    ///
    /// Dentro del ciclo primario avanza circularmente, `unavailable` vuelve a
    /// `available` y cualquier otro estado (logistics) no se mueve: devuelve `None`.
    pub fn next_in_cycle(&self) -> Option<UnitStatus> {
        if let Some(index) = Self::CYCLE.iter().position(|s| s == self) {
            return Some(Self::CYCLE[(index + 1) % Self::CYCLE.len()]);
        }
        match self {
            UnitStatus::Unavailable => Some(UnitStatus::Available),
            _ => None,
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown status '{}'", s))
    }
}

/// Unidad de la flota
///
/// El handle de temporizador del navegador no existe aquí: el tiempo restante
/// se recalcula en cada lectura a partir de `timer_end_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub location: String,
    pub status: UnitStatus,
    #[serde(default)]
    pub timer_end_time: Option<i64>,
}

impl Unit {
    pub fn new(id: &str, name: &str, location: &str, status: UnitStatus) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            location: location.to_string(),
            status,
            timer_end_time: None,
        }
    }

    /// Cambia el estado y arma o desarma el temporizador
    pub fn set_status(&mut self, status: UnitStatus, defaults: &TimerDefaults, now_ms: i64) {
        self.status = status;
        self.timer_end_time = defaults
            .minutes_for(status)
            .map(|minutes| now_ms + i64::from(minutes) * MS_PER_MINUTE);
    }

    /// Restablece el invariante `timerEndTime` ⇔ estado temporizado.
    ///
    /// Un temporizador ya armado se conserva tal cual.
    pub fn normalize_timer(&mut self, defaults: &TimerDefaults, now_ms: i64) {
        if !self.status.is_timed() {
            self.timer_end_time = None;
        } else if self.timer_end_time.is_none() {
            self.set_status(self.status, defaults, now_ms);
        }
    }
}

/// Flota por defecto cuando no hay datos en el servidor ni en el respaldo local
pub fn default_units() -> Vec<Unit> {
    [
        ("Med-0", "City // HQ"),
        ("Med-1", "City // HQ"),
        ("Med-2", "Rock Springs"),
        ("Med-3", "Homeland Park"),
        ("Med-4", "Williamston"),
        ("Med-5", "Rock Springs"),
        ("Med-6", "Iva"),
        ("Med-7", "Pendleton"),
        ("Med-8", "Townville"),
        ("Med-9", "Centerville"),
        ("Med-11", "City // HQ"),
        ("Med-13", "Honea Path"),
        ("Med-14", "Piedmont"),
        ("Med-15", "Wren"),
        ("Med-16", "Williamston"),
        ("Med-17", "City // HQ"),
        ("Med-18", "City // HQ"),
    ]
    .iter()
    .map(|(id, location)| Unit::new(id, id, location, UnitStatus::Available))
    .collect()
}
