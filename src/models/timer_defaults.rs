//! Duraciones por defecto de los temporizadores (en minutos)

use serde::{Deserialize, Serialize};

use crate::models::unit::UnitStatus;

pub const DEFAULT_AT_DESTINATION_MINUTES: u32 = 20;
pub const DEFAULT_LOGISTICS_MINUTES: u32 = 10;

/// Minutos asignados a cada estado temporizado.
///
/// Se aplican en el momento en que la unidad entra al estado, nunca de forma
/// retroactiva a unidades que ya están contando.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTimerDefaults")]
pub struct TimerDefaults {
    pub at_destination: u32,
    pub logistics: u32,
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            at_destination: DEFAULT_AT_DESTINATION_MINUTES,
            logistics: DEFAULT_LOGISTICS_MINUTES,
        }
    }
}

impl TimerDefaults {
    /// Duración para un estado, `None` si el estado no es temporizado
    pub fn minutes_for(&self, status: UnitStatus) -> Option<u32> {
        match status {
            UnitStatus::AtDestination => Some(self.at_destination),
            UnitStatus::Logistics => Some(self.logistics),
            _ => None,
        }
    }
}

/// Forma tolerante del objeto `timerDefaults`.
///
/// Las exportaciones antiguas guardaban la duración de destino bajo
/// `destination` o `enRouteToDestination`; las claves ausentes toman el valor
/// por defecto.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimerDefaults {
    at_destination: Option<u32>,
    logistics: Option<u32>,
    destination: Option<u32>,
    en_route_to_destination: Option<u32>,
}

impl From<RawTimerDefaults> for TimerDefaults {
    fn from(raw: RawTimerDefaults) -> Self {
        let at_destination = raw
            .at_destination
            .or(raw.destination)
            .or(raw.en_route_to_destination)
            .unwrap_or(DEFAULT_AT_DESTINATION_MINUTES);

        Self {
            at_destination,
            logistics: raw.logistics.unwrap_or(DEFAULT_LOGISTICS_MINUTES),
        }
    }
}
