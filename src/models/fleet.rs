//! Modelos de flota completa
//!
//! La unidad de transferencia y persistencia es siempre la flota entera,
//! nunca un delta:
//! - `FleetSnapshot`: lo que el cliente envía y guarda como respaldo local
//! - `FleetDocument`: el documento del servidor, con su sello `lastUpdated`
//! - `FleetState`: el contenedor en memoria que manipula el motor

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timer_defaults::TimerDefaults;
use crate::models::unit::{default_units, Unit, UnitStatus};

/// Serialización del sello en ISO-8601 con milisegundos (`2025-01-01T10:00:00.000Z`)
pub mod stamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_stamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

pub fn format_stamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Flota enviada por el cliente (POST /api/trucks) y guardada en el slot local
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshot {
    pub trucks: Vec<Unit>,
    #[serde(default)]
    pub timer_defaults: TimerDefaults,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<i64>,
}

/// Documento JSON único que guarda el servidor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetDocument {
    pub trucks: Vec<Unit>,
    #[serde(default)]
    pub timer_defaults: TimerDefaults,
    #[serde(with = "stamp", default)]
    pub last_updated: DateTime<Utc>,
}

impl FleetDocument {
    pub fn new(trucks: Vec<Unit>, timer_defaults: TimerDefaults) -> Self {
        Self {
            trucks,
            timer_defaults,
            last_updated: Utc::now(),
        }
    }

    /// Documento que se materializa en el primer acceso
    pub fn default_fleet() -> Self {
        Self::new(default_units(), TimerDefaults::default())
    }
}

/// Estado de la flota en memoria del cliente
#[derive(Debug, Clone, PartialEq)]
pub struct FleetState {
    pub units: Vec<Unit>,
    pub timer_defaults: TimerDefaults,
}

impl Default for FleetState {
    fn default() -> Self {
        Self {
            units: default_units(),
            timer_defaults: TimerDefaults::default(),
        }
    }
}

impl FleetState {
    pub fn new(units: Vec<Unit>, timer_defaults: TimerDefaults) -> Self {
        Self { units, timer_defaults }
    }

    pub fn find(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn available_count(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| unit.status == UnitStatus::Available)
            .count()
    }

    /// Reemplaza la flota completa (servidor, respaldo local o importación)
    pub fn replace(&mut self, units: Vec<Unit>, timer_defaults: TimerDefaults, now_ms: i64) {
        self.timer_defaults = timer_defaults;
        self.units = units;
        for unit in &mut self.units {
            unit.normalize_timer(&self.timer_defaults, now_ms);
        }
    }

    pub fn snapshot(&self, client_timestamp: i64) -> FleetSnapshot {
        FleetSnapshot {
            trucks: self.units.clone(),
            timer_defaults: self.timer_defaults,
            client_timestamp: Some(client_timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_stamp_round_trip_keeps_millis() {
        let stamp = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let document = FleetDocument {
            trucks: vec![],
            timer_defaults: TimerDefaults::default(),
            last_updated: stamp,
        };
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["lastUpdated"], "2023-11-14T22:13:20.123Z");

        let back: FleetDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back.last_updated, stamp);
    }

    #[test]
    fn test_snapshot_wire_shape() {
        let state = FleetState::new(
            vec![Unit::new("A", "Alpha", "Iva", UnitStatus::Available)],
            TimerDefaults::default(),
        );
        let value = serde_json::to_value(state.snapshot(42)).unwrap();
        assert_eq!(
            value,
            json!({
                "trucks": [{ "id": "A", "name": "Alpha", "location": "Iva", "status": "available", "timerEndTime": null }],
                "timerDefaults": { "atDestination": 20, "logistics": 10 },
                "clientTimestamp": 42
            })
        );
    }

    #[test]
    fn test_replace_normalizes_timers() {
        let mut state = FleetState::default();
        let mut stale = Unit::new("B", "Bravo", "Wren", UnitStatus::OnScene);
        stale.timer_end_time = Some(10);
        let timed = Unit::new("C", "Charlie", "Wren", UnitStatus::AtDestination);

        state.replace(vec![stale, timed], TimerDefaults { at_destination: 1, logistics: 2 }, 500);

        assert_eq!(state.units[0].timer_end_time, None);
        assert_eq!(state.units[1].timer_end_time, Some(500 + 60_000));
        assert_eq!(state.timer_defaults.at_destination, 1);
    }
}
