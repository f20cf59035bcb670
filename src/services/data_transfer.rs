//! Exportación e importación de la flota a un archivo JSON legible

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::models::{FleetState, TimerDefaults, Unit};
use crate::utils::errors::ImportError;
use crate::utils::validation::{validate_not_empty, validate_positive_duration};

/// Nombre sugerido para el archivo exportado
pub const EXPORT_FILE_NAME: &str = "truck_dispatch_data.json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportFile<'a> {
    trucks: &'a [Unit],
    timer_defaults: TimerDefaults,
}

/// Flota leída de un archivo exportado, pendiente de confirmación
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedFleet {
    pub trucks: Vec<Unit>,
    pub timer_defaults: TimerDefaults,
}

pub fn export_fleet(state: &FleetState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ExportFile {
        trucks: &state.units,
        timer_defaults: state.timer_defaults,
    })
}

/// Valida y lee un archivo exportado. Las claves antiguas de duración
/// (`destination`, `enRouteToDestination`) se migran a `atDestination`.
///
/// Se rechaza el archivo entero si alguna duración no es positiva o si hay
/// ids vacíos o repetidos.
pub fn parse_import(raw: &str) -> Result<ImportedFleet, ImportError> {
    let value: Value = serde_json::from_str(raw)?;

    let has_trucks = value.get("trucks").map_or(false, Value::is_array);
    let has_defaults = value.get("timerDefaults").map_or(false, Value::is_object);
    if !has_trucks || !has_defaults {
        return Err(ImportError::InvalidFormat);
    }

    let imported: ImportedFleet = serde_json::from_value(value).map_err(|e| {
        log::warn!("⚠️ Archivo de importación con unidades inválidas: {}", e);
        ImportError::InvalidFormat
    })?;
    check_imported(&imported)?;
    Ok(imported)
}

fn check_imported(imported: &ImportedFleet) -> Result<(), ImportError> {
    let defaults = imported.timer_defaults;
    if validate_positive_duration(defaults.at_destination).is_err()
        || validate_positive_duration(defaults.logistics).is_err()
    {
        log::warn!("⚠️ Duraciones no positivas en la importación: {:?}", defaults);
        return Err(ImportError::InvalidFormat);
    }

    let mut seen = HashSet::new();
    for unit in &imported.trucks {
        if validate_not_empty(&unit.id).is_err() || !seen.insert(unit.id.as_str()) {
            log::warn!("⚠️ Id vacío o repetido en la importación: '{}'", unit.id);
            return Err(ImportError::InvalidFormat);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitStatus;
    use std::collections::HashSet;

    fn tuples(units: &[Unit]) -> HashSet<(String, String, String, UnitStatus, Option<i64>)> {
        units
            .iter()
            .map(|u| (u.id.clone(), u.name.clone(), u.location.clone(), u.status, u.timer_end_time))
            .collect()
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let mut state = FleetState::default();
        let defaults = state.timer_defaults;
        state.units[2].set_status(UnitStatus::Logistics, &defaults, 1_000);
        state.units[4].status = UnitStatus::OnScene;

        let exported = export_fleet(&state).unwrap();
        assert!(exported.contains('\n'));

        let imported = parse_import(&exported).unwrap();
        assert_eq!(tuples(&imported.trucks), tuples(&state.units));
        assert_eq!(imported.timer_defaults, state.timer_defaults);
    }

    #[test]
    fn test_import_is_independent_of_key_order() {
        let raw = r#"{
            "timerDefaults": { "logistics": 12, "atDestination": 22 },
            "trucks": [{ "timerEndTime": null, "status": "dispatched", "location": "Iva", "name": "Six", "id": "Med-6" }]
        }"#;
        let imported = parse_import(raw).unwrap();
        assert_eq!(imported.trucks[0], Unit::new("Med-6", "Six", "Iva", UnitStatus::Dispatched));
        assert_eq!(imported.timer_defaults, TimerDefaults { at_destination: 22, logistics: 12 });
    }

    #[test]
    fn test_import_migrates_legacy_keys() {
        let raw = r#"{ "trucks": [], "timerDefaults": { "destination": 35, "logistics": 8 } }"#;
        let imported = parse_import(raw).unwrap();
        assert_eq!(imported.timer_defaults.at_destination, 35);
    }

    #[test]
    fn test_import_rejects_non_positive_durations() {
        let zero_both = r#"{ "trucks": [], "timerDefaults": { "atDestination": 0, "logistics": 0 } }"#;
        assert!(matches!(parse_import(zero_both), Err(ImportError::InvalidFormat)));

        let zero_logistics = r#"{ "trucks": [], "timerDefaults": { "atDestination": 20, "logistics": 0 } }"#;
        assert!(matches!(parse_import(zero_logistics), Err(ImportError::InvalidFormat)));

        let legacy_zero = r#"{ "trucks": [], "timerDefaults": { "destination": 0 } }"#;
        assert!(matches!(parse_import(legacy_zero), Err(ImportError::InvalidFormat)));

        assert_eq!(
            ImportError::InvalidFormat.to_string(),
            "Invalid JSON file format."
        );
    }

    #[test]
    fn test_import_rejects_duplicate_and_blank_ids() {
        let duplicate = r#"{
            "trucks": [
                { "id": "Med-1", "name": "A", "location": "Iva", "status": "available" },
                { "id": "Med-1", "name": "B", "location": "Wren", "status": "available" }
            ],
            "timerDefaults": { "atDestination": 20, "logistics": 10 }
        }"#;
        assert!(matches!(parse_import(duplicate), Err(ImportError::InvalidFormat)));

        let blank = r#"{
            "trucks": [{ "id": "  ", "name": "A", "location": "Iva", "status": "available" }],
            "timerDefaults": { "atDestination": 20, "logistics": 10 }
        }"#;
        assert!(matches!(parse_import(blank), Err(ImportError::InvalidFormat)));
    }

    #[test]
    fn test_import_rejects_bad_files() {
        assert!(matches!(parse_import("not json"), Err(ImportError::Parse(_))));
        assert!(matches!(
            parse_import(r#"{ "trucks": {}, "timerDefaults": {} }"#),
            Err(ImportError::InvalidFormat)
        ));
        assert!(matches!(
            parse_import(r#"{ "trucks": [] }"#),
            Err(ImportError::InvalidFormat)
        ));
        assert!(matches!(
            parse_import(r#"{ "trucks": [{ "id": "A", "name": "A", "location": "B", "status": "posted" }], "timerDefaults": {} }"#),
            Err(ImportError::InvalidFormat)
        ));
    }
}
