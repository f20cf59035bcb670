//! Derivación de la vista del tablero
//!
//! Función pura de (flota, ahora): se recalcula en cada tick de refresco,
//! no hay temporizadores por unidad.

use crate::models::{FleetState, Unit, UnitStatus};

/// Por debajo de este tiempo restante la tarjeta parpadea
pub const FLASH_THRESHOLD_MS: i64 = 60_000;

/// Tarjeta de una unidad
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitView {
    pub id: String,
    pub name: String,
    pub location: String,
    pub status: UnitStatus,
    pub status_label: &'static str,
    pub timer: Option<String>,
    pub flash_alert: bool,
}

/// Tablero completo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub tiles: Vec<UnitView>,
    pub available_count: usize,
}

/// `MM:SS` mientras queda tiempo, `+MM:SS` de exceso una vez cruzado el cero.
/// Los minutos no se limitan a 59.
pub fn format_countdown(remaining_ms: i64) -> String {
    let prefix = if remaining_ms > 0 { "" } else { "+" };
    let total_seconds = remaining_ms.unsigned_abs() / 1000;
    format!("{}{:02}:{:02}", prefix, total_seconds / 60, total_seconds % 60)
}

pub fn derive_unit_view(unit: &Unit, now_ms: i64) -> UnitView {
    let remaining = match unit.timer_end_time {
        Some(end) if unit.status.is_timed() => Some(end - now_ms),
        _ => None,
    };

    UnitView {
        id: unit.id.clone(),
        name: unit.name.clone(),
        location: unit.location.clone(),
        status: unit.status,
        status_label: unit.status.label(),
        timer: remaining.map(format_countdown),
        flash_alert: remaining.map_or(false, |ms| ms > 0 && ms < FLASH_THRESHOLD_MS),
    }
}

pub fn derive_board(state: &FleetState, now_ms: i64) -> BoardView {
    BoardView {
        tiles: state
            .units
            .iter()
            .map(|unit| derive_unit_view(unit, now_ms))
            .collect(),
        available_count: state.available_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimerDefaults;

    fn timed_unit(end: i64) -> Unit {
        let mut unit = Unit::new("Med-1", "Med-1", "Iva", UnitStatus::AtDestination);
        unit.timer_end_time = Some(end);
        unit
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(1_200_000), "20:00");
        assert_eq!(format_countdown(61_500), "01:01");
        assert_eq!(format_countdown(0), "+00:00");
        assert_eq!(format_countdown(-60_000), "+01:00");
        assert_eq!(format_countdown(-7_500_000), "+125:00");
    }

    #[test]
    fn test_overrun_after_twenty_minutes() {
        let t = 1_700_000_000_000;
        let mut unit = Unit::new("Med-1", "Med-1", "Iva", UnitStatus::Available);
        unit.set_status(UnitStatus::AtDestination, &TimerDefaults::default(), t);
        assert_eq!(unit.timer_end_time, Some(t + 1_200_000));

        let view = derive_unit_view(&unit, t + 1_260_000);
        assert_eq!(view.timer.as_deref(), Some("+01:00"));
        assert!(!view.flash_alert);
    }

    #[test]
    fn test_flash_only_in_last_minute() {
        assert!(!derive_unit_view(&timed_unit(60_000), 0).flash_alert);
        assert!(derive_unit_view(&timed_unit(59_999), 0).flash_alert);
        assert!(derive_unit_view(&timed_unit(1), 0).flash_alert);
        assert!(!derive_unit_view(&timed_unit(0), 0).flash_alert);
        assert!(!derive_unit_view(&timed_unit(-1), 0).flash_alert);
    }

    #[test]
    fn test_untimed_unit_has_no_timer() {
        let mut unit = Unit::new("Med-2", "Med-2", "Wren", UnitStatus::OnScene);
        unit.timer_end_time = Some(10);
        let view = derive_unit_view(&unit, 0);
        assert_eq!(view.timer, None);
        assert_eq!(view.status_label, "On Scene");
    }

    #[test]
    fn test_available_count() {
        let mut state = FleetState::default();
        state.units[0].status = UnitStatus::Dispatched;
        let board = derive_board(&state, 0);
        assert_eq!(board.tiles.len(), 17);
        assert_eq!(board.available_count, 16);
    }
}
