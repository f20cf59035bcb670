//! Utilidades de validación
//!
//! Funciones helper usadas por los derive de `validator` y por las
//! acciones de administración del tablero.

use validator::ValidationError;

/// Validar que un string no esté vacío (tras recortar espacios)
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar una duración en minutos escrita por el usuario: entero positivo
pub fn validate_positive_minutes(value: &str) -> Result<u32, ValidationError> {
    match value.trim().parse::<i64>() {
        Ok(minutes) if minutes > 0 && minutes <= i64::from(u32::MAX) => Ok(minutes as u32),
        _ => Err(minutes_error(value)),
    }
}

/// Misma regla para duraciones ya tipadas (archivos importados)
pub fn validate_positive_duration(minutes: u32) -> Result<(), ValidationError> {
    if minutes == 0 {
        return Err(minutes_error(&minutes.to_string()));
    }
    Ok(())
}

fn minutes_error(value: &str) -> ValidationError {
    let mut error = ValidationError::new("positive_minutes");
    error.add_param("value".into(), &value.to_string());
    error
}
