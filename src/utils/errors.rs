//! Sistema de manejo de errores
//!
//! Este módulo define los errores del servicio de persistencia
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Storage(e) => {
                tracing::error!("❌ Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Storage Error".to_string(),
                        message: "Failed to access truck data".to_string(),
                        details: Some(json!({ "io_error": e.to_string() })),
                        code: Some("STORAGE_ERROR".to_string()),
                    },
                )
            }

            AppError::Serialization(e) => {
                tracing::error!("❌ Serialization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Serialization Error".to_string(),
                        message: "Stored truck data is unreadable".to_string(),
                        details: Some(json!({ "serde_error": e.to_string() })),
                        code: Some("SERIALIZATION_ERROR".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                tracing::warn!("⚠️ Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                tracing::error!("❌ Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

/// Función helper para crear errores internos
pub fn internal_error(message: &str) -> AppError {
    AppError::Internal(message.to_string())
}

/// Errores del motor de flota: validaciones que abortan la operación sin
/// cambios parciales y se muestran como aviso bloqueante.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Please fill in all truck details.")]
    MissingFields,

    #[error("Truck with this ID already exists. Please use a unique ID.")]
    DuplicateId(String),

    #[error("Truck '{0}' no longer exists.")]
    UnitNotFound(String),

    #[error("Unknown status '{0}'.")]
    UnknownStatus(String),

    #[error("Please enter valid positive numbers for timer defaults.")]
    InvalidTimerDefaults,
}

/// Errores de comunicación con el backend. Todos se tratan igual:
/// backend no disponible.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server responded with status: {0}")]
    Status(u16),

    #[error("Malformed server response: {0}")]
    Malformed(String),
}

/// Errores del slot de respaldo local
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Backup storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backup data is unreadable: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errores de importación de archivos exportados
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read or parse JSON file.")]
    Read(#[from] std::io::Error),

    #[error("Failed to read or parse JSON file.")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid JSON file format.")]
    InvalidFormat,
}

/// Errores al escribir el archivo exportado
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to export truck data: {0}")]
    Write(#[from] std::io::Error),

    #[error("Failed to export truck data: {0}")]
    Serialization(#[from] serde_json::Error),
}
