use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use crate::controllers::fleet_controller::FleetController;
use crate::dto::fleet_dto::{MessageResponse, SaveFleetResponse, ServerStatusResponse};
use crate::models::{format_stamp, FleetDocument};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fleet_router() -> Router<AppState> {
    Router::new()
        .route("/trucks", get(get_trucks).post(save_trucks))
        .route("/status", get(server_status))
        .route("/backup", get(download_backup))
        .route("/restore", post(restore_backup))
}

async fn get_trucks(State(state): State<AppState>) -> Result<Json<FleetDocument>, AppError> {
    let controller = FleetController::new(state.repository.clone());
    let document = controller.load().await?;
    Ok(Json(document))
}

async fn save_trucks(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveFleetResponse>, AppError> {
    let Json(body) = body?;
    let controller = FleetController::new(state.repository.clone());
    let response = controller.save(body).await?;
    Ok(Json(response))
}

async fn server_status(State(state): State<AppState>) -> Json<ServerStatusResponse> {
    Json(ServerStatusResponse {
        status: "online".to_string(),
        timestamp: format_stamp(&chrono::Utc::now()),
        uptime: state.uptime_secs(),
    })
}

async fn download_backup(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let controller = FleetController::new(state.repository.clone());
    let document = controller.load().await?;
    Ok((
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=truck-backup.json",
        )],
        Json(document),
    ))
}

async fn restore_backup(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(body) = body?;
    let controller = FleetController::new(state.repository.clone());
    let response = controller.restore(body).await?;
    Ok(Json(response))
}
