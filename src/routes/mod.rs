pub mod fleet_routes;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Router completo: API de flota bajo `/api` y archivos estáticos para el resto
pub fn create_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);
    let cors = cors_middleware(&state.config.cors_origins);

    Router::new()
        .nest("/api", fleet_routes::create_fleet_router())
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state)
}
