use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use dispatch_board::config::environment::EnvironmentConfig;
use dispatch_board::routes::create_app;
use dispatch_board::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    let level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚑 Dispatch Board - Servidor de persistencia");
    info!("============================================");

    let addr: SocketAddr = config.server_url().parse()?;
    let state = AppState::new(config.clone());

    // Materializar el documento antes de aceptar conexiones
    match state.repository.load().await {
        Ok(document) => info!(
            "📄 {} cargado: {} unidades",
            config.data_file.display(),
            document.trucks.len()
        ),
        Err(e) => error!("❌ No se pudo preparar {}: {}", config.data_file.display(), e),
    }

    let app = create_app(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /api/trucks  - Flota completa");
    info!("   POST /api/trucks  - Guardar flota");
    info!("   GET  /api/status  - Estado del servidor");
    info!("   GET  /api/backup  - Descargar respaldo");
    info!("   POST /api/restore - Restaurar respaldo");
    info!("📁 Archivos estáticos desde {}", config.static_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
