//! Application wiring — builds state, binds the listener, runs the server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::watch;
use tracing::{error, info, warn};

use waypoint_auth::jwt::{JwtDecoder, JwtEncoder};
use waypoint_auth::password::PasswordHasher;
use waypoint_core::config::AppConfig;
use waypoint_core::error::AppError;
use waypoint_core::result::AppResult;
use waypoint_core::traits::LocationStore;
use waypoint_database::repositories::{LocationRepository, UserRepository};
use waypoint_realtime::relay::Relay;
use waypoint_service::auth::AuthService;
use waypoint_service::player::PlayerService;

use crate::router::build_router;
use crate::state::AppState;

/// Runs the server with the given configuration and database pool.
///
/// Returns once the server has stopped, either because the listener failed
/// or a shutdown signal was received.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> AppResult<()> {
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let location_repo = Arc::new(LocationRepository::new(db_pool.clone()));

    let password_hasher = Arc::new(PasswordHasher::new());
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&jwt_encoder),
        config.auth.password_min_length,
    ));
    let player_service = Arc::new(PlayerService::new(Arc::clone(&location_repo)));

    let relay = Relay::new(
        config.realtime.clone(),
        Arc::clone(&player_service) as Arc<dyn LocationStore>,
    );

    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool,
        jwt_encoder,
        jwt_decoder,
        auth_service,
        player_service,
        relay,
    };

    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(addr = %addr, "Server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let mut graceful_rx = shutdown_rx.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = graceful_rx.changed().await;
            info!("Shutdown signal received, draining connections");
        })
        .into_future();
    tokio::pin!(server);

    // Open WebSocket sessions keep the graceful drain alive indefinitely,
    // so a grace period bounds how long we wait before exiting anyway.
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    tokio::select! {
        result = &mut server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = async {
            let _ = shutdown_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                grace_seconds = grace.as_secs(),
                "Grace period elapsed with connections still open, exiting"
            );
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
