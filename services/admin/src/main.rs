use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use daehan_admin::config::AdminConfig;
use daehan_admin::infra::identity::IdentityClient;
use daehan_admin::router::build_router;
use daehan_admin::state::AppState;
use daehan_core::tracing::init_tracing;

/// Log filter used when `RUST_LOG` is absent or malformed.
const DEFAULT_LOG_DIRECTIVES: &str = "info,sqlx=warn";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing(DEFAULT_LOG_DIRECTIVES);

    let config = AdminConfig::from_env().expect("invalid configuration");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let identity = IdentityClient::from_config(
        &config.identity,
        config.list_page_size,
        config.provider_timeout,
    )
    .expect("failed to build identity provider client");
    let provider = identity.name();

    let state = AppState {
        db: Arc::new(db),
        identity,
        admin_key: config.admin_key.clone(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(provider, "admin service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
