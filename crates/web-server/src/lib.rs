use axum::{Router, routing::get};
use configuration::ReportSettings;
use database::JournalStore;
use reporter::Reporter;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub store: Arc<dyn JournalStore>,
    pub reporter: Reporter,
    pub settings: ReportSettings,
}

impl AppState {
    pub fn new(store: Arc<dyn JournalStore>, settings: ReportSettings) -> Self {
        Self {
            store,
            reporter: Reporter::new(&settings),
            settings,
        }
    }
}

/// Builds the router with every API route and middleware attached.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/mistakes", get(handlers::get_mistakes))
        .route("/api/analytics", get(handlers::get_all_analytics))
        .route("/api/users/:username/analytics", get(handlers::get_user_analytics))
        .route("/api/users/:username/trades", get(handlers::get_user_trades))
        .with_state(Arc::new(state))
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Serves the API on `addr` until the process is stopped.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
