mod clients;
mod crypto;
mod handlers;
mod routes;
mod sqn;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use clients::mongodb::MongoClient;
use sqn::SequenceNumberManager;
use types::{AppState, AuthEventStore, SubscriberStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("SERVER_PORT")
        .unwrap_or_else(|_| "8081".to_string())
        .parse::<u16>()?;

    let nf_instance_id = std::env::var("NF_INSTANCE_ID")
        .ok()
        .and_then(|s| if s.is_empty() { None } else { Some(s) })
        .and_then(|s| Uuid::parse_str(&s).ok())
        .unwrap_or_else(|| {
            let id = Uuid::new_v4();
            tracing::info!("Generated new NF instance ID: {}", id);
            id
        });

    let mongo_client = Arc::new(
        MongoClient::new()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create MongoDB client: {}", e))?,
    );

    let subscriber_store = Arc::new(SubscriberStore::new(Arc::clone(&mongo_client)));
    let auth_event_store = Arc::new(AuthEventStore::new(Arc::clone(&mongo_client)));
    let sqn_manager = Arc::new(SequenceNumberManager::new());

    let app_state = AppState {
        subscriber_store,
        auth_event_store,
        sqn_manager,
        nf_instance_id,
    };

    let app = routes::create_routes(app_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from((host.parse::<std::net::IpAddr>()?, port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        "UDM server listening on {} (instance ID: {})",
        addr,
        nf_instance_id
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, stopping UDM server");

    Ok(())
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
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
