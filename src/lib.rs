//! RCI Last Call backend
//!
//! CRUD endpoints over four MongoDB collections: resorts, users, bookings and
//! payment info. Handlers are stateless; the only shared resource is the
//! document store injected through [`AppState`].

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, patch},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod handlers;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod state;

use config::Config;
use error::StartupError;
use handlers::*;
use infrastructure::{DocumentStore, MongoStore};

pub use models::*;
pub use state::AppState;

/// Loads config, connects to MongoDB and serves until SIGINT/SIGTERM.
pub async fn start_server() -> Result<(), StartupError> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;

    info!("Connecting to MongoDB...");
    let store = Arc::new(MongoStore::connect(&config.mongodb_uri, &config.database).await?);
    if let Err(e) = store.ping().await {
        store.shutdown().await;
        return Err(e.into());
    }
    info!("Pinged your deployment. You successfully connected to MongoDB!");

    let app = create_router(AppState::from_config(store.clone(), &config));

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("RCI Last Call server listening on {address}");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.shutdown().await;
    info!("Server shut down");

    Ok(served?)
}

pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(root))
        .route("/resorts", get(list_resorts).post(create_resort))
        .route("/all-resorts", get(all_resorts))
        .route("/resorts/search", get(search_resorts))
        .route("/resorts/{resort_id}", patch(update_resort))
        .route("/users", get(find_user).post(create_user))
        .route("/all-users", get(all_users))
        .route("/update-user", patch(update_user_role))
        .route("/update-user-info", patch(update_user_info))
        .route("/bookings", get(find_booking).post(create_booking))
        .route("/all-bookings", get(all_bookings))
        .route("/payment-info", get(find_payment_info).post(create_payment_info))
        .layer(cors)
        .with_state(app_state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
