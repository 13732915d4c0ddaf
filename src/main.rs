//! Mention Backend
//!
//! Loads the employee and customer directories from Elasticsearch at startup, keeps a fuzzy
//! name index in memory and serves @mention suggestions to the editor over REST.

mod api;
mod config;
mod elastic;
mod errors;
mod mention;
mod models;
mod search;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use elastic::ElasticClient;
use search::PersonIndex;

/// The index currently being served and when it was built.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    pub index: Arc<PersonIndex>,
    /// Incremented on every rebuild, starting at 1.
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<ElasticClient>,
    current: Arc<RwLock<IndexSnapshot>>,
}

impl AppState {
    pub fn new(client: ElasticClient, index: PersonIndex) -> Self {
        let snapshot = IndexSnapshot {
            index: Arc::new(index),
            generation: 1,
            loaded_at: Utc::now(),
        };

        Self {
            client: Arc::new(client),
            current: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// The index to answer the current request from.
    pub async fn snapshot(&self) -> IndexSnapshot {
        self.current.read().await.clone()
    }

    /// Swap in a freshly built index and return the new snapshot.
    pub async fn replace_index(&self, index: PersonIndex) -> IndexSnapshot {
        let mut current = self.current.write().await;
        *current = IndexSnapshot {
            index: Arc::new(index),
            generation: current.generation + 1,
            loaded_at: Utc::now(),
        };
        current.clone()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mention Backend");
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.elastic_user.is_empty() {
        tracing::warn!("No ELASTIC_USER configured. Requests will be sent without credentials");
    }

    // Search backend client, created once for the lifetime of the process
    let client = ElasticClient::new(&config)?;
    tracing::info!("Search backend: {}", client.endpoint());

    // Load both collections before serving anything
    tracing::info!("Fetching directory...");
    let directory = client.fetch_directory().await?;
    let index = PersonIndex::from_directory(directory);
    if index.is_empty() {
        tracing::warn!("Both collections are empty. No one can be mentioned");
    }
    tracing::info!("Person index built with {} entries", index.len());

    let state = AppState::new(client, index);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/people", get(api::list_people))
        .route("/people/reload", post(api::reload_people))
        .route("/search", get(api::search_people))
        .route("/keystroke", post(api::handle_keystroke));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
