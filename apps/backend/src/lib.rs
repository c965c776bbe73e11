pub mod config;
pub mod error;
pub mod models;
pub mod routes;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use flashcard_core::{
    get_algorithm, CardStore, JsonFileGateway, ReviewSession, SpacedRepetitionAlgorithm,
};
use rand::rngs::StdRng;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::Config;

/// Card store plus the review sessions in progress.
pub struct Engine {
    pub store: CardStore<JsonFileGateway>,
    pub sessions: HashMap<Uuid, ReviewSession<StdRng>>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<Engine>>,
    pub scheduler: Arc<dyn SpacedRepetitionAlgorithm>,
}

impl AppState {
    pub fn new(
        store: CardStore<JsonFileGateway>,
        scheduler: Arc<dyn SpacedRepetitionAlgorithm>,
    ) -> Self {
        Self {
            engine: Arc::new(Mutex::new(Engine {
                store,
                sessions: HashMap::new(),
            })),
            scheduler,
        }
    }

    /// Open the snapshot named by `config` and pick its scheduler.
    ///
    /// An unreadable snapshot only logs a warning; the service then starts
    /// with an empty collection.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let scheduler = get_algorithm(&config.algorithm)
            .ok_or_else(|| anyhow::anyhow!("unknown scheduling algorithm '{}'", config.algorithm))?;

        let (store, load_error) = CardStore::open(JsonFileGateway::new(&config.data_file));
        if let Some(e) = load_error {
            tracing::warn!(
                path = %config.data_file.display(),
                error = %e,
                "Starting with an empty collection"
            );
        }
        tracing::info!(
            cards = store.len(),
            algorithm = scheduler.name(),
            "Collection ready"
        );

        Ok(Self::new(store, Arc::from(scheduler)))
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Deck routes
        .route("/api/decks", get(routes::decks::list).post(routes::decks::create))
        .route(
            "/api/decks/{name}",
            put(routes::decks::rename).delete(routes::decks::delete),
        )
        .route("/api/decks/{name}/cards", get(routes::decks::cards))
        // Card routes
        .route("/api/cards", get(routes::cards::search).post(routes::cards::create))
        .route(
            "/api/cards/{id}",
            get(routes::cards::get)
                .put(routes::cards::update)
                .delete(routes::cards::delete),
        )
        .route("/api/cards/{id}/move", post(routes::cards::move_card))
        // Study routes
        .route("/api/study/sessions", post(routes::study::start))
        .route("/api/study/sessions/{id}", delete(routes::study::abandon))
        .route("/api/study/sessions/{id}/next", post(routes::study::next))
        .route("/api/study/sessions/{id}/reveal", post(routes::study::reveal))
        .route("/api/study/sessions/{id}/grade", post(routes::study::grade))
        // Stats and settings
        .route("/api/stats", get(routes::stats::collection))
        .route(
            "/api/settings",
            get(routes::settings::get).put(routes::settings::update),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Loading collection from {}...", config.data_file.display());
    let state = AppState::from_config(&config)?;
    let app = router(state);

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
