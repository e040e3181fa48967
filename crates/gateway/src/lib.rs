//! HTTP API gateway for Parley.
//!
//! Exposes the agent over REST: a root status endpoint, a health check,
//! and `POST /agent/message` for conversation turns.
//!
//! Built on Axum. All heavy state (knowledge index, session store, plugin
//! registry) is constructed once at startup and shared via `Arc`.

use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use parley_agent::{AgentReply, Orchestrator, TemplateGenerator};
use parley_config::AppConfig;
use parley_core::Error;
use parley_knowledge::{HashEmbedder, KnowledgeIndex, load_corpus};
use parley_memory::SessionStore;
use parley_plugins::default_registry;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub orchestrator: Arc<Orchestrator>,
    pub sessions: Arc<SessionStore>,
    pub started_at: DateTime<Utc>,
}

type SharedState = Arc<GatewayState>;

/// Build all gateway state from configuration.
///
/// The knowledge index is built eagerly here: every corpus chunk is
/// embedded once, before the first request is accepted.
pub fn build_state(config: &AppConfig) -> SharedState {
    let corpus = load_corpus(
        Path::new(&config.retrieval.docs_dir),
        config.retrieval.min_chunk_chars,
    );
    let knowledge = Arc::new(KnowledgeIndex::build(
        corpus,
        Box::new(HashEmbedder::new(config.retrieval.embedding_dim)),
    ));
    let sessions = Arc::new(SessionStore::new(config.session.max_messages));
    let plugins = Arc::new(default_registry(&config.weather));
    let generator = Arc::new(TemplateGenerator::new());

    let orchestrator = Arc::new(Orchestrator::new(
        sessions.clone(),
        knowledge,
        plugins,
        generator,
        config.session.recent_window,
        config.retrieval.top_k,
    ));

    Arc::new(GatewayState {
        orchestrator,
        sessions,
        started_at: Utc::now(),
    })
}

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/agent/message", post(agent_message_handler))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Spawns a maintenance task that evicts stale sessions once an hour,
/// then serves requests until the process is stopped.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = build_state(&config);

    let retention = TimeDelta::hours(config.session.retention_hours as i64);
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(3600));
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            sessions.evict_stale(Utc::now(), retention);
        }
    });

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct AgentRequest {
    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct RootResponse {
    status: &'static str,
    message: &'static str,
    timestamp: DateTime<Utc>,
    features: [&'static str; 4],
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: i64,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        status: "healthy",
        message: "Parley agent gateway is running!",
        timestamp: Utc::now(),
        features: [
            "Weather information lookup",
            "Mathematical calculations",
            "Conversational AI with memory",
            "Knowledge retrieval",
        ],
    })
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}

async fn agent_message_handler(
    State(state): State<SharedState>,
    Json(payload): Json<AgentRequest>,
) -> Result<Json<AgentReply>, (StatusCode, Json<ErrorResponse>)> {
    let message = payload.message.unwrap_or_default();
    let session_id = payload.session_id.unwrap_or_default();

    match state.orchestrator.handle(&session_id, &message).await {
        Ok(reply) => Ok(Json(reply)),
        Err(e @ Error::Validation(_)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
        Err(e) => {
            tracing::error!(error = %e, "agent request failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".into(),
                }),
            ))
        }
    }
}

async fn not_found_handler() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Route not found".into(),
        }),
    )
}
