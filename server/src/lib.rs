use anyhow::Result;
use axum::{extract::State, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use chatmatch_core::{load_knowledge, CorpusModel, KnowledgeEntry, MatchOutcome};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod history;

use history::{open_history, ChatMessage, HistoryStore};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Knowledge file or directory, re-read on `/knowledge/reload`.
    pub knowledge_path: PathBuf,
    /// Sled directory for chat history; in memory when unset.
    pub history_db: Option<PathBuf>,
    pub admin_token: Option<String>,
    /// Comma-separated allowed origins; any origin when unset.
    pub cors_allow_origin: Option<String>,
}

impl AppConfig {
    pub fn new<P: Into<PathBuf>>(knowledge_path: P) -> Self {
        Self { knowledge_path: knowledge_path.into(), history_db: None, admin_token: None, cors_allow_origin: None }
    }

    /// Reads ADMIN_TOKEN and CORS_ALLOW_ORIGIN from the environment.
    pub fn with_env(mut self) -> Self {
        self.admin_token = std::env::var("ADMIN_TOKEN").ok();
        self.cors_allow_origin = std::env::var("CORS_ALLOW_ORIGIN").ok();
        self
    }
}

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default, alias = "Message")]
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Serialize)]
pub struct KnowledgeResponse {
    pub version: u64,
    pub entries: Vec<KnowledgeEntry>,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub version: u64,
    pub entries: usize,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { error: msg.into() }))
}

/// The corpus model currently used for scoring, and how many loads produced it.
pub struct Snapshot {
    pub version: u64,
    pub model: Arc<CorpusModel>,
}

#[derive(Clone)]
pub struct AppState {
    pub knowledge_path: PathBuf,
    pub snapshot: Arc<RwLock<Snapshot>>,
    pub history: Arc<dyn HistoryStore>,
    pub admin_token: Option<String>,
}

impl AppState {
    fn current(&self) -> (u64, Arc<CorpusModel>) {
        let snap = self.snapshot.read();
        (snap.version, snap.model.clone())
    }
}

pub fn build_app(config: AppConfig) -> Result<Router> {
    let kb = load_knowledge(&config.knowledge_path)?;
    let history = open_history(config.history_db.as_deref())?;
    let snapshot = Snapshot { version: 1, model: Arc::new(CorpusModel::build(&kb.entries)) };
    let app_state = AppState {
        knowledge_path: config.knowledge_path.clone(),
        snapshot: Arc::new(RwLock::new(snapshot)),
        history,
        admin_token: config.admin_token.clone(),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/chat", post(chat_handler))
        .route("/history", get(history_handler))
        .route("/knowledge", get(knowledge_handler))
        .route("/knowledge/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors_layer(config.cors_allow_origin.as_deref()))
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let origins: Vec<_> = allow_origin
        .unwrap_or("")
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    if origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
    }
}

pub async fn chat_handler(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Result<Json<ChatReply>, ApiError> {
    let (_, model) = state.current();
    let outcome = model.best_match(&req.message);
    if outcome == MatchOutcome::EmptyInput {
        return Err(api_error(StatusCode::BAD_REQUEST, outcome.reply()));
    }
    let reply = outcome.reply().to_string();
    state.history.append(&req.message, &reply).map_err(|e| {
        tracing::error!(error = %e, "failed to record chat");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {e}"))
    })?;
    Ok(Json(ChatReply { reply }))
}

pub async fn history_handler(State(state): State<AppState>) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let messages = state.history.list().map_err(|e| {
        tracing::error!(error = %e, "failed to read chat history");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {e}"))
    })?;
    Ok(Json(messages))
}

pub async fn knowledge_handler(State(state): State<AppState>) -> Json<KnowledgeResponse> {
    let (version, model) = state.current();
    Json(KnowledgeResponse { version, entries: model.entries().to_vec() })
}

async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<ReloadResponse>, ApiError> {
    authorize(&state, &headers)?;
    let kb = load_knowledge(&state.knowledge_path).map_err(|e| {
        tracing::error!(error = %format!("{e:#}"), "knowledge reload failed, keeping previous snapshot");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {e:#}"))
    })?;
    let model = Arc::new(CorpusModel::build(&kb.entries));
    let entries = model.len();
    let version = {
        let mut snap = state.snapshot.write();
        snap.version += 1;
        snap.model = model;
        snap.version
    };
    tracing::info!(version, entries, "knowledge reloaded");
    Ok(Json(ReloadResponse { version, entries }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err(api_error(StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set")),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        tracing::warn!("rejected admin request with invalid token");
        Err(api_error(StatusCode::UNAUTHORIZED, "invalid admin token"))
    }
}
