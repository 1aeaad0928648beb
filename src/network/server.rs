//! Sync Server
//!
//! HTTP service that keeps one score row per date. Single-player and
//! unauthenticated: a later sync for a date overwrites the earlier one.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument, warn};

use crate::network::protocol::{
    ErrorBody, HealthResponse, ProtocolError, ScoreRow, SyncRequest, SyncResponse, ValidSync,
};

/// Default bind port.
pub const DEFAULT_PORT: u16 = 5000;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Server version string.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Sync server errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncServerError {
    /// Failed to bind or serve.
    #[error("Failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),
}

/// HTTP-level error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected input.
    #[error("{0}")]
    BadRequest(String),

    /// No such row.
    #[error("{0}")]
    NotFound(String),
}

impl From<ProtocolError> for ApiError {
    fn from(e: ProtocolError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

// =============================================================================
// SCORE BOARD
// =============================================================================

/// Whether an upsert created or replaced a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// New date.
    Inserted,
    /// Existing date overwritten.
    Updated,
}

/// Score rows keyed by date.
#[derive(Debug, Default)]
pub struct ScoreBoard {
    rows: RwLock<BTreeMap<NaiveDate, ScoreRow>>,
}

impl ScoreBoard {
    /// Empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the row for a date.
    pub async fn upsert(&self, sync: &ValidSync) -> UpsertOutcome {
        let row = ScoreRow { date: sync.date, score: sync.score, time_taken: sync.time };
        match self.rows.write().await.insert(sync.date, row) {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Inserted,
        }
    }

    /// Row for a date.
    pub async fn get(&self, date: NaiveDate) -> Option<ScoreRow> {
        self.rows.read().await.get(&date).copied()
    }

    /// All rows in date order.
    pub async fn all(&self) -> Vec<ScoreRow> {
        self.rows.read().await.values().copied().collect()
    }

    /// Row count.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// True when no rows are stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

/// Shared handler state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Stored scores.
    pub board: ScoreBoard,
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Logic Looper sync service is running".to_string(),
        time: Utc::now().to_rfc3339(),
    })
}

async fn sync_score(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SyncRequest>, JsonRejection>,
) -> Result<Json<SyncResponse>, ApiError> {
    // Malformed bodies get the same error shape as failed validation.
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Sync body rejected");
        ApiError::from(ProtocolError::InvalidData)
    })?;
    let today = Utc::now().date_naive();
    let valid = request.validate(today).map_err(|e| {
        warn!(?request, error = %e, "Sync rejected");
        ApiError::from(e)
    })?;

    let outcome = state.board.upsert(&valid).await;
    info!(
        date = %valid.date,
        score = valid.score,
        time = valid.time,
        streak = ?valid.streak,
        ?outcome,
        "Score synced"
    );
    Ok(Json(SyncResponse { success: true }))
}

async fn list_scores(State(state): State<Arc<AppState>>) -> Json<Vec<ScoreRow>> {
    Json(state.board.all().await)
}

async fn get_score(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<ScoreRow>, ApiError> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid date '{}'", date)))?;
    state
        .board
        .get(date)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No score for {}", date)))
}

/// Build the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/", get(health))
        .route("/api/sync", post(sync_score))
        .route("/api/scores", get(list_scores))
        .route("/api/scores/{date}", get(get_score))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// =============================================================================
// SERVER
// =============================================================================

/// The sync server.
pub struct SyncServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl SyncServer {
    /// Create a server with an empty board.
    pub fn new(config: ServerConfig) -> Self {
        Self { config, state: Arc::new(AppState::default()) }
    }

    /// Shared state (for inspection).
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Router over this server's state.
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Bind and serve until the process stops.
    #[instrument(skip(self), fields(addr = %self.config.bind_addr))]
    pub async fn run(&self) -> Result<(), SyncServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("Sync server v{} listening on {}", self.config.version, self.config.bind_addr);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(Arc::new(AppState::default()));
        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["message"].is_string());
        assert!(body["time"].is_string());
    }

    #[tokio::test]
    async fn test_sync_upserts_one_row_per_date() {
        let state = Arc::new(AppState::default());
        let app = create_router(state.clone());

        let first = json!({"date": "2026-03-01", "score": 90, "time": 40, "streak": 1});
        let response = app.clone().oneshot(post_json("/api/sync", first)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"success": true}));

        let second = json!({"date": "2026-03-01", "score": 70, "time": 80, "streak": 1});
        let response = app.clone().oneshot(post_json("/api/sync", second)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(state.board.len().await, 1);
        let response = app.oneshot(get_request("/api/scores/2026-03-01")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"date": "2026-03-01", "score": 70, "time_taken": 80})
        );
    }

    #[tokio::test]
    async fn test_sync_rejections() {
        let state = Arc::new(AppState::default());
        let app = create_router(state.clone());

        let negative = json!({"date": "2026-03-01", "score": -5, "time": 40, "streak": 1});
        let response = app.clone().oneshot(post_json("/api/sync", negative)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Invalid data"}));

        let future = json!({"date": "2999-01-01", "score": 5, "time": 40, "streak": 1});
        let response = app.clone().oneshot(post_json("/api/sync", future)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Future date not allowed"}));

        let missing = json!({"score": 5, "time": 40});
        let response = app.oneshot(post_json("/api/sync", missing)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(state.board.is_empty().await);
    }

    #[tokio::test]
    async fn test_score_lookup() {
        let app = create_router(Arc::new(AppState::default()));
        let response = app.clone().oneshot(get_request("/api/scores/2026-03-01")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.clone().oneshot(get_request("/api/scores/march")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        for (date, score) in [("2026-03-02", 10), ("2026-03-01", 20)] {
            let body = json!({"date": date, "score": score, "time": 1, "streak": 1});
            app.clone().oneshot(post_json("/api/sync", body)).await.unwrap();
        }
        let response = app.oneshot(get_request("/api/scores")).await.unwrap();
        let rows = body_json(response).await;
        assert_eq!(rows[0]["date"], "2026-03-01");
        assert_eq!(rows[1]["date"], "2026-03-02");
    }

    #[tokio::test]
    async fn test_upsert_outcome() {
        let board = ScoreBoard::new();
        let sync = ValidSync {
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            score: 50,
            time: 10,
            streak: None,
        };
        assert_eq!(board.upsert(&sync).await, UpsertOutcome::Inserted);
        assert_eq!(board.upsert(&sync).await, UpsertOutcome::Updated);
    }

    #[tokio::test]
    async fn test_malformed_sync_body() {
        let state = Arc::new(AppState::default());
        let app = create_router(state.clone());

        let not_json = Request::builder()
            .method("POST")
            .uri("/api/sync")
            .header("content-type", "application/json")
            .body(Body::from("score=10"))
            .unwrap();
        let response = app.clone().oneshot(not_json).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Invalid data"}));

        let mistyped = json!({"date": "2026-03-01", "score": "ten", "time": 40});
        let response = app.clone().oneshot(post_json("/api/sync", mistyped)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Invalid data"}));

        let no_content_type = Request::builder()
            .method("POST")
            .uri("/api/sync")
            .body(Body::from(r#"{"date":"2026-03-01","score":1,"time":1}"#))
            .unwrap();
        let response = app.oneshot(no_content_type).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Invalid data"}));

        assert!(state.board.is_empty().await);
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
    }
}
