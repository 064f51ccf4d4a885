use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    serve, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog;
use crate::resolver::Resolver;
use crate::session::{Session, SessionError};

// Each session sits behind its own lock. Handlers that mutate use try_lock,
// so a second submission while a reply is pending is rejected instead of
// queued.
type SessionHandle = Arc<Mutex<Session>>;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    resolver: Resolver,
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl AppState {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn session(&self, id: Uuid) -> Result<SessionHandle, ApiError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ApiError::SessionNotFound(id))
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session {0} not found")]
    SessionNotFound(Uuid),
    #[error("session is busy with another request")]
    Busy,
    #[error("invalid request body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Busy => StatusCode::CONFLICT,
            ApiError::InvalidBody(rejection) => rejection.status(),
            ApiError::Session(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        warn!(%status, error = %self, "Request rejected");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ValueBody {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub content: String,
}

fn lock(handle: &SessionHandle) -> Result<MutexGuard<'_, Session>, ApiError> {
    handle.try_lock().map_err(|_| ApiError::Busy)
}

fn snapshot_json(session: &Session) -> Json<serde_json::Value> {
    Json(serde_json::to_value(session.snapshot()).unwrap_or_else(|e| json!({ "error": e.to_string() })))
}

async fn catalog_handler() -> impl IntoResponse {
    Json(catalog::SECTIONS)
}

async fn create_session_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = Session::new(state.resolver.clone());
    let id = session.id;
    let body = snapshot_json(&session);
    state
        .sessions
        .write()
        .await
        .insert(id, Arc::new(Mutex::new(session)));
    info!(%id, "Created session");
    (StatusCode::CREATED, body)
}

async fn get_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let handle = state.session(id).await?;
    let session = lock(&handle)?;
    Ok(snapshot_json(&session))
}

// Ends the session. Later requests for the id get 404.
async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    match state.sessions.write().await.remove(&id) {
        Some(_) => {
            info!(%id, "Ended session");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::SessionNotFound(id)),
    }
}

async fn answer_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ValueBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = payload?;
    let handle = state.session(id).await?;
    let mut session = lock(&handle)?;
    session.answer(&body.value).await?;
    Ok(snapshot_json(&session))
}

async fn toggle_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ValueBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = payload?;
    let handle = state.session(id).await?;
    let mut session = lock(&handle)?;
    session.toggle(&body.value)?;
    Ok(snapshot_json(&session))
}

async fn continue_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let handle = state.session(id).await?;
    let mut session = lock(&handle)?;
    session.commit().await?;
    Ok(snapshot_json(&session))
}

async fn back_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let handle = state.session(id).await?;
    let mut session = lock(&handle)?;
    session.back();
    Ok(snapshot_json(&session))
}

async fn message_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<MessageBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let handle = state.session(id).await?;
    let mut session = lock(&handle)?;
    let reply = session.send_message(&body.content).await?;
    Ok(Json(reply))
}

async fn reset_chat_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let handle = state.session(id).await?;
    let mut session = lock(&handle)?;
    session.reset_chat();
    Ok(snapshot_json(&session))
}

async fn reset_quiz_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let handle = state.session(id).await?;
    let mut session = lock(&handle)?;
    session.reset_quiz();
    Ok(snapshot_json(&session))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/catalog", get(catalog_handler))
        .route("/api/sessions", post(create_session_handler))
        .route(
            "/api/sessions/:id",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/api/sessions/:id/answer", post(answer_handler))
        .route("/api/sessions/:id/toggle", post(toggle_handler))
        .route("/api/sessions/:id/continue", post(continue_handler))
        .route("/api/sessions/:id/back", post(back_handler))
        .route("/api/sessions/:id/messages", post(message_handler))
        .route("/api/sessions/:id/reset-chat", post(reset_chat_handler))
        .route("/api/sessions/:id/reset-quiz", post(reset_quiz_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http()) // Add request logging
}

pub async fn start_web_server(port: u16, resolver: Resolver) -> Result<()> {
    let app = router(AppState::new(resolver));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Web server listening on http://{}", addr);

    // Bind using tokio::net::TcpListener
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}
