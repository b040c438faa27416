//! Route table and request handlers.
//!
//! # Responsibility
//! - `GET /` renders every note name under a fixed heading.
//! - `GET /notes` and `POST /notes` expose the same store as JSON.
//! - `GET /health` reports version and the active dependency path.

use crate::error::WebError;
use crate::middleware::log_requests;
use crate::render::render_index;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use noteshelf_core::Note;
use serde::{Deserialize, Serialize};

/// Body accepted by `POST /notes`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub dependency_upgraded_next: bool,
    pub dependency_path: &'static str,
}

/// Builds the full router with request logging applied.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/notes", get(list_notes).post(create_note))
        .route("/health", get(health))
        .layer(axum::middleware::from_fn(log_requests))
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let notes = state.with_notes(|service| service.list_notes()).await?;
    Ok(Html(render_index(&notes)))
}

async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, WebError> {
    let notes = state.with_notes(|service| service.list_notes()).await?;
    Ok(Json(notes))
}

async fn create_note(
    State(state): State<AppState>,
    Json(request): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), WebError> {
    let note = state
        .with_notes(move |service| service.create_note(request.name))
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let flags = state.flags();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        dependency_upgraded_next: flags.dependency_upgraded_next,
        dependency_path: flags.dependency_path(),
    })
}
