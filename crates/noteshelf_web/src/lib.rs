//! HTTP surface for noteshelf.
//!
//! # Responsibility
//! - Expose the note store over axum routes.
//! - Keep handlers thin: storage work runs on the blocking pool.

mod error;
mod middleware;
mod render;
mod routes;
mod server;
mod state;

pub use error::WebError;
pub use render::{escape_html, render_index, INDEX_HEADING};
pub use routes::{build_router, CreateNoteRequest, HealthResponse};
pub use server::HttpServer;
pub use state::AppState;
