//! Real-time collaborative text editing server.
//!
//! Clients connect to one WebSocket endpoint per document and exchange
//! full-document edits; the most recently received write wins. Cached content
//! is authoritative once written and is persisted to durable storage by a
//! background flush task.

pub mod cache;
pub mod config;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod sync;
pub mod ws;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

/// Assemble the application router: editor WebSocket, REST API and Swagger UI.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/editor/:doc_id", get(ws::handler::websocket_handler))
        .with_state(state.clone())
        .nest("/api", routes::create_api_routes(state))
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
