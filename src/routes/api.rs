use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};

use crate::handlers::{diagnostics, doc_deleted, health_check, ready_check};
use crate::routes::auth_middleware::auth_middleware;
use crate::state::AppState;

/// Create API routes
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .merge(
            Router::new()
                .route("/v1/diagnostics", get(diagnostics))
                .route("/v1/documents/:doc_id", delete(doc_deleted))
                // Applies to all routes added above
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        .with_state(state)
}
