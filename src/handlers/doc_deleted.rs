use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{error, info};

use crate::models::{DeleteNoticeResponse, ErrorResponse};
use crate::state::AppState;
use crate::sync::gate::Claims;
use crate::sync::service::handle_document_deleted;

/// Deletion notice from the metadata service: evict the cache entry, notify
/// the room, and disconnect every member.
pub async fn doc_deleted(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(doc_id): Path<String>,
) -> Result<(StatusCode, Json<DeleteNoticeResponse>), (StatusCode, Json<ErrorResponse>)> {
    // A still-resolvable document may only be torn down by its owner
    match state.store.fetch_document(&doc_id).await {
        Ok(Some(doc)) if !doc.is_deleted() && doc.owner_id != claims.user_id => {
            let status = StatusCode::FORBIDDEN;
            return Err((
                status,
                Json(ErrorResponse {
                    code: status.as_u16(),
                    status: status.to_string(),
                    error: format!("User {} does not own document '{}'", claims.user_id, doc_id),
                }),
            ));
        }
        Ok(_) => {}
        Err(e) => {
            error!("Failed to look up document '{}': {}", doc_id, e);
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            return Err((
                status,
                Json(ErrorResponse {
                    code: status.as_u16(),
                    status: status.to_string(),
                    error: format!("Failed to look up document '{}'", doc_id),
                }),
            ));
        }
    }

    handle_document_deleted(&state, &doc_id).await;
    info!("Processed deletion of document '{}'", doc_id);

    Ok((StatusCode::OK, Json(DeleteNoticeResponse { success: true })))
}
