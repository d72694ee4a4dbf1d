use utoipa::OpenApi;

use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Diagnostics endpoint
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics",
    responses(
        (status = 200, description = "Runtime counters and host statistics", body = DiagnosticsResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

/// Document deletion notice
#[utoipa::path(
    delete,
    path = "/api/v1/documents/{doc_id}",
    params(
        ("doc_id" = String, Path, description = "Document id")
    ),
    responses(
        (status = 200, description = "Room dissolved and cache invalidated", body = DeleteNoticeResponse),
        (status = 403, description = "Caller does not own the document", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn doc_deleted_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        diagnostics_doc,
        doc_deleted_doc,
    ),
    components(
        schemas(HealthResponse, DiagnosticsResponse, DeleteNoticeResponse, ErrorResponse)
    ),
    tags(
        (name = "api", description = "API endpoints")
    )
)]
pub struct ApiDoc;
