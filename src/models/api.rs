use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for an error
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: u16,
    pub status: String,
    pub error: String,
}

/// API response for health and readiness checks
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Runtime counters and host statistics
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DiagnosticsResponse {
    pub connections: u32,
    pub rooms: u32,
    pub cached_docs: u32,
    pub dirty_docs: u32,
    pub cpu_usage: f32,
    pub memory_used: u64,
    pub memory_free: u64,
    pub memory_total: u64,
}

/// Acknowledgement of a document deletion notice
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DeleteNoticeResponse {
    pub success: bool,
}
