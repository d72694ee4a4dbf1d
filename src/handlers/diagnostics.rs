use std::sync::{Arc, Mutex, OnceLock};

use axum::{extract::State, http::StatusCode, Extension, Json};
use sysinfo::System;
use tracing::info;

use crate::models::DiagnosticsResponse;
use crate::state::AppState;
use crate::sync::gate::Claims;

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Runtime counters and host statistics
pub async fn diagnostics(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> (StatusCode, Json<DiagnosticsResponse>) {
    let connections = state.registry.connection_count().await as u32;
    let rooms = state.registry.room_count().await as u32;
    let cached_docs = state.cache.entry_count() as u32;
    let dirty_docs = state.cache.dirty_count() as u32;

    // System stats
    let (cpu_usage, memory_used, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| Mutex::new(System::new_all()));
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0),
        }
    };

    info!(
        "Diagnostics for user {}: CPU: {:.2}%, Mem: {}/{} MB, Conn: {}, Rooms: {}",
        claims.user_id,
        cpu_usage,
        memory_used / 1024 / 1024,
        memory_total / 1024 / 1024,
        connections,
        rooms
    );

    (
        StatusCode::OK,
        Json(DiagnosticsResponse {
            connections,
            rooms,
            cached_docs,
            dirty_docs,
            cpu_usage,
            memory_used,
            memory_free,
            memory_total,
        }),
    )
}
