//! REST surface tests using tower's oneshot service calls.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use coscribe::config::Config;
use coscribe::state::AppState;
use coscribe::store::MemoryStore;
use coscribe::sync::gate::Claims;
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;

const SECRET: &str = "api-test-secret";

fn token_for(user_id: i64, name: &str) -> String {
    let claims = Claims {
        sub: name.to_string(),
        user_id,
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn state_with_doc() -> (Arc<AppState>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    store.insert_document("d1", 7, "body").await;
    let config = Config {
        jwt_secret: Some(SECRET.to_string()),
        ..Config::default()
    };
    (AppState::new(config, store.clone()), store)
}

#[tokio::test]
async fn health_endpoint_answers_without_auth() {
    let (state, _store) = state_with_doc().await;
    let app = coscribe::build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn deletion_notice_requires_a_token() {
    let (state, _store) = state_with_doc().await;
    let app = coscribe::build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/documents/d1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn owner_deletion_notice_clears_the_cache() {
    let (state, _store) = state_with_doc().await;
    state.cache.set("d1", "unsaved edits");
    let app = coscribe::build_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/documents/d1")
                .header(header::AUTHORIZATION, format!("Bearer {}", token_for(7, "owner")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.cache.get("d1"), None);
    assert!(!state.cache.is_dirty("d1"));
}

#[tokio::test]
async fn non_owner_deletion_notice_is_forbidden() {
    let (state, _store) = state_with_doc().await;
    state.cache.set("d1", "unsaved edits");
    let app = coscribe::build_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/documents/d1")
                .header(header::AUTHORIZATION, format!("Bearer {}", token_for(8, "intruder")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    // The cache entry survives a rejected notice
    assert_eq!(state.cache.get("d1").as_deref(), Some("unsaved edits"));
}

#[tokio::test]
async fn diagnostics_reports_cache_counters() {
    let (state, _store) = state_with_doc().await;
    state.cache.set("d1", "pending");
    let app = coscribe::build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/diagnostics")
                .header(header::AUTHORIZATION, format!("Bearer {}", token_for(7, "owner")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["cached_docs"], 1);
    assert_eq!(body["dirty_docs"], 1);
    assert_eq!(body["connections"], 0);
}
