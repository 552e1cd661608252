use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::Value;
use tower::ServiceExt;

use engine::Engine;
use integrations::Integrations;
use server::{AuthConfig, ServerState, router};

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .build()
        .await
        .unwrap();
    let state = ServerState::new(
        engine,
        Integrations::new(),
        &AuthConfig {
            jwt_secret: "test-secret".to_string(),
            api_key: "test-key".to_string(),
        },
    );
    router(state)
}

fn notify_request(uri: &str, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(api_key) = api_key {
        builder = builder.header("x-api-key", api_key);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn notify_requires_the_shared_key() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(notify_request("/notify/pending-approvals", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(notify_request("/notify/pending-approvals", Some("wrong")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn nothing_pending_means_nothing_is_sent() {
    let app = test_app().await;

    // No chat client is configured; the handler only reaches it when
    // there is something to say, so an empty database must succeed.
    let response = app
        .clone()
        .oneshot(notify_request("/notify/pending-approvals", Some("test-key")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "no pending approvals");
}

#[tokio::test]
async fn daily_summary_reports_missing_chat_configuration() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(notify_request("/notify/daily-summary", Some("test-key")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "chat notifications are not configured");
}
