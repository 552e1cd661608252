use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{CreateUserCmd, Engine, Role};
use integrations::Integrations;
use server::{AuthConfig, ServerState, router};

async fn test_app() -> (Router, Engine) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .build()
        .await
        .unwrap();
    let state = ServerState::new(
        engine.clone(),
        Integrations::new(),
        &AuthConfig {
            jwt_secret: "test-secret".to_string(),
            api_key: "test-key".to_string(),
        },
    );
    (router(state), engine)
}

fn json_request(method: Method, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": email, "password": password}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn seeded_token(app: &Router, engine: &Engine, email: &str, role: Role) -> String {
    engine
        .create_user(CreateUserCmd::new(email, "Test", "User", "pw123456").role(role))
        .await
        .unwrap();
    login(app, email, "pw123456").await
}

async fn net_amount(app: &Router, token: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(get_authed("/net-amount", token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["data"]["amount"].as_i64().unwrap()
}

#[tokio::test]
async fn create_sums_items_and_moves_the_net_amount() {
    let (app, engine) = test_app().await;
    let token = seeded_token(&app, &engine, "kai@example.com", Role::User).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/transactions",
            &token,
            json!({
                "title": "Team lunch",
                "kind": "expense",
                "items": [
                    {"name": "Food", "amount": 30_000},
                    {"name": "Drinks", "amount": 12_000},
                ],
                "files": [{"url": "https://cdn.example/r.jpg", "publicId": "transactions/r"}],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["amount"], 42_000);
    assert_eq!(body["data"]["kind"], "expense");
    assert_eq!(body["data"]["statusApprove"]["id"], 1);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["files"][0]["publicId"], "transactions/r");
    assert_eq!(body["data"]["createdBy"]["email"], "kai@example.com");

    assert_eq!(net_amount(&app, &token).await, -42_000);
}

#[tokio::test]
async fn update_recomputes_the_amount_and_the_net() {
    let (app, engine) = test_app().await;
    let token = seeded_token(&app, &engine, "kai@example.com", Role::User).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/transactions",
            &token,
            json!({
                "title": "Team lunch",
                "kind": "expense",
                "items": [{"name": "Food", "amount": 30_000}],
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/transactions/{id}"),
            &token,
            json!({
                "title": "Team dinner",
                "kind": "expense",
                "items": [{"name": "Food", "amount": 50_000}],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "Team dinner");
    assert_eq!(body["data"]["amount"], 50_000);

    assert_eq!(net_amount(&app, &token).await, -50_000);
}

#[tokio::test]
async fn approval_is_admin_only_and_final() {
    let (app, engine) = test_app().await;
    let owner_token = seeded_token(&app, &engine, "kai@example.com", Role::User).await;
    let admin_token = seeded_token(&app, &engine, "boss@example.com", Role::Admin).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/transactions",
            &owner_token,
            json!({
                "title": "Team lunch",
                "kind": "expense",
                "items": [{"name": "Food", "amount": 30_000}],
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/transactions/{id}/approve"),
            &owner_token,
            json!({"statusApproveId": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/transactions/{id}/approve"),
            &admin_token,
            json!({"statusApproveId": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["statusApprove"]["id"], 2);
    assert_eq!(body["data"]["approvedBy"]["email"], "boss@example.com");
    assert!(body["data"]["approvedAt"].is_string());

    // Approval never moves the balance; the write already did.
    assert_eq!(net_amount(&app, &admin_token).await, -30_000);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/transactions/{id}/approve"),
            &admin_token,
            json!({"statusApproveId": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_reverses_the_net_amount() {
    let (app, engine) = test_app().await;
    let token = seeded_token(&app, &engine, "kai@example.com", Role::User).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/transactions",
            &token,
            json!({
                "title": "Workshop income",
                "kind": "income",
                "items": [{"name": "Tickets", "amount": 80_000}],
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(net_amount(&app, &token).await, 80_000);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/transactions/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(net_amount(&app, &token).await, 0);

    let response = app
        .clone()
        .oneshot(get_authed(&format!("/transactions/{id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_kind_from_the_query_string() {
    let (app, engine) = test_app().await;
    let token = seeded_token(&app, &engine, "kai@example.com", Role::User).await;

    for (title, kind, amount) in [
        ("Team lunch", "expense", 30_000),
        ("Workshop income", "income", 80_000),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/transactions",
                &token,
                json!({
                    "title": title,
                    "kind": kind,
                    "items": [{"name": "Item", "amount": amount}],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get_authed("/transactions?kind=income", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["title"], "Workshop income");

    let response = app
        .clone()
        .oneshot(get_authed("/transactions?search=lunch", &token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["kind"], "expense");
}
