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

use engine::{CreateUserCmd, Engine};
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

async fn seeded_token(app: &Router, engine: &Engine) -> String {
    engine
        .create_user(CreateUserCmd::new("kai@example.com", "Kai", "Prasert", "pw123456"))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": "kai@example.com", "password": "pw123456"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn config_type_names_are_unique() {
    let (app, engine) = test_app().await;
    let token = seeded_token(&app, &engine).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/config-types",
            &token,
            json!({"name": "Department"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/config-types",
            &token,
            json!({"name": "Department"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(get_authed("/config-types", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Department");
}

#[tokio::test]
async fn config_crud_over_http() {
    let (app, engine) = test_app().await;
    let token = seeded_token(&app, &engine).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/config-types",
            &token,
            json!({"name": "Department"}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let type_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/configs",
            &token,
            json!({"name": "Finance", "configTypeId": type_id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["configType"]["name"], "Department");

    let response = app
        .clone()
        .oneshot(get_authed("/configs?search=fin", &token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/configs/{id}"),
            &token,
            json!({"name": "Finance & Accounting"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Finance & Accounting");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/configs/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_authed(&format!("/configs/{id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn config_delete_conflicts_while_referenced() {
    let (app, engine) = test_app().await;
    let token = seeded_token(&app, &engine).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/config-types",
            &token,
            json!({"name": "Department"}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let type_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/configs",
            &token,
            json!({"name": "Finance", "configTypeId": type_id}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let config_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/approve-lists")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "apiKey": "test-key",
                        "url": "https://origin.example/items/1",
                        "title": "New laptop",
                        "detail": "needs a decision",
                        "configId": config_id,
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/configs/{config_id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}
