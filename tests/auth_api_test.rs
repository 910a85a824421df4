use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use tower::ServiceExt;

use telegram_login_backend::{
    dto::auth_dto::LoginPayload, routes, utils::telegram_auth, AppState,
};

const BOT_TOKEN: &str = "123456:ABC-DEF";

fn setup_app() -> Router {
    std::env::set_var("TELEGRAM_BOT_TOKEN", BOT_TOKEN);
    std::env::remove_var("STATE_FILE");
    telegram_login_backend::config::init_config().ok();

    let state = AppState::new();
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/auth/telegram", post(routes::auth::telegram_login))
        .route(
            "/api/account/:telegram_id",
            get(routes::account::get_account),
        )
        .route(
            "/api/account/:telegram_id/topup",
            post(routes::account::top_up_balance),
        )
        .route(
            "/api/account/:telegram_id/charge",
            post(routes::account::charge_balance),
        )
        .with_state(state)
}

/// Signs a payload the way Telegram's widget would for `BOT_TOKEN`.
fn signed(value: Value) -> Value {
    let mut payload: LoginPayload = serde_json::from_value(value).unwrap();
    let key = telegram_auth::derive_secret_key(BOT_TOKEN);
    let mut mac = Hmac::<Sha256>::new_from_slice(&key).unwrap();
    mac.update(telegram_auth::build_data_check_string(&payload).as_bytes());
    payload.hash = Some(hex::encode(mac.finalize().into_bytes()));
    serde_json::to_value(payload).unwrap()
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn health_returns_ok() {
    let app = setup_app();
    let (status, body) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn login_rejects_payload_with_missing_field() {
    let app = setup_app();
    let (status, body) = request(
        &app,
        "POST",
        "/auth/telegram",
        Some(json!({
            "id": 12345,
            "auth_date": 1700000000,
            "hash": "deadbeef",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["error"], json!("Missing field: first_name"));
}

#[tokio::test]
async fn login_rejects_invalid_hash() {
    let app = setup_app();
    let (status, body) = request(
        &app,
        "POST",
        "/auth/telegram",
        Some(json!({
            "id": 12345,
            "first_name": "Ann",
            "auth_date": 1700000000,
            "hash": "00".repeat(32),
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Invalid Telegram hash"));
}

#[tokio::test]
async fn login_rejects_tampered_signed_payload() {
    let app = setup_app();
    let mut payload = signed(json!({
        "id": 12345,
        "first_name": "Ann",
        "auth_date": 1700000000,
    }));
    payload["auth_date"] = json!(1700000001);

    let (status, _) = request(&app, "POST", "/auth/telegram", Some(payload)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_accepts_signed_payload_and_echoes_it() {
    let app = setup_app();
    let payload = signed(json!({
        "id": 12345,
        "first_name": "Ann",
        "auth_date": 1700000000,
        "username": "ann",
        "photo_url": "https://t.me/i/userpic/320/ann.jpg",
    }));

    let (status, body) = request(&app, "POST", "/auth/telegram", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["data"], payload);
}

#[tokio::test]
async fn verified_login_opens_account_with_working_balance() {
    let app = setup_app();
    let payload = signed(json!({
        "id": 777,
        "first_name": "Bob",
        "auth_date": 1700000000,
    }));
    let (status, _) = request(&app, "POST", "/auth/telegram", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(&app, "GET", "/api/account/777", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["first_name"], json!("Bob"));
    assert_eq!(body["data"]["balance"], json!(0.0));

    let (status, body) = request(
        &app,
        "POST",
        "/api/account/777/topup",
        Some(json!({ "amount": 100.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balance"], json!(100.0));

    let (status, body) = request(
        &app,
        "POST",
        "/api/account/777/charge",
        Some(json!({ "amount": 40.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balance"], json!(60.0));

    let (status, body) = request(
        &app,
        "POST",
        "/api/account/777/charge",
        Some(json!({ "amount": 1000.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Insufficient balance"));
}

#[tokio::test]
async fn balance_changes_require_positive_amounts() {
    let app = setup_app();
    let payload = signed(json!({
        "id": 900,
        "first_name": "Cid",
        "auth_date": 1700000000,
    }));
    request(&app, "POST", "/auth/telegram", Some(payload)).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/account/900/topup",
        Some(json!({ "amount": -5.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Amount must be positive"));
}

#[tokio::test]
async fn unknown_account_is_not_found() {
    let app = setup_app();
    let (status, body) = request(&app, "GET", "/api/account/424242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Account not found"));
}
