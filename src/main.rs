use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use telegram_login_backend::{
    config::{get_config, init_config},
    middleware::cors::cors_layer,
    routes, AppState,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    if config.telegram_bot_token.is_none() {
        tracing::warn!(
            "TELEGRAM_BOT_TOKEN is not set; Telegram login verification will fail until it is configured"
        );
    }

    let app_state = AppState::new();
    app_state.account_service.load().await?;

    let app = Router::new()
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
        .with_state(app_state)
        .layer(cors_layer(&config.allowed_origin))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(64 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    info!("Allowed origin: {}", config.allowed_origin);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
