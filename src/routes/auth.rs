use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{
    config::get_config,
    dto::auth_dto::LoginPayload,
    error::{Error, Result},
    utils::telegram_auth,
    AppState,
};

/// `POST /auth/telegram` — verifies a Login Widget payload. Ordering matters:
/// an unconfigured bot token is reported before field validation, and no
/// cryptography runs for an incomplete payload.
pub async fn telegram_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    let bot_token = get_config().bot_token()?;

    if let Some(field) = payload.missing_field() {
        return Err(Error::BadRequest(format!("Missing field: {}", field)));
    }

    if !telegram_auth::verify_login(&payload, bot_token) {
        return Err(Error::Unauthorized("Invalid Telegram hash".to_string()));
    }

    let account = state.account_service.upsert_from_login(&payload).await?;
    tracing::info!(telegram_id = account.telegram_id, "Telegram login verified");

    Ok(Json(json!({ "ok": true, "data": payload })))
}
