use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{Error, Result},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct BalanceChangeRequest {
    pub amount: f64,
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let account = state
        .account_service
        .get(telegram_id)
        .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;
    Ok(Json(json!({ "ok": true, "data": account })))
}

pub async fn top_up_balance(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
    Json(req): Json<BalanceChangeRequest>,
) -> Result<impl IntoResponse> {
    validate_amount(req.amount)?;
    let account = state.account_service.credit(telegram_id, req.amount).await?;
    Ok(Json(json!({ "ok": true, "data": account })))
}

pub async fn charge_balance(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
    Json(req): Json<BalanceChangeRequest>,
) -> Result<impl IntoResponse> {
    validate_amount(req.amount)?;
    let account = state.account_service.debit(telegram_id, req.amount).await?;
    Ok(Json(json!({ "ok": true, "data": account })))
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::BadRequest("Amount must be positive".to_string()));
    }
    Ok(())
}
