use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{adapters::http::app_state::AppState, app_error::AppResult};

#[derive(Deserialize)]
struct TopUpPayload {
    amount_cents: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/wallet", get(get_wallet))
        .route("/users/{user_id}/wallet/top-up", post(top_up))
        .route("/users/{user_id}/payments", get(list_payments))
}

async fn get_wallet(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let wallet = app_state.wallet_ledger.get_by_user(user_id).await?;
    Ok(Json(wallet))
}

async fn top_up(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<TopUpPayload>,
) -> AppResult<impl IntoResponse> {
    let wallet = app_state.wallet_ledger.get_by_user(user_id).await?;
    let wallet = app_state
        .wallet_ledger
        .credit(wallet.id, payload.amount_cents)
        .await?;
    Ok(Json(wallet))
}

async fn list_payments(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let payments = app_state.payments.list_by_user(user_id).await?;
    Ok(Json(payments))
}
