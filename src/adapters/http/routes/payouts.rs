use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{adapters::http::app_state::AppState, app_error::AppResult};

#[derive(Deserialize)]
struct RequestPayoutPayload {
    user_id: Uuid,
    amount_cents: i64,
    destination_msisdn: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/payouts", post(request_payout))
        .route("/payouts/{id}", get(get_one))
        .route("/payouts/{id}/retry", post(retry))
        .route("/payouts/{id}/reverse", post(reverse))
        .route("/users/{user_id}/payouts", get(list_for_user))
}

async fn request_payout(
    State(app_state): State<AppState>,
    Json(payload): Json<RequestPayoutPayload>,
) -> AppResult<impl IntoResponse> {
    let payout = app_state
        .payouts
        .request_payout(
            payload.user_id,
            payload.amount_cents,
            &payload.destination_msisdn,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(payout)))
}

async fn get_one(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let payout = app_state.payouts.get(id).await?;
    Ok(Json(payout))
}

async fn list_for_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let payouts = app_state.payouts.list_by_user(user_id).await?;
    Ok(Json(payouts))
}

async fn retry(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let payout = app_state.payouts.retry_payout(id).await?;
    Ok(Json(payout))
}

async fn reverse(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let payout = app_state.payouts.reverse_payout(id).await?;
    Ok(Json(payout))
}
