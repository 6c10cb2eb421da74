use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    application::use_cases::subscriptions::RenewalOutcome,
    domain::entities::subscription::Subscription,
};

#[derive(Deserialize)]
struct CreatePayload {
    user_id: Uuid,
    plan_id: Uuid,
    promo_code: Option<String>,
}

#[derive(Deserialize)]
struct CreatePackagePayload {
    user_id: Uuid,
    package_plan_id: Uuid,
    promo_code: Option<String>,
}

#[derive(Deserialize)]
struct PlanChangePayload {
    plan_id: Uuid,
}

#[derive(Serialize)]
struct RenewalResponse {
    outcome: &'static str,
    subscription: Subscription,
    #[serde(skip_serializing_if = "Option::is_none")]
    attempts: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl From<RenewalOutcome> for RenewalResponse {
    fn from(outcome: RenewalOutcome) -> Self {
        match outcome {
            RenewalOutcome::Renewed(subscription) => RenewalResponse {
                outcome: "renewed",
                subscription,
                attempts: None,
                reason: None,
            },
            RenewalOutcome::AttemptFailed {
                subscription,
                attempts,
                reason,
            } => RenewalResponse {
                outcome: "attempt_failed",
                subscription,
                attempts: Some(attempts),
                reason: Some(reason),
            },
            RenewalOutcome::Expired(subscription) => RenewalResponse {
                outcome: "expired",
                subscription,
                attempts: None,
                reason: None,
            },
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscriptions", post(create))
        .route("/subscriptions/package", post(create_package))
        .route("/subscriptions/{id}", get(get_one))
        .route("/subscriptions/{id}/cancel", post(cancel))
        .route("/subscriptions/{id}/renew", post(renew))
        .route("/subscriptions/{id}/plan", post(stage_plan_change))
        .route("/users/{user_id}/subscriptions", get(list_for_user))
}

async fn create(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePayload>,
) -> AppResult<impl IntoResponse> {
    let created = app_state
        .subscriptions
        .create_subscription(payload.user_id, payload.plan_id, payload.promo_code.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_package(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePackagePayload>,
) -> AppResult<impl IntoResponse> {
    let created = app_state
        .subscriptions
        .create_package_subscription(
            payload.user_id,
            payload.package_plan_id,
            payload.promo_code.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_one(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let subscription = app_state.subscriptions.get(id).await?;
    Ok(Json(subscription))
}

async fn list_for_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let subscriptions = app_state.subscriptions.list_by_user(user_id).await?;
    Ok(Json(subscriptions))
}

async fn cancel(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let cancelled = app_state.subscriptions.cancel(id).await?;
    Ok(Json(cancelled))
}

async fn renew(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let outcome = app_state.subscriptions.renew(id).await?;
    Ok(Json(RenewalResponse::from(outcome)))
}

async fn stage_plan_change(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PlanChangePayload>,
) -> AppResult<impl IntoResponse> {
    let staged = app_state
        .subscriptions
        .stage_plan_change(id, payload.plan_id)
        .await?;
    Ok(Json(staged))
}
