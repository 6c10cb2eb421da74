use axum::Router;

use crate::adapters::http::app_state::AppState;

pub mod payouts;
pub mod subscriptions;
pub mod wallet;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(subscriptions::router())
        .merge(wallet::router())
        .merge(payouts::router())
}
