//! Payment route definitions

use axum::{routing::post, Router};

use crate::handlers::stripe_webhook;
use crate::state::AppState;

pub fn payment_routes() -> Router<AppState> {
    Router::new().route("/api/payments/webhook", post(stripe_webhook))
}
