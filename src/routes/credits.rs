//! Credit route definitions

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn credit_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/partner/credit-request",
            get(list_my_credit_requests).post(submit_credit_request),
        )
        .route("/api/partner/credits", get(my_credit_balance))
        .route("/api/admin/credit-requests", get(list_credit_requests))
        .route("/api/admin/credit-requests/:id", put(review_credit_request))
        .route(
            "/api/admin/partners/:id/credits",
            get(partner_credit_balance).post(grant_credit),
        )
}
