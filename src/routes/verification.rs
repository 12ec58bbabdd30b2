//! Verification route definitions

use axum::{routing::get, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn verification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/partner/verification",
            get(my_verification_status).post(submit_verification),
        )
        .route(
            "/api/admin/partners/:id/verification",
            get(get_partner_verification).put(review_verification),
        )
}
