//! Organization route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn organization_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/organizations/create-from-payment",
            post(create_organization_from_payment),
        )
        .route("/api/organizations/request", post(request_organization))
        .route(
            "/api/admin/organizations/requests",
            get(list_organization_requests),
        )
        .route(
            "/api/clerk-organizations/create",
            post(create_identity_organization),
        )
}
