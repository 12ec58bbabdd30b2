//! Service order route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/api/services/create-order", post(create_order))
        .route("/api/services/orders", get(list_my_orders))
        .route("/api/services/stats", get(my_order_stats))
        .route("/api/admin/services/orders", get(list_all_orders))
        .route("/api/admin/services/orders/stats", get(all_order_stats))
        .route("/api/admin/services/orders/:id/confirm", post(confirm_order))
        .route("/api/admin/services/orders/:id/start", post(start_order))
        .route("/api/admin/services/orders/:id/complete", post(complete_order))
        .route("/api/admin/services/orders/:id/cancel", post(cancel_order))
        .route("/api/admin/services/orders/:id/notes", post(add_order_note))
        .route("/api/admin/services/orders/:id/assign", post(assign_order))
}
