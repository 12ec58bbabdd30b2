//! Messaging route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn messaging_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/partner/messages",
            get(my_message_history).post(post_partner_message),
        )
        .route(
            "/api/admin/partners/:id/messages",
            get(partner_message_history).post(post_admin_message),
        )
        .route(
            "/api/admin/partners/:id/conversation",
            post(close_partner_conversation),
        )
}
