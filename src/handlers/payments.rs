//! Payment webhook handler

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::models::ApiResponse;
use crate::state::AppState;

/// Stripe webhook ingress. Unauthenticated by design; the signature header
/// is the authentication.
pub async fn stripe_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok());

    let outcome = app_state
        .payment_service
        .process_webhook(signature, &body)
        .await?;

    Ok(Json(ApiResponse::ok(json!({ "outcome": outcome }))))
}
