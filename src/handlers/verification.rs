//! Partner verification handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::middleware::{PartnerUser, StaffUser};
use crate::models::ApiResponse;
use crate::state::AppState;
use crate::verification::{
    PartnerVerification, ReviewVerificationRequest, SubmitVerificationRequest,
    VerificationStatusView,
};

/// The authenticated partner's verification status
pub async fn my_verification_status(
    State(app_state): State<AppState>,
    PartnerUser(user): PartnerUser,
) -> ApiResult<Json<ApiResponse<VerificationStatusView>>> {
    let status = app_state
        .verification_service
        .get_status(user.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(status)))
}

/// Submit (or resubmit) verification documents
pub async fn submit_verification(
    State(app_state): State<AppState>,
    PartnerUser(user): PartnerUser,
    Json(request): Json<SubmitVerificationRequest>,
) -> ApiResult<Json<ApiResponse<PartnerVerification>>> {
    let verification = app_state.verification_service.submit(&user, request).await?;
    Ok(Json(ApiResponse::ok(verification)))
}

/// Full verification record for a partner, back-office view
pub async fn get_partner_verification(
    State(app_state): State<AppState>,
    StaffUser(_user): StaffUser,
    Path(partner_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<PartnerVerification>>> {
    let verification = app_state
        .verification_service
        .get_verification(partner_id)
        .await?;
    Ok(Json(ApiResponse::ok(verification)))
}

/// Approve or reject a partner's verification
pub async fn review_verification(
    State(app_state): State<AppState>,
    StaffUser(user): StaffUser,
    Path(partner_id): Path<Uuid>,
    Json(request): Json<ReviewVerificationRequest>,
) -> ApiResult<Json<ApiResponse<PartnerVerification>>> {
    let verification = app_state
        .verification_service
        .review(&user, partner_id, request)
        .await?;
    Ok(Json(ApiResponse::ok(verification)))
}
