//! Credit request and ledger handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::credits::{
    Credit, CreditBalance, CreditRequest, GrantCreditRequest, ListCreditRequestsQuery,
    ReviewCreditRequest, SubmitCreditRequest,
};
use crate::error::ApiResult;
use crate::middleware::{PartnerUser, StaffUser};
use crate::models::ApiResponse;
use crate::state::AppState;

/// Submit a credit request for the authenticated partner
pub async fn submit_credit_request(
    State(app_state): State<AppState>,
    PartnerUser(user): PartnerUser,
    Json(request): Json<SubmitCreditRequest>,
) -> ApiResult<Json<ApiResponse<CreditRequest>>> {
    let created = app_state
        .credit_service
        .submit_request(&user, request)
        .await?;
    Ok(Json(ApiResponse::ok(created)))
}

/// List the authenticated partner's own credit requests
pub async fn list_my_credit_requests(
    State(app_state): State<AppState>,
    PartnerUser(user): PartnerUser,
) -> ApiResult<Json<ApiResponse<Vec<CreditRequest>>>> {
    let requests = app_state
        .credit_service
        .list_partner_requests(user.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// The authenticated partner's credit ledger
pub async fn my_credit_balance(
    State(app_state): State<AppState>,
    PartnerUser(user): PartnerUser,
) -> ApiResult<Json<ApiResponse<CreditBalance>>> {
    let balance = app_state.credit_service.partner_balance(user.user_id).await?;
    Ok(Json(ApiResponse::ok(balance)))
}

/// List credit requests across all partners, optionally filtered by status
pub async fn list_credit_requests(
    State(app_state): State<AppState>,
    StaffUser(_user): StaffUser,
    Query(query): Query<ListCreditRequestsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<CreditRequest>>>> {
    let requests = app_state.credit_service.list_requests(query).await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// Review a pending credit request
pub async fn review_credit_request(
    State(app_state): State<AppState>,
    StaffUser(user): StaffUser,
    Path(request_id): Path<Uuid>,
    Json(review): Json<ReviewCreditRequest>,
) -> ApiResult<Json<ApiResponse<CreditRequest>>> {
    let reviewed = app_state
        .credit_service
        .review_request(&user, request_id, review)
        .await?;
    Ok(Json(ApiResponse::ok(reviewed)))
}

/// Grant a credit directly, outside the request workflow
pub async fn grant_credit(
    State(app_state): State<AppState>,
    StaffUser(user): StaffUser,
    Path(partner_id): Path<Uuid>,
    Json(grant): Json<GrantCreditRequest>,
) -> ApiResult<Json<ApiResponse<Credit>>> {
    let credit = app_state
        .credit_service
        .grant_credit(&user, partner_id, grant)
        .await?;
    Ok(Json(ApiResponse::ok(credit)))
}

/// A partner's credit ledger, as seen from the back office
pub async fn partner_credit_balance(
    State(app_state): State<AppState>,
    StaffUser(_user): StaffUser,
    Path(partner_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<CreditBalance>>> {
    let balance = app_state.credit_service.partner_balance(partner_id).await?;
    Ok(Json(ApiResponse::ok(balance)))
}
