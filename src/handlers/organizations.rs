//! Organization handlers

use axum::{extract::State, Json};
use serde_json::{json, Value};
use validator::Validate;

use crate::error::ApiResult;
use crate::middleware::{AuthenticatedUser, StaffUser};
use crate::models::ApiResponse;
use crate::organizations::{
    CreateFromPaymentRequest, CreateIdentityOrgRequest, Organization, OrganizationRequest,
    RequestOrganizationRequest,
};
use crate::state::AppState;

/// Provision the caller's organization from a completed checkout session
pub async fn create_organization_from_payment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateFromPaymentRequest>,
) -> ApiResult<Json<ApiResponse<Organization>>> {
    request.validate()?;
    let organization = app_state
        .organization_service
        .create_from_session_id(&user, &request.session_id)
        .await?;
    Ok(Json(ApiResponse::ok(organization)))
}

/// Record a manual organization request
pub async fn request_organization(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<RequestOrganizationRequest>,
) -> ApiResult<Json<ApiResponse<OrganizationRequest>>> {
    let created = app_state
        .organization_service
        .request_organization(&user, request)
        .await?;
    Ok(Json(ApiResponse::ok(created)))
}

/// List organization requests for the back office
pub async fn list_organization_requests(
    State(app_state): State<AppState>,
    StaffUser(user): StaffUser,
) -> ApiResult<Json<ApiResponse<Vec<OrganizationRequest>>>> {
    let requests = app_state.organization_service.list_requests(&user).await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// Create the organization at the identity provider
pub async fn create_identity_organization(
    State(app_state): State<AppState>,
    StaffUser(user): StaffUser,
    Json(request): Json<CreateIdentityOrgRequest>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let external_id = app_state
        .organization_service
        .create_identity_org(&user, request)
        .await?;
    Ok(Json(ApiResponse::ok(json!({ "organization_id": external_id }))))
}
