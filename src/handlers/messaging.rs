//! Partner support conversation handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::messaging::{
    AdminMessageRequest, CloseConversationRequest, MessageHistory, PartnerConversation,
    PartnerMessage, PostMessageRequest,
};
use crate::middleware::{PartnerUser, SupportUser};
use crate::models::ApiResponse;
use crate::state::AppState;

/// Post a message on the authenticated partner's open conversation,
/// opening one when none exists
pub async fn post_partner_message(
    State(app_state): State<AppState>,
    PartnerUser(user): PartnerUser,
    Json(request): Json<PostMessageRequest>,
) -> ApiResult<Json<ApiResponse<PartnerMessage>>> {
    let message = app_state
        .messaging_service
        .post_message(user.user_id, &user.name, &user, &request.message)
        .await?;
    Ok(Json(ApiResponse::ok(message)))
}

/// The authenticated partner's message history
pub async fn my_message_history(
    State(app_state): State<AppState>,
    PartnerUser(user): PartnerUser,
) -> ApiResult<Json<ApiResponse<MessageHistory>>> {
    let history = app_state
        .messaging_service
        .message_history(user.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(history)))
}

/// Post a support reply on a partner's conversation
pub async fn post_admin_message(
    State(app_state): State<AppState>,
    SupportUser(user): SupportUser,
    Path(partner_id): Path<Uuid>,
    Json(request): Json<AdminMessageRequest>,
) -> ApiResult<Json<ApiResponse<PartnerMessage>>> {
    let partner_name = request.partner_name.as_deref().unwrap_or("Partner");
    let message = app_state
        .messaging_service
        .post_message(partner_id, partner_name, &user, &request.message)
        .await?;
    Ok(Json(ApiResponse::ok(message)))
}

/// A partner's message history, back-office view
pub async fn partner_message_history(
    State(app_state): State<AppState>,
    SupportUser(_user): SupportUser,
    Path(partner_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageHistory>>> {
    let history = app_state.messaging_service.message_history(partner_id).await?;
    Ok(Json(ApiResponse::ok(history)))
}

/// Close a partner's open conversation
pub async fn close_partner_conversation(
    State(app_state): State<AppState>,
    SupportUser(user): SupportUser,
    Path(partner_id): Path<Uuid>,
    Json(request): Json<CloseConversationRequest>,
) -> ApiResult<Json<ApiResponse<PartnerConversation>>> {
    let conversation = app_state
        .messaging_service
        .close_conversation(&user, partner_id, request.reason)
        .await?;
    Ok(Json(ApiResponse::ok(conversation)))
}
