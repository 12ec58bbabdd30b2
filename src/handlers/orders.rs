//! Service order handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::middleware::{AuthenticatedUser, StaffUser};
use crate::models::ApiResponse;
use crate::orders::{
    AddNoteRequest, AssignOrderRequest, CompleteOrderRequest, CreateOrderRequest, ListOrdersQuery,
    OrderEvent, OrderStats, ServiceOrder,
};
use crate::state::AppState;

/// Create a pending service order for the authenticated user
pub async fn create_order(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateOrderRequest>,
) -> ApiResult<Json<ApiResponse<ServiceOrder>>> {
    let order = app_state
        .order_service
        .create_order(user.user_id, Some(user.email.clone()), request)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// List the authenticated user's own orders
pub async fn list_my_orders(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListOrdersQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ServiceOrder>>>> {
    let orders = app_state
        .order_service
        .list_orders(Some(user.user_id), query)
        .await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// Order statistics for the authenticated user
pub async fn my_order_stats(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<OrderStats>>> {
    let stats = app_state.order_service.stats(Some(user.user_id)).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// List orders across all users, optionally filtered by status
pub async fn list_all_orders(
    State(app_state): State<AppState>,
    StaffUser(_user): StaffUser,
    Query(query): Query<ListOrdersQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ServiceOrder>>>> {
    let orders = app_state.order_service.list_orders(None, query).await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// Fleet-wide order statistics
pub async fn all_order_stats(
    State(app_state): State<AppState>,
    StaffUser(_user): StaffUser,
) -> ApiResult<Json<ApiResponse<OrderStats>>> {
    let stats = app_state.order_service.stats(None).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

pub async fn confirm_order(
    State(app_state): State<AppState>,
    StaffUser(_user): StaffUser,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ServiceOrder>>> {
    let order = app_state
        .order_service
        .apply_event(order_id, OrderEvent::Confirm, None)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

pub async fn start_order(
    State(app_state): State<AppState>,
    StaffUser(_user): StaffUser,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ServiceOrder>>> {
    let order = app_state
        .order_service
        .apply_event(order_id, OrderEvent::Start, None)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

pub async fn complete_order(
    State(app_state): State<AppState>,
    StaffUser(_user): StaffUser,
    Path(order_id): Path<Uuid>,
    Json(request): Json<CompleteOrderRequest>,
) -> ApiResult<Json<ApiResponse<ServiceOrder>>> {
    let order = app_state
        .order_service
        .apply_event(order_id, OrderEvent::Complete, request.deliverables)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

pub async fn cancel_order(
    State(app_state): State<AppState>,
    StaffUser(_user): StaffUser,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ServiceOrder>>> {
    let order = app_state
        .order_service
        .apply_event(order_id, OrderEvent::Cancel, None)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// Append an internal note to an order
pub async fn add_order_note(
    State(app_state): State<AppState>,
    StaffUser(_user): StaffUser,
    Path(order_id): Path<Uuid>,
    Json(request): Json<AddNoteRequest>,
) -> ApiResult<Json<ApiResponse<ServiceOrder>>> {
    let order = app_state.order_service.add_note(order_id, &request.note).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// Assign an order to a staff member
pub async fn assign_order(
    State(app_state): State<AppState>,
    StaffUser(_user): StaffUser,
    Path(order_id): Path<Uuid>,
    Json(request): Json<AssignOrderRequest>,
) -> ApiResult<Json<ApiResponse<ServiceOrder>>> {
    let order = app_state
        .order_service
        .assign_to(order_id, request.assigned_to, request.estimated_delivery)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}
