//! Service order service layer

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::orders::{
    CreateOrderRequest, ListOrdersQuery, OrderEvent, OrderStats, ServiceOrder, ServiceOrderStatus,
    ServiceType,
};
use crate::payments::CheckoutSession;

/// Service for the order lifecycle
#[derive(Clone)]
pub struct OrderService {
    db_pool: PgPool,
}

impl OrderService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Create a pending order from a direct request
    pub async fn create_order(
        &self,
        user_id: Uuid,
        customer_email: Option<String>,
        request: CreateOrderRequest,
    ) -> ApiResult<ServiceOrder> {
        request.validate()?;
        self.insert_order(user_id, customer_email, request, ServiceOrderStatus::Pending)
            .await
    }

    /// Create a pre-confirmed order from a completed checkout session.
    ///
    /// Field data comes from the session metadata but flows through the same
    /// `CreateOrderRequest` validator as the direct path. Idempotent on the
    /// checkout session id.
    pub async fn confirm_from_checkout(
        &self,
        session: &CheckoutSession,
    ) -> ApiResult<ServiceOrder> {
        let metadata = &session.metadata;

        let user_id = metadata
            .get("user_id")
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| {
                ApiError::ValidationError(
                    "Falta el identificador de usuario en los metadatos del pago".to_string(),
                )
            })?;

        let service_type = metadata
            .get("service_id")
            .and_then(|s| ServiceType::from_str(s))
            .ok_or_else(|| {
                ApiError::ValidationError(
                    "Tipo de servicio inválido en los metadatos del pago".to_string(),
                )
            })?;

        let request = CreateOrderRequest {
            service_type,
            service_name: metadata.get("service_name").cloned().unwrap_or_default(),
            service_description: metadata.get("service_description").cloned(),
            property_address: metadata
                .get("property_address")
                .cloned()
                .unwrap_or_default(),
            contact_phone: metadata.get("contact_phone").cloned().unwrap_or_default(),
            preferred_date: metadata
                .get("preferred_date")
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|d| d.with_timezone(&Utc)),
            special_requests: metadata.get("special_requests").cloned(),
            amount: session.amount_total.unwrap_or_default(),
            currency: session.currency.clone(),
            stripe_session_id: Some(session.id.clone()),
            stripe_payment_intent_id: session.payment_intent.clone(),
        };
        request.validate()?;

        self.insert_order(
            user_id,
            session.customer_email.clone(),
            request,
            ServiceOrderStatus::Confirmed,
        )
        .await
    }

    /// List orders, newest first. `user_id` scopes the listing; `None` lists
    /// everything (staff view).
    pub async fn list_orders(
        &self,
        user_id: Option<Uuid>,
        query: ListOrdersQuery,
    ) -> ApiResult<Vec<ServiceOrder>> {
        let orders = sqlx::query_as::<_, ServiceOrder>(
            r#"
            SELECT * FROM service_orders
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::service_order_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(query.status)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(orders)
    }

    /// Apply a lifecycle event under a row lock. Illegal transitions surface
    /// as CONFLICT.
    pub async fn apply_event(
        &self,
        order_id: Uuid,
        event: OrderEvent,
        deliverables: Option<Vec<String>>,
    ) -> ApiResult<ServiceOrder> {
        let mut tx = self.db_pool.begin().await?;

        let order = sqlx::query_as::<_, ServiceOrder>(
            "SELECT * FROM service_orders WHERE id = $1 FOR UPDATE",
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Pedido de servicio no encontrado".to_string()))?;

        let next = order
            .status
            .transition(event)
            .map_err(|e| ApiError::Conflict(e.to_string()))?;

        let mut all_deliverables = order.deliverables.clone();
        let mut actual_delivery = order.actual_delivery;
        if next == ServiceOrderStatus::Completed {
            if let Some(batch) = deliverables {
                all_deliverables.extend(batch);
            }
            actual_delivery = Some(Utc::now());
        }

        let updated = sqlx::query_as::<_, ServiceOrder>(
            r#"
            UPDATE service_orders
            SET status = $2, deliverables = $3, actual_delivery = $4, updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(next)
        .bind(&all_deliverables)
        .bind(actual_delivery)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order_id,
            from = order.status.as_str(),
            to = next.as_str(),
            "Service order transitioned"
        );

        Ok(updated)
    }

    /// Append a note to the order log
    pub async fn add_note(&self, order_id: Uuid, note: &str) -> ApiResult<ServiceOrder> {
        if note.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "La nota no puede estar vacía".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, ServiceOrder>(
            r#"
            UPDATE service_orders
            SET notes = array_append(notes, $2), updated_at = $3
            WHERE id = $1 AND status <> 'cancelled'
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(note.trim())
        .bind(Utc::now())
        .fetch_optional(&self.db_pool)
        .await?;

        match updated {
            Some(order) => Ok(order),
            None => Err(self.missing_or_cancelled(order_id).await?),
        }
    }

    /// Assign the order to a provider, optionally setting the delivery estimate
    pub async fn assign_to(
        &self,
        order_id: Uuid,
        assignee: Uuid,
        estimated_delivery: Option<DateTime<Utc>>,
    ) -> ApiResult<ServiceOrder> {
        let updated = sqlx::query_as::<_, ServiceOrder>(
            r#"
            UPDATE service_orders
            SET assigned_to = $2,
                estimated_delivery = COALESCE($3, estimated_delivery),
                updated_at = $4
            WHERE id = $1 AND status <> 'cancelled'
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(assignee)
        .bind(estimated_delivery)
        .bind(Utc::now())
        .fetch_optional(&self.db_pool)
        .await?;

        match updated {
            Some(order) => Ok(order),
            None => Err(self.missing_or_cancelled(order_id).await?),
        }
    }

    /// Read-side aggregation. `user_id` scopes the stats; `None` aggregates
    /// over everything.
    pub async fn stats(&self, user_id: Option<Uuid>) -> ApiResult<OrderStats> {
        let stats = sqlx::query_as::<_, OrderStats>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status IN ('confirmed', 'in_progress')) AS active_orders,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_orders,
                COALESCE(SUM(amount) FILTER (WHERE status <> 'cancelled'), 0)::BIGINT AS total_amount,
                COUNT(*) FILTER (WHERE created_at >= date_trunc('month', now())) AS orders_this_month
            FROM service_orders
            WHERE ($1::uuid IS NULL OR user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(stats)
    }

    async fn insert_order(
        &self,
        user_id: Uuid,
        customer_email: Option<String>,
        request: CreateOrderRequest,
        status: ServiceOrderStatus,
    ) -> ApiResult<ServiceOrder> {
        let currency = request.currency.clone().unwrap_or_else(|| "eur".to_string());
        let session_id = request.stripe_session_id.clone();

        let inserted = sqlx::query_as::<_, ServiceOrder>(
            r#"
            INSERT INTO service_orders (
                user_id, service_type, service_name, service_description,
                property_address, contact_phone, preferred_date, special_requests,
                amount, currency, status, stripe_payment_intent_id, stripe_session_id,
                customer_email, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
            ON CONFLICT (stripe_session_id) WHERE stripe_session_id IS NOT NULL DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(request.service_type)
        .bind(&request.service_name)
        .bind(&request.service_description)
        .bind(&request.property_address)
        .bind(&request.contact_phone)
        .bind(request.preferred_date)
        .bind(&request.special_requests)
        .bind(request.amount)
        .bind(&currency)
        .bind(status)
        .bind(&request.stripe_payment_intent_id)
        .bind(&session_id)
        .bind(&customer_email)
        .bind(Utc::now())
        .fetch_optional(&self.db_pool)
        .await?;

        if let Some(order) = inserted {
            tracing::info!(
                order_id = %order.id,
                user_id = %user_id,
                status = order.status.as_str(),
                "Service order created"
            );
            return Ok(order);
        }

        // The session was already processed; return the existing order
        let session_id = session_id.ok_or_else(|| {
            ApiError::InternalError("No se pudo crear el pedido de servicio".to_string())
        })?;

        let existing = sqlx::query_as::<_, ServiceOrder>(
            "SELECT * FROM service_orders WHERE stripe_session_id = $1",
        )
        .bind(&session_id)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(
            order_id = %existing.id,
            session_id = %session_id,
            "Checkout session already processed, returning existing order"
        );

        Ok(existing)
    }

    async fn missing_or_cancelled(&self, order_id: Uuid) -> ApiResult<ApiError> {
        let exists: Option<ServiceOrderStatus> =
            sqlx::query_scalar("SELECT status FROM service_orders WHERE id = $1")
                .bind(order_id)
                .fetch_optional(&self.db_pool)
                .await?;

        Ok(match exists {
            None => ApiError::NotFound("Pedido de servicio no encontrado".to_string()),
            Some(_) => ApiError::Conflict("El pedido está cancelado".to_string()),
        })
    }
}
