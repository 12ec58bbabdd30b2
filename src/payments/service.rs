//! Webhook processing

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;

use crate::error::{ApiError, ApiResult};
use crate::orders::OrderService;
use crate::organizations::OrganizationService;
use crate::payments::model::{CheckoutSession, StripeEvent, WebhookOutcome};
use crate::payments::stripe::{verify_webhook_signature, StripeClient, SIGNATURE_TOLERANCE_SECS};

pub struct PaymentService {
    db_pool: PgPool,
    stripe: Arc<StripeClient>,
    orders: Arc<OrderService>,
    organizations: Arc<OrganizationService>,
}

impl PaymentService {
    pub fn new(
        db_pool: PgPool,
        stripe: Arc<StripeClient>,
        orders: Arc<OrderService>,
        organizations: Arc<OrganizationService>,
    ) -> Self {
        Self {
            db_pool,
            stripe,
            orders,
            organizations,
        }
    }

    /// Verify, deduplicate and dispatch one webhook delivery. The raw body is
    /// needed because the signature covers the exact bytes on the wire.
    pub async fn process_webhook(
        &self,
        signature_header: Option<&str>,
        payload: &[u8],
    ) -> ApiResult<WebhookOutcome> {
        // Refuse deliveries outright when no secret is configured rather than
        // accepting unverifiable events.
        let secret = self.stripe.webhook_secret().ok_or_else(|| {
            ApiError::ServiceUnavailable(
                "La verificación de webhooks no está configurada".to_string(),
            )
        })?;

        let header = signature_header.ok_or_else(|| {
            ApiError::Unauthorized("Falta la firma del webhook".to_string())
        })?;

        verify_webhook_signature(
            secret,
            payload,
            header,
            SIGNATURE_TOLERANCE_SECS,
            Utc::now().timestamp(),
        )
        .map_err(|e| {
            tracing::warn!(error = %e, "webhook signature rejected");
            ApiError::Unauthorized("Firma de webhook inválida".to_string())
        })?;

        let event: StripeEvent = serde_json::from_slice(payload).map_err(|_| {
            ApiError::BadRequest("El cuerpo del evento no es válido".to_string())
        })?;

        // Stripe redelivers events until acknowledged; a second delivery of a
        // recorded event id is acknowledged without reprocessing.
        let inserted = sqlx::query(
            "INSERT INTO stripe_events (event_id) VALUES ($1) ON CONFLICT (event_id) DO NOTHING",
        )
        .bind(&event.id)
        .execute(&self.db_pool)
        .await?;

        if inserted.rows_affected() == 0 {
            tracing::info!(event_id = %event.id, "duplicate webhook delivery skipped");
            return Ok(WebhookOutcome::Duplicate);
        }

        match self.dispatch(&event).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                // Forget the event id so Stripe's retry gets a clean attempt.
                sqlx::query("DELETE FROM stripe_events WHERE event_id = $1")
                    .bind(&event.id)
                    .execute(&self.db_pool)
                    .await?;
                Err(e)
            }
        }
    }

    async fn dispatch(&self, event: &StripeEvent) -> ApiResult<WebhookOutcome> {
        if event.event_type != "checkout.session.completed" {
            tracing::debug!(event_type = %event.event_type, "webhook event type not handled");
            return Ok(WebhookOutcome::Ignored);
        }

        let session: CheckoutSession =
            serde_json::from_value(event.data.object.clone()).map_err(|_| {
                ApiError::BadRequest("La sesión de pago del evento no es válida".to_string())
            })?;

        if !session.is_paid() {
            tracing::info!(session_id = %session.id, "checkout session completed without payment");
            return Ok(WebhookOutcome::Ignored);
        }

        if session.metadata.contains_key("plan_id") {
            let org = self.organizations.create_from_payment(&session, None).await?;
            tracing::info!(event_id = %event.id, organization_id = %org.id, "webhook provisioned organization");
            Ok(WebhookOutcome::Processed)
        } else if session.metadata.contains_key("service_id") {
            let order = self.orders.confirm_from_checkout(&session).await?;
            tracing::info!(event_id = %event.id, order_id = %order.id, "webhook confirmed service order");
            Ok(WebhookOutcome::Processed)
        } else {
            tracing::warn!(event_id = %event.id, session_id = %session.id, "checkout session carries no recognizable metadata");
            Ok(WebhookOutcome::Ignored)
        }
    }
}
