//! Credit service layer - credit requests, reviews and the credit ledger

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::credits::{
    cooldown_days_remaining, Credit, CreditBalance, CreditRequest, CreditRequestStatus,
    GrantCreditRequest, ListCreditRequestsQuery, ReviewCreditRequest, ReviewDecision,
    SubmitCreditRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthenticatedUser;
use crate::models::UserRole;

/// Credit service for the request workflow and the ledger
#[derive(Clone)]
pub struct CreditService {
    db_pool: PgPool,
    cooldown_days: i64,
}

impl CreditService {
    pub fn new(db_pool: PgPool, cooldown_days: i64) -> Self {
        Self {
            db_pool,
            cooldown_days,
        }
    }

    /// Submit a credit request for the authenticated partner
    pub async fn submit_request(
        &self,
        partner: &AuthenticatedUser,
        request: SubmitCreditRequest,
    ) -> ApiResult<CreditRequest> {
        request.validate()?;

        // A rejected request opens a cooldown window before the next submission
        let last_rejected_at: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            SELECT reviewed_at FROM credit_requests
            WHERE partner_id = $1 AND status = 'rejected' AND reviewed_at IS NOT NULL
            ORDER BY reviewed_at DESC
            LIMIT 1
            "#,
        )
        .bind(partner.user_id)
        .fetch_optional(&self.db_pool)
        .await?;

        if let Some(reviewed_at) = last_rejected_at {
            if let Some(days) = cooldown_days_remaining(reviewed_at, Utc::now(), self.cooldown_days)
            {
                return Err(ApiError::CooldownActive(format!(
                    "Tu última solicitud fue rechazada. Debes esperar {} día(s) antes de enviar otra solicitud de crédito",
                    days
                )));
            }
        }

        let created = sqlx::query_as::<_, CreditRequest>(
            r#"
            INSERT INTO credit_requests (
                partner_id, partner_name, partner_email, amount, reason, justification,
                status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7)
            RETURNING *
            "#,
        )
        .bind(partner.user_id)
        .bind(&partner.name)
        .bind(&partner.email)
        .bind(request.amount)
        .bind(&request.reason)
        .bind(&request.justification)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(
            partner_id = %partner.user_id,
            amount = created.amount,
            "Credit request submitted"
        );

        Ok(created)
    }

    /// List credit requests, newest first
    pub async fn list_requests(
        &self,
        query: ListCreditRequestsQuery,
    ) -> ApiResult<Vec<CreditRequest>> {
        let requests = sqlx::query_as::<_, CreditRequest>(
            r#"
            SELECT * FROM credit_requests
            WHERE ($1::credit_request_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(query.status)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(requests)
    }

    /// List the authenticated partner's own requests, newest first
    pub async fn list_partner_requests(&self, partner_id: Uuid) -> ApiResult<Vec<CreditRequest>> {
        let requests = sqlx::query_as::<_, CreditRequest>(
            "SELECT * FROM credit_requests WHERE partner_id = $1 ORDER BY created_at DESC",
        )
        .bind(partner_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(requests)
    }

    /// Review a pending credit request.
    ///
    /// The status change and the ledger insert share one transaction, and the
    /// pending check happens inside the UPDATE itself, so a request can never
    /// end up approved without its credit or reviewed twice.
    pub async fn review_request(
        &self,
        reviewer: &AuthenticatedUser,
        request_id: Uuid,
        review: ReviewCreditRequest,
    ) -> ApiResult<CreditRequest> {
        if !reviewer.role.is_staff() {
            return Err(ApiError::Forbidden(
                "No tienes permisos para revisar solicitudes de crédito".to_string(),
            ));
        }

        let counter_amount = match review.decision {
            ReviewDecision::CounterOffer => {
                if !matches!(reviewer.role, UserRole::Superadmin) {
                    return Err(ApiError::Forbidden(
                        "Solo un superadministrador puede enviar una contraoferta".to_string(),
                    ));
                }
                match review.counter_offer_amount {
                    Some(amount) if amount > 0 => Some(amount),
                    _ => {
                        return Err(ApiError::ValidationError(
                            "Se requiere un monto de contraoferta válido".to_string(),
                        ))
                    }
                }
            }
            _ => None,
        };

        let mut tx = self.db_pool.begin().await?;

        let updated = sqlx::query_as::<_, CreditRequest>(
            r#"
            UPDATE credit_requests
            SET status = $2, reviewed_at = $3, reviewed_by = $4,
                review_notes = $5, counter_offer_amount = $6
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(review.decision.as_status())
        .bind(Utc::now())
        .bind(reviewer.user_id)
        .bind(&review.review_notes)
        .bind(counter_amount)
        .fetch_optional(&mut *tx)
        .await?;

        let request = match updated {
            Some(request) => request,
            None => {
                let status: Option<CreditRequestStatus> =
                    sqlx::query_scalar("SELECT status FROM credit_requests WHERE id = $1")
                        .bind(request_id)
                        .fetch_optional(&mut *tx)
                        .await?;

                return Err(match status {
                    None => {
                        ApiError::NotFound("Solicitud de crédito no encontrada".to_string())
                    }
                    Some(_) => {
                        ApiError::ValidationError("La solicitud ya fue revisada".to_string())
                    }
                });
            }
        };

        if let Some(grant) = review.decision.ledger_grant(request.amount, counter_amount) {
            let expires_at = review
                .expires_in_days
                .map(|days| Utc::now() + Duration::days(days));

            sqlx::query(
                r#"
                INSERT INTO credits (
                    partner_id, partner_name, amount, reason, granted_by, granted_by_name,
                    created_at, used, expires_at, request_id, is_counter_offer, original_amount
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, false, $8, $9, $10, $11)
                "#,
            )
            .bind(request.partner_id)
            .bind(&request.partner_name)
            .bind(grant.amount)
            .bind(&request.reason)
            .bind(reviewer.user_id)
            .bind(&reviewer.name)
            .bind(Utc::now())
            .bind(expires_at)
            .bind(request.id)
            .bind(grant.is_counter_offer)
            .bind(grant.original_amount)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            request_id = %request.id,
            partner_id = %request.partner_id,
            decision = ?review.decision,
            reviewer = %reviewer.user_id,
            "Credit request reviewed"
        );

        Ok(request)
    }

    /// Grant a credit directly, outside the request workflow
    pub async fn grant_credit(
        &self,
        granter: &AuthenticatedUser,
        partner_id: Uuid,
        grant: GrantCreditRequest,
    ) -> ApiResult<Credit> {
        if !granter.role.is_staff() {
            return Err(ApiError::Forbidden(
                "No tienes permisos para otorgar créditos".to_string(),
            ));
        }

        grant.validate()?;

        let expires_at = grant
            .expires_in_days
            .map(|days| Utc::now() + Duration::days(days));

        let credit = sqlx::query_as::<_, Credit>(
            r#"
            INSERT INTO credits (
                partner_id, partner_name, amount, reason, granted_by, granted_by_name,
                created_at, used, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, false, $8)
            RETURNING *
            "#,
        )
        .bind(partner_id)
        .bind(&grant.partner_name)
        .bind(grant.amount)
        .bind(&grant.reason)
        .bind(granter.user_id)
        .bind(&granter.name)
        .bind(Utc::now())
        .bind(expires_at)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(
            partner_id = %partner_id,
            amount = credit.amount,
            granted_by = %granter.user_id,
            "Credit granted directly"
        );

        Ok(credit)
    }

    /// Fetch a partner's ledger and derive the available balance
    pub async fn partner_balance(&self, partner_id: Uuid) -> ApiResult<CreditBalance> {
        let credits = sqlx::query_as::<_, Credit>(
            "SELECT * FROM credits WHERE partner_id = $1 ORDER BY created_at DESC",
        )
        .bind(partner_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(CreditBalance::from_ledger(credits, Utc::now()))
    }
}
