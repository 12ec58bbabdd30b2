//! Verification service layer

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthenticatedUser;
use crate::verification::{
    PartnerVerification, ReviewVerificationRequest, SubmitVerificationRequest,
    VerificationStatusView,
};

/// Service for the partner verification workflow
#[derive(Clone)]
pub struct VerificationService {
    db_pool: PgPool,
}

impl VerificationService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Current status for a partner; `not_started` when nothing was submitted
    pub async fn get_status(&self, partner_id: Uuid) -> ApiResult<VerificationStatusView> {
        let verification = self.find(partner_id).await?;

        Ok(verification
            .map(VerificationStatusView::from)
            .unwrap_or_else(|| VerificationStatusView::not_started(partner_id)))
    }

    /// Full verification document, for admin review screens
    pub async fn get_verification(&self, partner_id: Uuid) -> ApiResult<PartnerVerification> {
        self.find(partner_id).await?.ok_or_else(|| {
            ApiError::NotFound("No existe una verificación para este socio".to_string())
        })
    }

    /// Submit or re-submit verification documents. Re-submission overwrites
    /// the stored documents and resets the status to pending.
    pub async fn submit(
        &self,
        partner: &AuthenticatedUser,
        request: SubmitVerificationRequest,
    ) -> ApiResult<PartnerVerification> {
        let (documents, bank_info) = match (request.documents, request.bank_info) {
            (Some(documents), Some(bank_info)) => (documents, bank_info),
            _ => {
                return Err(ApiError::ValidationError(
                    "Los documentos y la información bancaria son obligatorios".to_string(),
                ))
            }
        };

        let verification = sqlx::query_as::<_, PartnerVerification>(
            r#"
            INSERT INTO partner_verifications (
                partner_id, partner_name, partner_email, status, documents, bank_info, submitted_at
            )
            VALUES ($1, $2, $3, 'pending', $4, $5, $6)
            ON CONFLICT (partner_id) DO UPDATE SET
                documents = EXCLUDED.documents,
                bank_info = EXCLUDED.bank_info,
                status = 'pending',
                submitted_at = EXCLUDED.submitted_at,
                reviewed_at = NULL,
                reviewed_by = NULL,
                review_notes = NULL
            RETURNING *
            "#,
        )
        .bind(partner.user_id)
        .bind(&partner.name)
        .bind(&partner.email)
        .bind(documents)
        .bind(bank_info)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(partner_id = %partner.user_id, "Verification submitted");

        Ok(verification)
    }

    /// Record an admin review decision
    pub async fn review(
        &self,
        reviewer: &AuthenticatedUser,
        partner_id: Uuid,
        request: ReviewVerificationRequest,
    ) -> ApiResult<PartnerVerification> {
        if !reviewer.role.is_staff() {
            return Err(ApiError::Forbidden(
                "No tienes permisos para revisar verificaciones".to_string(),
            ));
        }

        if !request.status.is_reviewable() {
            return Err(ApiError::ValidationError(
                "Estado de revisión inválido".to_string(),
            ));
        }

        let verification = sqlx::query_as::<_, PartnerVerification>(
            r#"
            UPDATE partner_verifications
            SET status = $2, reviewed_at = $3, reviewed_by = $4, review_notes = $5
            WHERE partner_id = $1
            RETURNING *
            "#,
        )
        .bind(partner_id)
        .bind(request.status)
        .bind(Utc::now())
        .bind(reviewer.user_id)
        .bind(&request.review_notes)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("No existe una verificación para este socio".to_string())
        })?;

        tracing::info!(
            partner_id = %partner_id,
            status = ?verification.status,
            reviewer = %reviewer.user_id,
            "Verification reviewed"
        );

        Ok(verification)
    }

    async fn find(&self, partner_id: Uuid) -> ApiResult<Option<PartnerVerification>> {
        let verification = sqlx::query_as::<_, PartnerVerification>(
            "SELECT * FROM partner_verifications WHERE partner_id = $1",
        )
        .bind(partner_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(verification)
    }
}
