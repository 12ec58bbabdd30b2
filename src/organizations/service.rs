//! Organization business logic

use std::sync::Arc;

use serde_json::json;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthenticatedUser;
use crate::organizations::identity::IdentityProvider;
use crate::organizations::model::{
    slugify, CreateIdentityOrgRequest, Organization, OrganizationCredits, OrganizationRequest,
    PlanTier, RequestOrganizationRequest,
};
use crate::payments::{CheckoutSession, StripeClient};

pub struct OrganizationService {
    db_pool: PgPool,
    stripe: Arc<StripeClient>,
    identity: Arc<dyn IdentityProvider>,
}

impl OrganizationService {
    pub fn new(
        db_pool: PgPool,
        stripe: Arc<StripeClient>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            db_pool,
            stripe,
            identity,
        }
    }

    /// Create or upgrade the caller's organization from a completed checkout
    /// session. Used by the post-checkout redirect; the webhook path calls
    /// `create_from_payment` directly.
    pub async fn create_from_session_id(
        &self,
        user: &AuthenticatedUser,
        session_id: &str,
    ) -> ApiResult<Organization> {
        let session = self.stripe.get_checkout_session(session_id).await?;

        if !session.is_paid() {
            return Err(ApiError::ValidationError(
                "El pago aún no se ha completado".to_string(),
            ));
        }

        self.create_from_payment(&session, Some(user.user_id)).await
    }

    /// Provision an organization for a paid checkout session. The upsert is
    /// keyed on the unique `owner_id` index, so a webhook delivery and the
    /// redirect path racing for the same buyer collapse into one row, with
    /// the later writer upgrading it in place.
    pub async fn create_from_payment(
        &self,
        session: &CheckoutSession,
        fallback_owner: Option<Uuid>,
    ) -> ApiResult<Organization> {
        let plan = session
            .metadata
            .get("plan_id")
            .and_then(|p| PlanTier::from_str(p))
            .ok_or_else(|| {
                ApiError::ValidationError("La sesión de pago no incluye un plan válido".to_string())
            })?;

        let owner_id = match session.metadata.get("user_id") {
            Some(raw) => raw.parse::<Uuid>().map_err(|_| {
                ApiError::ValidationError(
                    "La sesión de pago no identifica al comprador".to_string(),
                )
            })?,
            None => fallback_owner.ok_or_else(|| {
                ApiError::ValidationError(
                    "La sesión de pago no identifica al comprador".to_string(),
                )
            })?,
        };

        let name = session
            .metadata
            .get("organization_name")
            .cloned()
            .or_else(|| {
                session
                    .customer_email
                    .as_ref()
                    .map(|email| format!("Agencia de {}", email))
            })
            .unwrap_or_else(|| "Agencia".to_string());

        let credits = OrganizationCredits::for_plan(plan);
        let settings = plan_settings(plan);
        let metadata = json!({
            "stripe_session_id": session.id,
            "payment_intent": session.payment_intent,
        });

        let slug = self.unique_slug(&name).await?;

        // Name and slug stick once set; a later checkout only moves the plan
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, slug, owner_id, plan, status, settings, credits, metadata)
            VALUES ($1, $2, $3, $4, 'active', $5, $6, $7)
            ON CONFLICT (owner_id) DO UPDATE SET
                plan = EXCLUDED.plan,
                status = 'active',
                settings = EXCLUDED.settings,
                credits = EXCLUDED.credits,
                metadata = EXCLUDED.metadata,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&name)
        .bind(&slug)
        .bind(owner_id)
        .bind(plan)
        .bind(Json(settings))
        .bind(Json(credits))
        .bind(Json(metadata))
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(
            organization_id = %organization.id,
            owner_id = %owner_id,
            plan = ?plan,
            "organization provisioned from payment"
        );

        Ok(organization)
    }

    /// Record a manual organization request for the back office to triage.
    pub async fn request_organization(
        &self,
        user: &AuthenticatedUser,
        request: RequestOrganizationRequest,
    ) -> ApiResult<OrganizationRequest> {
        request.validate()?;

        let row = sqlx::query_as::<_, OrganizationRequest>(
            r#"
            INSERT INTO organization_requests (user_id, user_email, name, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user.user_id)
        .bind(&user.email)
        .bind(request.name.trim())
        .bind(request.message.as_deref().map(str::trim))
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(request_id = %row.id, user_id = %user.user_id, "organization request recorded");

        Ok(row)
    }

    pub async fn list_requests(
        &self,
        user: &AuthenticatedUser,
    ) -> ApiResult<Vec<OrganizationRequest>> {
        if !user.role.is_staff() {
            return Err(ApiError::Forbidden(
                "No tienes permisos para ver solicitudes de agencias".to_string(),
            ));
        }

        let rows = sqlx::query_as::<_, OrganizationRequest>(
            "SELECT * FROM organization_requests ORDER BY created_at DESC",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(rows)
    }

    /// Create the organization at the identity provider and remember its
    /// external id on the local row when one exists.
    pub async fn create_identity_org(
        &self,
        user: &AuthenticatedUser,
        request: CreateIdentityOrgRequest,
    ) -> ApiResult<String> {
        if !user.role.is_staff() {
            return Err(ApiError::Forbidden(
                "No tienes permisos para crear organizaciones".to_string(),
            ));
        }
        request.validate()?;

        let external_id = self
            .identity
            .create_organization(request.name.trim(), request.owner_id)
            .await?;

        sqlx::query(
            r#"
            UPDATE organizations
            SET metadata = metadata || jsonb_build_object('clerk_org_id', $2::text),
                updated_at = NOW()
            WHERE owner_id = $1
            "#,
        )
        .bind(request.owner_id)
        .bind(&external_id)
        .execute(&self.db_pool)
        .await?;

        tracing::info!(owner_id = %request.owner_id, external_id = %external_id, "identity organization created");

        Ok(external_id)
    }

    /// Slug with a random suffix when the plain one is taken.
    async fn unique_slug(&self, name: &str) -> ApiResult<String> {
        let base = match slugify(name) {
            s if s.is_empty() => "agencia".to_string(),
            s => s,
        };

        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM organizations WHERE slug = $1)")
                .bind(&base)
                .fetch_one(&self.db_pool)
                .await?;

        if !taken {
            return Ok(base);
        }

        let suffix = Uuid::new_v4().simple().to_string();
        Ok(format!("{}-{}", base, &suffix[..8]))
    }
}

/// Plan-level feature flags stored on the organization row.
fn plan_settings(plan: PlanTier) -> serde_json::Value {
    match plan {
        PlanTier::Free => json!({
            "max_team_members": 1,
            "analytics": false,
            "priority_support": false,
        }),
        PlanTier::Basic => json!({
            "max_team_members": 3,
            "analytics": false,
            "priority_support": false,
        }),
        PlanTier::Premium => json!({
            "max_team_members": 10,
            "analytics": true,
            "priority_support": true,
        }),
        PlanTier::Enterprise => json!({
            "max_team_members": 50,
            "analytics": true,
            "priority_support": true,
        }),
    }
}
