//! Organization models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

/// Subscription plan tiers
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "plan_tier", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Free,
    Basic,
    Premium,
    Enterprise,
}

impl PlanTier {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(PlanTier::Free),
            "basic" => Some(PlanTier::Basic),
            "premium" => Some(PlanTier::Premium),
            "enterprise" => Some(PlanTier::Enterprise),
            _ => None,
        }
    }
}

/// Organization status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "organization_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrganizationStatus {
    Active,
    Suspended,
}

/// Credit allotments bundled with a plan
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct OrganizationCredits {
    pub properties: i32,
    pub premium_features: i32,
    pub service_credits: i32,
}

impl OrganizationCredits {
    /// Allotments included with each plan tier
    pub fn for_plan(plan: PlanTier) -> Self {
        match plan {
            PlanTier::Free => Self {
                properties: 1,
                premium_features: 0,
                service_credits: 0,
            },
            PlanTier::Basic => Self {
                properties: 10,
                premium_features: 5,
                service_credits: 1,
            },
            PlanTier::Premium => Self {
                properties: 50,
                premium_features: 20,
                service_credits: 3,
            },
            PlanTier::Enterprise => Self {
                properties: 500,
                premium_features: 100,
                service_credits: 10,
            },
        }
    }
}

/// Agency account. One per owning user in practice; upgrades mutate the row
/// in place rather than creating a new one.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub owner_id: Uuid,
    pub plan: PlanTier,
    pub status: OrganizationStatus,
    pub settings: Json<serde_json::Value>,
    pub credits: Json<OrganizationCredits>,
    pub metadata: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Organization request status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "organization_request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrganizationRequestStatus {
    Pending,
    Processed,
}

/// User-submitted request for an organization account
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct OrganizationRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub name: String,
    pub message: Option<String>,
    pub status: OrganizationRequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for `POST /organizations/request`
#[derive(Debug, Deserialize, Validate)]
pub struct RequestOrganizationRequest {
    #[validate(length(min = 1, message = "El nombre de la agencia es obligatorio"))]
    pub name: String,
    pub message: Option<String>,
}

/// Request DTO for creating an organization from a checkout session id
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFromPaymentRequest {
    #[validate(length(min = 1, message = "El identificador de sesión es obligatorio"))]
    pub session_id: String,
}

/// Request DTO for creating an organization at the identity provider
#[derive(Debug, Deserialize, Validate)]
pub struct CreateIdentityOrgRequest {
    #[validate(length(min = 1, message = "El nombre de la agencia es obligatorio"))]
    pub name: String,
    pub owner_id: Uuid,
}

/// Build a URL-safe slug from an organization name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Inmobiliaria Sol y Mar"), "inmobiliaria-sol-y-mar");
        assert_eq!(slugify("  Casas & Pisos  "), "casas-pisos");
        assert_eq!(slugify("Ático 21"), "tico-21");
    }

    #[test]
    fn test_plan_credits_scale_with_tier() {
        let free = OrganizationCredits::for_plan(PlanTier::Free);
        let premium = OrganizationCredits::for_plan(PlanTier::Premium);
        assert!(premium.properties > free.properties);
        assert!(premium.service_credits > free.service_credits);
    }

    #[test]
    fn test_plan_from_str() {
        assert_eq!(PlanTier::from_str("premium"), Some(PlanTier::Premium));
        assert_eq!(PlanTier::from_str("gold"), None);
    }
}
