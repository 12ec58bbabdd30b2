//! Partner verification models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Verification status. `not_started` is the implicit state of a partner with
/// no stored submission; it is never written to the database.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "verification_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    NotStarted,
    Pending,
    InReview,
    Verified,
    Rejected,
    ResubmitRequired,
}

impl VerificationStatus {
    /// Statuses an admin review may set
    pub fn is_reviewable(&self) -> bool {
        matches!(
            self,
            VerificationStatus::InReview
                | VerificationStatus::Verified
                | VerificationStatus::Rejected
                | VerificationStatus::ResubmitRequired
        )
    }
}

/// One verification document per partner, keyed by partner id
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct PartnerVerification {
    pub partner_id: Uuid,
    pub partner_name: String,
    pub partner_email: String,
    pub status: VerificationStatus,
    pub documents: serde_json::Value,
    pub bank_info: serde_json::Value,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub review_notes: Option<String>,
}

/// Status view returned to partners; defaults to `not_started` when no
/// submission exists
#[derive(Debug, Serialize)]
pub struct VerificationStatusView {
    pub partner_id: Uuid,
    pub status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
}

impl VerificationStatusView {
    pub fn not_started(partner_id: Uuid) -> Self {
        Self {
            partner_id,
            status: VerificationStatus::NotStarted,
            submitted_at: None,
            reviewed_at: None,
            review_notes: None,
        }
    }
}

impl From<PartnerVerification> for VerificationStatusView {
    fn from(v: PartnerVerification) -> Self {
        Self {
            partner_id: v.partner_id,
            status: v.status,
            submitted_at: Some(v.submitted_at),
            reviewed_at: v.reviewed_at,
            review_notes: v.review_notes,
        }
    }
}

/// Request DTO for submitting verification documents
#[derive(Debug, Deserialize)]
pub struct SubmitVerificationRequest {
    pub documents: Option<serde_json::Value>,
    pub bank_info: Option<serde_json::Value>,
}

/// Request DTO for an admin review
#[derive(Debug, Deserialize)]
pub struct ReviewVerificationRequest {
    pub status: VerificationStatus,
    pub review_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reviewable_statuses() {
        assert!(VerificationStatus::InReview.is_reviewable());
        assert!(VerificationStatus::Verified.is_reviewable());
        assert!(VerificationStatus::Rejected.is_reviewable());
        assert!(VerificationStatus::ResubmitRequired.is_reviewable());
        assert!(!VerificationStatus::Pending.is_reviewable());
        assert!(!VerificationStatus::NotStarted.is_reviewable());
    }
}
