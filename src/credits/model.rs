//! Credit request and credit ledger models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Milliseconds in a day, used for cooldown math
pub const DAY_MS: i64 = 86_400_000;

/// Credit request status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "credit_request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CreditRequestStatus {
    Pending,
    Approved,
    Rejected,
    CounterOffer,
}

/// Partner credit request. Reviewed exactly once: status leaves `pending`
/// and never changes again.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct CreditRequest {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub partner_name: String,
    pub partner_email: String,
    pub amount: i64,
    pub reason: String,
    pub justification: String,
    pub status: CreditRequestStatus,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub review_notes: Option<String>,
    pub counter_offer_amount: Option<i64>,
}

/// Credit ledger entry. Append-only apart from redemption (`used`/`used_at`),
/// which belongs to the billing collaborator.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Credit {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub partner_name: String,
    pub amount: i64,
    pub reason: String,
    pub granted_by: Uuid,
    pub granted_by_name: String,
    pub created_at: DateTime<Utc>,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub request_id: Option<Uuid>,
    pub is_counter_offer: bool,
    pub original_amount: Option<i64>,
}

impl Credit {
    /// A credit counts as available iff it is unused and not expired
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        !self.used && self.expires_at.map_or(true, |expires| expires > now)
    }
}

/// Request DTO for submitting a credit request
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitCreditRequest {
    #[validate(range(min = 1, message = "El monto debe ser mayor a 0"))]
    pub amount: i64,
    #[validate(length(min = 1, message = "La razón es obligatoria"))]
    pub reason: String,
    #[validate(length(min = 1, message = "La justificación es obligatoria"))]
    pub justification: String,
}

/// Review decision for a pending credit request
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
    CounterOffer,
}

impl ReviewDecision {
    pub fn as_status(&self) -> CreditRequestStatus {
        match self {
            ReviewDecision::Approved => CreditRequestStatus::Approved,
            ReviewDecision::Rejected => CreditRequestStatus::Rejected,
            ReviewDecision::CounterOffer => CreditRequestStatus::CounterOffer,
        }
    }

    pub fn grants_credit(&self) -> bool {
        matches!(self, ReviewDecision::Approved | ReviewDecision::CounterOffer)
    }

    /// The ledger entry a decision produces, or `None` for a rejection.
    /// Counter-offers record the requested amount as `original_amount`.
    pub fn ledger_grant(&self, requested: i64, counter_amount: Option<i64>) -> Option<LedgerGrant> {
        if !self.grants_credit() {
            return None;
        }
        Some(LedgerGrant {
            amount: counter_amount.unwrap_or(requested),
            is_counter_offer: counter_amount.is_some(),
            original_amount: counter_amount.map(|_| requested),
        })
    }
}

/// Ledger entry derived from an accepting review decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerGrant {
    pub amount: i64,
    pub is_counter_offer: bool,
    pub original_amount: Option<i64>,
}

/// Request DTO for reviewing a credit request
#[derive(Debug, Deserialize)]
pub struct ReviewCreditRequest {
    pub decision: ReviewDecision,
    pub review_notes: Option<String>,
    pub expires_in_days: Option<i64>,
    pub counter_offer_amount: Option<i64>,
}

/// Request DTO for a direct admin grant
#[derive(Debug, Deserialize, Validate)]
pub struct GrantCreditRequest {
    #[validate(range(min = 1, message = "El monto debe ser mayor a 0"))]
    pub amount: i64,
    #[validate(length(min = 1, message = "La razón es obligatoria"))]
    pub reason: String,
    pub partner_name: String,
    pub expires_in_days: Option<i64>,
}

/// Query for listing credit requests
#[derive(Debug, Deserialize)]
pub struct ListCreditRequestsQuery {
    pub status: Option<CreditRequestStatus>,
}

/// Partner credit ledger with derived availability
#[derive(Debug, Serialize)]
pub struct CreditBalance {
    pub available: i64,
    pub credits: Vec<Credit>,
}

impl CreditBalance {
    pub fn from_ledger(credits: Vec<Credit>, now: DateTime<Utc>) -> Self {
        let available = credits
            .iter()
            .filter(|c| c.is_available(now))
            .map(|c| c.amount)
            .sum();
        Self { available, credits }
    }
}

/// Days left before a partner whose last request was rejected at
/// `reviewed_at` may submit again. `None` once the window has passed.
pub fn cooldown_days_remaining(
    reviewed_at: DateTime<Utc>,
    now: DateTime<Utc>,
    cooldown_days: i64,
) -> Option<i64> {
    let cooldown = Duration::days(cooldown_days);
    let elapsed = now - reviewed_at;
    if elapsed >= cooldown {
        return None;
    }
    let remaining_ms = (cooldown - elapsed).num_milliseconds();
    Some((remaining_ms + DAY_MS - 1) / DAY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credit(used: bool, expires_at: Option<DateTime<Utc>>, amount: i64) -> Credit {
        Credit {
            id: Uuid::new_v4(),
            partner_id: Uuid::new_v4(),
            partner_name: "Inmobiliaria Sol".to_string(),
            amount,
            reason: "ads".to_string(),
            granted_by: Uuid::new_v4(),
            granted_by_name: "Admin".to_string(),
            created_at: Utc::now(),
            used,
            used_at: None,
            expires_at,
            request_id: None,
            is_counter_offer: false,
            original_amount: None,
        }
    }

    #[test]
    fn test_credit_availability() {
        let now = Utc::now();
        assert!(credit(false, None, 100).is_available(now));
        assert!(credit(false, Some(now + Duration::days(1)), 100).is_available(now));
        assert!(!credit(false, Some(now - Duration::seconds(1)), 100).is_available(now));
        assert!(!credit(true, None, 100).is_available(now));
    }

    #[test]
    fn test_balance_sums_only_available() {
        let now = Utc::now();
        let ledger = vec![
            credit(false, None, 5000),
            credit(true, None, 2000),
            credit(false, Some(now - Duration::days(1)), 1000),
            credit(false, Some(now + Duration::days(30)), 3000),
        ];
        let balance = CreditBalance::from_ledger(ledger, now);
        assert_eq!(balance.available, 8000);
        assert_eq!(balance.credits.len(), 4);
    }

    #[test]
    fn test_cooldown_expired_window() {
        let now = Utc::now();
        assert_eq!(
            cooldown_days_remaining(now - Duration::days(30), now, 30),
            None
        );
        assert_eq!(
            cooldown_days_remaining(now - Duration::days(45), now, 30),
            None
        );
    }

    #[test]
    fn test_cooldown_rounds_up_to_days() {
        let now = Utc::now();
        // 1 ms into the window leaves the full 30 days
        assert_eq!(
            cooldown_days_remaining(now - Duration::milliseconds(1), now, 30),
            Some(30)
        );
        // 29 days and change elapsed leaves 1 day
        assert_eq!(
            cooldown_days_remaining(now - Duration::days(29) - Duration::hours(12), now, 30),
            Some(1)
        );
    }
}
