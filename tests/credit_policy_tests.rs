//! Credit Policy Tests
//!
//! These tests validate the rejection cooldown arithmetic and ledger
//! availability rules that back the credit request workflow.

use chrono::{Duration, TimeZone, Utc};
use inmovia_server::credits::{
    cooldown_days_remaining, Credit, CreditBalance, CreditRequestStatus, LedgerGrant,
    ReviewDecision,
};
use uuid::Uuid;

fn credit(amount: i64, used: bool, expires_in_days: Option<i64>) -> Credit {
    let now = Utc::now();
    Credit {
        id: Uuid::new_v4(),
        partner_id: Uuid::new_v4(),
        partner_name: "Inmobiliaria Norte".to_string(),
        amount,
        reason: "Campaña de lanzamiento".to_string(),
        granted_by: Uuid::new_v4(),
        granted_by_name: "Admin".to_string(),
        created_at: now,
        used,
        used_at: if used { Some(now) } else { None },
        expires_at: expires_in_days.map(|d| now + Duration::days(d)),
        request_id: None,
        is_counter_offer: false,
        original_amount: None,
    }
}

// ============================================================================
// Cooldown Arithmetic
// ============================================================================

#[test]
fn test_cooldown_active_right_after_rejection() {
    let reviewed = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let now = reviewed + Duration::hours(1);

    assert_eq!(cooldown_days_remaining(reviewed, now, 30), Some(30));
}

#[test]
fn test_cooldown_partial_days_round_up() {
    let reviewed = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    // 29 days and 1 hour remaining still reports 30 days
    let now = reviewed + Duration::days(1) - Duration::hours(1);
    assert_eq!(cooldown_days_remaining(reviewed, now, 30), Some(30));

    // Exactly mid-window: half the days remain
    let now = reviewed + Duration::days(15);
    assert_eq!(cooldown_days_remaining(reviewed, now, 30), Some(15));
}

#[test]
fn test_cooldown_last_moments() {
    let reviewed = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    let now = reviewed + Duration::days(30) - Duration::seconds(1);
    assert_eq!(cooldown_days_remaining(reviewed, now, 30), Some(1));
}

#[test]
fn test_cooldown_expired() {
    let reviewed = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    let now = reviewed + Duration::days(30);
    assert_eq!(cooldown_days_remaining(reviewed, now, 30), None);

    let now = reviewed + Duration::days(120);
    assert_eq!(cooldown_days_remaining(reviewed, now, 30), None);
}

#[test]
fn test_cooldown_respects_configured_length() {
    let reviewed = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let now = reviewed + Duration::days(5);

    assert_eq!(cooldown_days_remaining(reviewed, now, 7), Some(2));
    assert_eq!(cooldown_days_remaining(reviewed, now, 5), None);
}

// ============================================================================
// Ledger Availability
// ============================================================================

#[test]
fn test_used_credits_excluded_from_balance() {
    let now = Utc::now();
    let balance = CreditBalance::from_ledger(
        vec![credit(5000, false, None), credit(3000, true, None)],
        now,
    );

    assert_eq!(balance.available, 5000);
    assert_eq!(balance.credits.len(), 2);
}

#[test]
fn test_expired_credits_excluded_from_balance() {
    let now = Utc::now();
    let balance = CreditBalance::from_ledger(
        vec![credit(5000, false, Some(10)), credit(2000, false, Some(-1))],
        now,
    );

    assert_eq!(balance.available, 5000);
}

#[test]
fn test_credit_without_expiry_never_expires() {
    let far_future = Utc::now() + Duration::days(365 * 10);
    assert!(credit(1000, false, None).is_available(far_future));
}

#[test]
fn test_empty_ledger() {
    let balance = CreditBalance::from_ledger(Vec::new(), Utc::now());
    assert_eq!(balance.available, 0);
    assert!(balance.credits.is_empty());
}

// ============================================================================
// Review Decision → Ledger Entry
// ============================================================================

#[test]
fn test_rejection_produces_no_ledger_entry() {
    assert_eq!(ReviewDecision::Rejected.ledger_grant(5000, None), None);
    assert_eq!(
        ReviewDecision::Rejected.as_status(),
        CreditRequestStatus::Rejected
    );
}

#[test]
fn test_approval_grants_exactly_the_requested_amount() {
    assert_eq!(
        ReviewDecision::Approved.ledger_grant(5000, None),
        Some(LedgerGrant {
            amount: 5000,
            is_counter_offer: false,
            original_amount: None,
        })
    );
}

#[test]
fn test_counter_offer_grants_counter_amount_and_records_original() {
    assert_eq!(
        ReviewDecision::CounterOffer.ledger_grant(5000, Some(3000)),
        Some(LedgerGrant {
            amount: 3000,
            is_counter_offer: true,
            original_amount: Some(5000),
        })
    );
}

#[test]
fn test_every_accepting_decision_grants_credit() {
    assert!(ReviewDecision::Approved.grants_credit());
    assert!(ReviewDecision::CounterOffer.grants_credit());
    assert!(!ReviewDecision::Rejected.grants_credit());
}

#[test]
fn test_decision_status_mapping() {
    assert_eq!(
        ReviewDecision::Approved.as_status(),
        CreditRequestStatus::Approved
    );
    assert_eq!(
        ReviewDecision::CounterOffer.as_status(),
        CreditRequestStatus::CounterOffer
    );
}
