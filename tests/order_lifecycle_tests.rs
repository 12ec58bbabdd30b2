//! Service Order Lifecycle Tests
//!
//! These tests validate the order state machine against every event from
//! every state, including terminal states and cancellation windows.

use inmovia_server::orders::{OrderEvent, ServiceOrderStatus};

// ============================================================================
// Happy Path
// ============================================================================

#[test]
fn test_full_lifecycle() {
    let status = ServiceOrderStatus::Pending;
    let status = status.transition(OrderEvent::Confirm).unwrap();
    assert_eq!(status, ServiceOrderStatus::Confirmed);

    let status = status.transition(OrderEvent::Start).unwrap();
    assert_eq!(status, ServiceOrderStatus::InProgress);

    let status = status.transition(OrderEvent::Complete).unwrap();
    assert_eq!(status, ServiceOrderStatus::Completed);
    assert!(status.is_terminal());
}

// ============================================================================
// Cancellation Window
// ============================================================================

#[test]
fn test_cancellable_states() {
    for from in [
        ServiceOrderStatus::Pending,
        ServiceOrderStatus::Confirmed,
        ServiceOrderStatus::InProgress,
    ] {
        assert_eq!(
            from.transition(OrderEvent::Cancel).unwrap(),
            ServiceOrderStatus::Cancelled,
            "cancel should be allowed from {:?}",
            from
        );
    }
}

#[test]
fn test_terminal_states_reject_cancel() {
    for from in [ServiceOrderStatus::Completed, ServiceOrderStatus::Cancelled] {
        assert!(from.transition(OrderEvent::Cancel).is_err());
    }
}

// ============================================================================
// Invalid Transitions
// ============================================================================

#[test]
fn test_skipping_states_rejected() {
    // Cannot start or complete a pending order
    assert!(ServiceOrderStatus::Pending
        .transition(OrderEvent::Start)
        .is_err());
    assert!(ServiceOrderStatus::Pending
        .transition(OrderEvent::Complete)
        .is_err());

    // Cannot complete a confirmed order without starting it
    assert!(ServiceOrderStatus::Confirmed
        .transition(OrderEvent::Complete)
        .is_err());
}

#[test]
fn test_no_backwards_transitions() {
    assert!(ServiceOrderStatus::InProgress
        .transition(OrderEvent::Confirm)
        .is_err());
    assert!(ServiceOrderStatus::Completed
        .transition(OrderEvent::Start)
        .is_err());
}

#[test]
fn test_repeated_event_rejected() {
    let confirmed = ServiceOrderStatus::Pending
        .transition(OrderEvent::Confirm)
        .unwrap();
    assert!(confirmed.transition(OrderEvent::Confirm).is_err());
}

#[test]
fn test_invalid_transition_message_names_state_and_event() {
    let err = ServiceOrderStatus::Completed
        .transition(OrderEvent::Start)
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("completed"));
    assert!(message.contains("start"));
}

#[test]
fn test_terminal_flags() {
    assert!(!ServiceOrderStatus::Pending.is_terminal());
    assert!(!ServiceOrderStatus::Confirmed.is_terminal());
    assert!(!ServiceOrderStatus::InProgress.is_terminal());
    assert!(ServiceOrderStatus::Completed.is_terminal());
    assert!(ServiceOrderStatus::Cancelled.is_terminal());
}
