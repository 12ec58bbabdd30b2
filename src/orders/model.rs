//! Service order models and the status state machine
//!
//! The lifecycle is forward-only: `pending → confirmed → in_progress →
//! completed`, with `cancelled` reachable from any non-terminal state. Every
//! status change goes through [`ServiceOrderStatus::transition`], which
//! rejects anything else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// Add-on services sold through the marketplace
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "service_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Photography,
    VirtualTour,
    LegalAdvice,
    HomeStaging,
    EnergyCertificate,
    Appraisal,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Photography => "photography",
            ServiceType::VirtualTour => "virtual_tour",
            ServiceType::LegalAdvice => "legal_advice",
            ServiceType::HomeStaging => "home_staging",
            ServiceType::EnergyCertificate => "energy_certificate",
            ServiceType::Appraisal => "appraisal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "photography" => Some(ServiceType::Photography),
            "virtual_tour" => Some(ServiceType::VirtualTour),
            "legal_advice" => Some(ServiceType::LegalAdvice),
            "home_staging" => Some(ServiceType::HomeStaging),
            "energy_certificate" => Some(ServiceType::EnergyCertificate),
            "appraisal" => Some(ServiceType::Appraisal),
            _ => None,
        }
    }
}

/// Service order status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "service_order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceOrderStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl ServiceOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceOrderStatus::Pending => "pending",
            ServiceOrderStatus::Confirmed => "confirmed",
            ServiceOrderStatus::InProgress => "in_progress",
            ServiceOrderStatus::Completed => "completed",
            ServiceOrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ServiceOrderStatus::Completed | ServiceOrderStatus::Cancelled
        )
    }

    /// Apply a lifecycle event, validating that it is legal from the current
    /// state
    pub fn transition(self, event: OrderEvent) -> Result<ServiceOrderStatus, InvalidTransition> {
        use ServiceOrderStatus::*;

        let next = match (self, event) {
            (Pending, OrderEvent::Confirm) => Confirmed,
            (Confirmed, OrderEvent::Start) => InProgress,
            (InProgress, OrderEvent::Complete) => Completed,
            (Pending | Confirmed | InProgress, OrderEvent::Cancel) => Cancelled,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

/// Lifecycle events applied to a service order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    Confirm,
    Start,
    Complete,
    Cancel,
}

impl OrderEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderEvent::Confirm => "confirm",
            OrderEvent::Start => "start",
            OrderEvent::Complete => "complete",
            OrderEvent::Cancel => "cancel",
        }
    }
}

/// Rejected lifecycle event
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("El pedido en estado '{}' no admite la operación '{}'", from.as_str(), event.as_str())]
pub struct InvalidTransition {
    pub from: ServiceOrderStatus,
    pub event: OrderEvent,
}

/// Service order model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct ServiceOrder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_type: ServiceType,
    pub service_name: String,
    pub service_description: Option<String>,
    pub property_address: String,
    pub contact_phone: String,
    pub preferred_date: Option<DateTime<Utc>>,
    pub special_requests: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: ServiceOrderStatus,
    pub stripe_payment_intent_id: Option<String>,
    pub stripe_session_id: Option<String>,
    pub customer_email: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub actual_delivery: Option<DateTime<Utc>>,
    pub assigned_to: Option<Uuid>,
    pub deliverables: Vec<String>,
    pub notes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a service order. The webhook-confirmation path
/// builds this same DTO from checkout metadata, so both creation paths share
/// one validator.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub service_type: ServiceType,
    #[validate(length(min = 1, message = "El nombre del servicio es obligatorio"))]
    pub service_name: String,
    pub service_description: Option<String>,
    #[validate(length(min = 1, message = "La dirección de la propiedad es obligatoria"))]
    pub property_address: String,
    #[validate(length(min = 1, message = "El teléfono de contacto es obligatorio"))]
    pub contact_phone: String,
    pub preferred_date: Option<DateTime<Utc>>,
    pub special_requests: Option<String>,
    #[validate(range(min = 1, message = "El monto debe ser mayor a 0"))]
    pub amount: i64,
    pub currency: Option<String>,
    pub stripe_session_id: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
}

/// Request DTO for completing an order
#[derive(Debug, Deserialize, Default)]
pub struct CompleteOrderRequest {
    pub deliverables: Option<Vec<String>>,
}

/// Request DTO for appending a note
#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    pub note: String,
}

/// Request DTO for assigning an order
#[derive(Debug, Deserialize)]
pub struct AssignOrderRequest {
    pub assigned_to: Uuid,
    pub estimated_delivery: Option<DateTime<Utc>>,
}

/// Query for listing orders
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<ServiceOrderStatus>,
}

/// Read-side aggregation over service orders
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct OrderStats {
    pub active_orders: i64,
    pub completed_orders: i64,
    pub total_amount: i64,
    pub orders_this_month: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let status = ServiceOrderStatus::Pending;
        let status = status.transition(OrderEvent::Confirm).unwrap();
        assert_eq!(status, ServiceOrderStatus::Confirmed);
        let status = status.transition(OrderEvent::Start).unwrap();
        assert_eq!(status, ServiceOrderStatus::InProgress);
        let status = status.transition(OrderEvent::Complete).unwrap();
        assert_eq!(status, ServiceOrderStatus::Completed);
    }

    #[test]
    fn test_cancel_from_non_terminal_states() {
        for status in [
            ServiceOrderStatus::Pending,
            ServiceOrderStatus::Confirmed,
            ServiceOrderStatus::InProgress,
        ] {
            assert_eq!(
                status.transition(OrderEvent::Cancel).unwrap(),
                ServiceOrderStatus::Cancelled
            );
        }
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for status in [ServiceOrderStatus::Completed, ServiceOrderStatus::Cancelled] {
            for event in [
                OrderEvent::Confirm,
                OrderEvent::Start,
                OrderEvent::Complete,
                OrderEvent::Cancel,
            ] {
                assert!(status.transition(event).is_err());
            }
        }
    }

    #[test]
    fn test_no_skipping_states() {
        assert!(ServiceOrderStatus::Pending
            .transition(OrderEvent::Start)
            .is_err());
        assert!(ServiceOrderStatus::Pending
            .transition(OrderEvent::Complete)
            .is_err());
        assert!(ServiceOrderStatus::Confirmed
            .transition(OrderEvent::Complete)
            .is_err());
        assert!(ServiceOrderStatus::Confirmed
            .transition(OrderEvent::Confirm)
            .is_err());
    }

    #[test]
    fn test_service_type_round_trip() {
        for ty in [
            ServiceType::Photography,
            ServiceType::VirtualTour,
            ServiceType::LegalAdvice,
            ServiceType::HomeStaging,
            ServiceType::EnergyCertificate,
            ServiceType::Appraisal,
        ] {
            assert_eq!(ServiceType::from_str(ty.as_str()), Some(ty));
        }
        assert_eq!(ServiceType::from_str("plumbing"), None);
    }
}
