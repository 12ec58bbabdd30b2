//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthService;
use crate::credits::CreditService;
use crate::messaging::MessagingService;
use crate::orders::OrderService;
use crate::organizations::OrganizationService;
use crate::payments::PaymentService;
use crate::verification::VerificationService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub credit_service: Arc<CreditService>,
    pub verification_service: Arc<VerificationService>,
    pub messaging_service: Arc<MessagingService>,
    pub order_service: Arc<OrderService>,
    pub organization_service: Arc<OrganizationService>,
    pub payment_service: Arc<PaymentService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        credit_service: Arc<CreditService>,
        verification_service: Arc<VerificationService>,
        messaging_service: Arc<MessagingService>,
        order_service: Arc<OrderService>,
        organization_service: Arc<OrganizationService>,
        payment_service: Arc<PaymentService>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        Self {
            credit_service,
            verification_service,
            messaging_service,
            order_service,
            organization_service,
            payment_service,
            auth_service,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<CreditService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.credit_service.clone()
    }
}

impl FromRef<AppState> for Arc<OrderService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.order_service.clone()
    }
}
