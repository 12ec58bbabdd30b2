//! Payment processor integration: webhook ingress and the Stripe API client

pub mod model;
pub mod service;
pub mod stripe;

pub use model::*;
pub use service::PaymentService;
pub use stripe::{verify_webhook_signature, SignatureError, StripeClient};
