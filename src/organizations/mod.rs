//! Agency (organization) accounts

pub mod identity;
pub mod model;
pub mod service;

pub use identity::{ClerkClient, IdentityProvider};
pub use model::*;
pub use service::OrganizationService;
