//! Partner verification workflow

pub mod model;
pub mod service;

pub use model::*;
pub use service::VerificationService;
