//! Partner credit ledger and credit-request workflow

pub mod model;
pub mod service;

pub use model::*;
pub use service::CreditService;
