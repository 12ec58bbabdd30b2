//! Purchased add-on services and their order lifecycle

pub mod model;
pub mod service;

pub use model::*;
pub use service::OrderService;
