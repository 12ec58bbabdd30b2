//! Inmovia backend library
//!
//! Partner credit workflow, verification, support messaging, service orders,
//! organizations and payment processing for the Inmovia marketplace.

pub mod auth;
pub mod config;
pub mod credits;
pub mod db;
pub mod error;
pub mod handlers;
pub mod messaging;
pub mod middleware;
pub mod models;
pub mod orders;
pub mod organizations;
pub mod payments;
pub mod routes;
pub mod state;
pub mod verification;
