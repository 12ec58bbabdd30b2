//! Identity verification
//!
//! Inmovia does not manage accounts or passwords; sessions are issued by the
//! external identity provider. This module only verifies the session token
//! claims that arrive with each request.

pub mod jwt;
pub mod service;

pub use jwt::{issue_token, verify_token, Claims, JwtError};
pub use service::AuthService;
