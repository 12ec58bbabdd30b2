//! Auth service holding the verification secret

/// Verifies identity-provider session tokens for request extractors
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}
