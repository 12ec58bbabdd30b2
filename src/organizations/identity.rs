//! Identity provider organization sync (Clerk)

use axum::async_trait;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Abstraction over the identity provider's organization API. The production
/// implementation talks to Clerk; tests can substitute a stub.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an organization at the provider and return its external id.
    async fn create_organization(&self, name: &str, owner_id: Uuid) -> ApiResult<String>;
}

/// Clerk backoffice API client
pub struct ClerkClient {
    http: reqwest::Client,
    api_url: String,
    secret_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClerkOrganization {
    id: String,
}

impl ClerkClient {
    pub fn new(api_url: String, secret_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            secret_key,
        }
    }
}

#[async_trait]
impl IdentityProvider for ClerkClient {
    async fn create_organization(&self, name: &str, owner_id: Uuid) -> ApiResult<String> {
        let secret_key = self.secret_key.as_deref().ok_or_else(|| {
            ApiError::ServiceUnavailable(
                "El proveedor de identidad no está configurado".to_string(),
            )
        })?;

        let url = format!("{}/organizations", self.api_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(secret_key)
            .json(&json!({
                "name": name,
                "created_by": owner_id.to_string(),
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::ExternalServiceError(format!(
                "Clerk respondió {}",
                response.status()
            )));
        }

        let org = response.json::<ClerkOrganization>().await?;
        Ok(org.id)
    }
}
