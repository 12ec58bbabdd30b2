//! Authentication extractors
//!
//! Identity is resolved exactly once per request: the `AuthenticatedUser`
//! extractor verifies the bearer token and yields an explicit auth context
//! (user id, role, name, email) that handlers pass down to the services.
//! Role-gated wrappers build on it.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{verify_token, AuthService, JwtError};
use crate::error::ApiError;
use crate::models::UserRole;

/// Authenticated user extracted from the session token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: UserRole,
    pub name: String,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ApiError::Unauthorized(
                        "Se requiere un token de sesión en el encabezado Authorization".to_string(),
                    )
                    .into_response()
                })?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        let claims = verify_token(bearer.token(), auth_service.jwt_secret()).map_err(|e| {
            let message = match e {
                JwtError::TokenExpired => "La sesión ha expirado",
                _ => "Token de sesión inválido",
            };
            ApiError::Unauthorized(message.to_string()).into_response()
        })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            ApiError::Unauthorized("Token de sesión inválido".to_string()).into_response()
        })?;

        let role = UserRole::from_str(&claims.role).ok_or_else(|| {
            ApiError::Unauthorized("Rol desconocido en el token de sesión".to_string())
                .into_response()
        })?;

        Ok(AuthenticatedUser {
            user_id,
            role,
            name: claims.name,
            email: claims.email,
        })
    }
}

fn forbidden() -> Response {
    ApiError::Forbidden("No tienes permisos para realizar esta acción".to_string()).into_response()
}

/// Requires the partner role
pub struct PartnerUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for PartnerUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !matches!(user.role, UserRole::Partner) {
            return Err(forbidden());
        }

        Ok(PartnerUser(user))
    }
}

/// Requires admin or superadmin
pub struct StaffUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for StaffUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !user.role.is_staff() {
            return Err(forbidden());
        }

        Ok(StaffUser(user))
    }
}

/// Requires superadmin
pub struct SuperadminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for SuperadminUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !matches!(user.role, UserRole::Superadmin) {
            return Err(forbidden());
        }

        Ok(SuperadminUser(user))
    }
}

/// Requires admin, superadmin or helpdesk
pub struct SupportUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for SupportUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !user.role.is_support() {
            return Err(forbidden());
        }

        Ok(SupportUser(user))
    }
}
