//! Shared data models for the Inmovia backend

use serde::{Deserialize, Serialize};

/// User roles carried by identity-provider session claims
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Partner,
    Helpdesk,
    Admin,
    Superadmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Partner => "partner",
            UserRole::Helpdesk => "helpdesk",
            UserRole::Admin => "admin",
            UserRole::Superadmin => "superadmin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(UserRole::User),
            "partner" => Some(UserRole::Partner),
            "helpdesk" => Some(UserRole::Helpdesk),
            "admin" => Some(UserRole::Admin),
            "superadmin" => Some(UserRole::Superadmin),
            _ => None,
        }
    }

    /// Admin or superadmin
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Superadmin)
    }

    /// Staff plus helpdesk
    pub fn is_support(&self) -> bool {
        matches!(
            self,
            UserRole::Admin | UserRole::Superadmin | UserRole::Helpdesk
        )
    }
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Pagination parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            UserRole::User,
            UserRole::Partner,
            UserRole::Helpdesk,
            UserRole::Admin,
            UserRole::Superadmin,
        ] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str("owner"), None);
    }

    #[test]
    fn test_role_gates() {
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Superadmin.is_staff());
        assert!(!UserRole::Helpdesk.is_staff());
        assert!(UserRole::Helpdesk.is_support());
        assert!(!UserRole::Partner.is_support());
    }
}
