//! Role model and capability checks.
//!
//! Token issuance and verification live outside this service; upstream
//! middleware authenticates the caller and installs an [`AuthContext`]
//! request extension. This module only answers "is this action permitted
//! for this role".

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Closed set of user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Employee,
    Driver,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Driver => "driver",
            Role::Customer => "customer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            "driver" => Some(Role::Driver),
            "customer" => Some(Role::Customer),
            _ => None,
        }
    }
}

/// Returns whether `role` is one of the roles permitted for an action.
pub fn role_allowed(role: Role, required: &[Role]) -> bool {
    required.contains(&role)
}

/// Authenticated caller identity, installed as a request extension by the
/// external authentication middleware.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ServiceError::Forbidden("missing authentication context".to_string()))
    }
}
