use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error payload returned to HTTP clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Unprocessable Entity")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// Unified error type for all service operations.
///
/// Every operation returns these as typed results; nothing is panicked
/// across the service/boundary seam. `status_code` is the single source of
/// truth for the transport mapping.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::error::DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Product {0} not found")]
    ProductNotFound(Uuid),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Capacity exceeded: requested {requested}, short by {deficit}")]
    CapacityExceeded {
        requested: Decimal,
        deficit: Decimal,
    },

    #[error("No warehouse can fulfill {requested} of product {product_id}")]
    NoWarehouseAvailable {
        product_id: Uuid,
        requested: Decimal,
    },

    #[error("Invalid order transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Driver {0} has no vehicle assigned")]
    NoVehicleAssigned(Uuid),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) | Self::EventError(_) | Self::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) | Self::ProductNotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::NoVehicleAssigned(_) => StatusCode::BAD_REQUEST,
            Self::InsufficientStock { .. } | Self::CapacityExceeded { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::NoWarehouseAvailable { .. } | Self::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Returns the error message suitable for HTTP responses. Internal
    /// errors return generic messages to avoid leaking implementation
    /// details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::EventError(_) | Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn status_mapping_is_deterministic() {
        assert_eq!(
            ServiceError::NotFound("order".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::InsufficientStock {
                requested: dec!(100),
                available: dec!(20),
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::InvalidTransition {
                from: "pending".into(),
                to: "delivered".into(),
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Forbidden("role".into()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn insufficient_stock_reports_available_amount() {
        let err = ServiceError::InsufficientStock {
            requested: dec!(50),
            available: dec!(12.5),
        };
        assert!(err.to_string().contains("12.5"));
    }

    #[test]
    fn internal_errors_are_not_leaked() {
        let err = ServiceError::InternalError("pool exhausted at worker 3".into());
        assert_eq!(err.response_message(), "Internal server error");
    }
}
