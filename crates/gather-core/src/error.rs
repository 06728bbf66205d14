//! Error types module
//!
//! All failures are unified under the `AppError` enum: database errors,
//! business-rule violations (capacity, duplicate registration, booking state),
//! validation failures, and payment-provider errors. The `ErrorMetadata` trait
//! lets each variant self-describe how it renders over HTTP: status code, a
//! stable machine-readable code (`EVENT_002`, `REG_001`, ...), a client-safe
//! message, and a log level.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx`
//! feature so the crate can be used without a database driver.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors like validation or business-rule failures
    Debug,
    /// Recoverable issues worth operator attention
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "EVENT_002")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Event is at capacity: {0}")]
    CapacityExceeded(String),

    #[error("Duplicate registration: {0}")]
    DuplicateRegistration(String),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("Invalid booking transition: {0}")]
    InvalidTransition(String),

    #[error("Organization not found: {0}")]
    OrganizationNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Payment provider error: {0}")]
    PaymentProvider(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Invalid input: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
/// `client_message` stays per-variant for dynamic content.
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Database(_) => (500, "GEN_500", true, LogLevel::Error),
        AppError::EventNotFound(_) => (404, "EVENT_001", false, LogLevel::Debug),
        AppError::CapacityExceeded(_) => (400, "EVENT_002", false, LogLevel::Debug),
        AppError::DuplicateRegistration(_) => (400, "REG_001", false, LogLevel::Debug),
        AppError::BookingNotFound(_) => (404, "BOOKING_001", false, LogLevel::Debug),
        AppError::InvalidTransition(_) => (400, "BOOKING_002", false, LogLevel::Debug),
        AppError::OrganizationNotFound(_) => (404, "ORG_001", false, LogLevel::Debug),
        AppError::UserNotFound(_) => (404, "USER_001", false, LogLevel::Debug),
        AppError::Validation(_) => (400, "GEN_001", false, LogLevel::Debug),
        AppError::Unauthorized(_) => (401, "AUTH_001", false, LogLevel::Debug),
        AppError::Forbidden(_) => (403, "AUTH_002", false, LogLevel::Debug),
        AppError::PaymentProvider(_) => (502, "PAY_001", true, LogLevel::Error),
        AppError::Internal(_) => (500, "GEN_500", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "GEN_500", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::EventNotFound(_) => "EventNotFound",
            AppError::CapacityExceeded(_) => "CapacityExceeded",
            AppError::DuplicateRegistration(_) => "DuplicateRegistration",
            AppError::BookingNotFound(_) => "BookingNotFound",
            AppError::InvalidTransition(_) => "InvalidTransition",
            AppError::OrganizationNotFound(_) => "OrganizationNotFound",
            AppError::UserNotFound(_) => "UserNotFound",
            AppError::Validation(_) => "Validation",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::PaymentProvider(_) => "PaymentProvider",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including the error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::PaymentProvider(_) => "Payment processing failed".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
            AppError::EventNotFound(msg)
            | AppError::CapacityExceeded(msg)
            | AppError::DuplicateRegistration(msg)
            | AppError::BookingNotFound(msg)
            | AppError::InvalidTransition(msg)
            | AppError::OrganizationNotFound(msg)
            | AppError::UserNotFound(msg)
            | AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_database() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::PoolClosed);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("pool closed".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "GEN_500");
        assert_eq!(err.client_message(), "A database error occurred");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_capacity_exceeded() {
        let err = AppError::CapacityExceeded("Event is fully booked".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "EVENT_002");
        assert_eq!(err.client_message(), "Event is fully booked");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_duplicate_registration() {
        let err = AppError::DuplicateRegistration("Already registered".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "REG_001");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_not_found_variants() {
        assert_eq!(
            AppError::EventNotFound("x".into()).error_code(),
            "EVENT_001"
        );
        assert_eq!(
            AppError::BookingNotFound("x".into()).error_code(),
            "BOOKING_001"
        );
        assert_eq!(
            AppError::OrganizationNotFound("x".into()).error_code(),
            "ORG_001"
        );
        assert_eq!(AppError::UserNotFound("x".into()).error_code(), "USER_001");
        for err in [
            AppError::EventNotFound("x".into()),
            AppError::BookingNotFound("x".into()),
            AppError::OrganizationNotFound("x".into()),
            AppError::UserNotFound("x".into()),
        ] {
            assert_eq!(err.http_status_code(), 404);
        }
    }

    #[test]
    fn test_error_metadata_payment_provider_is_sensitive() {
        let err = AppError::PaymentProvider("stripe 500".to_string());
        assert_eq!(err.http_status_code(), 502);
        assert_eq!(err.error_code(), "PAY_001");
        assert_eq!(err.client_message(), "Payment processing failed");
        assert!(err.is_sensitive());
    }

    #[test]
    fn test_validation_errors_convert() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert_eq!(err.error_code(), "GEN_001");
        assert_eq!(err.http_status_code(), 400);
    }
}
