//! Mapping from the domain error taxonomy to HTTP responses.
//!
//! 4xx variants carry their own safe message; 5xx-equivalent failures are
//! logged in full and surface as an opaque body.

use actix_web::{http::StatusCode, HttpResponse};
use validator::ValidationErrors;

use kg_core::errors::{AuthError, DomainError, StoreError, TokenError};
use kg_shared::types::response::ErrorResponse;

/// Render a domain error as an HTTP response
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let (status, code) = match &error {
        DomainError::Auth(AuthError::InvalidCredentials) => {
            (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
        }
        DomainError::Auth(AuthError::EmailAlreadyRegistered) => {
            (StatusCode::CONFLICT, "EMAIL_ALREADY_REGISTERED")
        }
        DomainError::Token(TokenError::InvalidToken) => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
        DomainError::Token(TokenError::TokenExpired) => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
        // reuse keeps its own code; upstream revocation hangs off this signal
        DomainError::Token(TokenError::TokenReuseDetected) => {
            (StatusCode::UNAUTHORIZED, "TOKEN_REUSE_DETECTED")
        }
        DomainError::Token(TokenError::TokenGenerationFailed) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        DomainError::Store(StoreError::Unavailable { .. }) => {
            (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
        }
        DomainError::Store(StoreError::Conflict { .. }) => (StatusCode::CONFLICT, "CONFLICT"),
        DomainError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };

    let message = if status.is_server_error() {
        tracing::error!("API error: {}", error);
        if status == StatusCode::SERVICE_UNAVAILABLE {
            "Service temporarily unavailable".to_string()
        } else {
            "An internal error occurred".to_string()
        }
    } else {
        error.to_string()
    };

    HttpResponse::build(status).json(ErrorResponse::new(code, message))
}

/// Render request-body validation failures as a 400
pub fn handle_validation_errors(errors: ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new("VALIDATION_ERROR", errors.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                DomainError::Auth(AuthError::InvalidCredentials),
                StatusCode::UNAUTHORIZED,
            ),
            (
                DomainError::Token(TokenError::TokenReuseDetected),
                StatusCode::UNAUTHORIZED,
            ),
            (
                DomainError::NotFound {
                    resource: "user".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::Store(StoreError::Unavailable {
                    message: "down".to_string(),
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                DomainError::Internal {
                    message: "secret detail".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(handle_domain_error(error).status(), expected);
        }
    }
}
