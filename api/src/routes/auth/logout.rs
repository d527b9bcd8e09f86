//! Logout endpoint.

use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{LogoutRequest, LogoutResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use kg_core::repositories::{TokenRepository, UserRepository};
use kg_core::services::storage::FileStorage;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented refresh token without issuing a successor.
///
/// # Errors
/// - 400 Bad Request: missing refresh token
/// - 404 Not Found: token unknown or already revoked
pub async fn logout<U, T, F>(
    state: web::Data<AppState<U, T, F>>,
    request: web::Json<LogoutRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    F: FileStorage + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state.auth_service.logout(&request.refresh_token).await {
        Ok(()) => HttpResponse::Ok().json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
        Err(error) => handle_domain_error(error),
    }
}
