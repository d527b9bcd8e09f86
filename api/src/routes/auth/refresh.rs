//! Token refresh endpoint.

use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{AuthResponse, RefreshTokenRequest};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use kg_core::repositories::{TokenRepository, UserRepository};
use kg_core::services::storage::FileStorage;

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a valid refresh token for a new pair. The presented token is
/// consumed by the rotation: using it a second time is reported as reuse.
///
/// # Errors
/// - 400 Bad Request: missing refresh token
/// - 401 Unauthorized: invalid, expired, or reused refresh token (the body
///   distinguishes `TOKEN_REUSE_DETECTED` from the other failures)
pub async fn refresh<U, T, F>(
    state: web::Data<AppState<U, T, F>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    F: FileStorage + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state.auth_service.refresh(&request.refresh_token).await {
        Ok(payload) => HttpResponse::Ok().json(AuthResponse::from(payload)),
        Err(error) => handle_domain_error(error),
    }
}
