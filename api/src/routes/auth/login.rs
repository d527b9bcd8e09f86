//! Login endpoint.

use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{AuthResponse, LoginRequest};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use kg_core::repositories::{TokenRepository, UserRepository};
use kg_core::services::storage::FileStorage;

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Verifies the credentials and returns the public profile together with a
/// fresh access/refresh pair.
///
/// # Errors
/// - 400 Bad Request: missing or malformed email/password
/// - 401 Unauthorized: unknown email or wrong password (indistinguishable)
pub async fn login<U, T, F>(
    state: web::Data<AppState<U, T, F>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    F: FileStorage + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .auth_service
        .login(&request.email, &request.password)
        .await
    {
        Ok(payload) => HttpResponse::Ok().json(AuthResponse::from(payload)),
        Err(error) => handle_domain_error(error),
    }
}
