//! Current-user endpoint.

use actix_web::{web, HttpResponse};

use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use kg_core::repositories::{TokenRepository, UserRepository};
use kg_core::services::storage::FileStorage;

use super::AppState;

/// Handler for GET /api/v1/auth/me
///
/// Returns the authenticated user's account, with the profile picture
/// resolved to a short-lived signed URL when one is stored.
///
/// # Errors
/// - 401 Unauthorized: missing, invalid, or expired bearer token
pub async fn me<U, T, F>(state: web::Data<AppState<U, T, F>>, auth: AuthContext) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    F: FileStorage + 'static,
{
    match state.account_service.me(auth.user_id).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(error) => handle_domain_error(error),
    }
}
