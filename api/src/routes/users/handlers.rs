//! User management handlers: registration, lookup, profile pictures.

use actix_web::{http::header::CONTENT_TYPE, web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::dto::user::{RegisterRequest, UserDto};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};
use crate::middleware::auth::AuthContext;

use kg_core::repositories::{TokenRepository, UserRepository};
use kg_core::services::storage::FileStorage;
use kg_shared::types::response::ErrorResponse;

use super::AppState;

/// Handler for GET /api/v1/users
pub async fn list_users<U, T, F>(state: web::Data<AppState<U, T, F>>) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    F: FileStorage + 'static,
{
    match state.account_service.list_users().await {
        Ok(users) => {
            HttpResponse::Ok().json(users.into_iter().map(UserDto::from).collect::<Vec<_>>())
        }
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for GET /api/v1/users/{id}
pub async fn get_user<U, T, F>(
    state: web::Data<AppState<U, T, F>>,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    F: FileStorage + 'static,
{
    match state.account_service.get_user(path.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(UserDto::from(user)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/v1/users
///
/// Registers a new account.
///
/// # Errors
/// - 400 Bad Request: invalid name, email, or password
/// - 409 Conflict: email already registered
pub async fn register<U, T, F>(
    state: web::Data<AppState<U, T, F>>,
    request: web::Json<RegisterRequest>,
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
        .account_service
        .register(&request.name, &request.email, &request.password)
        .await
    {
        Ok(profile) => HttpResponse::Created().json(UserDto::from(profile)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/v1/users/{id}/profile-picture
///
/// Accepts the raw file bytes (capped by `MAX_UPLOAD_SIZE`) with the file
/// type taken from the Content-Type header. Users can only replace their
/// own picture.
///
/// # Errors
/// - 400 Bad Request: missing body, missing Content-Type, or disallowed type
/// - 401 Unauthorized: missing or invalid bearer token
/// - 403 Forbidden: attempting to change another user's picture
pub async fn update_profile_picture<U, T, F>(
    state: web::Data<AppState<U, T, F>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: HttpRequest,
    body: web::Bytes,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    F: FileStorage + 'static,
{
    let user_id = path.into_inner();
    if auth.user_id != user_id {
        return HttpResponse::Forbidden().json(ErrorResponse::new(
            "FORBIDDEN",
            "Cannot change another user's profile picture",
        ));
    }

    let content_type = match request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        Some(value) => value.to_string(),
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "VALIDATION_ERROR",
                "Content-Type header is required",
            ));
        }
    };

    match state
        .account_service
        .update_profile_picture(user_id, body.to_vec(), &content_type)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Profile picture updated"
        })),
        Err(error) => handle_domain_error(error),
    }
}
