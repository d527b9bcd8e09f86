//! JWT authentication middleware for protected endpoints.
//!
//! Extracts the bearer token from the Authorization header, verifies it
//! through the token codec, and injects an `AuthContext` into the request.
//! The three 401 outcomes - missing, invalid, expired - carry distinct
//! error codes so clients can react (e.g. trigger a refresh on expiry).

use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use kg_core::domain::entities::token::Claims;
use kg_core::errors::{DomainError, TokenError};
use kg_core::services::token::TokenCodec;
use kg_shared::types::response::ErrorResponse;

/// User authentication context injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID extracted from the JWT claims
    pub user_id: Uuid,
    /// Display name from the claims
    pub name: String,
    /// Email from the claims
    pub email: String,
    /// JWT ID for tracing
    pub jti: String,
}

impl AuthContext {
    /// Creates an authentication context from verified claims
    pub fn from_claims(claims: Claims) -> Result<Self, DomainError> {
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidToken))?;
        Ok(Self {
            user_id,
            name: claims.name,
            email: claims.email,
            jti: claims.jti,
        })
    }
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthContext>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("No token provided")),
        )
    }
}

/// JWT authentication middleware factory
pub struct JwtAuth {
    codec: Arc<TokenCodec>,
}

impl JwtAuth {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            codec: self.codec.clone(),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    codec: Arc<TokenCodec>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let codec = self.codec.clone();

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => return Ok(unauthorized(req, "MISSING_TOKEN", "No token provided")),
            };

            let claims = match codec.verify_access(&token) {
                Ok(claims) => claims,
                Err(DomainError::Token(TokenError::TokenExpired)) => {
                    return Ok(unauthorized(req, "TOKEN_EXPIRED", "Token expired"));
                }
                Err(_) => return Ok(unauthorized(req, "INVALID_TOKEN", "Invalid token")),
            };

            let context = match AuthContext::from_claims(claims) {
                Ok(context) => context,
                Err(_) => return Ok(unauthorized(req, "INVALID_TOKEN", "Invalid token")),
            };

            req.extensions_mut().insert(context);
            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Extract the token from a `Bearer` Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Short-circuit with a 401 carrying a distinct error code
fn unauthorized<B>(
    req: ServiceRequest,
    code: &str,
    message: &str,
) -> ServiceResponse<EitherBody<B>> {
    let response = HttpResponse::Unauthorized().json(ErrorResponse::new(code, message));
    req.into_response(response).map_into_right_body()
}
