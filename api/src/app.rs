//! Application factory.
//!
//! Builds the actix-web application from an `AppState`. The factory is
//! generic over the repository and storage implementations, so the binary
//! and the integration tests assemble the exact same routing table.

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use crate::middleware::{auth::JwtAuth, cors::create_cors};
use crate::routes::users::MAX_UPLOAD_SIZE;
use crate::routes::{auth, users, AppState};

use kg_core::repositories::{TokenRepository, UserRepository};
use kg_core::services::storage::FileStorage;
use kg_shared::types::response::ErrorResponse;

/// Create and configure the application with all routes and middleware
pub fn create_app<U, T, F>(
    app_state: web::Data<AppState<U, T, F>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    F: FileStorage + 'static,
{
    let codec = app_state.codec.clone();
    let cors = create_cors();

    App::new()
        .app_data(app_state)
        .wrap(TracingLogger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(auth::login::login::<U, T, F>))
                        .route("/refresh", web::post().to(auth::refresh::refresh::<U, T, F>))
                        .route("/logout", web::post().to(auth::logout::logout::<U, T, F>))
                        .route(
                            "/me",
                            web::get()
                                .to(auth::me::me::<U, T, F>)
                                .wrap(JwtAuth::new(codec.clone())),
                        ),
                )
                .service(
                    web::scope("/users")
                        .route("", web::get().to(users::handlers::list_users::<U, T, F>))
                        .route("", web::post().to(users::handlers::register::<U, T, F>))
                        .route(
                            "/{id}",
                            web::get().to(users::handlers::get_user::<U, T, F>),
                        )
                        .service(
                            web::resource("/{id}/profile-picture")
                                .app_data(web::PayloadConfig::new(MAX_UPLOAD_SIZE))
                                .route(
                                    web::post()
                                        .to(users::handlers::update_profile_picture::<U, T, F>)
                                        .wrap(JwtAuth::new(codec)),
                                ),
                        ),
                ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "keygate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "NOT_FOUND",
        "The requested resource was not found",
    ))
}
