//! Keygate API server entry point.
//!
//! Wires the real infrastructure together: connection pool, migrations,
//! repositories, services, the retention sweeper, and the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kg_api::app::create_app;
use kg_api::routes::AppState;
use kg_core::services::account::{AccountService, AccountServiceConfig};
use kg_core::services::auth::{AuthService, AuthServiceConfig};
use kg_core::services::token::{TokenCleanupConfig, TokenCleanupService, TokenCodec, TokenCodecConfig};
use kg_infra::database::{DatabasePool, MySqlTokenRepository, MySqlUserRepository};
use kg_infra::storage::S3FileStorage;
use kg_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().map_err(startup_error)?;
    info!("Starting Keygate API server ({:?})", config.environment);

    // Persistence: pool first, then the schema it serves
    let pool = DatabasePool::new(&config.database)
        .await
        .map_err(startup_error)?;
    pool.run_migrations().await.map_err(startup_error)?;

    let user_repository = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
    let token_repository = Arc::new(MySqlTokenRepository::new(pool.get_pool().clone()));
    let storage = Arc::new(S3FileStorage::new(&config.storage).await);

    // Services
    let codec = Arc::new(TokenCodec::new(TokenCodecConfig::from(&config.jwt)));
    let auth_service = Arc::new(AuthService::new(
        user_repository.clone(),
        token_repository.clone(),
        codec.clone(),
        AuthServiceConfig::default(),
    ));
    let account_service = Arc::new(AccountService::new(
        user_repository,
        storage,
        AccountServiceConfig {
            signed_url_expiry: Duration::from_secs(config.storage.signed_url_expiry),
            ..Default::default()
        },
    ));

    // Retention sweeper: first sweep runs immediately, then hourly
    let sweeper = Arc::new(TokenCleanupService::new(
        token_repository,
        TokenCleanupConfig::default(),
    ));
    let sweeper_handle = sweeper.start_background_task();

    let app_state = web::Data::new(AppState {
        auth_service,
        account_service,
        codec,
    });

    let bind_address = config.server.bind_address();
    info!("Server listening on http://{}", bind_address);

    HttpServer::new(move || create_app(app_state.clone()))
        .bind(&bind_address)?
        .run()
        .await?;

    // Graceful drain: stop the sweeper, then release the pool
    if let Some(handle) = sweeper_handle {
        handle.abort();
    }
    pool.close().await;
    info!("Server stopped");

    Ok(())
}

fn startup_error(error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, error.to_string())
}
