//! Retention sweeper for stale refresh tokens.
//!
//! Runs independently of request traffic: one purge at startup to bound
//! growth after downtime, then one per interval. A failed cycle is logged
//! and retried at the next tick; it never affects request handling.

use std::sync::Arc;

use chrono::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::DomainResult;
use crate::repositories::TokenRepository;

/// Configuration for the retention sweeper
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run a sweep (in seconds)
    pub interval_seconds: u64,
    /// How long revoked records are retained past revocation (in days);
    /// expired records are purged immediately
    pub revocation_grace_days: i64,
    /// Whether the sweeper runs at all
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            revocation_grace_days: 30,
            enabled: true,
        }
    }
}

/// Result of one sweep cycle
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of stale records deleted
    pub tokens_purged: usize,
    /// Errors encountered during the cycle
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Periodic purger of expired and long-revoked refresh tokens
pub struct TokenCleanupService<T: TokenRepository + 'static> {
    repository: Arc<T>,
    config: TokenCleanupConfig,
}

impl<T: TokenRepository> TokenCleanupService<T> {
    pub fn new(repository: Arc<T>, config: TokenCleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single sweep cycle
    ///
    /// Safe to re-run at any time: purging acts on records that can no
    /// longer become valid again.
    pub async fn run_cleanup(&self) -> DomainResult<CleanupResult> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let grace = Duration::days(self.config.revocation_grace_days);
        let mut result = CleanupResult::default();

        match self.repository.purge_stale(grace).await {
            Ok(count) => {
                result.tokens_purged = count;
                info!("Purged {} stale refresh tokens", count);
            }
            Err(e) => {
                error!("Failed to purge stale tokens: {}", e);
                result.errors.push(format!("Purge error: {}", e));
            }
        }

        Ok(result)
    }

    /// Start the sweeper as a background task
    ///
    /// The first cycle runs immediately, then one per configured interval.
    /// Returns the task handle so the caller can abort it at shutdown;
    /// `None` when the sweeper is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token retention sweeper is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Token retention sweeper started - sweeping every {} seconds",
                self.config.interval_seconds
            );

            let mut timer = tokio::time::interval(interval);

            loop {
                // first tick completes immediately, covering startup
                timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) if !result.is_success() => {
                        warn!("Sweep completed with errors: {:?}", result.errors);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("Sweep cycle failed: {}", e);
                    }
                }
            }
        }))
    }
}
