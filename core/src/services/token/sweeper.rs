//! Background pruning of expired revocation entries
//!
//! Entries for credentials past their natural expiry are dead weight; the
//! sweeper drops them periodically. Stores with native expiry (Redis)
//! make each sweep a cheap no-op, the in-memory store needs it.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::DomainResult;
use crate::repositories::RevocationStore;

/// Configuration for the revocation sweeper
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// How often to run a sweep (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic sweeping
    pub enabled: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            enabled: true,
        }
    }
}

/// Periodic maintenance over a revocation store
pub struct RevocationSweeper<R: RevocationStore + 'static> {
    store: Arc<R>,
    config: SweeperConfig,
}

impl<R: RevocationStore> RevocationSweeper<R> {
    /// Create a new sweeper over the given store
    pub fn new(store: Arc<R>, config: SweeperConfig) -> Self {
        Self { store, config }
    }

    /// Run a single sweep cycle
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of entries dropped
    pub async fn run_sweep(&self) -> DomainResult<usize> {
        if !self.config.enabled {
            return Ok(0);
        }

        let dropped = self.store.prune_expired().await?;
        if dropped > 0 {
            info!("Dropped {} expired revocation entries", dropped);
        }
        Ok(dropped)
    }

    /// Start the sweeper as a background task
    ///
    /// Spawns a tokio task that sweeps at the configured interval.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Revocation sweeper is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                "Revocation sweeper started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_sweep().await {
                    error!("Revocation sweep failed: {}", e);
                }
            }
        });
    }
}
