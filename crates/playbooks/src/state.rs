//! Application state for the Playbooks server.
//!
//! This module defines the shared application state that is
//! passed to all handlers via Axum's state management.

use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::db::DbPool;

/// Shared application state.
///
/// Domain handlers get their service as router state; this struct carries
/// what the cross-cutting routes (health, readiness) need.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DbPool,

    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: DbPool, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get the server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
