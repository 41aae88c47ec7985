//! Pulseboard Library
//!
//! Host resource samples in, restricted ad-hoc SQL console and live charts
//! out. This library contains all the core modules for the Pulseboard
//! application.

use std::sync::Arc;

pub mod config;
pub mod embedded;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::Config;
pub use services::{ChartRenderer, SamplerService, SessionState, StoreExecutor};

/// Application shared state
///
/// All services are wrapped in Arc for cheap cloning and thread safety. The
/// session slot is the only shared mutable piece; everything else is
/// read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<StoreExecutor>,
    pub session: Arc<SessionState>,
    pub renderer: Arc<ChartRenderer>,
    pub dashboard: config::DashboardConfig,
}
