use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::RecommendationEngine;

/// Shared application state
///
/// The engine is immutable after startup, so handlers read it without locking.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine, config: Config) -> Self {
        Self {
            engine: Arc::new(engine),
            config: Arc::new(config),
        }
    }

    /// Resolves an optional requested count against the configured bounds
    pub fn recommendation_count(&self, requested: Option<usize>) -> AppResult<usize> {
        let n = requested.unwrap_or(self.config.default_recommendations);
        if n == 0 || n > self.config.max_recommendations {
            return Err(AppError::InvalidInput(format!(
                "n must be between 1 and {}",
                self.config.max_recommendations
            )));
        }
        Ok(n)
    }
}
