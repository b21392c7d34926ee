//! Engine configuration.

use domain::AggregationError;

/// Default number of aggregation jobs allowed to run at once.
pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 2;

/// Default number of entries requested per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest `per_page` GitHub honours; bigger requests are silently capped.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Directory whose first entry is read as the CI configuration.
pub const DEFAULT_CI_CONFIG_PATH: &str = ".github/workflows";

/// Tunables of the aggregation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on concurrently running aggregation jobs, process-wide.
    pub max_concurrent_jobs: usize,

    /// Entries requested per page for directory and repository listings.
    ///
    /// A page shorter than this ends pagination.
    pub page_size: u32,

    /// Repository path listed by the CI-config facet.
    pub ci_config_path: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: DEFAULT_MAX_CONCURRENT_JOBS,
            page_size: DEFAULT_PAGE_SIZE,
            ci_config_path: DEFAULT_CI_CONFIG_PATH.to_string(),
        }
    }
}

impl EngineConfig {
    /// Checks the configuration, returning [`AggregationError::Configuration`]
    /// for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), AggregationError> {
        if self.max_concurrent_jobs == 0 {
            return Err(AggregationError::Configuration {
                message: "max_concurrent_jobs must be at least 1".to_string(),
            });
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(AggregationError::Configuration {
                message: format!("page_size must be between 1 and {MAX_PAGE_SIZE}"),
            });
        }
        Ok(())
    }
}
