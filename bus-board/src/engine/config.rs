//! Engine configuration.

use std::time::Duration;

/// Tunables for one curation pass.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on any single stop fetch. A fetch that takes longer
    /// counts as "no data" for that stop.
    pub fetch_timeout: Duration,
}

impl EngineConfig {
    pub fn new(fetch_timeout: Duration) -> Self {
        Self { fetch_timeout }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(5),
        }
    }
}
