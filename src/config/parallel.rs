//! Worker pool configuration for the parse phase.
//!
//! Parsing is the only concurrent phase of a run. Files are dispatched to a
//! rayon pool sized by this configuration; everything after parsing runs on
//! the calling thread.

use serde::{Deserialize, Serialize};

/// Configuration for the parse worker pool.
///
/// # Example
///
/// ```rust
/// use classdoc::config::ParallelConfig;
///
/// let config = ParallelConfig { jobs: Some(4) };
/// assert_eq!(config.worker_count(), 4);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Number of parse workers (default: number of CPU cores).
    ///
    /// `Some(1)` parses files one after another on a single worker, which
    /// is useful when debugging a parser.
    #[serde(default)]
    pub jobs: Option<usize>,
}

impl ParallelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-worker configuration.
    pub fn sequential() -> Self {
        Self { jobs: Some(1) }
    }

    /// Effective worker count; never zero.
    pub fn worker_count(&self) -> usize {
        self.jobs
            .filter(|&jobs| jobs > 0)
            .unwrap_or_else(num_cpus::get)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_all_cores() {
        let config = ParallelConfig::default();
        assert!(config.jobs.is_none());
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn test_sequential() {
        assert_eq!(ParallelConfig::sequential().worker_count(), 1);
    }

    #[test]
    fn test_zero_jobs_falls_back_to_cores() {
        let config = ParallelConfig { jobs: Some(0) };
        assert_eq!(config.worker_count(), num_cpus::get().max(1));
    }

    #[test]
    fn test_parallel_config_toml() {
        let parsed: ParallelConfig = toml::from_str("jobs = 8").unwrap();
        assert_eq!(parsed.worker_count(), 8);
    }
}
