//! Progress sink trait definition.
//!
//! The pipeline reports what it is doing through a [`ProgressSink`]:
//!
//! - once per input file while parsing and aggregating (`notify`)
//! - at the start and end of every stage (`start_stage` / `complete_stage`)
//! - for recovered problems worth surfacing immediately (`warn`)
//!
//! # Thread Safety
//!
//! All `ProgressSink` implementations must be `Send + Sync`: parse workers
//! call `notify` concurrently from the rayon pool.
//!
//! # Example
//!
//! ```rust
//! use classdoc::progress::ProgressSink;
//!
//! struct Printer;
//!
//! impl ProgressSink for Printer {
//!     fn notify(&self, stage: &str, identifier: &str) {
//!         eprintln!("{}: {}", stage, identifier);
//!     }
//!     fn start_stage(&self, _name: &str) {}
//!     fn complete_stage(&self, _name: &str) {}
//!     fn warn(&self, message: &str) {
//!         eprintln!("warning: {}", message);
//!     }
//! }
//! ```

/// Progress sink abstraction - receives progress updates.
///
/// # Implementation Requirements
///
/// - All methods must be non-blocking
/// - Methods may be called from multiple threads concurrently
/// - A sink that panics does not break the run: the pipeline calls sinks
///   through [`GuardedSink`](super::GuardedSink)
pub trait ProgressSink: Send + Sync + 'static {
    /// Report that `identifier` (usually a file name) was handled by `stage`.
    fn notify(&self, stage: &str, identifier: &str);

    /// A stage is starting.
    fn start_stage(&self, name: &str);

    /// A stage finished (successfully or not).
    fn complete_stage(&self, name: &str);

    /// A warning that should not interrupt progress output.
    fn warn(&self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_progress_sink_is_object_safe() {
        // If this compiles, the trait is object-safe
        fn _takes_trait_object(_sink: Arc<dyn ProgressSink>) {}
    }
}
