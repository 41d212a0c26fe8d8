//! Progress reporting for documentation runs.
//!
//! The pipeline talks to a [`ProgressSink`]; which sink is used decides what
//! the user sees:
//!
//! - **Quiet Mode**: nothing (respects `CLASSDOC_QUIET` and `--quiet`)
//! - **Non-TTY**: spinner hidden, log output only
//! - **Interactive**: an `indicatif` spinner showing the current stage and file
//!
//! Whatever the caller passes in is wrapped in a [`GuardedSink`] before the
//! pipeline uses it, so a misbehaving sink cannot break a run.
//!
//! # Examples
//!
//! ```rust
//! use classdoc::progress::{GuardedSink, ProgressSink, RecordingProgressSink};
//! use std::sync::Arc;
//!
//! let recorder = RecordingProgressSink::new();
//! let sink = GuardedSink::new(Arc::new(recorder.clone()));
//! sink.notify("Parsing", "Foo.js");
//! assert_eq!(recorder.notified("Parsing"), vec!["Foo.js"]);
//! ```

pub mod implementations;
pub mod traits;

pub use implementations::{
    BarProgressSink, LogProgressSink, ProgressEvent, RecordingProgressSink, SilentProgressSink,
};
pub use traits::ProgressSink;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const TEMPLATE_SPINNER: &str = "{spinner} {msg}";

/// Configuration for progress display behavior
#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    /// Whether to suppress all progress output
    pub quiet_mode: bool,
    /// Verbosity level (0 = basic, 1 = detailed, 2 = very detailed)
    pub verbosity: u8,
}

impl ProgressConfig {
    /// Create progress configuration from environment and CLI arguments
    pub fn from_env(quiet: bool, verbosity: u8) -> Self {
        let env_quiet = std::env::var("CLASSDOC_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
            verbosity,
        }
    }

    /// Determine if the spinner should be displayed
    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }
}

/// Wraps a sink so that a panic inside it is contained.
///
/// The first panic is logged; the sink is then disabled for the remainder
/// of the run so a broken sink does not log once per file.
pub struct GuardedSink {
    inner: Arc<dyn ProgressSink>,
    disabled: AtomicBool,
}

impl GuardedSink {
    pub fn new(inner: Arc<dyn ProgressSink>) -> Self {
        Self {
            inner,
            disabled: AtomicBool::new(false),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    fn guarded<F: FnOnce(&dyn ProgressSink)>(&self, call: F) {
        if self.is_disabled() {
            return;
        }
        let inner = self.inner.as_ref();
        if catch_unwind(AssertUnwindSafe(|| call(inner))).is_err()
            && !self.disabled.swap(true, Ordering::Relaxed)
        {
            log::warn!("Progress sink panicked; further progress output disabled");
        }
    }
}

impl ProgressSink for GuardedSink {
    fn notify(&self, stage: &str, identifier: &str) {
        self.guarded(|sink| sink.notify(stage, identifier));
    }

    fn start_stage(&self, name: &str) {
        self.guarded(|sink| sink.start_stage(name));
    }

    fn complete_stage(&self, name: &str) {
        self.guarded(|sink| sink.complete_stage(name));
    }

    fn warn(&self, message: &str) {
        self.guarded(|sink| sink.warn(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PanickingSink;

    impl ProgressSink for PanickingSink {
        fn notify(&self, _stage: &str, _identifier: &str) {
            panic!("sink exploded");
        }
        fn start_stage(&self, _name: &str) {}
        fn complete_stage(&self, _name: &str) {}
        fn warn(&self, _message: &str) {}
    }

    #[test]
    fn test_explicit_quiet_flag() {
        let config = ProgressConfig::from_env(true, 0);
        assert!(!config.should_show_progress());
    }

    #[test]
    fn test_guarded_sink_forwards_calls() {
        let recorder = RecordingProgressSink::new();
        let sink = GuardedSink::new(Arc::new(recorder.clone()));
        sink.start_stage("Parsing");
        sink.notify("Parsing", "a.js");
        sink.complete_stage("Parsing");
        sink.warn("w");
        assert_eq!(recorder.events().len(), 4);
        assert!(!sink.is_disabled());
    }

    #[test]
    fn test_guarded_sink_contains_panics() {
        let sink = GuardedSink::new(Arc::new(PanickingSink));
        sink.notify("Parsing", "a.js");
        assert!(sink.is_disabled());
        // Disabled sinks are skipped entirely
        sink.notify("Parsing", "b.js");
        sink.start_stage("Aggregating");
    }
}
