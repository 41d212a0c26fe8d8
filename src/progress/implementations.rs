//! Progress sink implementations for different output modes.
//!
//! - [`SilentProgressSink`]: no-op, for tests and library use
//! - [`LogProgressSink`]: routes everything through the `log` facade
//! - [`RecordingProgressSink`]: captures events for assertions
//! - [`BarProgressSink`]: `indicatif` spinner for interactive terminals
//!
//! # Example: Using RecordingProgressSink in Tests
//!
//! ```rust
//! use classdoc::progress::{ProgressEvent, ProgressSink, RecordingProgressSink};
//!
//! let recorder = RecordingProgressSink::new();
//! recorder.start_stage("Parsing");
//! recorder.notify("Parsing", "src/Foo.js");
//! recorder.complete_stage("Parsing");
//!
//! assert_eq!(recorder.events().len(), 3);
//! assert!(matches!(recorder.events()[0], ProgressEvent::StartStage { .. }));
//! ```

use super::traits::ProgressSink;
use super::{ProgressConfig, TEMPLATE_SPINNER};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Silent progress sink - no-op implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentProgressSink;

impl ProgressSink for SilentProgressSink {
    #[inline]
    fn notify(&self, _stage: &str, _identifier: &str) {}

    #[inline]
    fn start_stage(&self, _name: &str) {}

    #[inline]
    fn complete_stage(&self, _name: &str) {}

    #[inline]
    fn warn(&self, _message: &str) {}
}

/// Sends progress to the `log` facade: per-file notifications at debug
/// level, stage boundaries at info level, warnings at warn level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn notify(&self, stage: &str, identifier: &str) {
        log::debug!("{} {}", stage, identifier);
    }

    fn start_stage(&self, name: &str) {
        log::info!("{}...", name);
    }

    fn complete_stage(&self, name: &str) {
        log::debug!("{} complete", name);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Progress event recorded by [`RecordingProgressSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Notify { stage: String, identifier: String },
    StartStage { name: String },
    CompleteStage { name: String },
    Warn { message: String },
}

/// Recording progress sink - captures events for testing.
///
/// Notifications sent from parse workers arrive in completion order, so
/// tests should not rely on the relative order of `Notify` events within
/// the parse stage.
#[derive(Clone, Debug, Default)]
pub struct RecordingProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ProgressEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.lock().clone()
    }

    /// Names of started stages, in order.
    pub fn stages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::StartStage { name } => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn completed_stages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::CompleteStage { name } => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Identifiers notified for one stage.
    pub fn notified(&self, stage: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Notify {
                    stage: s,
                    identifier,
                } if s == stage => Some(identifier),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Warn { message } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl ProgressSink for RecordingProgressSink {
    fn notify(&self, stage: &str, identifier: &str) {
        self.lock().push(ProgressEvent::Notify {
            stage: stage.to_string(),
            identifier: identifier.to_string(),
        });
    }

    fn start_stage(&self, name: &str) {
        self.lock().push(ProgressEvent::StartStage {
            name: name.to_string(),
        });
    }

    fn complete_stage(&self, name: &str) {
        self.lock().push(ProgressEvent::CompleteStage {
            name: name.to_string(),
        });
    }

    fn warn(&self, message: &str) {
        self.lock().push(ProgressEvent::Warn {
            message: message.to_string(),
        });
    }
}

/// Spinner shown on stderr while the pipeline runs.
///
/// Hidden when stderr is not a terminal or quiet mode is on.
pub struct BarProgressSink {
    bar: ProgressBar,
    handled: std::sync::atomic::AtomicUsize,
}

impl BarProgressSink {
    pub fn new(config: &ProgressConfig) -> Self {
        let bar = if config.should_show_progress() {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template(TEMPLATE_SPINNER) {
                bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
            }
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        Self {
            bar,
            handled: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    /// Remove the spinner before final output is printed.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for BarProgressSink {
    fn notify(&self, stage: &str, identifier: &str) {
        let count = self
            .handled
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            + 1;
        self.bar
            .set_message(format!("{} ({}) {}", stage, count, identifier));
    }

    fn start_stage(&self, name: &str) {
        self.handled.store(0, std::sync::atomic::Ordering::Relaxed);
        self.bar.set_message(name.to_string());
    }

    fn complete_stage(&self, name: &str) {
        self.bar.set_message(format!("{} complete", name));
    }

    fn warn(&self, message: &str) {
        self.bar.suspend(|| eprintln!("Warning: {}", message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_sink_is_no_op() {
        let sink = SilentProgressSink;
        sink.start_stage("Test");
        sink.notify("Test", "a.js");
        sink.complete_stage("Test");
        sink.warn("Warning");
    }

    #[test]
    fn test_recording_sink_records_all_events() {
        let recorder = RecordingProgressSink::new();

        recorder.start_stage("Parsing");
        recorder.notify("Parsing", "a.js");
        recorder.notify("Parsing", "b.js");
        recorder.complete_stage("Parsing");
        recorder.warn("careful");

        assert_eq!(recorder.events().len(), 5);
        assert_eq!(recorder.stages(), vec!["Parsing"]);
        assert_eq!(recorder.completed_stages(), vec!["Parsing"]);
        assert_eq!(recorder.notified("Parsing"), vec!["a.js", "b.js"]);
        assert_eq!(recorder.warnings(), vec!["careful"]);
    }

    #[test]
    fn test_recording_sink_clones_share_events() {
        let recorder = RecordingProgressSink::new();
        let clone = recorder.clone();
        clone.start_stage("Shared");
        assert_eq!(recorder.stages(), vec!["Shared"]);
        recorder.clear();
        assert!(clone.events().is_empty());
    }

    #[test]
    fn test_bar_sink_hidden_in_quiet_mode() {
        let sink = BarProgressSink::new(&ProgressConfig {
            quiet_mode: true,
            verbosity: 0,
        });
        assert!(sink.is_hidden());
        sink.start_stage("Parsing");
        sink.notify("Parsing", "a.js");
        sink.finish();
    }
}
