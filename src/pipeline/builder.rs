//! Pipeline builder for composing documentation stages.

use super::stage::{AnyStage, Stage};
use crate::errors::DocError;
use crate::progress::ProgressSink;
use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Builder for constructing pipelines.
///
/// The builder uses phantom types to track the output type of the pipeline
/// at compile time, enabling type-safe composition.
pub struct PipelineBuilder<T> {
    stages: Vec<Box<dyn AnyStage>>,
    progress: Option<Arc<dyn ProgressSink>>,
    _phantom: PhantomData<T>,
}

impl PipelineBuilder<()> {
    /// Create a new empty pipeline builder.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            progress: None,
            _phantom: PhantomData,
        }
    }
}

impl Default for PipelineBuilder<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PipelineBuilder<T> {
    /// Add a stage to the pipeline.
    ///
    /// The stage's input type must match the current pipeline output type.
    /// Returns a new builder with the stage's output type.
    pub fn stage<S>(mut self, stage: S) -> PipelineBuilder<S::Output>
    where
        S: Stage<Input = T> + Send + Sync + 'static,
        S::Input: 'static,
        S::Output: 'static,
        S::Error: Into<DocError>,
    {
        self.stages.push(Box::new(stage));
        PipelineBuilder {
            stages: self.stages,
            progress: self.progress,
            _phantom: PhantomData,
        }
    }

    /// Add a stage conditionally.
    ///
    /// ```rust,ignore
    /// let pipeline = PipelineBuilder::new()
    ///     .stage(parse)
    ///     .when(!config.ignore_global, |p| p.stage(hoist_globals))
    ///     .build();
    /// ```
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    /// Report stage start and completion to `sink`.
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Build the final pipeline ready for execution.
    pub fn build(self) -> BuiltPipeline<T> {
        BuiltPipeline {
            stages: self.stages,
            progress: self.progress,
            _phantom: PhantomData,
        }
    }
}

/// A built pipeline ready for execution.
pub struct BuiltPipeline<T> {
    stages: Vec<Box<dyn AnyStage>>,
    progress: Option<Arc<dyn ProgressSink>>,
    _phantom: PhantomData<T>,
}

impl<T: 'static> BuiltPipeline<T> {
    /// Execute the pipeline.
    ///
    /// The pipeline starts with a unit value `()` and threads data through
    /// each stage sequentially.
    pub fn execute(&self) -> Result<T, DocError> {
        self.execute_with_timing().map(|(result, _)| result)
    }

    /// Execute the pipeline and collect timing information for each stage.
    pub fn execute_with_timing(&self) -> Result<(T, Vec<StageTiming>), DocError> {
        let mut data: Box<dyn Any> = Box::new(());
        let mut timings = Vec::with_capacity(self.stages.len());

        for (i, stage) in self.stages.iter().enumerate() {
            let start = Instant::now();
            log::debug!("Stage {}/{}: {}", i + 1, self.stages.len(), stage.name());

            if let Some(sink) = &self.progress {
                sink.start_stage(stage.name());
            }
            let outcome = stage.execute_any(data);
            if let Some(sink) = &self.progress {
                sink.complete_stage(stage.name());
            }
            data = outcome.map_err(|e| stage_error(stage.name(), e))?;

            timings.push(StageTiming {
                name: stage.name().to_string(),
                duration: start.elapsed(),
            });
        }

        let result = data
            .downcast::<T>()
            .map(|b| *b)
            .map_err(|_| DocError::other("Type mismatch in pipeline output"))?;

        Ok((result, timings))
    }

    /// Get the number of stages in this pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Input failures already name their file and pass through untouched;
/// anything else is tagged with the stage it came from.
fn stage_error(stage: &str, error: DocError) -> DocError {
    if error.is_input_failure() {
        return error;
    }
    DocError::Stage {
        stage: stage.to_string(),
        message: error.to_string(),
    }
}

/// Timing information for a pipeline stage.
#[derive(Debug, Clone)]
pub struct StageTiming {
    /// Name of the stage
    pub name: String,

    /// Time taken to execute the stage
    pub duration: Duration,
}

impl StageTiming {
    /// Format the timing as a human-readable string.
    pub fn format(&self) -> String {
        format!("{}: {:.2}s", self.name, self.duration.as_secs_f64())
    }
}
