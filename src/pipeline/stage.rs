//! Pipeline stage abstractions.
//!
//! A run is a fixed sequence of stages, each taking the previous stage's
//! output by value: file list → parse results → aggregated docs → enriched
//! docs → relations → resolved relations.

use crate::errors::DocError;
use std::marker::PhantomData;

/// A pipeline stage that transforms data.
///
/// The type system ensures stages can only be composed when their types align:
/// ```rust,ignore
/// PipelineBuilder::new()
///     .stage(parse)      // Input: (), Output: Vec<FileParseResult>
///     .stage(aggregate)  // Input: Vec<FileParseResult>, Output: AggregatedDocs
///     .stage(resolve)    // Input: Relations -> compile error!
/// ```
pub trait Stage {
    type Input;
    type Output;
    type Error;

    /// Execute this stage with the given input.
    fn execute(&self, input: Self::Input) -> Result<Self::Output, Self::Error>;

    /// Get the stage name for progress reporting.
    fn name(&self) -> &str;
}

/// A stage that cannot fail.
///
/// # Example
///
/// ```rust,ignore
/// let stage = PureStage::new("Enriching", move |docs| enrich(docs, &config, &chain, &sink));
/// ```
pub struct PureStage<F, I, O> {
    name: String,
    func: F,
    _phantom: PhantomData<(I, O)>,
}

impl<F, I, O> PureStage<F, I, O>
where
    F: Fn(I) -> O,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, I, O> Stage for PureStage<F, I, O>
where
    F: Fn(I) -> O,
{
    type Input = I;
    type Output = O;
    type Error = std::convert::Infallible;

    fn execute(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        Ok((self.func)(input))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A stage that can fail, such as parsing or building the class index.
pub struct FallibleStage<F, I, O, E> {
    name: String,
    func: F,
    _phantom: PhantomData<(I, O, E)>,
}

impl<F, I, O, E> FallibleStage<F, I, O, E>
where
    F: Fn(I) -> Result<O, E>,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, I, O, E> Stage for FallibleStage<F, I, O, E>
where
    F: Fn(I) -> Result<O, E>,
{
    type Input = I;
    type Output = O;
    type Error = E;

    fn execute(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        (self.func)(input)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Type-erased stage for dynamic dispatch.
///
/// This trait allows stages of different types to be stored in collections.
/// It's used internally by the pipeline builder.
pub(crate) trait AnyStage: Send + Sync {
    fn execute_any(
        &self,
        input: Box<dyn std::any::Any>,
    ) -> Result<Box<dyn std::any::Any>, DocError>;
    fn name(&self) -> &str;
}

impl<S> AnyStage for S
where
    S: Stage + Send + Sync,
    S::Input: 'static,
    S::Output: 'static,
    S::Error: Into<DocError>,
{
    fn execute_any(
        &self,
        input: Box<dyn std::any::Any>,
    ) -> Result<Box<dyn std::any::Any>, DocError> {
        let typed_input = input
            .downcast::<S::Input>()
            .map_err(|_| DocError::other("Type mismatch in pipeline stage input"))?;

        let output = self.execute(*typed_input).map_err(|e| e.into())?;
        Ok(Box::new(output))
    }

    fn name(&self) -> &str {
        Stage::name(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_stage_execution() {
        let stage = PureStage::new("Count", |names: Vec<&str>| names.len());
        assert_eq!(stage.execute(vec!["Ext.Base", "Ext.Panel"]).unwrap(), 2);
    }

    #[test]
    fn test_fallible_stage_failure() {
        let stage = FallibleStage::new("Parse", |s: String| {
            s.parse::<usize>()
                .map_err(|_| DocError::parse("a.js", Some(1), "not a number"))
        });
        assert_eq!(stage.execute("42".to_string()).unwrap(), 42);
        let err = stage.execute("nope".to_string()).unwrap_err();
        assert!(err.is_input_failure());
    }

    #[test]
    fn test_any_stage_rejects_wrong_input() {
        let stage = PureStage::new("Double", |x: i32| x * 2);
        let err = AnyStage::execute_any(&stage, Box::new("text")).unwrap_err();
        assert!(err.to_string().contains("Type mismatch"));
        assert_eq!(AnyStage::name(&stage), "Double");
    }
}
