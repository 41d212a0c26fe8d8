//! The documentation pipeline.
//!
//! ```text
//! Parsing -> Aggregating -> Enriching -> Building relations -> Resolving
//! ```
//!
//! Data flows strictly forward. Only a parse or read failure stops a run;
//! every other problem is collected as a diagnostic on the returned
//! [`Relations`].
//!
//! # Example
//!
//! ```rust,no_run
//! use classdoc::config::DocConfig;
//! use classdoc::parser::DocCommentParser;
//! use classdoc::pipeline::DocPipeline;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! let pipeline = DocPipeline::new(DocConfig::default(), Arc::new(DocCommentParser::new()));
//! let relations = pipeline.run(&[PathBuf::from("src/Panel.js")]).unwrap();
//! for class in relations.classes() {
//!     println!("{}", class.name());
//! }
//! ```

pub mod builder;
pub mod stage;
pub mod stages;

pub use builder::{BuiltPipeline, PipelineBuilder, StageTiming};
pub use stage::{FallibleStage, PureStage, Stage};
pub use stages::parse::{ParseInput, SourceFile};

use crate::config::DocConfig;
use crate::errors::DocError;
use crate::model::AggregatedDocs;
use crate::passes::{
    default_enrichment_chain, default_resolution_chain, EnrichmentPass, ResolutionPass,
};
use crate::parser::{FileParseResult, SourceParser};
use crate::progress::{GuardedSink, ProgressSink, SilentProgressSink};
use crate::relations::Relations;
use std::path::PathBuf;
use std::sync::Arc;

/// A configured documentation run.
///
/// Holds everything the stages share: configuration, the source parser,
/// the progress sink and the two pass chains. The same pipeline can be run
/// any number of times.
pub struct DocPipeline {
    config: Arc<DocConfig>,
    parser: Arc<dyn SourceParser>,
    sink: Arc<GuardedSink>,
    enrichment: Arc<Vec<Box<dyn EnrichmentPass>>>,
    resolution: Arc<Vec<Box<dyn ResolutionPass>>>,
}

impl DocPipeline {
    /// Pipeline with the default pass chains and no progress output.
    pub fn new(config: DocConfig, parser: Arc<dyn SourceParser>) -> Self {
        Self {
            config: Arc::new(config),
            parser,
            sink: Arc::new(GuardedSink::new(Arc::new(SilentProgressSink))),
            enrichment: Arc::new(default_enrichment_chain()),
            resolution: Arc::new(default_resolution_chain()),
        }
    }

    /// Report progress to `sink`. Panics raised by the sink are contained.
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = Arc::new(GuardedSink::new(sink));
        self
    }

    pub fn with_enrichment_chain(mut self, chain: Vec<Box<dyn EnrichmentPass>>) -> Self {
        self.enrichment = Arc::new(chain);
        self
    }

    pub fn with_resolution_chain(mut self, chain: Vec<Box<dyn ResolutionPass>>) -> Self {
        self.resolution = Arc::new(chain);
        self
    }

    pub fn config(&self) -> &DocConfig {
        &self.config
    }

    /// Document `files`, read from disk in the given order.
    pub fn run(&self, files: &[PathBuf]) -> Result<Relations, DocError> {
        self.build(ParseInput::Files(files.to_vec())).execute()
    }

    /// Document sources already held in memory.
    pub fn run_sources(&self, sources: Vec<SourceFile>) -> Result<Relations, DocError> {
        self.build(ParseInput::Sources(sources)).execute()
    }

    /// Like [`run`](Self::run), also returning how long each stage took.
    pub fn run_with_timing(
        &self,
        files: &[PathBuf],
    ) -> Result<(Relations, Vec<StageTiming>), DocError> {
        self.build(ParseInput::Files(files.to_vec()))
            .execute_with_timing()
    }

    fn build(&self, input: ParseInput) -> BuiltPipeline<Relations> {
        let parse = {
            let config = Arc::clone(&self.config);
            let parser = Arc::clone(&self.parser);
            let sink = Arc::clone(&self.sink);
            FallibleStage::new(stages::PARSING, move |()| {
                stages::parse::parse_input(&input, &config, parser.as_ref(), sink.as_ref())
            })
        };
        let aggregate = {
            let config = Arc::clone(&self.config);
            let sink = Arc::clone(&self.sink);
            PureStage::new(stages::AGGREGATING, move |results: Vec<FileParseResult>| {
                stages::aggregate::aggregate(results, &config, sink.as_ref())
            })
        };
        let enrich = {
            let config = Arc::clone(&self.config);
            let chain = Arc::clone(&self.enrichment);
            let sink = Arc::clone(&self.sink);
            PureStage::new(stages::ENRICHING, move |docs: AggregatedDocs| {
                stages::enrich::enrich(docs, &config, &chain, sink.as_ref())
            })
        };
        let build = {
            let sink = Arc::clone(&self.sink);
            FallibleStage::new(stages::BUILDING, move |docs: AggregatedDocs| {
                stages::build::build_relations(docs, sink.as_ref())
            })
        };
        let resolve = {
            let config = Arc::clone(&self.config);
            let chain = Arc::clone(&self.resolution);
            let sink = Arc::clone(&self.sink);
            PureStage::new(stages::RESOLVING, move |relations: Relations| {
                stages::resolve::resolve(relations, &config, &chain, sink.as_ref())
            })
        };

        PipelineBuilder::new()
            .with_progress(self.sink.clone())
            .stage(parse)
            .stage(aggregate)
            .stage(enrich)
            .stage(build)
            .stage(resolve)
            .build()
    }
}

/// Document `files` with the default pass chains.
pub fn run(
    files: &[PathBuf],
    config: &DocConfig,
    parser: Arc<dyn SourceParser>,
    sink: Arc<dyn ProgressSink>,
) -> Result<Relations, DocError> {
    DocPipeline::new(config.clone(), parser)
        .with_sink(sink)
        .run(files)
}

/// Document in-memory sources with the default pass chains.
pub fn run_sources(
    sources: Vec<SourceFile>,
    config: &DocConfig,
    parser: Arc<dyn SourceParser>,
    sink: Arc<dyn ProgressSink>,
) -> Result<Relations, DocError> {
    DocPipeline::new(config.clone(), parser)
        .with_sink(sink)
        .run_sources(sources)
}
