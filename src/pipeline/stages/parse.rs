//! Parse coordination.
//!
//! Files are scattered over a rayon pool sized by
//! [`ParallelConfig::worker_count`](crate::config::ParallelConfig::worker_count)
//! and gathered back by index, so the output order is the input order no
//! matter which worker finishes first. The first failing file aborts the
//! whole stage.

use super::PARSING;
use crate::config::DocConfig;
use crate::errors::DocError;
use crate::parser::{FileParseResult, SourceParser};
use crate::progress::ProgressSink;
use rayon::prelude::*;
use std::path::PathBuf;

/// An in-memory source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// What the parse stage reads from.
#[derive(Debug, Clone)]
pub enum ParseInput {
    /// Paths read by the workers themselves.
    Files(Vec<PathBuf>),
    Sources(Vec<SourceFile>),
}

impl ParseInput {
    pub fn len(&self) -> usize {
        match self {
            Self::Files(files) => files.len(),
            Self::Sources(sources) => sources.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn parse_input(
    input: &ParseInput,
    config: &DocConfig,
    parser: &dyn SourceParser,
    sink: &dyn ProgressSink,
) -> Result<Vec<FileParseResult>, DocError> {
    match input {
        ParseInput::Files(files) => parse_files(files, config, parser, sink),
        ParseInput::Sources(sources) => parse_sources(sources, config, parser, sink),
    }
}

/// Read and parse every file, preserving input order.
pub fn parse_files(
    files: &[PathBuf],
    config: &DocConfig,
    parser: &dyn SourceParser,
    sink: &dyn ProgressSink,
) -> Result<Vec<FileParseResult>, DocError> {
    scatter(files, config, |path| {
        let content = std::fs::read_to_string(path).map_err(|e| DocError::io(path, e))?;
        parse_one(path.clone(), &content, config, parser, sink)
    })
}

/// Parse sources already held in memory, preserving input order.
pub fn parse_sources(
    sources: &[SourceFile],
    config: &DocConfig,
    parser: &dyn SourceParser,
    sink: &dyn ProgressSink,
) -> Result<Vec<FileParseResult>, DocError> {
    scatter(sources, config, |source| {
        parse_one(source.path.clone(), &source.content, config, parser, sink)
    })
}

fn scatter<T, F>(items: &[T], config: &DocConfig, work: F) -> Result<Vec<FileParseResult>, DocError>
where
    T: Sync,
    F: Fn(&T) -> Result<FileParseResult, DocError> + Send + Sync,
{
    let workers = config.parallel.worker_count();
    log::info!("Parsing {} files with {} workers", items.len(), workers);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| DocError::WorkerPool(e.to_string()))?;

    // Indexed collect keeps input order; an error short-circuits the rest.
    pool.install(|| items.par_iter().map(&work).collect())
}

fn parse_one(
    path: PathBuf,
    content: &str,
    config: &DocConfig,
    parser: &dyn SourceParser,
    sink: &dyn ProgressSink,
) -> Result<FileParseResult, DocError> {
    let fragments = parser.parse(content, &path, config)?;
    log::trace!("{}: {} fragments", path.display(), fragments.len());
    sink.notify(PARSING, &path.display().to_string());
    Ok(FileParseResult::new(path, fragments))
}
