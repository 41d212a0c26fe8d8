//! Source parsers.
//!
//! The pipeline only depends on the [`SourceParser`] trait: given the text of
//! one file it returns that file's fragments in emission order, or fails.
//! [`DocCommentParser`] is the bundled implementation for `/** ... */`
//! annotated sources.

pub mod doc_comment;

pub use doc_comment::DocCommentParser;

use crate::config::DocConfig;
use crate::errors::DocError;
use crate::model::Fragment;
use std::path::{Path, PathBuf};

/// Turns one source file into documentation fragments.
///
/// Implementations are called concurrently from the parse worker pool and
/// must not share mutable state between calls.
pub trait SourceParser: Send + Sync {
    fn parse(
        &self,
        content: &str,
        filename: &Path,
        config: &DocConfig,
    ) -> Result<Vec<Fragment>, DocError>;
}

/// Fragments of one input file, in the order the parser emitted them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileParseResult {
    pub path: PathBuf,
    pub fragments: Vec<Fragment>,
}

impl FileParseResult {
    pub fn new(path: impl Into<PathBuf>, fragments: Vec<Fragment>) -> Self {
        Self {
            path: path.into(),
            fragments,
        }
    }
}
