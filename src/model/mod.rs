//! Documentation data model.
//!
//! Data moves through three shapes:
//!
//! 1. [`Fragment`]: one documented entity as emitted by a
//!    [`SourceParser`](crate::parser::SourceParser).
//! 2. [`AggregatedClass`]: the mutable per-class accumulation built by the
//!    aggregator and rewritten by the enrichment passes.
//! 3. [`Class`]: the graph node stored in
//!    [`Relations`](crate::relations::Relations) once the class set is final.
//!
//! [`Member`] is shared by the last two shapes; a member keeps its identity
//! (kind and name) from aggregation to output.

pub mod aggregated;
pub mod class;
pub mod external;
pub mod fragment;
pub mod member;

pub use aggregated::{AggregatedClass, AggregatedDocs, ClassMergePolicy};
pub use class::Class;
pub use external::ExternalClasses;
pub use fragment::{
    CodeType, EnumSpec, EnumValue, Fragment, FragmentKind, InheritDocTarget, Param, ReturnSpec,
};
pub use member::{Member, MemberKey, MemberKind, MemberPath, MemberTable};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where a fragment was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}
