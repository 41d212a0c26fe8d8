//! Aggregation and resolution of class-based API documentation.
//!
//! Source files are parsed into [`model::Fragment`]s, folded into one class
//! mapping, enriched, frozen into a [`Relations`] graph and resolved. See
//! [`pipeline`] for the stage order.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod io;
pub mod model;
pub mod parser;
pub mod passes;
pub mod pipeline;
pub mod progress;
pub mod relations;

pub use crate::config::DocConfig;
pub use crate::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticKind, Diagnostics};
pub use crate::errors::DocError;
pub use crate::pipeline::{DocPipeline, SourceFile};
pub use crate::relations::{ClassId, ModelSnapshot, Relations};
