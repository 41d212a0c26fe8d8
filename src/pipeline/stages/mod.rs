//! The five stages of a documentation run.
//!
//! Only [`parse`] runs concurrently; the other stages are single-threaded
//! folds over data they own exclusively.

pub mod aggregate;
pub mod build;
pub mod enrich;
pub mod parse;
pub mod resolve;

pub const PARSING: &str = "Parsing";
pub const AGGREGATING: &str = "Aggregating";
pub const ENRICHING: &str = "Enriching";
pub const BUILDING: &str = "Building relations";
pub const RESOLVING: &str = "Resolving";
