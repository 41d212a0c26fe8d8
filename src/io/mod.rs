//! File-system edges of the binary: input discovery and report writers.

pub mod output;
pub mod walker;

pub use output::{create_writer, OutputFormat, OutputWriter};
pub use walker::{find_source_files, FileWalker};
