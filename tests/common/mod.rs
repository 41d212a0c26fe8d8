// Shared helpers for classdoc integration tests
#![allow(dead_code)]

use classdoc::config::DocConfig;
use classdoc::parser::DocCommentParser;
use classdoc::pipeline::{DocPipeline, SourceFile};
use classdoc::Relations;
use std::sync::Arc;

pub fn source(path: &str, content: &str) -> SourceFile {
    SourceFile::new(path, content)
}

pub fn pipeline(config: DocConfig) -> DocPipeline {
    DocPipeline::new(config, Arc::new(DocCommentParser::new()))
}

/// Run the full pipeline over in-memory sources with `jobs` parse workers.
pub fn run_with_jobs(sources: &[SourceFile], jobs: usize) -> Relations {
    pipeline(DocConfig::default().with_jobs(jobs))
        .run_sources(sources.to_vec())
        .expect("pipeline run failed")
}

pub fn run(sources: &[SourceFile]) -> Relations {
    run_with_jobs(sources, 2)
}

pub fn run_with_config(sources: &[SourceFile], config: DocConfig) -> Relations {
    pipeline(config)
        .run_sources(sources.to_vec())
        .expect("pipeline run failed")
}

/// Byte-stable form of a resolved model.
pub fn snapshot_json(relations: &Relations) -> String {
    serde_json::to_string_pretty(&relations.snapshot()).expect("snapshot serializes")
}

/// Steps needed to walk `extends` from `name` to a class without parent,
/// or `None` if the walk exceeds `limit`.
pub fn steps_to_root(relations: &Relations, name: &str, limit: usize) -> Option<usize> {
    let mut current = relations.get(name)?;
    let mut steps = 0;
    while let Some(parent) = current.extends() {
        steps += 1;
        if steps > limit {
            return None;
        }
        match relations.get(parent) {
            Some(next) => current = next,
            None => break,
        }
    }
    Some(steps)
}
