//! Enrichment and resolution passes.
//!
//! Two ordered chains run around the graph build:
//!
//! - [`EnrichmentPass`]es rewrite the [`AggregatedDocs`] mapping before any
//!   class is frozen into the graph.
//! - [`ResolutionPass`]es run over the built [`Relations`], filling derived
//!   fields (inherited docs, versions, return types) and collecting lint.
//!
//! Each pass depends on what the passes before it established, so the
//! default chains below are the only supported orders.

pub mod enrich;
pub mod resolve;

use crate::config::DocConfig;
use crate::model::AggregatedDocs;
use crate::relations::Relations;

/// A pass over the aggregated class mapping.
///
/// Passes never fail; problems become diagnostics in `docs.diagnostics`.
pub trait EnrichmentPass: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, docs: &mut AggregatedDocs, config: &DocConfig);
}

/// A pass over the built class graph.
pub trait ResolutionPass: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, relations: &mut Relations, config: &DocConfig);
}

/// Ignored classes, globals, accessors, framework quirks, enums, overrides.
pub fn default_enrichment_chain() -> Vec<Box<dyn EnrichmentPass>> {
    vec![
        Box::new(enrich::IgnoredClasses),
        Box::new(enrich::GlobalMembers),
        Box::new(enrich::Accessors),
        Box::new(enrich::FrameworkQuirks::default()),
        Box::new(enrich::Enums),
        Box::new(enrich::Overrides),
    ]
}

/// Cycle breaking, doc inheritance, versions, return values, lint.
pub fn default_resolution_chain() -> Vec<Box<dyn ResolutionPass>> {
    vec![
        Box::new(resolve::CircularDeps),
        Box::new(resolve::InheritDoc),
        Box::new(resolve::Versions),
        Box::new(resolve::ReturnValues),
        Box::new(resolve::Lint),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_order() {
        let enrichment: Vec<_> = default_enrichment_chain().iter().map(|p| p.name()).collect();
        assert_eq!(
            enrichment,
            vec![
                "ignored-classes",
                "global-members",
                "accessors",
                "framework-quirks",
                "enums",
                "overrides",
            ]
        );
        let resolution: Vec<_> = default_resolution_chain().iter().map(|p| p.name()).collect();
        assert_eq!(
            resolution,
            vec!["circular-deps", "inherit-doc", "versions", "return-values", "lint"]
        );
    }
}
