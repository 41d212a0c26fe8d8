use super::ENRICHING;
use crate::config::DocConfig;
use crate::model::AggregatedDocs;
use crate::passes::EnrichmentPass;
use crate::progress::ProgressSink;

/// Run the enrichment chain in order over the aggregated mapping.
pub fn enrich(
    mut docs: AggregatedDocs,
    config: &DocConfig,
    chain: &[Box<dyn EnrichmentPass>],
    sink: &dyn ProgressSink,
) -> AggregatedDocs {
    for pass in chain {
        let before = docs.diagnostics.len();
        pass.apply(&mut docs, config);
        log::debug!(
            "Enrichment pass {}: {} classes, {} new diagnostics",
            pass.name(),
            docs.len(),
            docs.diagnostics.len() - before
        );
        sink.notify(ENRICHING, pass.name());
    }
    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassMergePolicy, Fragment};
    use crate::passes::default_enrichment_chain;
    use crate::progress::RecordingProgressSink;

    #[test]
    fn test_runs_chain_in_order() {
        let mut docs = AggregatedDocs::default();
        docs.class_entry("Hidden")
            .merge_declaration(&Fragment::class("Hidden").ignored(), ClassMergePolicy::FirstWins);
        let sink = RecordingProgressSink::new();

        let docs = enrich(docs, &DocConfig::default(), &default_enrichment_chain(), &sink);

        assert!(!docs.contains("Hidden"));
        assert!(docs.external.contains("Hidden"));
        assert_eq!(
            sink.notified(ENRICHING),
            vec![
                "ignored-classes",
                "global-members",
                "accessors",
                "framework-quirks",
                "enums",
                "overrides"
            ]
        );
    }
}
