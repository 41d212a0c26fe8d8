use super::RESOLVING;
use crate::config::DocConfig;
use crate::diagnostics::DiagnosticCategory;
use crate::passes::ResolutionPass;
use crate::progress::ProgressSink;
use crate::relations::Relations;

/// Run the resolution chain in order over the built graph.
///
/// Structural cycles found by a pass are also reported as warnings, since
/// breaking one changes the documented hierarchy.
pub fn resolve(
    mut relations: Relations,
    config: &DocConfig,
    chain: &[Box<dyn ResolutionPass>],
    sink: &dyn ProgressSink,
) -> Relations {
    for pass in chain {
        let before = relations.diagnostics().len();
        pass.apply(&mut relations, config);
        log::debug!("Resolution pass {} done", pass.name());
        relations.diagnostics().as_slice()[before..]
            .iter()
            .filter(|d| d.category() == DiagnosticCategory::StructuralCycle)
            .for_each(|d| sink.warn(&d.message));
        sink.notify(RESOLVING, pass.name());
    }
    log::info!(
        "Resolved {} classes with {} diagnostics",
        relations.len(),
        relations.diagnostics().len()
    );
    relations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticKind, Diagnostics};
    use crate::model::{AggregatedClass, Class, ClassMergePolicy, ExternalClasses, Fragment};
    use crate::passes::default_resolution_chain;
    use crate::progress::RecordingProgressSink;

    #[test]
    fn test_cycle_is_broken_before_later_passes() {
        let classes = ["A", "B"]
            .iter()
            .zip(["B", "A"])
            .map(|(name, parent)| {
                let mut agg = AggregatedClass::new(*name, 0);
                agg.merge_declaration(
                    &Fragment::class(*name).extends(parent).doc("Doc."),
                    ClassMergePolicy::FirstWins,
                );
                Class::from_aggregated(agg)
            })
            .collect();
        let relations =
            Relations::new(classes, ExternalClasses::new(), Diagnostics::new()).unwrap();
        let sink = RecordingProgressSink::new();

        let chain = default_resolution_chain();
        let relations = resolve(relations, &DocConfig::default(), &chain, &sink);

        assert_eq!(relations.diagnostics().count_kind(DiagnosticKind::StructuralCycle), 1);
        let warnings = sink.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Inheritance cycle"));
        assert_eq!(sink.notified(RESOLVING).len(), 5);
        assert_eq!(sink.notified(RESOLVING)[0], "circular-deps");
    }
}
