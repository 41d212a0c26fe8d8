use crate::errors::DocError;
use crate::model::{AggregatedDocs, Class};
use crate::progress::ProgressSink;
use crate::relations::Relations;

/// Freeze the enriched mapping into the class graph.
///
/// Global members must have been hoisted or dropped by now; any left over
/// are discarded with a warning.
pub fn build_relations(
    docs: AggregatedDocs,
    sink: &dyn ProgressSink,
) -> Result<Relations, DocError> {
    if !docs.globals.is_empty() {
        sink.warn(&format!(
            "{} global members were never hoisted and are dropped",
            docs.globals.len()
        ));
    }
    let classes = docs
        .classes
        .into_values()
        .map(Class::from_aggregated)
        .collect();
    Relations::new(classes, docs.external, docs.diagnostics)
}
