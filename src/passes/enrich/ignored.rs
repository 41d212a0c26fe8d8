use crate::config::DocConfig;
use crate::model::AggregatedDocs;
use crate::passes::EnrichmentPass;

/// Removes `@ignore`d classes. Their names (and alternate names) become
/// external so that classes extending them are not reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoredClasses;

impl EnrichmentPass for IgnoredClasses {
    fn name(&self) -> &'static str {
        "ignored-classes"
    }

    fn apply(&self, docs: &mut AggregatedDocs, _config: &DocConfig) {
        let ignored: Vec<String> = docs
            .classes
            .values()
            .filter(|c| c.ignore)
            .map(|c| c.name.clone())
            .collect();

        for name in ignored {
            if let Some(class) = docs.remove(&name) {
                log::debug!("Ignoring class {}", name);
                docs.external.insert(&name);
                for alt in &class.alternate_names {
                    docs.external.insert(alt);
                }
            }
        }
    }
}
