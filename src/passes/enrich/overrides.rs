use crate::config::DocConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::model::{AggregatedClass, AggregatedDocs};
use crate::passes::EnrichmentPass;

/// Folds `@override` classes into their targets.
///
/// Overrides are applied in the order the aggregator first saw them, so a
/// later override replaces members set by an earlier one. Every override
/// class is removed and its name registered as external, whether or not its
/// target exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides;

impl EnrichmentPass for Overrides {
    fn name(&self) -> &'static str {
        "overrides"
    }

    fn apply(&self, docs: &mut AggregatedDocs, _config: &DocConfig) {
        let overrides: Vec<String> = docs
            .names_in_order()
            .into_iter()
            .filter(|name| docs.get(name).is_some_and(|c| c.override_target.is_some()))
            .collect();

        for name in overrides {
            let Some(source) = docs.remove(&name) else {
                continue;
            };
            docs.external.insert(&name);
            let Some(target_name) = source.override_target.clone() else {
                continue;
            };

            match find_target(docs, &target_name) {
                Some(key) => {
                    if let Some(target) = docs.get_mut(&key) {
                        log::debug!("Merging override {} into {}", name, key);
                        merge_override(target, source);
                    }
                }
                None => docs.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::UnresolvedReference,
                        format!("Override target {} of {} not found", target_name, name),
                    )
                    .for_class(name.clone())
                    .at(source.files.first().cloned()),
                ),
            }
        }
    }
}

/// Resolve an override target by name or alternate name.
fn find_target(docs: &AggregatedDocs, target: &str) -> Option<String> {
    if docs.contains(target) {
        return Some(target.to_string());
    }
    docs.classes
        .values()
        .find(|c| c.alternate_names.iter().any(|alt| alt == target))
        .map(|c| c.name.clone())
}

fn merge_override(target: &mut AggregatedClass, source: AggregatedClass) {
    if !source.doc.trim().is_empty() {
        let section = format!("**From override {}:** {}", source.name, source.doc.trim());
        target.doc = if target.doc.trim().is_empty() {
            section
        } else {
            format!("{}\n\n{}", target.doc, section)
        };
    }

    for mut member in source.members {
        member.owner = target.name.clone();
        if let Some(replaced) = target.members.insert(member) {
            // An undocumented override keeps the documentation it replaces
            let key = replaced.key();
            if let Some(current) = target.members.get_mut(&key) {
                if !current.has_doc() {
                    current.doc = replaced.doc;
                }
            }
        }
    }

    target.files.extend(source.files);
}
