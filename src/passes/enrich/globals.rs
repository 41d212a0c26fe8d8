use crate::config::DocConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::model::AggregatedDocs;
use crate::passes::EnrichmentPass;

pub const GLOBAL_CLASS_DOC: &str = "Global variables and functions.";

/// Moves members declared outside any class into the synthetic global
/// class, or drops them when `ignore_global` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalMembers;

impl EnrichmentPass for GlobalMembers {
    fn name(&self) -> &'static str {
        "global-members"
    }

    fn apply(&self, docs: &mut AggregatedDocs, config: &DocConfig) {
        if docs.globals.is_empty() {
            return;
        }
        let globals = std::mem::take(&mut docs.globals);
        if config.ignore_global {
            log::debug!("Dropping {} global members", globals.len());
            return;
        }

        let owner = config.global_class_name.clone();
        let mut shadowed = Vec::new();
        let class = docs.class_entry(&owner);
        class.declared = true;
        if class.doc.trim().is_empty() {
            class.doc = GLOBAL_CLASS_DOC.to_string();
        }
        for mut member in globals {
            member.owner = owner.clone();
            let location = member.location();
            if let Some(previous) = class.add_member(member) {
                shadowed.push((previous, location));
            }
        }

        for (previous, location) in shadowed {
            docs.diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::DuplicateDefinition,
                    format!(
                        "Global {} {} redefined; earlier definition{} is shadowed",
                        previous.kind,
                        previous.name,
                        previous
                            .location()
                            .map(|l| format!(" at {}", l))
                            .unwrap_or_default()
                    ),
                )
                .for_class(owner.clone())
                .for_member(previous.kind, previous.name.clone())
                .at(location),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Member, MemberKind};

    fn docs_with_globals() -> AggregatedDocs {
        let mut docs = AggregatedDocs::default();
        docs.globals
            .push(Member::new(MemberKind::Method, "setTimeout", ""));
        docs.globals.push(Member::new(MemberKind::Property, "window", ""));
        docs
    }

    #[test]
    fn test_globals_hoisted_into_global_class() {
        let mut docs = docs_with_globals();
        GlobalMembers.apply(&mut docs, &DocConfig::default());

        let global = docs.get("global").unwrap();
        assert!(global.declared);
        assert_eq!(global.doc, GLOBAL_CLASS_DOC);
        assert_eq!(global.members.len(), 2);
        assert!(global.members.iter().all(|m| m.owner == "global"));
        assert!(docs.globals.is_empty());
    }

    #[test]
    fn test_ignore_global_drops_members() {
        let mut docs = docs_with_globals();
        let config = DocConfig {
            ignore_global: true,
            ..DocConfig::default()
        };
        GlobalMembers.apply(&mut docs, &config);
        assert!(docs.is_empty());
        assert!(docs.globals.is_empty());
    }

    #[test]
    fn test_duplicate_global_recorded() {
        let mut docs = docs_with_globals();
        docs.globals
            .push(Member::new(MemberKind::Method, "setTimeout", ""));
        GlobalMembers.apply(&mut docs, &DocConfig::default());
        assert_eq!(
            docs.diagnostics
                .count_kind(DiagnosticKind::DuplicateDefinition),
            1
        );
    }
}
