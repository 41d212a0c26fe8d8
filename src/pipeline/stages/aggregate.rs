//! Fold the ordered parse results into one class mapping.
//!
//! Files are consumed in input order and fragments in emission order, so
//! the mapping depends only on that order and never on which parse worker
//! finished first.

use super::AGGREGATING;
use crate::config::DocConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::model::{AggregatedDocs, Fragment, Member};
use crate::parser::FileParseResult;
use crate::progress::ProgressSink;
use std::collections::HashMap;

pub fn aggregate(
    results: Vec<FileParseResult>,
    config: &DocConfig,
    sink: &dyn ProgressSink,
) -> AggregatedDocs {
    let mut aggregator = Aggregator::new(config);
    for result in results {
        sink.notify(AGGREGATING, &result.path.display().to_string());
        aggregator.add_file(result);
    }
    log::info!(
        "Aggregated {} classes ({} global members)",
        aggregator.docs.len(),
        aggregator.docs.globals.len()
    );
    aggregator.docs
}

struct Aggregator<'a> {
    config: &'a DocConfig,
    docs: AggregatedDocs,
    /// Alternate name -> canonical class name.
    alt_names: HashMap<String, String>,
}

impl<'a> Aggregator<'a> {
    fn new(config: &'a DocConfig) -> Self {
        Self {
            config,
            docs: AggregatedDocs::new(config.external_set()),
            alt_names: HashMap::new(),
        }
    }

    fn add_file(&mut self, result: FileParseResult) {
        // Members without @member belong to the last class declared above them.
        let mut current: Option<String> = None;
        for fragment in result.fragments {
            if fragment.is_class() {
                current = Some(self.add_class(&fragment));
            } else {
                self.add_member(&fragment, current.as_deref());
            }
        }
    }

    fn canonical(&mut self, fragment: &Fragment, name: &str) -> String {
        match self.alt_names.get(name) {
            Some(canonical) => {
                let canonical = canonical.clone();
                self.docs.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::AlternateName,
                        format!("{} is an alternate name of {}; merged into it", name, canonical),
                    )
                    .for_class(canonical.clone())
                    .at(Some(fragment.location.clone())),
                );
                canonical
            }
            None => name.to_string(),
        }
    }

    fn add_class(&mut self, fragment: &Fragment) -> String {
        let name = self.canonical(fragment, &fragment.name);
        self.docs
            .class_entry(&name)
            .merge_declaration(fragment, self.config.class_merge);

        for alt in &fragment.alternate_names {
            self.register_alternate_name(fragment, &name, alt);
        }
        name
    }

    fn register_alternate_name(&mut self, fragment: &Fragment, name: &str, alt: &str) {
        let location = Some(fragment.location.clone());
        if alt == name {
            if let Some(class) = self.docs.get_mut(name) {
                class.alternate_names.retain(|a| a != alt);
            }
            self.docs.diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::AlternateName,
                    format!("Class {} lists itself as an alternate name", name),
                )
                .for_class(name)
                .at(location),
            );
            return;
        }

        if let Some(owner) = self.alt_names.get(alt) {
            if owner != name {
                let message = format!(
                    "Alternate name {} of {} is already taken by {}",
                    alt, name, owner
                );
                self.docs.diagnostics.push(
                    Diagnostic::new(DiagnosticKind::AlternateName, message)
                        .for_class(name)
                        .at(location),
                );
            }
            return;
        }
        self.alt_names.insert(alt.to_string(), name.to_string());

        let Some(existing) = self.docs.get(alt) else {
            return;
        };
        if existing.declared {
            self.docs.diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::AlternateName,
                    format!("Alternate name {} of {} is also declared as a class", alt, name),
                )
                .for_class(name)
                .at(location),
            );
            return;
        }

        // Members documented earlier under the alternate name move over.
        if let Some(placeholder) = self.docs.remove(alt) {
            let locations: HashMap<_, _> = placeholder
                .members
                .iter()
                .map(|m| (m.key(), m.location()))
                .collect();
            let dropped = self.docs.class_entry(name).absorb(placeholder);
            for key in dropped {
                self.docs.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::DuplicateDefinition,
                        format!(
                            "{} {} documented under alternate name {} is already defined in {}",
                            key.kind, key.name, alt, name
                        ),
                    )
                    .for_class(name)
                    .for_member(key.kind, key.name.clone())
                    .at(locations.get(&key).cloned().flatten()),
                );
            }
        }
    }

    fn add_member(&mut self, fragment: &Fragment, current: Option<&str>) {
        if fragment.ignore {
            log::debug!("Skipping ignored member {} at {}", fragment.name, fragment.location);
            return;
        }
        let owner = match &fragment.owner {
            Some(owner) => Some(self.canonical(fragment, owner)),
            None => current.map(str::to_string),
        };

        let Some(owner) = owner else {
            if let Some(member) = Member::from_fragment(fragment, "") {
                self.docs.globals.push(member);
            }
            return;
        };
        let Some(member) = Member::from_fragment(fragment, &owner) else {
            return;
        };

        let location = member.location();
        if let Some(previous) = self.docs.class_entry(&owner).add_member(member) {
            let earlier = previous
                .location()
                .map(|l| format!(" at {}", l))
                .unwrap_or_default();
            self.docs.diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::DuplicateDefinition,
                    format!(
                        "Member {} redefined; earlier definition{} is shadowed",
                        previous.path(),
                        earlier
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
    use crate::model::{ClassMergePolicy, MemberKind};
    use crate::progress::{RecordingProgressSink, SilentProgressSink};

    fn file(path: &str, fragments: Vec<Fragment>) -> FileParseResult {
        let fragments = fragments
            .into_iter()
            .enumerate()
            .map(|(i, f)| f.at(path, i + 1))
            .collect();
        FileParseResult::new(path, fragments)
    }

    fn method(name: &str, doc: &str) -> Fragment {
        Fragment::member(MemberKind::Method, name).doc(doc)
    }

    #[test]
    fn test_later_file_wins_member_merge() {
        let docs = aggregate(
            vec![
                file("a.js", vec![Fragment::class("A"), method("foo", "x")]),
                file("b.js", vec![Fragment::class("A"), method("foo", "y")]),
            ],
            &DocConfig::default(),
            &SilentProgressSink,
        );
        let a = docs.get("A").unwrap();
        assert_eq!(a.members.find(MemberKind::Method, "foo").unwrap().doc, "y");
        let dups: Vec<_> = docs
            .diagnostics
            .of_kind(DiagnosticKind::DuplicateDefinition)
            .collect();
        assert_eq!(dups.len(), 1);
        assert!(dups[0].message.contains("a.js:2"));
        assert_eq!(dups[0].location.as_ref().map(|l| l.line), Some(2));
    }

    #[test]
    fn test_members_attach_to_current_class() {
        let docs = aggregate(
            vec![
                file("globals.js", vec![method("helper", "Help.")]),
                file(
                    "a.js",
                    vec![
                        Fragment::class("A"),
                        method("run", ""),
                        Fragment::class("B"),
                        method("stop", ""),
                        method("other", "").owner("A"),
                    ],
                ),
            ],
            &DocConfig::default(),
            &SilentProgressSink,
        );
        assert_eq!(docs.globals.len(), 1);
        let a = docs.get("A").unwrap();
        assert!(a.members.contains(MemberKind::Method, "run"));
        assert!(a.members.contains(MemberKind::Method, "other"));
        let b = docs.get("B").unwrap();
        assert!(b.members.contains(MemberKind::Method, "stop"));
        assert_eq!(b.members.len(), 1);
    }

    #[test]
    fn test_class_attributes_follow_merge_policy() {
        let files = || {
            vec![
                file("a.js", vec![Fragment::class("A").extends("Base").mixin("M1")]),
                file("b.js", vec![Fragment::class("A").extends("Other").mixin("M2")]),
            ]
        };
        let first = aggregate(files(), &DocConfig::default(), &SilentProgressSink);
        assert_eq!(first.get("A").unwrap().extends.as_deref(), Some("Base"));
        assert_eq!(first.get("A").unwrap().mixins, vec!["M1", "M2"]);

        let config = DocConfig {
            class_merge: ClassMergePolicy::LastWins,
            ..DocConfig::default()
        };
        let last = aggregate(files(), &config, &SilentProgressSink);
        assert_eq!(last.get("A").unwrap().extends.as_deref(), Some("Other"));
    }

    #[test]
    fn test_alternate_names_merge_into_canonical() {
        let docs = aggregate(
            vec![
                file(
                    "early.js",
                    vec![method("legacy", "Old.").owner("Ext.OldPanel")],
                ),
                file(
                    "panel.js",
                    vec![Fragment::class("Ext.Panel").alternate_name("Ext.OldPanel")],
                ),
                file(
                    "late.js",
                    vec![Fragment::class("Ext.OldPanel"), method("extra", "More.")],
                ),
            ],
            &DocConfig::default(),
            &SilentProgressSink,
        );
        assert!(!docs.contains("Ext.OldPanel"));
        let panel = docs.get("Ext.Panel").unwrap();
        assert!(panel.members.contains(MemberKind::Method, "legacy"));
        assert!(panel.members.contains(MemberKind::Method, "extra"));
        assert_eq!(
            panel.members.find(MemberKind::Method, "legacy").unwrap().owner,
            "Ext.Panel"
        );
        assert_eq!(docs.diagnostics.count_kind(DiagnosticKind::AlternateName), 1);
    }

    #[test]
    fn test_self_alternate_name_is_diagnosed() {
        let docs = aggregate(
            vec![file("a.js", vec![Fragment::class("A").alternate_name("A")])],
            &DocConfig::default(),
            &SilentProgressSink,
        );
        assert!(docs.get("A").unwrap().alternate_names.is_empty());
        assert_eq!(docs.diagnostics.count_kind(DiagnosticKind::AlternateName), 1);
    }

    #[test]
    fn test_ignored_members_are_dropped() {
        let docs = aggregate(
            vec![file("a.js", vec![Fragment::class("A"), method("hidden", "").ignored()])],
            &DocConfig::default(),
            &SilentProgressSink,
        );
        assert!(docs.get("A").unwrap().members.is_empty());
    }

    #[test]
    fn test_undeclared_owner_creates_placeholder() {
        let sink = RecordingProgressSink::new();
        let docs = aggregate(
            vec![file("a.js", vec![method("run", "").owner("Ghost")])],
            &DocConfig::default(),
            &sink,
        );
        assert!(!docs.get("Ghost").unwrap().declared);
        assert_eq!(sink.notified(AGGREGATING), vec!["a.js"]);
    }
}
