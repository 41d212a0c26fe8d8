//! Final validation of the resolved model.
//!
//! Lint only appends diagnostics; it never changes the model and never
//! fails the run.

use crate::config::DocConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::model::{Class, Member, MemberKind};
use crate::passes::ResolutionPass;
use crate::relations::Relations;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default)]
pub struct Lint;

impl ResolutionPass for Lint {
    fn name(&self) -> &'static str {
        "lint"
    }

    fn apply(&self, relations: &mut Relations, config: &DocConfig) {
        let mut found = unresolved_references(relations);
        for class in relations.classes() {
            found.extend(lint_class(class, config));
        }
        log::debug!("Lint found {} problems", found.len());
        let diagnostics = relations.diagnostics_mut();
        for diagnostic in found {
            diagnostics.push(diagnostic);
        }
    }
}

/// Parents and mixins that are neither documented nor registered external.
fn unresolved_references(relations: &Relations) -> Vec<Diagnostic> {
    let mut found = Vec::new();
    for stub in relations.stubs().filter(|s| !relations.is_external(s.name())) {
        for child in relations.subclasses_of(stub.name()) {
            found.push(
                Diagnostic::new(
                    DiagnosticKind::UnresolvedReference,
                    format!("Class {} extends unknown class {}", child.name(), stub.name()),
                )
                .for_class(child.name())
                .at(child.location()),
            );
        }
        for host in relations.mixed_into(stub.name()) {
            found.push(
                Diagnostic::new(
                    DiagnosticKind::UnresolvedReference,
                    format!("Class {} mixes in unknown class {}", host.name(), stub.name()),
                )
                .for_class(host.name())
                .at(host.location()),
            );
        }
    }
    found
}

fn member_diagnostic(kind: DiagnosticKind, member: &Member, message: String) -> Diagnostic {
    Diagnostic::new(kind, message)
        .for_class(member.owner.clone())
        .for_member(member.kind, member.name.clone())
        .at(member.location())
}

fn lint_class(class: &Class, config: &DocConfig) -> Vec<Diagnostic> {
    let mut found = Vec::new();

    if !class.is_declared() {
        found.push(
            Diagnostic::new(
                DiagnosticKind::UndeclaredClass,
                format!("Members documented for undeclared class {}", class.name()),
            )
            .for_class(class.name())
            .at(class.location()),
        );
    }

    if config.lint.missing_docs && !class.is_private() && class.doc().trim().is_empty() {
        found.push(
            Diagnostic::new(
                DiagnosticKind::MissingDoc,
                format!("Class {} has no documentation", class.name()),
            )
            .for_class(class.name())
            .at(class.location()),
        );
    }

    if class.enum_spec().is_some()
        && !class
            .members()
            .iter()
            .any(|m| m.kind == MemberKind::Property)
    {
        found.push(
            Diagnostic::new(
                DiagnosticKind::EmptyEnum,
                format!("Enum {} has no values", class.name()),
            )
            .for_class(class.name())
            .at(class.location()),
        );
    }

    for member in class.members().iter() {
        found.extend(lint_member(class, member, config));
    }
    found
}

fn lint_member(class: &Class, member: &Member, config: &DocConfig) -> Vec<Diagnostic> {
    let mut found = Vec::new();

    if member.kind == MemberKind::Method {
        for other in [MemberKind::Property, MemberKind::Cfg] {
            if class.member(other, &member.name).is_some() {
                found.push(member_diagnostic(
                    DiagnosticKind::DuplicateDefinition,
                    member,
                    format!(
                        "Method {} has the same name as {} {} in {}",
                        member.name,
                        other,
                        member.name,
                        class.name()
                    ),
                ));
            }
        }
    }

    if class.is_singleton() && member.is_static {
        found.push(member_diagnostic(
            DiagnosticKind::SingletonStatic,
            member,
            format!(
                "Static {} {} in singleton class {}",
                member.kind,
                member.name,
                class.name()
            ),
        ));
    }

    if config.lint.missing_docs && !member.private && !member.has_doc() {
        found.push(member_diagnostic(
            DiagnosticKind::MissingDoc,
            member,
            format!("Member {} has no documentation", member.path()),
        ));
    }

    if !member.kind.has_params() {
        return found;
    }

    let mut seen = HashSet::new();
    let mut optional_seen = false;
    for param in &member.params {
        if !seen.insert(param.name.as_str()) {
            found.push(member_diagnostic(
                DiagnosticKind::DuplicateParam,
                member,
                format!("Parameter {} of {} listed twice", param.name, member.path()),
            ));
        }
        if param.optional {
            optional_seen = true;
        } else if optional_seen {
            found.push(member_diagnostic(
                DiagnosticKind::OptionalParamOrder,
                member,
                format!(
                    "Required parameter {} of {} follows an optional one",
                    param.name,
                    member.path()
                ),
            ));
        }
        if config.lint.undocumented_params && !member.autodetected && param.doc.trim().is_empty() {
            found.push(member_diagnostic(
                DiagnosticKind::UndocumentedParam,
                member,
                format!("Parameter {} of {} is undocumented", param.name, member.path()),
            ));
        }
    }
    found
}
