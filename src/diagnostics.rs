//! Recoverable problems found while aggregating and resolving classes.
//!
//! Diagnostics never stop the pipeline. They are accumulated in the order the
//! stages discover them and handed to the caller together with the final
//! [`Relations`](crate::relations::Relations).

use crate::model::{MemberKind, SourceLocation};
use serde::Serialize;
use std::fmt;

/// Broad class of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCategory {
    UnresolvedReference,
    StructuralCycle,
    DuplicateDefinition,
    Lint,
}

/// Concrete kind of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// `extends`, mixin, override or `@inheritdoc` target that resolves to nothing.
    UnresolvedReference,
    /// Inheritance, mixin or explicit doc-inheritance cycle.
    StructuralCycle,
    /// Same (kind, name) member defined twice, or clashing member names.
    DuplicateDefinition,
    /// Alternate class name used as a class name, or pointing at itself.
    AlternateName,
    /// Members were documented for a class that is never declared.
    UndeclaredClass,
    UndocumentedParam,
    DuplicateParam,
    /// Optional parameter followed by a required one.
    OptionalParamOrder,
    SingletonStatic,
    EmptyEnum,
    MissingDoc,
}

impl DiagnosticKind {
    pub fn category(self) -> DiagnosticCategory {
        match self {
            Self::UnresolvedReference => DiagnosticCategory::UnresolvedReference,
            Self::StructuralCycle => DiagnosticCategory::StructuralCycle,
            Self::DuplicateDefinition | Self::AlternateName => {
                DiagnosticCategory::DuplicateDefinition
            }
            Self::UndeclaredClass
            | Self::UndocumentedParam
            | Self::DuplicateParam
            | Self::OptionalParamOrder
            | Self::SingletonStatic
            | Self::EmptyEnum
            | Self::MissingDoc => DiagnosticCategory::Lint,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnresolvedReference => "unresolved-reference",
            Self::StructuralCycle => "cycle",
            Self::DuplicateDefinition => "duplicate",
            Self::AlternateName => "alt-name",
            Self::UndeclaredClass => "undeclared-class",
            Self::UndocumentedParam => "undocumented-param",
            Self::DuplicateParam => "duplicate-param",
            Self::OptionalParamOrder => "optional-param-order",
            Self::SingletonStatic => "singleton-static",
            Self::EmptyEnum => "empty-enum",
            Self::MissingDoc => "missing-doc",
        }
    }
}

/// Member a diagnostic points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRef {
    pub kind: MemberKind,
    pub name: String,
}

/// A single recorded problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            class: None,
            member: None,
            location: None,
        }
    }

    pub fn for_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn for_member(mut self, kind: MemberKind, name: impl Into<String>) -> Self {
        self.member = Some(MemberRef {
            kind,
            name: name.into(),
        });
        self
    }

    pub fn at(mut self, location: Option<SourceLocation>) -> Self {
        self.location = location;
        self
    }

    pub fn category(&self) -> DiagnosticCategory {
        self.kind.category()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{}: ", location)?;
        }
        write!(f, "[{}] {}", self.kind.as_str(), self.message)
    }
}

/// Ordered diagnostic list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("{}", diagnostic);
        self.0.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(move |d| d.kind == kind)
    }

    pub fn count_kind(&self, kind: DiagnosticKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn categories_follow_taxonomy() {
        assert_eq!(
            DiagnosticKind::AlternateName.category(),
            DiagnosticCategory::DuplicateDefinition
        );
        assert_eq!(
            DiagnosticKind::UndocumentedParam.category(),
            DiagnosticCategory::Lint
        );
        assert_eq!(
            DiagnosticKind::StructuralCycle.category(),
            DiagnosticCategory::StructuralCycle
        );
    }

    #[test]
    fn display_includes_location() {
        let d = Diagnostic::new(DiagnosticKind::DuplicateDefinition, "method foo shadowed")
            .for_class("A")
            .at(Some(SourceLocation::new(PathBuf::from("a.js"), 3)));
        assert_eq!(d.to_string(), "a.js:3: [duplicate] method foo shadowed");
    }

    #[test]
    fn count_by_kind() {
        let mut all = Diagnostics::new();
        all.push(Diagnostic::new(DiagnosticKind::EmptyEnum, "x"));
        all.push(Diagnostic::new(DiagnosticKind::EmptyEnum, "y"));
        all.push(Diagnostic::new(DiagnosticKind::MissingDoc, "z"));
        assert_eq!(all.count_kind(DiagnosticKind::EmptyEnum), 2);
        assert_eq!(all.len(), 3);
    }
}
