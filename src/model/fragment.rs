//! Raw parser output.

use super::{MemberKind, SourceLocation};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whether a fragment declares a class or one of its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    Class,
    Member(MemberKind),
}

/// How the class was declared in code. Only used to decide whether the
/// framework-specific normalization applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeType {
    #[default]
    Plain,
    /// Declared through the framework's `Ext.define(...)` call.
    ExtDefine,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub doc: String,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, type_name: Option<&str>, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.map(str::to_string),
            doc: doc.into(),
            optional: false,
            default_value: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnSpec {
    pub type_name: String,
    pub doc: String,
}

impl ReturnSpec {
    pub fn new(type_name: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            doc: doc.into(),
        }
    }
}

/// Target of an explicit `@inheritdoc` tag. Any part may be missing: a
/// missing class means "same class", a missing member means "same name",
/// a missing kind means "same kind".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InheritDocTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<MemberKind>,
}

impl InheritDocTarget {
    /// Parse `Class`, `Class#member`, `#member` or `Class#kind-member`.
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        let (class, member) = match spec.split_once('#') {
            Some((class, member)) => (class, Some(member)),
            None => (spec, None),
        };
        let (kind, member) = match member {
            Some(m) => match m
                .split_once('-')
                .and_then(|(k, n)| MemberKind::parse(k).map(|k| (k, n)))
            {
                Some((kind, name)) => (Some(kind), Some(name.to_string())),
                None => (None, Some(m.to_string())),
            },
            None => (None, None),
        };
        Self {
            class: (!class.is_empty()).then(|| class.to_string()),
            member: member.filter(|m| !m.is_empty()),
            kind,
        }
    }

    /// True when no part of the target was given (bare `@inheritdoc`).
    pub fn is_implicit(&self) -> bool {
        self.class.is_none() && self.member.is_none() && self.kind.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub doc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnumSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Wildcard default such as `widget.*`, expanded from class aliases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub doc_only: bool,
    pub values: Vec<EnumValue>,
}

/// One documented entity as produced by a parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub kind: FragmentKind,
    /// Full dotted class name for class fragments; member name otherwise.
    pub name: String,
    /// Explicit owning class of a member (`@member`).
    pub owner: Option<String>,
    pub extends: Option<String>,
    pub mixins: Vec<String>,
    pub alternate_names: Vec<String>,
    pub aliases: Vec<String>,
    pub override_target: Option<String>,
    pub doc: String,
    pub params: Vec<Param>,
    pub returns: Option<ReturnSpec>,
    pub type_name: Option<String>,
    pub default_value: Option<String>,
    pub inherit_doc: Option<InheritDocTarget>,
    pub since: Option<String>,
    pub enum_spec: Option<EnumSpec>,
    pub code_type: CodeType,
    pub ignore: bool,
    pub singleton: bool,
    pub is_static: bool,
    pub private: bool,
    pub accessor: bool,
    pub evented: bool,
    pub location: SourceLocation,
}

impl Fragment {
    fn blank(kind: FragmentKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            owner: None,
            extends: None,
            mixins: Vec::new(),
            alternate_names: Vec::new(),
            aliases: Vec::new(),
            override_target: None,
            doc: String::new(),
            params: Vec::new(),
            returns: None,
            type_name: None,
            default_value: None,
            inherit_doc: None,
            since: None,
            enum_spec: None,
            code_type: CodeType::Plain,
            ignore: false,
            singleton: false,
            is_static: false,
            private: false,
            accessor: false,
            evented: false,
            location: SourceLocation::new(PathBuf::new(), 0),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::blank(FragmentKind::Class, name)
    }

    pub fn member(kind: MemberKind, name: impl Into<String>) -> Self {
        Self::blank(FragmentKind::Member(kind), name)
    }

    pub fn is_class(&self) -> bool {
        self.kind == FragmentKind::Class
    }

    pub fn member_kind(&self) -> Option<MemberKind> {
        match self.kind {
            FragmentKind::Member(kind) => Some(kind),
            FragmentKind::Class => None,
        }
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    pub fn mixin(mut self, mixin: impl Into<String>) -> Self {
        self.mixins.push(mixin.into());
        self
    }

    pub fn alternate_name(mut self, name: impl Into<String>) -> Self {
        self.alternate_names.push(name.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn overrides(mut self, target: impl Into<String>) -> Self {
        self.override_target = Some(target.into());
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, type_name: impl Into<String>, doc: impl Into<String>) -> Self {
        self.returns = Some(ReturnSpec::new(type_name, doc));
        self
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn inherit_doc(mut self, target: &str) -> Self {
        self.inherit_doc = Some(InheritDocTarget::parse(target));
        self
    }

    pub fn since(mut self, version: impl Into<String>) -> Self {
        self.since = Some(version.into());
        self
    }

    pub fn enum_spec(mut self, spec: EnumSpec) -> Self {
        self.enum_spec = Some(spec);
        self
    }

    pub fn code_type(mut self, code_type: CodeType) -> Self {
        self.code_type = code_type;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn accessor(mut self) -> Self {
        self.accessor = true;
        self
    }

    pub fn evented(mut self) -> Self {
        self.evented = true;
        self
    }

    pub fn at(mut self, file: impl Into<PathBuf>, line: usize) -> Self {
        self.location = SourceLocation::new(file, line);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inheritdoc_class_and_member() {
        let target = InheritDocTarget::parse("Ext.Base#getId");
        assert_eq!(target.class.as_deref(), Some("Ext.Base"));
        assert_eq!(target.member.as_deref(), Some("getId"));
        assert_eq!(target.kind, None);
    }

    #[test]
    fn inheritdoc_with_kind_prefix() {
        let target = InheritDocTarget::parse("Ext.Panel#cfg-title");
        assert_eq!(target.kind, Some(MemberKind::Cfg));
        assert_eq!(target.member.as_deref(), Some("title"));
    }

    #[test]
    fn inheritdoc_member_only_keeps_hyphenated_names() {
        let target = InheritDocTarget::parse("#before-render");
        assert_eq!(target.class, None);
        assert_eq!(target.kind, None);
        assert_eq!(target.member.as_deref(), Some("before-render"));
    }

    #[test]
    fn bare_inheritdoc_is_implicit() {
        assert!(InheritDocTarget::parse("").is_implicit());
        assert!(!InheritDocTarget::parse("Foo").is_implicit());
    }

    #[test]
    fn builder_sets_member_kind() {
        let frag = Fragment::member(MemberKind::Event, "click").owner("Ext.Button");
        assert_eq!(frag.member_kind(), Some(MemberKind::Event));
        assert!(!frag.is_class());
        assert_eq!(frag.owner.as_deref(), Some("Ext.Button"));
    }
}
