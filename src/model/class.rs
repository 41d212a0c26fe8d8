//! Class nodes stored in the relations graph.

use super::fragment::{EnumSpec, InheritDocTarget};
use super::{AggregatedClass, Member, MemberKey, MemberKind, MemberTable, SourceLocation};
use serde::Serialize;

/// A documented class (or a memberless stub for an external ancestor).
///
/// Identity fields (name, parent, mixins) are fixed once the graph is built;
/// only cycle breaking may cut an edge. Resolution passes fill derived fields
/// such as inherited docs and versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Class {
    pub(crate) name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) extends: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) mixins: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) alternate_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) aliases: Vec<String>,
    pub(crate) doc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) doc_inherited_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) since: Option<String>,
    pub(crate) is_new: bool,
    pub(crate) singleton: bool,
    pub(crate) private: bool,
    #[serde(skip)]
    pub(crate) declared: bool,
    #[serde(skip)]
    pub(crate) stub: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) enum_spec: Option<EnumSpec>,
    #[serde(skip)]
    pub(crate) inherit_doc: Option<InheritDocTarget>,
    pub(crate) members: MemberTable,
    pub(crate) files: Vec<SourceLocation>,
}

impl Class {
    pub fn from_aggregated(cls: AggregatedClass) -> Self {
        Self {
            name: cls.name,
            extends: cls.extends,
            mixins: cls.mixins,
            alternate_names: cls.alternate_names,
            aliases: cls.aliases,
            doc: cls.doc,
            doc_inherited_from: None,
            since: cls.since,
            is_new: false,
            singleton: cls.singleton,
            private: cls.private,
            declared: cls.declared,
            stub: false,
            enum_spec: cls.enum_spec,
            inherit_doc: cls.inherit_doc,
            members: cls.members,
            files: cls.files,
        }
    }

    /// Memberless placeholder for a referenced but undocumented class.
    pub fn stub(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            mixins: Vec::new(),
            alternate_names: Vec::new(),
            aliases: Vec::new(),
            doc: String::new(),
            doc_inherited_from: None,
            since: None,
            is_new: false,
            singleton: false,
            private: false,
            declared: false,
            stub: true,
            enum_spec: None,
            inherit_doc: None,
            members: MemberTable::new(),
            files: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extends(&self) -> Option<&str> {
        self.extends.as_deref()
    }

    pub fn mixins(&self) -> &[String] {
        &self.mixins
    }

    pub fn alternate_names(&self) -> &[String] {
        &self.alternate_names
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Class whose doc text was copied into this one by `@inheritdoc`.
    pub fn doc_inherited_from(&self) -> Option<&str> {
        self.doc_inherited_from.as_deref()
    }

    pub fn since(&self) -> Option<&str> {
        self.since.as_deref()
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    pub fn is_private(&self) -> bool {
        self.private
    }

    pub fn is_stub(&self) -> bool {
        self.stub
    }

    pub fn is_declared(&self) -> bool {
        self.declared
    }

    pub fn enum_spec(&self) -> Option<&EnumSpec> {
        self.enum_spec.as_ref()
    }

    pub fn members(&self) -> &MemberTable {
        &self.members
    }

    pub fn member(&self, kind: MemberKind, name: &str) -> Option<&Member> {
        self.members.find(kind, name)
    }

    pub(crate) fn member_mut(&mut self, key: &MemberKey) -> Option<&mut Member> {
        self.members.get_mut(key)
    }

    pub fn files(&self) -> &[SourceLocation] {
        &self.files
    }

    pub fn location(&self) -> Option<SourceLocation> {
        self.files.first().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassMergePolicy, Fragment};

    #[test]
    fn built_from_aggregated_record() {
        let mut agg = AggregatedClass::new("Ext.Panel", 0);
        agg.merge_declaration(
            &Fragment::class("Ext.Panel").extends("Ext.Container").since("4.0"),
            ClassMergePolicy::FirstWins,
        );
        agg.add_member(Member::new(MemberKind::Method, "show", "Ext.Panel"));

        let cls = Class::from_aggregated(agg);
        assert_eq!(cls.name(), "Ext.Panel");
        assert_eq!(cls.extends(), Some("Ext.Container"));
        assert_eq!(cls.since(), Some("4.0"));
        assert!(cls.member(MemberKind::Method, "show").is_some());
        assert!(!cls.is_stub());
    }

    #[test]
    fn stub_has_no_members() {
        let stub = Class::stub("Ext.Base");
        assert!(stub.is_stub());
        assert!(stub.members().is_empty());
        assert_eq!(stub.extends(), None);
    }
}
