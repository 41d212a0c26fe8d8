//! Class members and the per-class member table.

use super::fragment::{Fragment, InheritDocTarget, Param, ReturnSpec};
use super::SourceLocation;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Method,
    Property,
    Cfg,
    Event,
    CssVar,
    CssMixin,
}

impl MemberKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Property => "property",
            Self::Cfg => "cfg",
            Self::Event => "event",
            Self::CssVar => "css_var",
            Self::CssMixin => "css_mixin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "method" => Some(Self::Method),
            "property" => Some(Self::Property),
            "cfg" => Some(Self::Cfg),
            "event" => Some(Self::Event),
            "css_var" | "var" => Some(Self::CssVar),
            "css_mixin" => Some(Self::CssMixin),
            _ => None,
        }
    }

    /// Kinds that carry a parameter list.
    pub fn has_params(self) -> bool {
        matches!(self, Self::Method | Self::Event | Self::CssMixin)
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a member within one class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberKey {
    pub kind: MemberKind,
    pub name: String,
}

impl MemberKey {
    pub fn new(kind: MemberKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.name)
    }
}

/// Fully qualified pointer to a member of some class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MemberPath {
    pub class: String,
    pub kind: MemberKind,
    pub name: String,
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}-{}", self.class, self.kind, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub owner: String,
    pub doc: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<ReturnSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub is_static: bool,
    pub private: bool,
    #[serde(skip)]
    pub accessor: bool,
    #[serde(skip)]
    pub evented: bool,
    /// Synthesized by a pass rather than written in source.
    pub autodetected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    pub is_new: bool,
    #[serde(skip)]
    pub inherit_doc: Option<InheritDocTarget>,
    /// Member whose documentation was copied into this one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<MemberPath>,
    pub files: Vec<SourceLocation>,
}

impl Member {
    pub fn new(kind: MemberKind, name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            owner: owner.into(),
            doc: String::new(),
            params: Vec::new(),
            returns: None,
            type_name: None,
            default_value: None,
            is_static: false,
            private: false,
            accessor: false,
            evented: false,
            autodetected: false,
            since: None,
            is_new: false,
            inherit_doc: None,
            inherited_from: None,
            files: Vec::new(),
        }
    }

    /// Build a member from a member fragment. Returns `None` for class fragments.
    pub fn from_fragment(fragment: &Fragment, owner: &str) -> Option<Self> {
        let kind = fragment.member_kind()?;
        Some(Self {
            name: fragment.name.clone(),
            kind,
            owner: owner.to_string(),
            doc: fragment.doc.clone(),
            params: fragment.params.clone(),
            returns: fragment.returns.clone(),
            type_name: fragment.type_name.clone(),
            default_value: fragment.default_value.clone(),
            is_static: fragment.is_static,
            private: fragment.private,
            accessor: fragment.accessor,
            evented: fragment.evented,
            autodetected: false,
            since: fragment.since.clone(),
            is_new: false,
            inherit_doc: fragment.inherit_doc.clone(),
            inherited_from: None,
            files: vec![fragment.location.clone()],
        })
    }

    pub fn key(&self) -> MemberKey {
        MemberKey::new(self.kind, self.name.clone())
    }

    pub fn path(&self) -> MemberPath {
        MemberPath {
            class: self.owner.clone(),
            kind: self.kind,
            name: self.name.clone(),
        }
    }

    pub fn has_doc(&self) -> bool {
        !self.doc.trim().is_empty()
    }

    pub fn location(&self) -> Option<SourceLocation> {
        self.files.first().cloned()
    }
}

/// Members of one class keyed by (kind, name), in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberTable {
    members: Vec<Member>,
    index: HashMap<MemberKey, usize>,
}

impl MemberTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a member, replacing any member with the same key in place.
    /// The replaced member is returned so callers can report the shadowing.
    pub fn insert(&mut self, member: Member) -> Option<Member> {
        let key = member.key();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.members[pos], member)),
            None => {
                self.index.insert(key, self.members.len());
                self.members.push(member);
                None
            }
        }
    }

    pub fn get(&self, key: &MemberKey) -> Option<&Member> {
        self.index.get(key).map(|&pos| &self.members[pos])
    }

    pub fn get_mut(&mut self, key: &MemberKey) -> Option<&mut Member> {
        self.index.get(key).map(|&pos| &mut self.members[pos])
    }

    pub fn find(&self, kind: MemberKind, name: &str) -> Option<&Member> {
        self.get(&MemberKey::new(kind, name))
    }

    /// First member with this name, whatever its kind.
    pub fn find_any(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn contains(&self, kind: MemberKind, name: &str) -> bool {
        self.index.contains_key(&MemberKey::new(kind, name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Member> {
        self.members.iter_mut()
    }

    pub fn of_kind(&self, kind: MemberKind) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(move |m| m.kind == kind)
    }

    pub fn keys(&self) -> Vec<MemberKey> {
        self.members.iter().map(Member::key).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl IntoIterator for MemberTable {
    type Item = Member;
    type IntoIter = std::vec::IntoIter<Member>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl Serialize for MemberTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.members.iter())
    }
}
