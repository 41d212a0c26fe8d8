//! Per-class accumulation built by the aggregator and rewritten by the
//! enrichment passes.

use super::fragment::{CodeType, EnumSpec, Fragment, InheritDocTarget};
use super::{ExternalClasses, Member, MemberKey, MemberTable, SourceLocation};
use crate::diagnostics::Diagnostics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How single-valued class attributes combine when a class is reopened in
/// a later fragment. List attributes (mixins, alternate names, aliases)
/// always accumulate, and boolean flags are always or-ed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassMergePolicy {
    /// The first non-empty value seen in aggregation order is kept.
    #[default]
    FirstWins,
    /// Every later non-empty value replaces the previous one.
    LastWins,
}

impl ClassMergePolicy {
    fn merge<T: Clone>(self, slot: &mut Option<T>, incoming: &Option<T>) {
        if let Some(value) = incoming {
            if slot.is_none() || self == Self::LastWins {
                *slot = Some(value.clone());
            }
        }
    }

    fn merge_doc(self, slot: &mut String, incoming: &str) {
        if incoming.trim().is_empty() {
            return;
        }
        if slot.trim().is_empty() || self == Self::LastWins {
            *slot = incoming.to_string();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedClass {
    pub name: String,
    /// Creation order within the aggregation; stable tie-breaker for passes
    /// that must follow input order.
    pub seq: usize,
    /// False while the class only exists because a member named it as owner.
    pub declared: bool,
    pub extends: Option<String>,
    pub mixins: Vec<String>,
    pub alternate_names: Vec<String>,
    pub aliases: Vec<String>,
    pub doc: String,
    pub since: Option<String>,
    pub singleton: bool,
    pub private: bool,
    pub ignore: bool,
    pub override_target: Option<String>,
    pub enum_spec: Option<EnumSpec>,
    pub code_type: CodeType,
    pub inherit_doc: Option<InheritDocTarget>,
    pub members: MemberTable,
    pub files: Vec<SourceLocation>,
}

impl AggregatedClass {
    pub fn new(name: impl Into<String>, seq: usize) -> Self {
        Self {
            name: name.into(),
            seq,
            declared: false,
            extends: None,
            mixins: Vec::new(),
            alternate_names: Vec::new(),
            aliases: Vec::new(),
            doc: String::new(),
            since: None,
            singleton: false,
            private: false,
            ignore: false,
            override_target: None,
            enum_spec: None,
            code_type: CodeType::Plain,
            inherit_doc: None,
            members: MemberTable::new(),
            files: Vec::new(),
        }
    }

    /// Fold a class-level fragment into this record.
    pub fn merge_declaration(&mut self, fragment: &Fragment, policy: ClassMergePolicy) {
        self.declared = true;
        policy.merge(&mut self.extends, &fragment.extends);
        policy.merge(&mut self.since, &fragment.since);
        policy.merge(&mut self.override_target, &fragment.override_target);
        policy.merge(&mut self.enum_spec, &fragment.enum_spec);
        policy.merge(&mut self.inherit_doc, &fragment.inherit_doc);
        policy.merge_doc(&mut self.doc, &fragment.doc);

        if fragment.code_type != CodeType::Plain {
            self.code_type = fragment.code_type;
        }
        self.singleton |= fragment.singleton;
        self.private |= fragment.private;
        self.ignore |= fragment.ignore;

        extend_unique(&mut self.mixins, &fragment.mixins);
        extend_unique(&mut self.alternate_names, &fragment.alternate_names);
        extend_unique(&mut self.aliases, &fragment.aliases);
        self.files.push(fragment.location.clone());
    }

    /// Fold a record that was aggregated earlier under another name (an
    /// alternate name of this class) into this one. Attributes already set
    /// here win; members already present here win. Returns the keys of the
    /// members that were dropped from `other`.
    pub fn absorb(&mut self, other: AggregatedClass) -> Vec<MemberKey> {
        let policy = ClassMergePolicy::FirstWins;
        policy.merge(&mut self.extends, &other.extends);
        policy.merge(&mut self.since, &other.since);
        policy.merge(&mut self.override_target, &other.override_target);
        policy.merge(&mut self.enum_spec, &other.enum_spec);
        policy.merge(&mut self.inherit_doc, &other.inherit_doc);
        policy.merge_doc(&mut self.doc, &other.doc);
        self.declared |= other.declared;
        self.singleton |= other.singleton;
        self.private |= other.private;
        self.ignore |= other.ignore;
        extend_unique(&mut self.mixins, &other.mixins);
        extend_unique(&mut self.aliases, &other.aliases);
        self.files.extend(other.files);

        let mut dropped = Vec::new();
        for mut member in other.members {
            let key = member.key();
            if self.members.get(&key).is_some() {
                dropped.push(key);
            } else {
                member.owner = self.name.clone();
                self.members.insert(member);
            }
        }
        dropped
    }

    /// Insert a member, returning the member it shadows.
    pub fn add_member(&mut self, member: Member) -> Option<Member> {
        self.members.insert(member)
    }
}

fn extend_unique(target: &mut Vec<String>, incoming: &[String]) {
    for item in incoming {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

/// The class mapping handed from the aggregator through the enrichment chain.
#[derive(Debug, Clone, Default)]
pub struct AggregatedDocs {
    pub classes: BTreeMap<String, AggregatedClass>,
    /// Members declared outside of any class, waiting to be hoisted.
    pub globals: Vec<Member>,
    pub external: ExternalClasses,
    pub diagnostics: Diagnostics,
    next_seq: usize,
}

impl AggregatedDocs {
    pub fn new(external: ExternalClasses) -> Self {
        Self {
            external,
            ..Self::default()
        }
    }

    /// Get the record for `name`, creating an undeclared one if needed.
    pub fn class_entry(&mut self, name: &str) -> &mut AggregatedClass {
        let next_seq = &mut self.next_seq;
        self.classes.entry(name.to_string()).or_insert_with(|| {
            let seq = *next_seq;
            *next_seq += 1;
            AggregatedClass::new(name, seq)
        })
    }

    pub fn get(&self, name: &str) -> Option<&AggregatedClass> {
        self.classes.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AggregatedClass> {
        self.classes.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<AggregatedClass> {
        self.classes.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Class names in the order the aggregator first saw them.
    pub fn names_in_order(&self) -> Vec<String> {
        let mut ordered: Vec<_> = self.classes.values().map(|c| (c.seq, &c.name)).collect();
        ordered.sort();
        ordered.into_iter().map(|(_, n)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MemberKind;

    #[test]
    fn first_wins_keeps_earliest_parent() {
        let mut cls = AggregatedClass::new("A", 0);
        let first = Fragment::class("A").extends("B").mixin("M1");
        let second = Fragment::class("A").extends("C").mixin("M2").mixin("M1");
        cls.merge_declaration(&first, ClassMergePolicy::FirstWins);
        cls.merge_declaration(&second, ClassMergePolicy::FirstWins);
        assert_eq!(cls.extends.as_deref(), Some("B"));
        assert_eq!(cls.mixins, vec!["M1", "M2"]);
        assert_eq!(cls.files.len(), 2);
    }

    #[test]
    fn last_wins_takes_latest_non_empty() {
        let mut cls = AggregatedClass::new("A", 0);
        let first = Fragment::class("A").extends("B").doc("first");
        cls.merge_declaration(&first, ClassMergePolicy::LastWins);
        cls.merge_declaration(&Fragment::class("A").extends("C"), ClassMergePolicy::LastWins);
        assert_eq!(cls.extends.as_deref(), Some("C"));
        assert_eq!(cls.doc, "first");
    }

    #[test]
    fn flags_are_sticky() {
        let mut cls = AggregatedClass::new("A", 0);
        cls.merge_declaration(&Fragment::class("A").singleton(), ClassMergePolicy::FirstWins);
        cls.merge_declaration(&Fragment::class("A"), ClassMergePolicy::LastWins);
        assert!(cls.singleton);
        assert!(cls.declared);
    }

    #[test]
    fn absorb_keeps_existing_members() {
        let mut canonical = AggregatedClass::new("Ext.Panel", 1);
        canonical.add_member(Member::new(MemberKind::Method, "show", "Ext.Panel"));
        let mut alias = AggregatedClass::new("Ext.Pnl", 0);
        alias.add_member(Member::new(MemberKind::Method, "show", "Ext.Pnl"));
        alias.add_member(Member::new(MemberKind::Method, "hide", "Ext.Pnl"));

        let dropped = canonical.absorb(alias);
        assert_eq!(dropped, vec![MemberKey::new(MemberKind::Method, "show")]);
        let hide = canonical.members.find(MemberKind::Method, "hide").unwrap();
        assert_eq!(hide.owner, "Ext.Panel");
    }

    #[test]
    fn names_follow_creation_order() {
        let mut docs = AggregatedDocs::default();
        docs.class_entry("Zeta");
        docs.class_entry("Alpha");
        docs.class_entry("Zeta");
        assert_eq!(docs.names_in_order(), vec!["Zeta", "Alpha"]);
    }
}
