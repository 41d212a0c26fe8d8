//! Documentation inheritance.
//!
//! A member inherits documentation when its own doc text is empty, or when
//! it carries an `@inheritdoc` tag:
//!
//! - without a target, the member's inheritance chain (ancestors nearest
//!   first, then mixins) is searched for a documented member of the same
//!   kind and name;
//! - with a target (`Class#kind-name`, any part optional), that member is
//!   used directly, looked up in the target class and its own chain.
//!
//! Resolution runs in two phases: every inherited doc is computed against
//! the unmodified graph (memoized, so each member is resolved once, from
//! its nearest documented ancestor), then the results are written back.
//! The `inherited_from` reference always names the member that actually
//! wrote the text, however many hops away.

use crate::config::DocConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::model::{InheritDocTarget, Member, MemberKey, MemberPath};
use crate::passes::ResolutionPass;
use crate::relations::{ClassId, Relations};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default)]
pub struct InheritDoc;

type Slot = (ClassId, MemberKey);

#[derive(Debug, Clone, PartialEq)]
struct Resolved {
    doc: String,
    /// Member whose own text was used; `None` when the doc is the member's own.
    origin: Option<Slot>,
}

struct Resolver<'a> {
    relations: &'a Relations,
    memo: HashMap<Slot, Option<Resolved>>,
    diagnostics: Vec<Diagnostic>,
}

/// A member whose doc is being resolved, with the slots it may copy from.
struct Frame<'a> {
    slot: Slot,
    member: &'a Member,
    candidates: Vec<Slot>,
    next: usize,
}

fn describe(target: &InheritDocTarget) -> String {
    let mut out = target.class.clone().unwrap_or_default();
    if target.member.is_some() || target.kind.is_some() {
        out.push('#');
        if let Some(kind) = target.kind {
            out.push_str(&format!("{}-", kind));
        }
        out.push_str(target.member.as_deref().unwrap_or(""));
    }
    out
}

fn combine(own: &str, inherited: Resolved, source: Slot) -> Resolved {
    let doc = if own.trim().is_empty() {
        inherited.doc
    } else {
        format!("{}\n\n{}", own.trim(), inherited.doc)
    };
    Resolved {
        doc,
        origin: inherited.origin.or(Some(source)),
    }
}

fn has_explicit_target(member: &Member) -> bool {
    member
        .inherit_doc
        .as_ref()
        .is_some_and(|target| !target.is_implicit())
}

impl<'a> Resolver<'a> {
    fn new(relations: &'a Relations) -> Self {
        Self {
            relations,
            memo: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    fn member(&self, slot: &Slot) -> Option<&'a Member> {
        self.relations.by_id(slot.0)?.members().get(&slot.1)
    }

    fn own_doc(member: &Member) -> Option<Resolved> {
        member.has_doc().then(|| Resolved {
            doc: member.doc.clone(),
            origin: None,
        })
    }

    /// Resolve `slot` and everything it depends on. Pending work lives on an
    /// explicit stack, so hierarchy depth never grows the call stack.
    fn resolve(&mut self, slot: Slot) -> Option<Resolved> {
        if let Some(done) = self.memo.get(&slot) {
            return done.clone();
        }

        let mut stack: Vec<Frame<'a>> = Vec::new();
        if let Some(frame) = self.open(slot.clone()) {
            stack.push(frame);
        }
        while let Some(frame) = stack.last_mut() {
            let candidate = frame.candidates.get(frame.next).cloned();
            frame.next += 1;
            let Some(candidate) = candidate else {
                self.finish(&mut stack, None);
                continue;
            };
            match self.memo.get(&candidate).cloned() {
                Some(Some(found)) => self.finish(&mut stack, Some((found, candidate))),
                Some(None) => {}
                None if stack.iter().any(|f| f.slot == candidate) => {
                    self.report_cycle(&stack, &candidate)
                }
                None => {
                    if let Some(frame) = self.open(candidate) {
                        stack.push(frame);
                    }
                }
            }
        }

        self.memo.get(&slot).cloned().flatten()
    }

    /// Start resolving a slot. Returns `None` when the result is known
    /// immediately, after recording it.
    fn open(&mut self, slot: Slot) -> Option<Frame<'a>> {
        let Some(member) = self.member(&slot) else {
            self.memo.insert(slot, None);
            return None;
        };
        let candidates = match &member.inherit_doc {
            Some(target) if !target.is_implicit() => {
                match self.locate(&slot, member, target) {
                    Some(source) => vec![source],
                    None => {
                        self.report_missing(member, target);
                        Vec::new()
                    }
                }
            }
            None if member.has_doc() => {
                self.memo.insert(slot, Self::own_doc(member));
                return None;
            }
            _ => self.chain_candidates(&slot),
        };
        Some(Frame {
            slot,
            member,
            candidates,
            next: 0,
        })
    }

    /// Pop the top frame and record its result.
    fn finish(&mut self, stack: &mut Vec<Frame<'a>>, found: Option<(Resolved, Slot)>) {
        if let Some(frame) = stack.pop() {
            let result = match found {
                Some((inherited, source)) => Some(combine(&frame.member.doc, inherited, source)),
                None => Self::own_doc(frame.member),
            };
            self.memo.insert(frame.slot, result);
        }
    }

    /// Slots searched for an implicit inherit. Only the nearest ancestor
    /// defining the member is listed: if it resolves to nothing, nothing
    /// above it can either. Mixins of the class and of the ancestors below
    /// that one follow. An ancestor with an explicit target breaks that
    /// shortcut, so the full inheritance chain is searched instead.
    fn chain_candidates(&self, slot: &Slot) -> Vec<Slot> {
        let mut owners = vec![slot.0];
        let mut nearest = None;
        let mut current = slot.0;
        while owners.len() <= self.relations.ids().len() {
            let Some(parent) = self.relations.parent_of(current) else {
                break;
            };
            if parent == slot.0 {
                break;
            }
            let candidate = (parent, slot.1.clone());
            if let Some(member) = self.member(&candidate) {
                if has_explicit_target(member) {
                    return self
                        .relations
                        .inheritance_chain(slot.0)
                        .into_iter()
                        .map(|id| (id, slot.1.clone()))
                        .filter(|c| self.member(c).is_some())
                        .collect();
                }
                nearest = Some(candidate);
                break;
            }
            owners.push(parent);
            current = parent;
        }

        let mut seen: HashSet<ClassId> = HashSet::from([slot.0]);
        let mut candidates = Vec::new();
        if let Some(nearest) = nearest {
            seen.insert(nearest.0);
            candidates.push(nearest);
        }
        for owner in owners {
            for mixin in self.relations.mixin_ids(owner) {
                let candidate = (mixin, slot.1.clone());
                if seen.insert(mixin) && self.member(&candidate).is_some() {
                    candidates.push(candidate);
                }
            }
        }
        candidates
    }

    fn report_cycle(&mut self, stack: &[Frame<'a>], slot: &Slot) {
        let Some(member) = self.member(slot) else {
            return;
        };
        let chain: Vec<String> = stack
            .iter()
            .map(|f| &f.slot)
            .skip_while(|s| *s != slot)
            .chain(std::iter::once(slot))
            .filter_map(|s| self.member(s))
            .map(|m| m.path().to_string())
            .collect();
        self.diagnostics.push(
            Diagnostic::new(
                DiagnosticKind::StructuralCycle,
                format!("@inheritdoc cycle {}", chain.join(" -> ")),
            )
            .for_class(member.owner.clone())
            .for_member(member.kind, member.name.clone())
            .at(member.location()),
        );
    }

    fn report_missing(&mut self, member: &Member, target: &InheritDocTarget) {
        self.diagnostics.push(
            Diagnostic::new(
                DiagnosticKind::UnresolvedReference,
                format!(
                    "@inheritdoc target {} of {} not found",
                    describe(target),
                    member.path()
                ),
            )
            .for_class(member.owner.clone())
            .for_member(member.kind, member.name.clone())
            .at(member.location()),
        );
    }

    fn locate(&self, slot: &Slot, member: &Member, target: &InheritDocTarget) -> Option<Slot> {
        let class_name = target.class.as_deref().unwrap_or(&member.owner);
        let start = self.relations.id_of(class_name)?;
        let name = target.member.as_deref().unwrap_or(&member.name);
        let kind = target.kind.unwrap_or(member.kind);

        std::iter::once(start)
            .chain(self.relations.inheritance_chain(start))
            .find_map(|id| {
                let class = self.relations.by_id(id)?;
                class
                    .member(kind, name)
                    .or_else(|| {
                        target
                            .kind
                            .is_none()
                            .then(|| class.members().find_any(name))
                            .flatten()
                    })
                    .map(|m| (id, m.key()))
                    // `@inheritdoc #name` in the same class never points at itself
                    .filter(|found| target.class.is_some() || found != slot)
            })
    }

    /// Slots that need resolving, in class then member order.
    fn pending(&self) -> Vec<Slot> {
        self.relations
            .ids()
            .filter_map(|id| self.relations.by_id(id).map(|c| (id, c)))
            .filter(|(_, class)| !class.is_stub())
            .flat_map(|(id, class)| {
                class
                    .members()
                    .iter()
                    .filter(|m| !m.has_doc() || m.inherit_doc.is_some())
                    .map(move |m| (id, m.key()))
            })
            .collect()
    }
}

/// Class-level `@inheritdoc`: copy the doc of the named class, or of the
/// parent when no class is named.
fn resolve_class_docs(
    relations: &Relations,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<(ClassId, String, String)> {
    let mut updates = Vec::new();
    for id in relations.ids() {
        let Some(class) = relations.by_id(id) else {
            continue;
        };
        let Some(target) = &class.inherit_doc else {
            continue;
        };
        let source = match &target.class {
            Some(name) => relations.id_of(name),
            None => relations.parent_of(id),
        }
        .and_then(|sid| relations.by_id(sid))
        .filter(|source| {
            !source.is_stub() && !source.doc().trim().is_empty() && source.name() != class.name()
        });

        match source {
            Some(source) => {
                let doc = if class.doc().trim().is_empty() {
                    source.doc().to_string()
                } else {
                    format!("{}\n\n{}", class.doc().trim(), source.doc())
                };
                updates.push((id, doc, source.name().to_string()));
            }
            None => diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::UnresolvedReference,
                    format!(
                        "@inheritdoc target {} of class {} not found",
                        target.class.as_deref().unwrap_or("(parent)"),
                        class.name()
                    ),
                )
                .for_class(class.name())
                .at(class.location()),
            ),
        }
    }
    updates
}

impl ResolutionPass for InheritDoc {
    fn name(&self) -> &'static str {
        "inherit-doc"
    }

    fn apply(&self, relations: &mut Relations, _config: &DocConfig) {
        let (member_updates, class_updates, diagnostics) = {
            let mut resolver = Resolver::new(relations);
            let mut updates = Vec::new();
            for slot in resolver.pending() {
                if let Some(Resolved {
                    doc,
                    origin: Some(origin),
                }) = resolver.resolve(slot.clone())
                {
                    updates.push((slot, doc, origin));
                }
            }
            let mut diagnostics = resolver.diagnostics;
            let class_updates = resolve_class_docs(relations, &mut diagnostics);
            (updates, class_updates, diagnostics)
        };

        for ((id, key), doc, origin) in member_updates {
            let Some(source) = relations
                .by_id(origin.0)
                .and_then(|c| c.members().get(&origin.1))
                .cloned()
            else {
                continue;
            };
            let Some(member) = relations.class_mut(id).and_then(|c| c.member_mut(&key)) else {
                continue;
            };
            member.doc = doc;
            member.inherited_from = Some(MemberPath {
                class: source.owner.clone(),
                kind: source.kind,
                name: source.name.clone(),
            });
            if member.params.is_empty() {
                member.params = source.params;
            }
            if member.returns.is_none() {
                member.returns = source.returns;
            }
            if member.type_name.is_none() {
                member.type_name = source.type_name;
            }
        }

        for (id, doc, source) in class_updates {
            if let Some(class) = relations.class_mut(id) {
                class.doc = doc;
                class.doc_inherited_from = Some(source);
            }
        }

        let sink = relations.diagnostics_mut();
        for diagnostic in diagnostics {
            sink.push(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::model::{
        AggregatedClass, Class, ClassMergePolicy, ExternalClasses, Fragment, MemberKind, Param,
    };

    fn class(fragment: Fragment, members: Vec<Member>) -> Class {
        let mut agg = AggregatedClass::new(fragment.name.clone(), 0);
        agg.merge_declaration(&fragment, ClassMergePolicy::FirstWins);
        for member in members {
            agg.add_member(member);
        }
        Class::from_aggregated(agg)
    }

    fn method(owner: &str, name: &str, doc: &str) -> Member {
        let mut m = Member::new(MemberKind::Method, name, owner);
        m.doc = doc.into();
        m
    }

    fn resolve(classes: Vec<Class>) -> Relations {
        let mut rel = Relations::new(classes, ExternalClasses::new(), Diagnostics::new()).unwrap();
        InheritDoc.apply(&mut rel, &DocConfig::default());
        rel
    }

    #[test]
    fn test_empty_doc_inherited_from_parent() {
        let mut documented = method("A", "bar", "hello");
        documented.params.push(Param::new("x", Some("Number"), "The x."));
        let rel = resolve(vec![
            class(Fragment::class("A"), vec![documented]),
            class(Fragment::class("B").extends("A"), vec![method("B", "bar", "")]),
        ]);

        let bar = rel.get("B").unwrap().member(MemberKind::Method, "bar").unwrap();
        assert_eq!(bar.doc, "hello");
        assert_eq!(bar.inherited_from.as_ref().unwrap().to_string(), "A#method-bar");
        assert_eq!(bar.params.len(), 1);
    }

    #[test]
    fn test_multi_level_points_at_original() {
        let rel = resolve(vec![
            class(Fragment::class("A"), vec![method("A", "bar", "root")]),
            class(Fragment::class("B").extends("A"), vec![method("B", "bar", "")]),
            class(Fragment::class("C").extends("B"), vec![method("C", "bar", "")]),
        ]);
        let bar = rel.get("C").unwrap().member(MemberKind::Method, "bar").unwrap();
        assert_eq!(bar.doc, "root");
        assert_eq!(bar.inherited_from.as_ref().unwrap().class, "A");
    }

    #[test]
    fn test_mixin_searched_after_ancestors() {
        let rel = resolve(vec![
            class(Fragment::class("Base"), vec![]),
            class(Fragment::class("Mix"), vec![method("Mix", "run", "from mixin")]),
            class(
                Fragment::class("Child").extends("Base").mixin("Mix"),
                vec![method("Child", "run", "")],
            ),
        ]);
        let run = rel.get("Child").unwrap().member(MemberKind::Method, "run").unwrap();
        assert_eq!(run.doc, "from mixin");
    }

    #[test]
    fn test_explicit_target_across_classes() {
        let mut member = method("Util", "each", "");
        member.inherit_doc = Some(InheritDocTarget::parse("Ext.Array#forEach"));
        let rel = resolve(vec![
            class(Fragment::class("Ext.Array"), vec![method("Ext.Array", "forEach", "Iterates.")]),
            class(Fragment::class("Util"), vec![member]),
        ]);
        let each = rel.get("Util").unwrap().member(MemberKind::Method, "each").unwrap();
        assert_eq!(each.doc, "Iterates.");
        assert_eq!(each.inherited_from.as_ref().unwrap().name, "forEach");
    }

    #[test]
    fn test_missing_explicit_target_recorded() {
        let mut member = method("Util", "each", "");
        member.inherit_doc = Some(InheritDocTarget::parse("Nowhere#each"));
        let rel = resolve(vec![class(Fragment::class("Util"), vec![member])]);

        let each = rel.get("Util").unwrap().member(MemberKind::Method, "each").unwrap();
        assert!(each.doc.is_empty());
        assert!(each.inherited_from.is_none());
        assert_eq!(
            rel.diagnostics().count_kind(DiagnosticKind::UnresolvedReference),
            1
        );
    }

    #[test]
    fn test_explicit_cycle_detected() {
        let mut a = method("A", "foo", "");
        a.inherit_doc = Some(InheritDocTarget::parse("B#foo"));
        let mut b = method("B", "foo", "");
        b.inherit_doc = Some(InheritDocTarget::parse("A#foo"));
        let rel = resolve(vec![
            class(Fragment::class("A"), vec![a]),
            class(Fragment::class("B"), vec![b]),
        ]);
        assert_eq!(rel.diagnostics().count_kind(DiagnosticKind::StructuralCycle), 1);
        assert!(rel.get("A").unwrap().member(MemberKind::Method, "foo").unwrap().doc.is_empty());
    }

    #[test]
    fn test_deep_chain_resolves_from_root() {
        let depth = 3000;
        let classes = (0..depth)
            .map(|i| {
                let name = format!("C{i}");
                let fragment = match i {
                    0 => Fragment::class(&name),
                    _ => Fragment::class(&name).extends(&format!("C{}", i - 1)),
                };
                let doc = if i == 0 { "Runs it." } else { "" };
                class(fragment, vec![method(&name, "run", doc)])
            })
            .collect();
        let rel = resolve(classes);

        let last = format!("C{}", depth - 1);
        let run = rel.get(&last).unwrap().member(MemberKind::Method, "run").unwrap();
        assert_eq!(run.doc, "Runs it.");
        assert_eq!(run.inherited_from.as_ref().unwrap().class, "C0");
        assert_eq!(rel.diagnostics().len(), 0);
    }

    #[test]
    fn test_mixin_of_intermediate_ancestor_searched() {
        let rel = resolve(vec![
            class(Fragment::class("A"), vec![method("A", "run", "")]),
            class(Fragment::class("B").extends("A").mixin("Mix"), vec![]),
            class(Fragment::class("C").extends("B"), vec![method("C", "run", "")]),
            class(Fragment::class("Mix"), vec![method("Mix", "run", "mixed in")]),
        ]);
        let run = rel.get("C").unwrap().member(MemberKind::Method, "run").unwrap();
        assert_eq!(run.doc, "mixed in");
        assert_eq!(run.inherited_from.as_ref().unwrap().class, "Mix");
    }

    #[test]
    fn test_class_level_inheritdoc() {
        let rel = resolve(vec![
            class(Fragment::class("A").doc("Base docs."), vec![]),
            class(Fragment::class("B").extends("A").inherit_doc(""), vec![]),
        ]);
        let b = rel.get("B").unwrap();
        assert_eq!(b.doc(), "Base docs.");
        assert_eq!(b.doc_inherited_from(), Some("A"));
    }
}
