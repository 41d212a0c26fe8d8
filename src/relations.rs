//! The class graph.
//!
//! [`Relations`] owns every [`Class`] in one arena, sorted by name, and keeps
//! the graph edges as names inside the classes. Lookups go through the name
//! and alternate-name indexes; the reverse edges (subclasses, mixed-into)
//! are index lists rebuilt whenever cycle breaking cuts an edge.
//!
//! Every name referenced as a parent or mixin but not documented gets a
//! memberless stub node, so traversals never dangle.

use crate::diagnostics::Diagnostics;
use crate::errors::DocError;
use crate::model::{Class, ExternalClasses};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Index of a class inside [`Relations`].
pub type ClassId = usize;

#[derive(Debug, Clone)]
pub struct Relations {
    classes: Vec<Class>,
    by_name: HashMap<String, ClassId>,
    by_alt_name: HashMap<String, ClassId>,
    subclasses: Vec<Vec<ClassId>>,
    mixed_into: Vec<Vec<ClassId>>,
    external: ExternalClasses,
    diagnostics: Diagnostics,
}

/// Serializable view of a finished model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSnapshot {
    pub classes: Vec<Class>,
    pub stubs: Vec<String>,
    pub diagnostics: Diagnostics,
}

impl Relations {
    /// Build the graph. Fails if two classes share a name.
    pub fn new(
        classes: Vec<Class>,
        external: ExternalClasses,
        diagnostics: Diagnostics,
    ) -> Result<Self, DocError> {
        let mut seen = HashSet::with_capacity(classes.len());
        for class in &classes {
            if !seen.insert(class.name().to_string()) {
                return Err(DocError::DuplicateClass(class.name().to_string()));
            }
        }

        let alt_names: HashSet<&str> = classes
            .iter()
            .flat_map(|c| c.alternate_names().iter().map(String::as_str))
            .collect();
        let missing: BTreeSet<String> = classes
            .iter()
            .flat_map(|c| c.extends().into_iter().chain(c.mixins().iter().map(String::as_str)))
            .filter(|name| !seen.contains(*name) && !alt_names.contains(name))
            .map(str::to_string)
            .collect();

        let mut all = classes;
        all.extend(missing.into_iter().map(Class::stub));
        all.sort_by(|a, b| a.name().cmp(b.name()));

        let by_name = all
            .iter()
            .enumerate()
            .map(|(id, c)| (c.name().to_string(), id))
            .collect::<HashMap<_, _>>();
        let mut by_alt_name = HashMap::new();
        for (id, class) in all.iter().enumerate() {
            for alt in class.alternate_names() {
                if !by_name.contains_key(alt) {
                    by_alt_name.entry(alt.clone()).or_insert(id);
                }
            }
        }

        let mut relations = Self {
            subclasses: Vec::new(),
            mixed_into: Vec::new(),
            classes: all,
            by_name,
            by_alt_name,
            external,
            diagnostics,
        };
        relations.reindex();
        log::debug!(
            "Built relations: {} classes, {} stubs",
            relations.len(),
            relations.stubs().count()
        );
        Ok(relations)
    }

    fn reindex(&mut self) {
        let mut subclasses = vec![Vec::new(); self.classes.len()];
        let mut mixed_into = vec![Vec::new(); self.classes.len()];
        for (id, class) in self.classes.iter().enumerate() {
            if let Some(parent) = class.extends().and_then(|p| self.id_of(p)) {
                subclasses[parent].push(id);
            }
            for mixin in class.mixins() {
                if let Some(mixin) = self.id_of(mixin) {
                    mixed_into[mixin].push(id);
                }
            }
        }
        self.subclasses = subclasses;
        self.mixed_into = mixed_into;
    }

    /// Resolve a class name or alternate name.
    pub fn id_of(&self, name: &str) -> Option<ClassId> {
        self.by_name
            .get(name)
            .or_else(|| self.by_alt_name.get(name))
            .copied()
    }

    pub fn get(&self, name: &str) -> Option<&Class> {
        self.id_of(name).map(|id| &self.classes[id])
    }

    pub fn by_id(&self, id: ClassId) -> Option<&Class> {
        self.classes.get(id)
    }

    pub(crate) fn class_mut(&mut self, id: ClassId) -> Option<&mut Class> {
        self.classes.get_mut(id)
    }

    /// Every node id, stubs included, in name order.
    pub fn ids(&self) -> std::ops::Range<ClassId> {
        0..self.classes.len()
    }

    /// Documented classes in name order.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.iter().filter(|c| !c.is_stub())
    }

    /// Stub nodes for referenced but undocumented classes.
    pub fn stubs(&self) -> impl Iterator<Item = &Class> {
        self.classes.iter().filter(|c| c.is_stub())
    }

    /// Number of documented classes.
    pub fn len(&self) -> usize {
        self.classes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn external(&self) -> &ExternalClasses {
        &self.external
    }

    pub fn is_external(&self, name: &str) -> bool {
        self.external.contains(name)
    }

    /// Documented locally or registered as external.
    pub fn is_known(&self, name: &str) -> bool {
        self.get(name).is_some_and(|c| !c.is_stub()) || self.is_external(name)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub(crate) fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn parent_of(&self, id: ClassId) -> Option<ClassId> {
        self.classes
            .get(id)
            .and_then(|c| c.extends())
            .and_then(|p| self.id_of(p))
    }

    /// Parent chain of a class, nearest first. The walk stops after as many
    /// steps as there are nodes, so it terminates even on a cyclic graph.
    pub fn ancestor_ids(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            if chain.len() >= self.classes.len() || parent == id {
                break;
            }
            chain.push(parent);
            current = self.parent_of(parent);
        }
        chain
    }

    pub fn ancestors(&self, name: &str) -> Vec<&Class> {
        self.id_of(name)
            .map(|id| self.ancestor_ids(id).into_iter().map(|a| &self.classes[a]).collect())
            .unwrap_or_default()
    }

    pub fn mixin_ids(&self, id: ClassId) -> Vec<ClassId> {
        self.classes
            .get(id)
            .map(|c| c.mixins().iter().filter_map(|m| self.id_of(m)).collect())
            .unwrap_or_default()
    }

    pub fn mixins_of(&self, name: &str) -> Vec<&Class> {
        self.id_of(name)
            .map(|id| self.mixin_ids(id).into_iter().map(|m| &self.classes[m]).collect())
            .unwrap_or_default()
    }

    pub fn subclasses_of(&self, name: &str) -> Vec<&Class> {
        self.id_of(name)
            .map(|id| self.subclasses[id].iter().map(|&s| &self.classes[s]).collect())
            .unwrap_or_default()
    }

    pub fn mixed_into(&self, name: &str) -> Vec<&Class> {
        self.id_of(name)
            .map(|id| self.mixed_into[id].iter().map(|&s| &self.classes[s]).collect())
            .unwrap_or_default()
    }

    /// Classes searched when a member of `id` inherits something: the
    /// ancestors nearest first, then the mixins of the class and of each
    /// ancestor in declaration order. Each class appears once.
    pub fn inheritance_chain(&self, id: ClassId) -> Vec<ClassId> {
        let ancestors = self.ancestor_ids(id);
        let mut seen: HashSet<ClassId> = HashSet::from([id]);
        let mut chain = Vec::new();
        for &ancestor in &ancestors {
            if seen.insert(ancestor) {
                chain.push(ancestor);
            }
        }
        for owner in std::iter::once(id).chain(ancestors) {
            for mixin in self.mixin_ids(owner) {
                if seen.insert(mixin) {
                    chain.push(mixin);
                }
            }
        }
        chain
    }

    /// Drop the `extends` edge of a class.
    pub(crate) fn cut_parent(&mut self, id: ClassId) {
        if let Some(class) = self.classes.get_mut(id) {
            class.extends = None;
        }
        self.reindex();
    }

    /// Drop one mixin edge of a class.
    pub(crate) fn remove_mixin(&mut self, id: ClassId, mixin: &str) {
        if let Some(class) = self.classes.get_mut(id) {
            class.mixins.retain(|m| m != mixin);
        }
        self.reindex();
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            classes: self.classes().cloned().collect(),
            stubs: self.stubs().map(|c| c.name().to_string()).collect(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}
