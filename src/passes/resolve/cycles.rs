//! Inheritance cycle detection and breaking.
//!
//! Depth-first search over the `extends` and `mixins` edges, starting from
//! every class in name order. Each back edge found closes a cycle and is
//! removed from the graph; removing every back edge of a DFS leaves the
//! graph acyclic, so all later ancestor walks terminate.

use crate::config::DocConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::passes::ResolutionPass;
use crate::relations::{ClassId, Relations};

#[derive(Debug, Clone, Copy, Default)]
pub struct CircularDeps;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Edge {
    Extends,
    Mixin(String),
}

#[derive(Debug)]
struct BackEdge {
    from: ClassId,
    to: ClassId,
    edge: Edge,
    cycle: Vec<ClassId>,
}

struct Search<'a> {
    relations: &'a Relations,
    visited: Vec<bool>,
    rec_stack: Vec<bool>,
    path: Vec<ClassId>,
    back_edges: Vec<BackEdge>,
}

impl<'a> Search<'a> {
    fn new(relations: &'a Relations) -> Self {
        let n = relations.ids().len();
        Self {
            relations,
            visited: vec![false; n],
            rec_stack: vec![false; n],
            path: Vec::new(),
            back_edges: Vec::new(),
        }
    }

    fn edges(&self, id: ClassId) -> Vec<(Edge, ClassId)> {
        let Some(class) = self.relations.by_id(id) else {
            return Vec::new();
        };
        let parent = self
            .relations
            .parent_of(id)
            .map(|parent| (Edge::Extends, parent));
        let mixins = class.mixins().iter().filter_map(|name| {
            self.relations
                .id_of(name)
                .map(|mixin| (Edge::Mixin(name.clone()), mixin))
        });
        parent.into_iter().chain(mixins).collect()
    }

    fn dfs_detect_cycles(&mut self, id: ClassId) {
        self.visited[id] = true;
        self.rec_stack[id] = true;
        self.path.push(id);

        for (edge, next) in self.edges(id) {
            if !self.visited[next] {
                self.dfs_detect_cycles(next);
            } else if self.rec_stack[next] {
                let start = self.path.iter().position(|&p| p == next).unwrap_or(0);
                let mut cycle = self.path[start..].to_vec();
                cycle.push(next);
                self.back_edges.push(BackEdge {
                    from: id,
                    to: next,
                    edge,
                    cycle,
                });
            }
        }

        self.path.pop();
        self.rec_stack[id] = false;
    }
}

impl ResolutionPass for CircularDeps {
    fn name(&self) -> &'static str {
        "circular-deps"
    }

    fn apply(&self, relations: &mut Relations, _config: &DocConfig) {
        let back_edges = {
            let mut search = Search::new(relations);
            for id in relations.ids() {
                if !search.visited[id] {
                    search.dfs_detect_cycles(id);
                }
            }
            search.back_edges
        };

        for back_edge in back_edges {
            let name_of = |id: ClassId| {
                relations
                    .by_id(id)
                    .map(|c| c.name().to_string())
                    .unwrap_or_default()
            };
            let from = name_of(back_edge.from);
            let to = name_of(back_edge.to);
            let cycle: Vec<String> = back_edge.cycle.iter().map(|&id| name_of(id)).collect();
            let location = relations.by_id(back_edge.from).and_then(|c| c.location());

            let removed = match &back_edge.edge {
                Edge::Extends => {
                    relations.cut_parent(back_edge.from);
                    format!("removed parent {} of {}", to, from)
                }
                Edge::Mixin(mixin) => {
                    relations.remove_mixin(back_edge.from, mixin);
                    format!("removed mixin {} of {}", mixin, from)
                }
            };
            log::debug!("Inheritance cycle {}; {}", cycle.join(" -> "), removed);
            relations.diagnostics_mut().push(
                Diagnostic::new(
                    DiagnosticKind::StructuralCycle,
                    format!("Inheritance cycle {}; {}", cycle.join(" -> "), removed),
                )
                .for_class(from)
                .at(location),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::model::{AggregatedClass, Class, ClassMergePolicy, ExternalClasses, Fragment};

    fn relations(fragments: Vec<Fragment>) -> Relations {
        let classes = fragments
            .into_iter()
            .map(|f| {
                let mut agg = AggregatedClass::new(f.name.clone(), 0);
                agg.merge_declaration(&f, ClassMergePolicy::FirstWins);
                Class::from_aggregated(agg)
            })
            .collect();
        Relations::new(classes, ExternalClasses::new(), Diagnostics::new()).unwrap()
    }

    #[test]
    fn test_extends_cycle_is_cut() {
        let mut rel = relations(vec![
            Fragment::class("A").extends("B"),
            Fragment::class("B").extends("A"),
        ]);
        CircularDeps.apply(&mut rel, &DocConfig::default());

        assert_eq!(rel.get("A").unwrap().extends(), Some("B"));
        assert_eq!(rel.get("B").unwrap().extends(), None);
        let cycles: Vec<_> = rel
            .diagnostics()
            .of_kind(DiagnosticKind::StructuralCycle)
            .collect();
        assert_eq!(cycles.len(), 1);
        assert!(cycles[0].message.contains("A -> B -> A"));
    }

    #[test]
    fn test_self_parent_is_cut() {
        let mut rel = relations(vec![Fragment::class("Loop").extends("Loop")]);
        CircularDeps.apply(&mut rel, &DocConfig::default());
        assert_eq!(rel.get("Loop").unwrap().extends(), None);
    }

    #[test]
    fn test_mixin_cycle_drops_mixin() {
        let mut rel = relations(vec![
            Fragment::class("A").mixin("M"),
            Fragment::class("M").extends("A"),
        ]);
        CircularDeps.apply(&mut rel, &DocConfig::default());
        // Search starts at A, so the closing edge is M -> A
        assert_eq!(rel.get("M").unwrap().extends(), None);
        assert_eq!(rel.get("A").unwrap().mixins(), &["M".to_string()]);
        assert_eq!(rel.diagnostics().count_kind(DiagnosticKind::StructuralCycle), 1);
    }

    #[test]
    fn test_mixin_back_edge_removes_mixin() {
        let mut rel = relations(vec![
            Fragment::class("A").extends("B"),
            Fragment::class("B").mixin("A"),
        ]);
        CircularDeps.apply(&mut rel, &DocConfig::default());
        assert_eq!(rel.get("A").unwrap().extends(), Some("B"));
        assert!(rel.get("B").unwrap().mixins().is_empty());
        assert!(rel.mixed_into("A").is_empty());
    }

    #[test]
    fn test_acyclic_graph_untouched() {
        let mut rel = relations(vec![
            Fragment::class("A"),
            Fragment::class("B").extends("A"),
            Fragment::class("C").extends("B").mixin("A"),
        ]);
        CircularDeps.apply(&mut rel, &DocConfig::default());
        assert!(rel.diagnostics().is_empty());
        assert_eq!(rel.get("C").unwrap().mixins(), &["A".to_string()]);
    }
}
