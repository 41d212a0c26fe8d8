use crate::config::DocConfig;
use crate::model::MemberKey;
use crate::passes::ResolutionPass;
use crate::relations::{ClassId, Relations};

/// Fills in `since` versions and the `is_new` flag.
///
/// A class without `@since` takes the configured default. A member without
/// one takes the nearest explicit version of the same member along its
/// inheritance chain, falling back to its class's version.
#[derive(Debug, Clone, Copy, Default)]
pub struct Versions;

impl ResolutionPass for Versions {
    fn name(&self) -> &'static str {
        "versions"
    }

    fn apply(&self, relations: &mut Relations, config: &DocConfig) {
        let class_since: Vec<Option<String>> = relations
            .ids()
            .map(|id| {
                relations
                    .by_id(id)
                    .and_then(|c| c.since().map(str::to_string))
                    .or_else(|| config.default_since.clone())
            })
            .collect();

        let mut member_since: Vec<(ClassId, MemberKey, Option<String>)> = Vec::new();
        for id in relations.ids() {
            let Some(class) = relations.by_id(id) else {
                continue;
            };
            if class.is_stub() {
                continue;
            }
            let chain = relations.inheritance_chain(id);
            for member in class.members().iter() {
                let key = member.key();
                let since = member
                    .since
                    .clone()
                    .or_else(|| {
                        chain.iter().find_map(|&ancestor| {
                            relations
                                .by_id(ancestor)?
                                .members()
                                .get(&key)?
                                .since
                                .clone()
                        })
                    })
                    .or_else(|| class_since[id].clone());
                member_since.push((id, key, since));
            }
        }

        let is_new = |since: &Option<String>| {
            config.new_since.is_some() && since.as_ref() == config.new_since.as_ref()
        };

        for id in relations.ids() {
            if let Some(class) = relations.class_mut(id) {
                if class.is_stub() {
                    continue;
                }
                class.since = class_since[id].clone();
                class.is_new = is_new(&class.since);
            }
        }
        for (id, key, since) in member_since {
            if let Some(member) = relations.class_mut(id).and_then(|c| c.member_mut(&key)) {
                member.is_new = is_new(&since);
                member.since = since;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::model::{
        AggregatedClass, Class, ClassMergePolicy, ExternalClasses, Fragment, Member, MemberKind,
    };

    fn class(fragment: Fragment, members: Vec<Member>) -> Class {
        let mut agg = AggregatedClass::new(fragment.name.clone(), 0);
        agg.merge_declaration(&fragment, ClassMergePolicy::FirstWins);
        for member in members {
            agg.add_member(member);
        }
        Class::from_aggregated(agg)
    }

    fn method(owner: &str, name: &str, since: Option<&str>) -> Member {
        let mut m = Member::new(MemberKind::Method, name, owner);
        m.since = since.map(str::to_string);
        m
    }

    #[test]
    fn test_version_propagation() {
        let mut rel = Relations::new(
            vec![
                class(Fragment::class("A").since("1.0"), vec![method("A", "run", Some("1.5"))]),
                class(
                    Fragment::class("B").extends("A"),
                    vec![method("B", "run", None), method("B", "stop", None)],
                ),
            ],
            ExternalClasses::new(),
            Diagnostics::new(),
        )
        .unwrap();
        let config = DocConfig {
            default_since: Some("2.0".into()),
            new_since: Some("2.0".into()),
            ..DocConfig::default()
        };
        Versions.apply(&mut rel, &config);

        let a = rel.get("A").unwrap();
        assert_eq!(a.since(), Some("1.0"));
        assert!(!a.is_new());

        let b = rel.get("B").unwrap();
        assert_eq!(b.since(), Some("2.0"));
        assert!(b.is_new());
        let run = b.member(MemberKind::Method, "run").unwrap();
        assert_eq!(run.since.as_deref(), Some("1.5"));
        assert!(!run.is_new);
        let stop = b.member(MemberKind::Method, "stop").unwrap();
        assert_eq!(stop.since.as_deref(), Some("2.0"));
        assert!(stop.is_new);
    }

    #[test]
    fn test_no_versions_configured() {
        let mut rel = Relations::new(
            vec![class(Fragment::class("A"), vec![method("A", "run", None)])],
            ExternalClasses::new(),
            Diagnostics::new(),
        )
        .unwrap();
        Versions.apply(&mut rel, &DocConfig::default());
        let a = rel.get("A").unwrap();
        assert_eq!(a.since(), None);
        assert!(!a.member(MemberKind::Method, "run").unwrap().is_new);
    }
}
