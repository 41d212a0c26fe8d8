use crate::config::DocConfig;
use crate::model::{AggregatedDocs, Member, MemberKind, Param, ReturnSpec};
use crate::passes::EnrichmentPass;

/// Synthesizes `getX`/`setX` methods for `@accessor` configs and
/// properties, plus an `xchange` event for `@evented` ones. Members that
/// are already documented are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accessors;

impl EnrichmentPass for Accessors {
    fn name(&self) -> &'static str {
        "accessors"
    }

    fn apply(&self, docs: &mut AggregatedDocs, _config: &DocConfig) {
        for class in docs.classes.values_mut() {
            let synthesized: Vec<Member> = class
                .members
                .iter()
                .filter(|m| m.accessor && matches!(m.kind, MemberKind::Cfg | MemberKind::Property))
                .flat_map(accessor_members)
                .collect();

            for member in synthesized {
                if !class.members.contains(member.kind, &member.name) {
                    log::trace!("Synthesized {} {}#{}", member.kind, class.name, member.name);
                    class.members.insert(member);
                }
            }
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn synthesized(source: &Member, kind: MemberKind, name: String, doc: String) -> Member {
    let mut member = Member::new(kind, name, source.owner.clone());
    member.doc = doc;
    member.autodetected = true;
    member.since = source.since.clone();
    member.private = source.private;
    member.files = source.files.clone();
    member
}

fn accessor_members(source: &Member) -> Vec<Member> {
    let cap = capitalize(&source.name);
    let link = format!("{{@link #{}-{}}}", source.kind, source.name);
    let type_name = source.type_name.clone().unwrap_or_else(|| "Object".to_string());

    let mut getter = synthesized(
        source,
        MemberKind::Method,
        format!("get{}", cap),
        format!("Returns the value of {}.", link),
    );
    getter.returns = Some(ReturnSpec::new(type_name.clone(), ""));

    let mut setter = synthesized(
        source,
        MemberKind::Method,
        format!("set{}", cap),
        format!("Sets the value of {}.", link),
    );
    setter.params = vec![Param::new(
        source.name.clone(),
        Some(&type_name),
        "The new value.",
    )];

    let mut members = vec![getter, setter];

    if source.evented {
        let mut event = synthesized(
            source,
            MemberKind::Event,
            format!("{}change", source.name.to_lowercase()),
            format!(
                "Fires when the {} configuration is changed by {{@link #method-set{}}}.",
                link, cap
            ),
        );
        event.params = vec![
            Param::new("this", Some(&source.owner), "The instance that fired the event."),
            Param::new("value", Some(&type_name), "The new value being set."),
            Param::new("oldValue", Some(&type_name), "The existing value."),
        ];
        members.push(event);
    }

    members
}
