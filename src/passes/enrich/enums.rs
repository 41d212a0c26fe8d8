use crate::config::DocConfig;
use crate::model::{AggregatedClass, AggregatedDocs, EnumValue, Member, MemberKind};
use crate::passes::EnrichmentPass;

/// Expands `@enum` classes into one static property per value.
///
/// Values come from `@value` tags and from a wildcard default such as
/// `widget.*`, which yields one value per class alias under that prefix.
/// Untyped properties of an enum class take the enum's type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Enums;

impl EnrichmentPass for Enums {
    fn name(&self) -> &'static str {
        "enums"
    }

    fn apply(&self, docs: &mut AggregatedDocs, _config: &DocConfig) {
        let mut aliases: Vec<(String, String)> = docs
            .classes
            .values()
            .flat_map(|c| c.aliases.iter().map(move |a| (a.clone(), c.name.clone())))
            .collect();
        aliases.sort();

        for class in docs.classes.values_mut() {
            expand_enum(class, &aliases);
        }
    }
}

fn expand_enum(class: &mut AggregatedClass, aliases: &[(String, String)]) {
    let Some(mut spec) = class.enum_spec.clone() else {
        return;
    };

    let mut values = spec.values.clone();
    if let Some(prefix) = spec.default.as_deref().and_then(|d| d.strip_suffix('*')) {
        values.extend(wildcard_values(prefix, aliases));
    }

    let type_name = spec
        .type_name
        .clone()
        .unwrap_or_else(|| infer_type(&values, spec.default.is_some()));

    for member in class
        .members
        .iter_mut()
        .filter(|m| m.kind == MemberKind::Property && m.type_name.is_none())
    {
        member.type_name = Some(type_name.clone());
    }

    if !spec.doc_only {
        for value in &values {
            if class.members.contains(MemberKind::Property, &value.name) {
                continue;
            }
            let mut member =
                Member::new(MemberKind::Property, value.name.clone(), class.name.clone());
            member.doc = value.doc.clone();
            member.type_name = Some(type_name.clone());
            member.default_value = value.value.clone();
            member.is_static = true;
            member.autodetected = true;
            member.since = class.since.clone();
            member.private = class.private;
            member.files = class.files.iter().take(1).cloned().collect();
            class.members.insert(member);
        }
    }

    spec.type_name = Some(type_name);
    class.enum_spec = Some(spec);
}

fn wildcard_values(prefix: &str, aliases: &[(String, String)]) -> Vec<EnumValue> {
    aliases
        .iter()
        .filter_map(|(alias, owner)| {
            let name = alias.strip_prefix(prefix)?;
            (!name.is_empty()).then(|| EnumValue {
                name: name.to_string(),
                value: Some(format!("'{}'", name)),
                doc: format!("Alias for {{@link {}}}.", owner),
            })
        })
        .collect()
}

/// Type of an enum without an explicit one, judged from its first value.
fn infer_type(values: &[EnumValue], wildcard: bool) -> String {
    let first = values.iter().find_map(|v| v.value.as_deref());
    let inferred = match first {
        Some(v) if v.starts_with('\'') || v.starts_with('"') => "String",
        Some("true") | Some("false") => "Boolean",
        Some(v) if v.parse::<f64>().is_ok() => "Number",
        None if wildcard => "String",
        _ => "Object",
    };
    inferred.to_string()
}
