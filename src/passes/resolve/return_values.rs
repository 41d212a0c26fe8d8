use crate::config::DocConfig;
use crate::model::{MemberKind, ReturnSpec};
use crate::passes::ResolutionPass;
use crate::relations::Relations;

/// Return type meaning "the instance the method was called on".
pub const SELF_RETURN_TYPE: &str = "this";

/// Rewrites chainable return types to the owning class, and gives
/// constructors without a documented return value the class itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnValues;

impl ResolutionPass for ReturnValues {
    fn name(&self) -> &'static str {
        "return-values"
    }

    fn apply(&self, relations: &mut Relations, _config: &DocConfig) {
        for id in relations.ids() {
            let Some(class) = relations.class_mut(id) else {
                continue;
            };
            if class.is_stub() {
                continue;
            }
            let class_name = class.name.clone();
            for method in class
                .members
                .iter_mut()
                .filter(|m| m.kind == MemberKind::Method)
            {
                if method.returns.is_none() && method.name == "constructor" {
                    method.returns = Some(ReturnSpec::new(class_name.clone(), ""));
                } else if let Some(returns) = method.returns.as_mut() {
                    if returns.type_name == SELF_RETURN_TYPE {
                        returns.type_name = class_name.clone();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::model::{AggregatedClass, Class, ExternalClasses, Member};

    #[test]
    fn test_chainable_and_constructor() {
        let mut agg = AggregatedClass::new("Ext.Panel", 0);
        let mut show = Member::new(MemberKind::Method, "show", "Ext.Panel");
        show.returns = Some(ReturnSpec::new("this", "this"));
        let mut get_title = Member::new(MemberKind::Method, "getTitle", "Ext.Panel");
        get_title.returns = Some(ReturnSpec::new("String", ""));
        agg.add_member(show);
        agg.add_member(get_title);
        agg.add_member(Member::new(MemberKind::Method, "constructor", "Ext.Panel"));

        let mut rel = Relations::new(
            vec![Class::from_aggregated(agg)],
            ExternalClasses::new(),
            Diagnostics::new(),
        )
        .unwrap();
        ReturnValues.apply(&mut rel, &DocConfig::default());

        let panel = rel.get("Ext.Panel").unwrap();
        let ret = |name: &str| {
            panel
                .member(MemberKind::Method, name)
                .and_then(|m| m.returns.as_ref())
                .map(|r| r.type_name.clone())
        };
        assert_eq!(ret("show").as_deref(), Some("Ext.Panel"));
        assert_eq!(ret("getTitle").as_deref(), Some("String"));
        assert_eq!(ret("constructor").as_deref(), Some("Ext.Panel"));
    }
}
