//! Framework-specific normalization.
//!
//! Each correction is a [`QuirkRule`] that decides for itself whether it
//! applies to the current run. [`FrameworkQuirks`] runs its rules in order.

use crate::config::{DocConfig, EventQuirk};
use crate::model::{AggregatedDocs, CodeType, MemberKind, Param};
use crate::passes::EnrichmentPass;

/// One narrow, independently testable correction.
pub trait QuirkRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn applies(&self, docs: &AggregatedDocs, config: &DocConfig) -> bool;
    fn apply(&self, docs: &mut AggregatedDocs);
}

pub struct FrameworkQuirks {
    rules: Vec<Box<dyn QuirkRule>>,
}

impl FrameworkQuirks {
    pub fn new(rules: Vec<Box<dyn QuirkRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

impl Default for FrameworkQuirks {
    fn default() -> Self {
        Self::new(vec![Box::new(Ext4EventOptions)])
    }
}

impl EnrichmentPass for FrameworkQuirks {
    fn name(&self) -> &'static str {
        "framework-quirks"
    }

    fn apply(&self, docs: &mut AggregatedDocs, config: &DocConfig) {
        for rule in &self.rules {
            if rule.applies(docs, config) {
                log::debug!("Applying quirk rule {}", rule.name());
                rule.apply(docs);
            }
        }
    }
}

pub const EVENT_OPTIONS_PARAM: &str = "eOpts";
pub const EVENT_OPTIONS_DOC: &str =
    "The options object passed to {@link Ext.util.Observable#addListener}.";

/// Ext JS 4 passes an options object as the last argument of every event
/// handler; add it to every documented event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ext4EventOptions;

impl QuirkRule for Ext4EventOptions {
    fn name(&self) -> &'static str {
        "ext4-event-options"
    }

    fn applies(&self, docs: &AggregatedDocs, config: &DocConfig) -> bool {
        match config.event_quirk {
            EventQuirk::On => true,
            EventQuirk::Off => false,
            EventQuirk::Auto => docs
                .classes
                .values()
                .any(|c| c.code_type == CodeType::ExtDefine),
        }
    }

    fn apply(&self, docs: &mut AggregatedDocs) {
        for class in docs.classes.values_mut() {
            for event in class
                .members
                .iter_mut()
                .filter(|m| m.kind == MemberKind::Event)
            {
                if !event.params.iter().any(|p| p.name == EVENT_OPTIONS_PARAM) {
                    event.params.push(Param::new(
                        EVENT_OPTIONS_PARAM,
                        Some("Object"),
                        EVENT_OPTIONS_DOC,
                    ));
                }
            }
        }
    }
}
