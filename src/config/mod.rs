//! Configuration for a documentation run.
//!
//! Values come from `.classdoc.toml` (see [`loader`]) and are then overridden
//! by command-line flags. Every field has a default, so an empty file is a
//! valid configuration.

mod loader;
mod parallel;

pub use crate::model::ClassMergePolicy;
pub use loader::{
    directory_ancestors, load_config, load_config_from_path, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
pub use parallel::ParallelConfig;

use crate::model::ExternalClasses;
use serde::{Deserialize, Serialize};

/// Names treated as external when no configuration says otherwise: the
/// JavaScript built-ins plus the DOM types commonly used as parents.
pub const DEFAULT_EXTERNAL_CLASSES: &[&str] = &[
    "Object",
    "String",
    "Number",
    "Boolean",
    "RegExp",
    "Function",
    "Array",
    "Arguments",
    "Date",
    "Error",
    "HTMLElement",
    "XMLElement",
    "NodeList",
    "TextNode",
    "CSSStyleSheet",
    "CSSStyleRule",
    "Event",
    "undefined",
    "null",
    "Mixed",
];

/// Whether the framework event-options quirk is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventQuirk {
    /// Apply only when at least one class is declared with the framework's
    /// define call.
    #[default]
    Auto,
    On,
    Off,
}

/// Lint toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Report parameters without a description.
    pub undocumented_params: bool,
    /// Report public classes without any documentation.
    pub missing_docs: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            undocumented_params: true,
            missing_docs: false,
        }
    }
}

fn default_external_classes() -> Vec<String> {
    DEFAULT_EXTERNAL_CLASSES.iter().map(|s| s.to_string()).collect()
}

fn default_global_class_name() -> String {
    "global".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["js".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocConfig {
    /// Class names known to exist outside the documented sources. `*` is a
    /// wildcard.
    #[serde(default = "default_external_classes")]
    pub external_classes: Vec<String>,

    #[serde(default)]
    pub event_quirk: EventQuirk,

    /// Version given to classes that have no `@since`.
    #[serde(default)]
    pub default_since: Option<String>,

    /// Version that marks classes and members as new.
    #[serde(default)]
    pub new_since: Option<String>,

    /// Drop members declared outside any class instead of hoisting them.
    #[serde(default)]
    pub ignore_global: bool,

    #[serde(default = "default_global_class_name")]
    pub global_class_name: String,

    #[serde(default)]
    pub class_merge: ClassMergePolicy,

    #[serde(default)]
    pub parallel: ParallelConfig,

    #[serde(default)]
    pub lint: LintConfig,

    /// File extensions picked up when an input is a directory.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns for files skipped during input discovery.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            external_classes: default_external_classes(),
            event_quirk: EventQuirk::default(),
            default_since: None,
            new_since: None,
            ignore_global: false,
            global_class_name: default_global_class_name(),
            class_merge: ClassMergePolicy::default(),
            parallel: ParallelConfig::default(),
            lint: LintConfig::default(),
            extensions: default_extensions(),
            ignore: Vec::new(),
        }
    }
}

impl DocConfig {
    /// The configured external names as a lookup set.
    pub fn external_set(&self) -> ExternalClasses {
        ExternalClasses::from_names(&self.external_classes)
    }

    /// Add more external names (e.g. from `--external`).
    pub fn add_external_classes<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.external_classes.contains(&name) {
                self.external_classes.push(name);
            }
        }
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.parallel.jobs = Some(jobs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_builtins() {
        let config = DocConfig::default();
        let external = config.external_set();
        assert!(external.contains("Object"));
        assert!(external.contains("HTMLElement"));
        assert_eq!(config.global_class_name, "global");
        assert_eq!(config.class_merge, ClassMergePolicy::FirstWins);
    }

    #[test]
    fn add_external_skips_duplicates() {
        let mut config = DocConfig::default();
        let before = config.external_classes.len();
        config.add_external_classes(["Object", "Ext.*"]);
        assert_eq!(config.external_classes.len(), before + 1);
        assert!(config.external_set().contains("Ext.Foo"));
    }
}
