//! Names of classes that are known to exist but are not documented locally.

use glob::Pattern;
use std::collections::BTreeSet;

/// Registered external class names.
///
/// Entries come from configuration (where `*` wildcards are allowed, e.g.
/// `Ext.data.*`), from ignored classes, and from override classes that were
/// folded into their targets.
#[derive(Debug, Clone, Default)]
pub struct ExternalClasses {
    names: BTreeSet<String>,
    patterns: Vec<Pattern>,
}

impl ExternalClasses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configured names. Names containing `*` become patterns;
    /// an invalid pattern is kept as a literal name.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut external = Self::new();
        for name in names {
            external.insert(name.as_ref());
        }
        external
    }

    pub fn insert(&mut self, name: &str) {
        if name.contains('*') {
            match Pattern::new(name) {
                Ok(pattern) => {
                    if !self.patterns.iter().any(|p| p.as_str() == pattern.as_str()) {
                        self.patterns.push(pattern);
                    }
                    return;
                }
                Err(e) => log::warn!("Invalid external class pattern '{}': {}", name, e),
            }
        }
        self.names.insert(name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name) || self.patterns.iter().any(|p| p.matches(name))
    }

    /// Literal names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Pattern::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len() + self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.patterns.is_empty()
    }
}
