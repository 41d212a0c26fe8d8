//! Tag parser for `/** ... */` documentation comments.
//!
//! Every doc block becomes at most one [`Fragment`]. The block's kind comes
//! from its kind tag (`@class`, `@method`, `@property`, `@cfg`, `@event`,
//! `@css_var`, `@css_mixin`); without one, the first code line after the
//! block decides:
//!
//! - `Ext.define('Name', ...)` declares a class
//! - `name: function (...)`, `name = function` or `function name(` is a method
//! - `name: value` / `name = value` is a property
//!
//! Blocks that match none of these (licence headers, for example) are
//! skipped.

use super::SourceParser;
use crate::config::DocConfig;
use crate::errors::DocError;
use crate::model::{
    CodeType, EnumSpec, EnumValue, Fragment, FragmentKind, InheritDocTarget, MemberKind, Param,
    ReturnSpec,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

// -- Regex patterns -----------------------------------------------------------

static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@([A-Za-z_]+)\s*(.*)$").unwrap());

static RE_EXT_DEFINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"Ext\.define\(\s*['"]([\w$.]+)['"]"#).unwrap());

static RE_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:function\s+([\w$]+)\s*\(|(?:[\w$]+\.)*([\w$]+)\s*[:=]\s*function\b)")
        .unwrap()
});

static RE_PROPERTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(?:var|let|const)\s+)?(?:[\w$]+\.)*([\w$]+)\s*[:=]\s*(.+?)\s*[,;]?\s*$")
        .unwrap()
});

static RE_ENUM_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)^([\w$]+)(?:\s*=\s*('[^']*'|"[^"]*"|\S+))?\s*(.*)$"#).unwrap()
});

/// Parser for doc-comment annotated JavaScript sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocCommentParser;

impl DocCommentParser {
    pub fn new() -> Self {
        Self
    }
}

impl SourceParser for DocCommentParser {
    fn parse(
        &self,
        content: &str,
        filename: &Path,
        _config: &DocConfig,
    ) -> Result<Vec<Fragment>, DocError> {
        let mut fragments = Vec::new();
        for raw in extract_blocks(content, filename)? {
            let block = Block::split(&raw);
            if let Some(fragment) = block.into_fragment(filename)? {
                fragments.push(fragment);
            }
        }
        log::trace!(
            "{}: {} fragments",
            filename.display(),
            fragments.len()
        );
        Ok(fragments)
    }
}

// -- Block extraction ---------------------------------------------------------

/// A comment body (markers stripped) and the code line that follows it.
#[derive(Debug)]
struct RawBlock {
    line: usize,
    body: Vec<String>,
    code: Option<String>,
}

fn find_doc_start(line: &str) -> Option<usize> {
    let start = line.find("/**")?;
    match line[start + 3..].chars().next() {
        // `/**/` is an empty comment and `/***...` a separator line
        Some('*') | Some('/') => None,
        _ => Some(start),
    }
}

fn clean_line(line: &str) -> String {
    let trimmed = line.trim_start();
    let stripped = match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => trimmed,
    };
    stripped.trim_end().to_string()
}

fn extract_blocks(content: &str, path: &Path) -> Result<Vec<RawBlock>, DocError> {
    let lines: Vec<&str> = content.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let Some(start) = find_doc_start(line) else {
            i += 1;
            continue;
        };
        let start_line = i + 1;
        let after = &line[start + 3..];
        let mut body = Vec::new();

        let (end_idx, rest) = match after.find("*/") {
            Some(end) => {
                body.push(clean_line(&after[..end]));
                (i, &after[end + 2..])
            }
            None => {
                body.push(clean_line(after));
                let mut j = i + 1;
                loop {
                    if j >= lines.len() {
                        return Err(DocError::parse(
                            path,
                            Some(start_line),
                            "unterminated doc comment",
                        ));
                    }
                    let current = lines[j];
                    if let Some(end) = current.find("*/") {
                        body.push(clean_line(&current[..end]));
                        break (j, &current[end + 2..]);
                    }
                    body.push(clean_line(current));
                    j += 1;
                }
            }
        };

        let code = if rest.trim().is_empty() {
            lines[end_idx + 1..]
                .iter()
                .map(|l| l.trim())
                .find(|l| !l.is_empty())
                .filter(|l| find_doc_start(l).is_none())
                .map(str::to_string)
        } else {
            Some(rest.trim().to_string())
        };

        blocks.push(RawBlock {
            line: start_line,
            body,
            code,
        });
        i = end_idx + 1;
    }

    Ok(blocks)
}

// -- Tag splitting ------------------------------------------------------------

#[derive(Debug)]
struct Tag {
    name: String,
    text: String,
    line: usize,
}

/// Tags whose text may continue on the following lines.
fn takes_text(tag: &str) -> bool {
    matches!(tag, "param" | "return" | "returns" | "value")
}

fn kind_of_tag(tag: &str) -> Option<FragmentKind> {
    match tag {
        "class" => Some(FragmentKind::Class),
        "method" | "property" | "cfg" | "event" | "css_var" | "var" | "css_mixin" => {
            MemberKind::parse(tag).map(FragmentKind::Member)
        }
        _ => None,
    }
}

struct Block<'a> {
    line: usize,
    doc: String,
    tags: Vec<Tag>,
    code: Option<&'a str>,
}

impl<'a> Block<'a> {
    fn split(raw: &'a RawBlock) -> Self {
        let mut doc_lines: Vec<&str> = Vec::new();
        let mut tags: Vec<Tag> = Vec::new();
        let mut open = false;

        for (offset, line) in raw.body.iter().enumerate() {
            if let Some(caps) = RE_TAG.captures(line) {
                tags.push(Tag {
                    name: caps[1].to_string(),
                    text: caps[2].trim().to_string(),
                    line: raw.line + offset,
                });
                open = takes_text(&caps[1]);
                continue;
            }
            if line.is_empty() {
                open = false;
            }
            match tags.last_mut() {
                Some(tag) if open => {
                    tag.text.push('\n');
                    tag.text.push_str(line);
                }
                _ => doc_lines.push(line),
            }
        }

        Self {
            line: raw.line,
            doc: doc_lines.join("\n").trim().to_string(),
            tags,
            code: raw.code.as_deref(),
        }
    }

    fn into_fragment(self, path: &Path) -> Result<Option<Fragment>, DocError> {
        let inferred = self.code.and_then(infer_from_code);

        let (mut fragment, lead) = match self.tags.iter().find(|t| kind_of_tag(&t.name).is_some()) {
            Some(tag) => {
                let kind = match kind_of_tag(&tag.name) {
                    Some(kind) => kind,
                    None => return Ok(None),
                };
                let (type_name, rest) = split_type(&tag.text, tag, path)?;
                let (spec, rest) = split_name(rest);
                let spec = match spec.or_else(|| inferred.as_ref().map(Inferred::name_spec)) {
                    Some(spec) => spec,
                    None => {
                        return Err(DocError::parse(
                            path,
                            Some(tag.line),
                            format!("@{} without a name", tag.name),
                        ))
                    }
                };
                let mut fragment = match kind {
                    FragmentKind::Class => Fragment::class(spec.name),
                    FragmentKind::Member(kind) => Fragment::member(kind, spec.name),
                };
                fragment.type_name = type_name;
                fragment.default_value = spec.default.or_else(|| {
                    inferred
                        .as_ref()
                        .and_then(|i| i.default_value.clone())
                });
                (fragment, rest.trim().to_string())
            }
            None => match &inferred {
                Some(inferred) => (inferred.fragment(), String::new()),
                None => {
                    log::trace!("{}:{}: skipping untagged block", path.display(), self.line);
                    return Ok(None);
                }
            },
        };

        if fragment.is_class() && self.code.is_some_and(|c| RE_EXT_DEFINE.is_match(c)) {
            fragment.code_type = CodeType::ExtDefine;
        }
        fragment.doc = [lead.as_str(), self.doc.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n");

        let mut enum_values = Vec::new();
        for tag in &self.tags {
            apply_tag(&mut fragment, tag, path, &mut enum_values)?;
        }
        if let Some(spec) = fragment.enum_spec.as_mut() {
            spec.doc_only = enum_values.is_empty() && spec.default.is_none();
            spec.values = enum_values;
        } else if !enum_values.is_empty() {
            log::debug!(
                "{}:{}: @value outside of an @enum block",
                path.display(),
                self.line
            );
        }

        Ok(Some(fragment.at(path, self.line)))
    }
}

fn apply_tag(
    fragment: &mut Fragment,
    tag: &Tag,
    path: &Path,
    enum_values: &mut Vec<EnumValue>,
) -> Result<(), DocError> {
    let text = tag.text.as_str();
    match tag.name.as_str() {
        "extends" => fragment.extends = first_word(text),
        "mixins" | "mixin" => push_unique(&mut fragment.mixins, split_list(text)),
        "alternateClassName" => push_unique(&mut fragment.alternate_names, split_list(text)),
        "alias" | "xtype" => push_unique(&mut fragment.aliases, split_list(text)),
        "singleton" => fragment.singleton = true,
        "override" => fragment.override_target = first_word(text),
        "enum" => {
            let (type_name, rest) = split_type(text, tag, path)?;
            fragment.enum_spec = Some(EnumSpec {
                type_name,
                default: first_word(rest),
                doc_only: false,
                values: Vec::new(),
            });
        }
        "value" => {
            if let Some(caps) = RE_ENUM_VALUE.captures(text) {
                enum_values.push(EnumValue {
                    name: caps[1].to_string(),
                    value: caps.get(2).map(|m| m.as_str().to_string()),
                    doc: caps.get(3).map_or("", |m| m.as_str()).trim().to_string(),
                });
            }
        }
        "param" => {
            let (type_name, rest) = split_type(text, tag, path)?;
            match split_name(rest) {
                (Some(spec), doc) => fragment.params.push(Param {
                    name: spec.name,
                    type_name,
                    doc: doc.trim().to_string(),
                    optional: spec.optional,
                    default_value: spec.default,
                }),
                (None, _) => log::debug!(
                    "{}:{}: @param without a name",
                    path.display(),
                    tag.line
                ),
            }
        }
        "return" | "returns" => {
            let (type_name, rest) = split_type(text, tag, path)?;
            fragment.returns = Some(ReturnSpec::new(
                type_name.unwrap_or_else(|| "Object".to_string()),
                rest.trim(),
            ));
        }
        "chainable" => fragment.returns = Some(ReturnSpec::new("this", "this")),
        "type" => {
            let (type_name, rest) = split_type(text, tag, path)?;
            fragment.type_name = type_name.or_else(|| first_word(rest));
        }
        "default" => fragment.default_value = Some(text.to_string()).filter(|t| !t.is_empty()),
        "static" => fragment.is_static = true,
        "accessor" => fragment.accessor = true,
        "evented" => fragment.evented = true,
        "member" => {
            if !fragment.is_class() {
                fragment.owner = first_word(text);
            }
        }
        "inheritdoc" | "inheritDoc" => {
            fragment.inherit_doc = Some(InheritDocTarget::parse(
                first_word(text).as_deref().unwrap_or(""),
            ));
        }
        "since" => fragment.since = first_word(text),
        "ignore" => fragment.ignore = true,
        "private" => fragment.private = true,
        name if kind_of_tag(name).is_some() => {}
        other => log::trace!("ignoring unknown tag @{}", other),
    }
    Ok(())
}

// -- Tag text helpers ---------------------------------------------------------

/// Split a leading `{Type}` off tag text. Braces may nest.
fn split_type<'t>(
    text: &'t str,
    tag: &Tag,
    path: &Path,
) -> Result<(Option<String>, &'t str), DocError> {
    let text = text.trim_start();
    if !text.starts_with('{') {
        return Ok((None, text));
    }
    let mut depth = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let type_name = text[1..i].trim();
                    return Ok((
                        Some(type_name.to_string()).filter(|t| !t.is_empty()),
                        text[i + 1..].trim_start(),
                    ));
                }
            }
            _ => {}
        }
    }
    Err(DocError::parse(
        path,
        Some(tag.line),
        format!("unclosed type in @{}", tag.name),
    ))
}

#[derive(Debug, Clone, PartialEq)]
struct NameSpec {
    name: String,
    optional: bool,
    default: Option<String>,
}

/// Split `name` or `[name=default]` off tag text.
fn split_name(text: &str) -> (Option<NameSpec>, &str) {
    let text = text.trim_start();
    if let Some(inner_rest) = text.strip_prefix('[') {
        if let Some(end) = inner_rest.find(']') {
            let inner = &inner_rest[..end];
            let (name, default) = match inner.split_once('=') {
                Some((name, default)) => (name.trim(), Some(default.trim().to_string())),
                None => (inner.trim(), None),
            };
            let spec = (!name.is_empty()).then(|| NameSpec {
                name: name.to_string(),
                optional: true,
                default,
            });
            return (spec, inner_rest[end + 1..].trim_start());
        }
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    if end == 0 {
        return (None, text);
    }
    let spec = NameSpec {
        name: text[..end].to_string(),
        optional: false,
        default: None,
    };
    (Some(spec), text[end..].trim_start())
}

fn first_word(text: &str) -> Option<String> {
    text.split_whitespace().next().map(str::to_string)
}

fn split_list(text: &str) -> Vec<String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn push_unique(target: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

// -- Code inference -----------------------------------------------------------

/// What the code line after a block declares.
#[derive(Debug, Clone, PartialEq)]
struct Inferred {
    kind: FragmentKind,
    name: String,
    default_value: Option<String>,
}

impl Inferred {
    fn name_spec(&self) -> NameSpec {
        NameSpec {
            name: self.name.clone(),
            optional: false,
            default: None,
        }
    }

    fn fragment(&self) -> Fragment {
        let mut fragment = match self.kind {
            FragmentKind::Class => Fragment::class(&self.name),
            FragmentKind::Member(kind) => Fragment::member(kind, &self.name),
        };
        fragment.default_value = self.default_value.clone();
        fragment
    }
}

fn infer_from_code(code: &str) -> Option<Inferred> {
    if let Some(caps) = RE_EXT_DEFINE.captures(code) {
        return Some(Inferred {
            kind: FragmentKind::Class,
            name: caps[1].to_string(),
            default_value: None,
        });
    }
    if let Some(caps) = RE_FUNCTION.captures(code) {
        let name = caps.get(1).or_else(|| caps.get(2))?;
        return Some(Inferred {
            kind: FragmentKind::Member(MemberKind::Method),
            name: name.as_str().to_string(),
            default_value: None,
        });
    }
    RE_PROPERTY.captures(code).map(|caps| Inferred {
        kind: FragmentKind::Member(MemberKind::Property),
        name: caps[1].to_string(),
        default_value: Some(caps[2].to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::path::PathBuf;

    fn parse(src: &str) -> Result<Vec<Fragment>, DocError> {
        DocCommentParser.parse(src, &PathBuf::from("test.js"), &DocConfig::default())
    }

    #[test]
    fn test_clean_line_strips_leading_star() {
        assert_eq!(clean_line("   * Some text"), "Some text");
        assert_eq!(clean_line("   *"), "");
        assert_eq!(clean_line(" plain"), "plain");
    }

    #[test]
    fn test_split_name_with_default() {
        let (spec, rest) = split_name("[title=Untitled] The title.");
        let spec = spec.unwrap();
        assert_eq!(spec.name, "title");
        assert!(spec.optional);
        assert_eq!(spec.default.as_deref(), Some("Untitled"));
        assert_eq!(rest, "The title.");
    }

    #[test]
    fn test_infer_method_from_code() {
        let inferred = infer_from_code("show: function(animate) {").unwrap();
        assert_eq!(inferred.kind, FragmentKind::Member(MemberKind::Method));
        assert_eq!(inferred.name, "show");

        let inferred = infer_from_code("function doLayout() {").unwrap();
        assert_eq!(inferred.name, "doLayout");
    }

    #[test]
    fn test_infer_property_from_code() {
        let inferred = infer_from_code("border: true,").unwrap();
        assert_eq!(inferred.kind, FragmentKind::Member(MemberKind::Property));
        assert_eq!(inferred.name, "border");
        assert_eq!(inferred.default_value.as_deref(), Some("true"));
    }

    #[test]
    fn test_class_block_with_tags() {
        let fragments = parse(indoc! {r#"
            /**
             * @class Ext.Panel
             * @extends Ext.Container
             * @mixins Ext.Floating, Ext.Draggable
             * @alternateClassName Ext.PanelAlias
             * @since 4.0
             * A panel.
             */
            Ext.define('Ext.Panel', {
        "#})
        .unwrap();
        assert_eq!(fragments.len(), 1);
        let class = &fragments[0];
        assert!(class.is_class());
        assert_eq!(class.name, "Ext.Panel");
        assert_eq!(class.extends.as_deref(), Some("Ext.Container"));
        assert_eq!(class.mixins, vec!["Ext.Floating", "Ext.Draggable"]);
        assert_eq!(class.alternate_names, vec!["Ext.PanelAlias"]);
        assert_eq!(class.since.as_deref(), Some("4.0"));
        assert_eq!(class.doc, "A panel.");
        assert_eq!(class.code_type, CodeType::ExtDefine);
        assert_eq!(class.location.line, 1);
    }

    #[test]
    fn test_unterminated_block_is_fatal() {
        let err = parse("/**\n * @class Foo\n").unwrap_err();
        assert!(matches!(err, DocError::Parse { line: Some(1), .. }));
    }

    #[test]
    fn test_unclosed_type_is_fatal() {
        let err = parse("/**\n * @param {String name\n */\nfunction f(name) {}\n").unwrap_err();
        assert!(err.to_string().contains("unclosed type in @param"));
    }

    #[test]
    fn test_kind_tag_without_inferable_name_is_fatal() {
        let err = parse("/**\n * @method\n */\n").unwrap_err();
        assert!(err.to_string().contains("@method without a name"));
    }

    #[test]
    fn test_untagged_block_without_code_is_skipped() {
        let fragments = parse("/**\n * Copyright notice.\n */\n\n").unwrap();
        assert!(fragments.is_empty());
    }
}
