use crate::diagnostics::{Diagnostic, DiagnosticCategory};
use crate::relations::Relations;
use colored::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

pub trait OutputWriter {
    fn write_results(&mut self, relations: &Relations) -> anyhow::Result<()>;
}

/// Writes the resolved model snapshot as pretty-printed JSON.
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_results(&mut self, relations: &Relations) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&relations.snapshot())?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Human-readable summary: class list and diagnostics.
pub struct TextWriter<W: Write> {
    writer: W,
}

impl<W: Write> TextWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_header(&mut self) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "classdoc report".bold().blue())?;
        writeln!(self.writer, "{}", "===============".blue())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, relations: &Relations) -> anyhow::Result<()> {
        let members: usize = relations.classes().map(|c| c.members().len()).sum();
        writeln!(self.writer, "{}", "Summary:".bold())?;
        writeln!(self.writer, "  Classes: {}", relations.len())?;
        writeln!(self.writer, "  Members: {}", members)?;
        writeln!(
            self.writer,
            "  Referenced but undocumented: {}",
            relations.stubs().count()
        )?;
        let count = relations.diagnostics().len();
        let shown = if count == 0 {
            count.to_string().green()
        } else {
            count.to_string().yellow()
        };
        writeln!(self.writer, "  Diagnostics: {}", shown)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_classes(&mut self, relations: &Relations) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Classes:".bold())?;
        for class in relations.classes() {
            let mut line = format!("  {}", class.name());
            if let Some(parent) = class.extends() {
                line.push_str(&format!(" extends {}", parent));
            }
            if !class.mixins().is_empty() {
                line.push_str(&format!(" mixins {}", class.mixins().join(", ")));
            }
            let new_marker = if class.is_new() { " (new)" } else { "" };
            writeln!(
                self.writer,
                "{} [{} members]{}",
                line,
                class.members().len(),
                new_marker.green()
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_diagnostics(&mut self, relations: &Relations) -> anyhow::Result<()> {
        if relations.diagnostics().is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "{}", "Diagnostics:".bold())?;
        for diagnostic in relations.diagnostics() {
            writeln!(self.writer, "  {}", format_diagnostic(diagnostic))?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for TextWriter<W> {
    fn write_results(&mut self, relations: &Relations) -> anyhow::Result<()> {
        self.write_header()?;
        self.write_summary(relations)?;
        self.write_classes(relations)?;
        self.write_diagnostics(relations)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let tag = format!("[{}]", diagnostic.kind.as_str());
    let tag = match diagnostic.category() {
        DiagnosticCategory::StructuralCycle => tag.red(),
        DiagnosticCategory::UnresolvedReference => tag.yellow(),
        DiagnosticCategory::DuplicateDefinition => tag.magenta(),
        DiagnosticCategory::Lint => tag.cyan(),
    };
    match &diagnostic.location {
        Some(location) => format!("{} {} ({})", tag, diagnostic.message, location),
        None => format!("{} {}", tag, diagnostic.message),
    }
}

/// Writer for `format`, targeting `destination` or stdout.
pub fn create_writer(
    format: OutputFormat,
    destination: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match destination {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout()),
    };
    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Text => Box::new(TextWriter::new(sink)),
    })
}
