use crate::config::{DocConfig, EventQuirk};
use crate::io::OutputFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "classdoc")]
#[command(about = "Aggregate and resolve class documentation from doc comments", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Source files, directories or glob patterns, in processing order
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Configuration file (defaults to the nearest .classdoc.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of parse workers (default: number of CPU cores)
    #[arg(short, long, env = "CLASSDOC_JOBS")]
    pub jobs: Option<usize>,

    /// Additional external class names (comma separated, `*` allowed)
    #[arg(long, value_delimiter = ',')]
    pub external: Vec<String>,

    /// Apply the framework event-options quirk
    #[arg(long, value_enum)]
    pub event_quirk: Option<QuirkMode>,

    /// Version assumed for classes without @since
    #[arg(long)]
    pub default_since: Option<String>,

    /// Classes and members with this version are marked as new
    #[arg(long)]
    pub new_since: Option<String>,

    /// Skip input files matching these glob patterns (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Drop members declared outside any class
    #[arg(long)]
    pub ignore_global: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: FormatArg,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QuirkMode {
    Auto,
    On,
    Off,
}

impl From<QuirkMode> for EventQuirk {
    fn from(mode: QuirkMode) -> Self {
        match mode {
            QuirkMode::Auto => EventQuirk::Auto,
            QuirkMode::On => EventQuirk::On,
            QuirkMode::Off => EventQuirk::Off,
        }
    }
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_to(&self, mut config: DocConfig) -> DocConfig {
        if let Some(jobs) = self.jobs {
            config = config.with_jobs(jobs);
        }
        config.add_external_classes(
            self.external.iter().map(|s| s.trim()).filter(|s| !s.is_empty()),
        );
        for pattern in self.ignore.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            if !config.ignore.iter().any(|p| p == pattern) {
                config.ignore.push(pattern.to_string());
            }
        }
        if let Some(mode) = self.event_quirk {
            config.event_quirk = mode.into();
        }
        if let Some(since) = &self.default_since {
            config.default_since = Some(since.clone());
        }
        if let Some(since) = &self.new_since {
            config.new_since = Some(since.clone());
        }
        if self.ignore_global {
            config.ignore_global = true;
        }
        config
    }

    /// Log level for `-v` repeats, unless `-q` silences everything but errors.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
