use anyhow::{Context, Result};
use clap::Parser;
use classdoc::cli::Cli;
use classdoc::config::{load_config, load_config_from_path, DocConfig};
use classdoc::io::{create_writer, find_source_files};
use classdoc::parser::DocCommentParser;
use classdoc::pipeline::DocPipeline;
use classdoc::progress::{BarProgressSink, LogProgressSink, ProgressConfig, ProgressSink};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = cli.apply_to(resolve_config(&cli)?);
    let files = find_source_files(&cli.inputs, &config.extensions, &config.ignore)
        .context("Failed to collect input files")?;
    if files.is_empty() {
        log::warn!("No source files matched the given inputs");
    }

    let progress = ProgressConfig::from_env(cli.quiet, cli.verbosity);
    let bar = Arc::new(BarProgressSink::new(&progress));
    let sink: Arc<dyn ProgressSink> = if bar.is_hidden() {
        Arc::new(LogProgressSink)
    } else {
        bar.clone()
    };

    let pipeline = DocPipeline::new(config, Arc::new(DocCommentParser::new())).with_sink(sink);
    let result = pipeline.run_with_timing(&files);
    bar.finish();
    // A failed run writes no output at all.
    let (relations, timings) = result?;
    for timing in &timings {
        log::debug!("{}", timing.format());
    }

    let mut writer = create_writer(cli.format.into(), cli.output.as_deref())
        .context("Failed to open output")?;
    writer.write_results(&relations)?;
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<DocConfig> {
    match &cli.config {
        Some(path) => Ok(load_config_from_path(path)?),
        None => Ok(load_config()),
    }
}

fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
