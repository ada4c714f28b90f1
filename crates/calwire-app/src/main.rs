use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use calwire_core::config::load_config;
use calwire_rfc::rfc::ical::{ExportDefaults, parse, serialize_with};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "calwire")]
#[command(about = "Parse an iCalendar document and write it back in normalized form")]
struct Cli {
    /// Calendar file to read; `-` or no argument reads standard input
    input: Option<PathBuf>,
}

impl Cli {
    /// Returns the file to read, or `None` for standard input.
    fn source(&self) -> Option<&Path> {
        self.input.as_deref().filter(|path| *path != Path::new("-"))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let config = load_config()?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let source = cli.source();
    let name = source.map_or_else(|| "standard input".to_string(), |path| path.display().to_string());

    let input = read_input(source)?;
    tracing::info!(source = %name, bytes = input.len(), "Read calendar data");

    let root = parse(&input).with_context(|| format!("failed to parse {name}"))?;
    let output = serialize_with(&root, &ExportDefaults::from(&config.export));

    io::stdout()
        .lock()
        .write_all(output.as_bytes())
        .context("failed to write output")?;

    Ok(())
}

fn read_input(source: Option<&Path>) -> anyhow::Result<String> {
    let Some(path) = source else {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read standard input")?;
        return Ok(input);
    };

    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
