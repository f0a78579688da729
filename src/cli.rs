//! Command-line front end
//!
//! Reads one SVG file, tags the whole drawing with a layer label and writes
//! one VDS document per sheet next to the input (or into `--out-dir`).

use anyhow::{anyhow, Context};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use vdskit_core::LayerLabel;
use vdskit_designer::{path_data_by_layer, to_drawing, Drawing, VdsGenerator};
use vdskit_settings::ConvertConfig;

#[derive(Debug, Parser)]
#[command(name = "vdskit")]
#[command(about = "Convert SVG drawings into multi-sheet VDS cutting jobs")]
#[command(version = crate::VERSION, long_version = crate::LONG_VERSION)]
pub struct Cli {
    /// SVG drawing to convert
    pub input: PathBuf,

    /// Layer label for the whole drawing (sheet.cut.tool, or NOCUT)
    #[arg(short, long)]
    pub label: Option<String>,

    /// Output directory; defaults to the input's directory
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Config file (TOML or JSON); defaults to the user config
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum chord length used when measuring curved geometry
    #[arg(long)]
    pub facet_size: Option<f64>,

    /// Print the path data of each label group instead of writing files
    #[arg(long)]
    pub dump_path_data: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Load the config and apply the command-line overrides to it
    pub fn config(&self) -> anyhow::Result<ConvertConfig> {
        let mut config = match &self.config {
            Some(path) => ConvertConfig::load_from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ConvertConfig::load_or_default().context("failed to load user config")?,
        };

        if let Some(facet_size) = self.facet_size {
            config.geometry.facet_size = facet_size;
        }
        if let Some(dir) = &self.out_dir {
            config.output.directory = Some(dir.clone());
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    /// The label given on the command line, or the configured default
    pub fn label(&self, config: &ConvertConfig) -> anyhow::Result<LayerLabel> {
        match &self.label {
            Some(label) => {
                LayerLabel::parse(label).with_context(|| format!("invalid label '{label}'"))
            }
            None => Ok(config.label.to_label()?),
        }
    }
}

/// Run a conversion and return the files written
pub fn run(cli: &Cli) -> anyhow::Result<Vec<PathBuf>> {
    let config = cli.config()?;
    let label = cli.label(&config)?;
    debug!("Converting {} as {}", cli.input.display(), label);

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let mut drawing = to_drawing(&source)
        .with_context(|| format!("failed to import {}", cli.input.display()))?;
    drawing.set_label(&label);

    if cli.dump_path_data {
        dump_path_data(&drawing)?;
        return Ok(Vec::new());
    }

    let documents = VdsGenerator::with_facet_size(config.geometry.facet_size)
        .generate(&drawing)
        .ok_or_else(|| anyhow!("{} has no geometry to export", cli.input.display()))?;
    if documents.is_empty() {
        warn!("No cut geometry in {}, nothing written", cli.input.display());
        return Ok(Vec::new());
    }

    let directory = output_directory(&cli.input, config.output.directory.as_deref());
    fs::create_dir_all(&directory)
        .with_context(|| format!("failed to create {}", directory.display()))?;

    let stem = cli
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "drawing".to_string());
    let single = documents.len() == 1;

    let mut written = Vec::with_capacity(documents.len());
    for (sheet, document) in &documents {
        let name = output_file_name(&stem, sheet, single, &config.output.extension);
        let path = directory.join(name);
        fs::write(&path, document)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote sheet '{}' to {}", sheet, path.display());
        written.push(path);
    }
    Ok(written)
}

fn dump_path_data(drawing: &Drawing) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (layer, data) in path_data_by_layer(drawing) {
        writeln!(out, "{layer}\t{data}")?;
    }
    Ok(())
}

fn output_directory(input: &Path, configured: Option<&Path>) -> PathBuf {
    match configured {
        Some(dir) => dir.to_path_buf(),
        None => match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    }
}

/// `<stem>.<ext>` for a single sheet, `<stem>-<sheet>.<ext>` otherwise
fn output_file_name(stem: &str, sheet: &str, single: bool, extension: &str) -> String {
    if single {
        format!("{stem}.{extension}")
    } else {
        format!("{stem}-{}.{extension}", sanitize_sheet(sheet))
    }
}

fn sanitize_sheet(sheet: &str) -> String {
    sheet
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
