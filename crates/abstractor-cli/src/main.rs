use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use abstractor_core::config_file::{self, ConfigFile};
use abstractor_core::{DocumentFormat, LineSequence};
use abstractor_ingest::{BatchOutcome, LineSources, ProgressEvent, process_paths};
use abstractor_parsing::{AbstractExtractor, SegmenterConfig, config::parse_marker};
use abstractor_reporting::{ExportFormat, WorkTable, export_table, render};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

/// Abstract metadata extractor - pull title, presenter and co-authors out of
/// abstract documents (.docx, .pdf) into one table
#[derive(Parser, Debug)]
#[command(name = "abstractor", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract one record per document and print or export the table
    Extract {
        /// Documents or directories of documents (directories are not recursed)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write the table to this file (format inferred from the extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: xlsx, csv, json, md or txt
        #[arg(long)]
        format: Option<String>,

        #[command(flatten)]
        segmentation: SegmentationArgs,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Print nothing on stdout except requested output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Dry run: show how a single document is segmented, line by line
    Inspect {
        /// Path to the .docx or .pdf file
        file_path: PathBuf,

        #[command(flatten)]
        segmentation: SegmentationArgs,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct SegmentationArgs {
    /// Config file layered over the platform and ./.abstractor.toml configs
    #[arg(long)]
    config: Option<PathBuf>,

    /// A title starts at the first line longer than this many characters
    #[arg(long)]
    min_title_chars: Option<usize>,

    /// Symbol marking the presenting author
    #[arg(long)]
    marker: Option<String>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            paths,
            output,
            format,
            segmentation,
            no_color,
            quiet,
        } => extract(paths, output, format, &segmentation, no_color, quiet),
        Command::Inspect {
            file_path,
            segmentation,
            no_color,
        } => inspect(&file_path, &segmentation, no_color),
    }
}

/// Resolve configuration: CLI flags > --config file > ./.abstractor.toml > platform config > defaults
/// Layer the `--config` file over `base`, then the flags over both.
fn resolve_config(
    base: ConfigFile,
    args: &SegmentationArgs,
) -> anyhow::Result<(ConfigFile, SegmenterConfig)> {
    let mut file = base;
    if let Some(path) = &args.config {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let overlay = config_file::parse_config(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        file = config_file::merge(file, overlay);
    }

    let mut builder = SegmenterConfig::builder();
    if let Some(section) = &file.segmentation {
        builder = builder.apply_file(section)?;
    }
    if let Some(n) = args.min_title_chars {
        builder = builder.min_title_chars(n);
    }
    if let Some(marker) = &args.marker {
        builder = builder.presenter_marker(parse_marker(marker)?);
    }
    let config = builder.build()?;

    Ok((file, config))
}

fn line_sources(file: &ConfigFile) -> LineSources {
    LineSources::from_pdf_config(&file.pdf.clone().unwrap_or_default())
}

/// Expand directories into their files, sorted by name. Plain paths are
/// kept as given, in order, even when they do not exist.
fn expand_paths(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut expanded = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory {}", path.display()))?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.is_file())
                .collect();
            entries.sort();
            expanded.extend(entries);
        } else {
            expanded.push(path.clone());
        }
    }
    Ok(expanded)
}

/// `--format` wins, then the output file extension, then `[export] format`.
fn resolve_format(
    flag: Option<&str>,
    output: Option<&Path>,
    file: &ConfigFile,
) -> anyhow::Result<Option<ExportFormat>> {
    if let Some(name) = flag {
        return Ok(Some(name.parse()?));
    }
    if let Some(format) = output.and_then(ExportFormat::from_path) {
        return Ok(Some(format));
    }
    match file.export.as_ref().and_then(|e| e.format.as_deref()) {
        Some(name) => Ok(Some(name.parse()?)),
        None => Ok(None),
    }
}

fn extract(
    paths: Vec<PathBuf>,
    output: Option<PathBuf>,
    format: Option<String>,
    segmentation: &SegmentationArgs,
    no_color: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let (file, config) = resolve_config(config_file::load_config(), segmentation)?;
    let sources = line_sources(&file);

    let paths = expand_paths(&paths)?;
    if paths.is_empty() {
        anyhow::bail!("No input files");
    }
    tracing::debug!(files = paths.len(), ?sources, "expanded input paths");
    let export_format = resolve_format(format.as_deref(), output.as_deref(), &file)?;

    let color = ColorMode(!no_color);
    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(paths.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:30.green/dim}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=> "),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    };

    let outcome = process_paths(&paths, &config, &sources, |event| match event {
        ProgressEvent::Started { total } => bar.set_length(total as u64),
        ProgressEvent::Extracted { filename, .. }
        | ProgressEvent::Skipped { filename, .. }
        | ProgressEvent::Failed { filename, .. } => {
            bar.set_message(filename);
            bar.inc(1);
        }
        ProgressEvent::Finished { .. } => bar.finish_and_clear(),
    })?;

    let BatchOutcome {
        records,
        skipped,
        failures,
    } = outcome;
    let table = WorkTable::from(records);
    let mut stdout = std::io::stdout();

    match (&output, export_format) {
        (Some(path), format) => {
            let format = format.unwrap_or_default();
            export_table(&table, format, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !quiet {
                output::print_table(&mut stdout, &table, color)?;
                output::print_summary(&mut stdout, table.len(), &skipped, &failures, color)?;
                writeln!(
                    stdout,
                    "Wrote {} rows ({}) to {}",
                    table.len(),
                    format.label(),
                    path.display()
                )?;
            }
        }
        (None, Some(ExportFormat::Xlsx)) => {
            anyhow::bail!("XLSX output needs a file: pass -o <FILE>.xlsx");
        }
        (None, Some(format)) if format != ExportFormat::Text => {
            stdout.write_all(&render(&table, format)?)?;
        }
        (None, _) => {
            if !quiet {
                output::print_table(&mut stdout, &table, color)?;
                output::print_summary(&mut stdout, table.len(), &skipped, &failures, color)?;
            }
        }
    }

    Ok(())
}

fn inspect(file_path: &Path, segmentation: &SegmentationArgs, no_color: bool) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string());

    let format = DocumentFormat::from_filename(&file_name)
        .ok_or_else(|| anyhow::anyhow!("Unsupported file type: {} (expected .docx or .pdf)", file_name))?;

    let (file, config) = resolve_config(config_file::load_config(), segmentation)?;
    let sources = line_sources(&file);
    let source = sources
        .get(format)
        .ok_or_else(|| anyhow::anyhow!("No line source available for .{} files", format))?;

    let lines = LineSequence::new(source.extract_lines(file_path)?);
    let extractor = AbstractExtractor::with_config(config);
    let analysis = extractor.analyze(&lines);

    let mut stdout = std::io::stdout();
    output::print_inspection(
        &mut stdout,
        &file_name,
        &lines,
        analysis.as_ref(),
        extractor.config(),
        ColorMode(!no_color),
    )?;
    Ok(())
}
