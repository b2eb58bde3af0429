//! CLI entry point for the elections data toolkit.
//!
//! This binary wires the library crates into the commands used to maintain
//! the elections data repository.
//!
//! # Usage
//!
//! ```bash
//! elect [OPTIONS] <COMMAND>
//!
//! # Write the source document (phrases + sources + generated nodes)
//! elect make-json
//!
//! # Assemble and write the canonical document
//! elect build _build/canonical.json
//!
//! # Rewrite auto-generated YAML files in canonical form
//! elect yaml-norm pre_data/*.yaml
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use elect_core::{Config, FileType, TypeRegistry};
use elect_data::{Assembler, SourceDocument, read_phrase_dir, to_json_pretty};
use elect_yaml::{DocumentWriter, NormalizeOutcome};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Toolkit for the elections data repository.
///
/// Reads the hand-authored YAML sources and phrase files and produces the
/// JSON documents consumed by the site generator.
#[derive(Parser)]
#[command(name = "elect", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file; missing settings keep their defaults.
    #[arg(short, long, global = true, env = "ELECT_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Root of the data repository (overrides the configuration file).
    #[arg(short, long, global = true, env = "ELECT_ROOT")]
    root: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Write the source document as JSON.
    MakeJson {
        /// Output file (defaults to `paths.json_output`).
        output: Option<Utf8PathBuf>,
    },

    /// Assemble the canonical document and write it as JSON.
    Build {
        /// Output file (defaults to `paths.canonical_output`).
        output: Option<Utf8PathBuf>,
    },

    /// Print the merged phrase table.
    Phrases,

    /// Load a type-definitions file and print the resulting types.
    Types {
        /// Type-definitions YAML file.
        path: Utf8PathBuf,
    },

    /// Rewrite auto-generated and auto-updated YAML files in canonical form.
    YamlNorm {
        /// Files to normalize.
        #[arg(required = true)]
        paths: Vec<Utf8PathBuf>,

        /// Also print the normalized text.
        #[arg(long)]
        stdout: bool,
    },

    /// Print the file type of YAML files and whether they may be rewritten.
    YamlCheck {
        /// Files to check.
        #[arg(required = true)]
        paths: Vec<Utf8PathBuf>,
    },

    /// Set the `_meta` header of a YAML file and rewrite it.
    YamlHeader {
        /// File to update.
        path: Utf8PathBuf,

        /// File type to declare (`manual`, `auto_generated`, `auto_updated`).
        #[arg(long)]
        file_type: FileType,

        /// Free-text comments stored in the header.
        #[arg(long)]
        comments: Option<String>,
    },
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},ignore=warn,globset=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the configuration file and CLI arguments.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be loaded, if a
/// setting is invalid, or if the repository root is not a directory.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    if let Some(root) = &cli.root {
        config.paths.root.clone_from(root);
    }

    config.validate()?;
    config.require_root()?;
    Ok(config)
}

fn current_year() -> i64 {
    i64::from(chrono::Local::now().year())
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Builds the source document and writes it to `output`.
fn run_make_json(config: &Config, output: Option<&Utf8Path>) -> color_eyre::Result<()> {
    let path = output_path(config, output, &config.paths.json_output);
    info!(root = %config.paths.root, "Building source document");

    let source = SourceDocument::build(config)?;
    let json = source.to_json_pretty()?;
    write_output(&path, &json)?;

    info!(path = %path, "Source document written");
    Ok(())
}

/// Builds, assembles and writes the canonical document.
fn run_build(config: &Config, output: Option<&Utf8Path>) -> color_eyre::Result<()> {
    let path = output_path(config, output, &config.paths.canonical_output);
    info!(root = %config.paths.root, "Assembling canonical document");

    let registry = match &config.paths.type_definitions {
        Some(types_path) => Some(load_registry(&config.paths.resolve(types_path))?),
        None => None,
    };

    let source = SourceDocument::build(config)?;
    let mut assembler = Assembler::new(&config.assembly, current_year());
    if let Some(registry) = &registry {
        assembler = assembler.with_registry(registry);
    }
    let canonical = assembler.assemble(source)?;

    let json = to_json_pretty(&canonical)?;
    write_output(&path, &json)?;

    info!(path = %path, offices = canonical.offices.len(), "Canonical document written");
    Ok(())
}

/// Prints the merged phrase table.
fn run_phrases(config: &Config) -> color_eyre::Result<()> {
    let dir = config.paths.resolve(&config.paths.phrase_dir());
    let table = read_phrase_dir(&dir)?;
    print_stdout(&to_json_pretty(&table)?)
}

/// Prints the types defined by a type-definitions file.
fn run_types(path: &Utf8Path) -> color_eyre::Result<()> {
    let registry = load_registry(path)?;
    info!(path = %path, types = registry.len(), "Loaded type definitions");
    print_stdout(&to_json_pretty(&registry)?)
}

/// Normalizes each file, optionally echoing the rewritten text.
fn run_yaml_norm(paths: &[Utf8PathBuf], stdout: bool) -> color_eyre::Result<()> {
    let writer = DocumentWriter::default();
    for path in paths {
        match writer.normalize(path)? {
            NormalizeOutcome::Rewritten(text) if stdout => print_stdout(&text)?,
            NormalizeOutcome::Rewritten(_) | NormalizeOutcome::Skipped(_) => {}
        }
    }
    Ok(())
}

/// Prints the file type of each file.
fn run_yaml_check(paths: &[Utf8PathBuf]) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for path in paths {
        let file_type = elect_yaml::read(path)?
            .file_type()
            .map_err(|e| elect_yaml::YamlError::from(e).with_path(path))?;
        let verdict = if file_type.is_normalizable() {
            "normalizable"
        } else {
            "left alone"
        };
        writeln!(handle, "{path}: {file_type} ({verdict})")?;
    }
    Ok(())
}

/// Sets the header of a file and rewrites it.
fn run_yaml_header(
    path: &Utf8Path,
    file_type: FileType,
    comments: Option<&str>,
) -> color_eyre::Result<()> {
    let mut doc = elect_yaml::read(path)?;
    DocumentWriter::default().write_with_header(&mut doc, path, Some(file_type), comments)?;
    info!(path = %path, file_type = %file_type, "Header written");
    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn load_registry(path: &Utf8Path) -> color_eyre::Result<TypeRegistry> {
    let document: serde_json::Value = elect_yaml::read_value(path)?;
    TypeRegistry::from_document(&document)
        .wrap_err_with(|| format!("invalid type definitions in {path}"))
}

fn output_path(config: &Config, output: Option<&Utf8Path>, default: &Utf8Path) -> Utf8PathBuf {
    output.map_or_else(|| config.paths.resolve(default), Utf8Path::to_owned)
}

/// Writes fully rendered output, creating parent directories.
fn write_output(path: &Utf8Path, contents: &str) -> color_eyre::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).wrap_err_with(|| format!("failed to create {parent}"))?;
    }
    fs::write(path, contents).wrap_err_with(|| format!("failed to write {path}"))
}

fn print_stdout(text: &str) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write!(handle, "{text}").map_err(|e| eyre!("failed to write to stdout: {e}"))
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Route to appropriate command
    match &cli.command {
        Commands::MakeJson { output } => run_make_json(&build_config(&cli)?, output.as_deref()),
        Commands::Build { output } => run_build(&build_config(&cli)?, output.as_deref()),
        Commands::Phrases => run_phrases(&build_config(&cli)?),
        Commands::Types { path } => run_types(path),
        Commands::YamlNorm { paths, stdout } => run_yaml_norm(paths, *stdout),
        Commands::YamlCheck { paths } => run_yaml_check(paths),
        Commands::YamlHeader {
            path,
            file_type,
            comments,
        } => run_yaml_header(path, *file_type, comments.as_deref()),
    }
}
