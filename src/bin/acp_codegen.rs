//! ACP Code Generator CLI
//!
//! Generates Rust models and method constants from the ACP schema directory.
//!
//! Usage:
//!   acp-codegen all --schema-dir ./schema --output-dir ./src/generated
//!   acp-codegen schema --check
//!   acp-codegen --help

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use similar::TextDiff;
use tracing::info;
use tracing_subscriber::EnvFilter;

use acp_codegen::codegen::meta::{generate_meta, DEFAULT_META_LABEL};
use acp_codegen::{CodegenContext, GeneratorConfig, MetaDocument, SchemaDocument, SchemaRef};

#[derive(Parser)]
#[command(name = "acp-codegen")]
#[command(about = "Generate Rust models from the Agent Client Protocol JSON Schema")]
struct Cli {
    /// Directory holding schema.json, meta.json and VERSION
    #[arg(long, global = true)]
    schema_dir: Option<PathBuf>,

    /// Directory generated files are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Path the generated code invokes runtime macros through
    #[arg(long, global = true)]
    runtime_path: Option<String>,

    /// Config file layered over the default locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Compare against the files on disk instead of writing them
    #[arg(long, global = true)]
    check: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Generate models from schema.json
    Schema,

    /// Generate method constants from meta.json
    Meta,

    /// Generate both
    All,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("❌ Generated files are out of date; rerun without --check");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// `Ok(false)` when `--check` found a stale file
fn run(cli: Cli) -> Result<bool> {
    let mut config = GeneratorConfig::load_from(cli.config.as_deref()).context("failed to load configuration")?;

    if let Some(dir) = cli.schema_dir {
        config.input.schema_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }
    if let Some(path) = cli.runtime_path {
        config.codegen.runtime_path = path;
    }

    let schema_ref = SchemaRef::read(&config.version_path())
        .with_context(|| format!("failed to read {}", config.version_path().display()))?;

    let mut up_to_date = true;
    if matches!(cli.command, Commands::Schema | Commands::All) {
        up_to_date &= generate_schema(&config, schema_ref.clone(), cli.check)?;
    }
    if matches!(cli.command, Commands::Meta | Commands::All) {
        up_to_date &= generate_meta_file(&config, schema_ref, cli.check)?;
    }

    Ok(up_to_date)
}

fn generate_schema(config: &GeneratorConfig, schema_ref: Option<SchemaRef>, check: bool) -> Result<bool> {
    let input = config.schema_path();
    let doc = SchemaDocument::load(&input)
        .with_context(|| format!("failed to load {}", input.display()))?
        .with_schema_ref(schema_ref);

    let ctx = CodegenContext::build(&doc, config.codegen.clone())
        .with_context(|| format!("failed to generate models from {}", input.display()))?;

    if !ctx.diagnostics().is_empty() {
        eprint!("{}", ctx.diagnostics().format_all());
    }

    info!(types = ctx.types().len(), "models generated");
    write_or_check(&config.schema_output(), &ctx.emit(), check)
}

fn generate_meta_file(config: &GeneratorConfig, schema_ref: Option<SchemaRef>, check: bool) -> Result<bool> {
    let input = config.meta_path();
    let meta = MetaDocument::load(&input)
        .with_context(|| format!("failed to load {}", input.display()))?
        .with_schema_ref(schema_ref);

    write_or_check(&config.meta_output(), &generate_meta(&meta, DEFAULT_META_LABEL), check)
}

fn write_or_check(path: &Path, content: &str, check: bool) -> Result<bool> {
    if check {
        let existing = match fs::read_to_string(path) {
            Ok(existing) => existing,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                println!("⚠️  {} does not exist", path.display());
                return Ok(false);
            }
            Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
        };

        if existing == content {
            println!("✅ {} is up to date", path.display());
            return Ok(true);
        }

        let on_disk = path.display().to_string();
        let diff = TextDiff::from_lines(existing.as_str(), content);
        print!("{}", diff.unified_diff().context_radius(3).header(&on_disk, "generated"));
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    println!("📝 Wrote {}", path.display());
    Ok(true)
}
