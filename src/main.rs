use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use owner_resolver::config::Config;
use owner_resolver::constants;
use owner_resolver::domain::Owner;
use owner_resolver::logging;
use owner_resolver::metrics;
use owner_resolver::pipeline::processing::InvalidCollector;
use owner_resolver::pipeline::{collect_inputs, BatchResolver, OwnerResolver};

#[derive(Parser)]
#[command(name = "owner-resolver")]
#[command(
    about = "Resolve property owner strings into people, companies and an ownership timeline"
)]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (default: resolver.toml if present, or $OWNER_RESOLVER_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write Prometheus metrics to this file on exit
    #[arg(long, global = true)]
    metrics_out: Option<PathBuf>,

    /// Directory for JSON log files (overrides [logging] directory)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one property document or a directory of them
    Resolve {
        /// Property JSON file, or a directory of *.json files
        #[arg(short, long)]
        input: PathBuf,
        /// Write property_<id>.json files here instead of printing to stdout
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Source profile to use for every document
        #[arg(short, long)]
        source: Option<String>,
    },
    /// Run a single raw owner string through the engine
    Parse {
        text: String,
        /// Source profile (default from config)
        #[arg(short, long)]
        source: Option<String>,
    },
    /// List the registered source profiles
    Sources,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var(constants::CONFIG_PATH_ENV).ok().map(PathBuf::from));
    let config = Config::load_or_default(config_path.as_deref())
        .context("Failed to load configuration")?;

    let log_dir = cli.log_dir.clone().or_else(|| config.logging.directory.clone());
    logging::init_logging(log_dir.as_deref());

    if cli.metrics_out.is_some() {
        metrics::init_metrics();
    }

    let exit = match cli.command {
        Commands::Resolve {
            input,
            output_dir,
            source,
        } => run_resolve(&config, &input, output_dir.as_deref(), source)?,
        Commands::Parse { text, source } => run_parse(&config, &text, source)?,
        Commands::Sources => run_sources(&config)?,
    };

    if let Some(path) = &cli.metrics_out {
        write_metrics(path)?;
    }

    Ok(exit)
}

fn run_resolve(
    config: &Config,
    input: &Path,
    output_dir: Option<&Path>,
    source: Option<String>,
) -> anyhow::Result<ExitCode> {
    let span = tracing::info_span!("resolve", input = %input.display());
    let _enter = span.enter();

    let registry = config.build_registry()?;
    let tables = config.build_tables()?;
    let default_source = config.resolver.default_source.clone();
    let mut batch = BatchResolver::new(registry, tables, default_source, source)?;

    let inputs = collect_inputs(input)
        .with_context(|| format!("Failed to read input {}", input.display()))?;
    if inputs.is_empty() {
        warn!("No property documents found");
        eprintln!("⚠️  No property documents found in {}", input.display());
        return Ok(ExitCode::FAILURE);
    }

    info!(documents = inputs.len(), "Resolving properties");
    let outcomes = batch.run(&inputs);

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => match output_dir {
                Some(dir) => {
                    let path = report.write_to_dir(dir)?;
                    println!(
                        "✅ {} -> {} ({} current owners, {} invalid)",
                        outcome.input.display(),
                        path.display(),
                        report.current_owners().len(),
                        report.invalid_owners.len()
                    );
                }
                None => println!("{}", report.to_json_pretty()?),
            },
            Err(error_report) => {
                failed += 1;
                eprintln!("{}", serde_json::to_string(error_report)?);
            }
        }
    }

    if output_dir.is_some() {
        println!("\n📊 Resolved {} of {} properties", outcomes.len() - failed, outcomes.len());
    }

    if failed > 0 {
        eprintln!("❌ {} properties failed", failed);
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_parse(config: &Config, text: &str, source: Option<String>) -> anyhow::Result<ExitCode> {
    let registry = config.build_registry()?;
    let source_id = source.unwrap_or_else(|| config.resolver.default_source.clone());
    let profile = registry.get(&source_id)?.clone();
    let resolver = OwnerResolver::new(config.build_tables()?, profile);

    let mut invalid = InvalidCollector::new();
    let owners = resolver.resolve_text(text, &mut invalid);

    println!("🔍 {} ({}, {})", text, source_id, resolver.profile().name_order);
    for owner in &owners {
        let icon = match owner {
            Owner::Person(_) => "👤",
            Owner::Company(_) => "🏢",
        };
        println!("   {} {} {}", icon, owner.kind(), owner);
    }
    for entry in invalid.entries() {
        println!("   ⚠️  {:?} rejected: {}", entry.raw, entry.reason);
    }

    Ok(ExitCode::SUCCESS)
}

fn run_sources(config: &Config) -> anyhow::Result<ExitCode> {
    let registry = config.build_registry()?;

    println!("📋 Source profiles:");
    for source_id in registry.list_sources() {
        let profile = registry.get(source_id)?;
        let marker = if source_id == config.resolver.default_source { " (default)" } else { "" };
        println!(
            "   {}{}: order={}, split_on_semicolon={}, split_on_slash={}, digits_imply_company={}",
            source_id,
            marker,
            profile.name_order,
            profile.split_on_semicolon,
            profile.split_on_slash,
            profile.digits_imply_company
        );
    }

    Ok(ExitCode::SUCCESS)
}

fn write_metrics(path: &Path) -> anyhow::Result<()> {
    match metrics::render() {
        Some(text) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
            info!(path = %path.display(), "Metrics written");
        }
        None => warn!("Metrics recorder not installed; nothing written"),
    }
    Ok(())
}
