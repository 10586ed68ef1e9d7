//! exs2xpm - Logic EXS24 to Akai MPC program converter
//!
//! Converts EXS24 sampler instruments (.exs) into MPC keygroup or drum
//! programs (.xpm) with their samples copied alongside.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use exs2xpm::config::parse_program_type;
use exs2xpm::{
    BatchReport, ConvertConfig, ConvertOptions, InfoOptions, SampleIndex, convert_all,
    convert_file, render_info,
};

#[derive(Parser)]
#[command(name = "exs2xpm")]
#[command(about = "Convert Logic EXS24 instruments to Akai MPC programs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Settings shared by `convert` and `file`
#[derive(clap::Args)]
struct ConvertArgs {
    /// Output directory, one subdirectory per instrument
    #[arg(short, long = "output-path")]
    output_path: PathBuf,

    /// Directory searched for samples (default: the input location)
    #[arg(long)]
    samples_path: Option<PathBuf>,

    /// Zones per instrument before a key range is split
    #[arg(short, long)]
    layers_per_instrument: Option<usize>,

    /// keygroup, drum or auto
    #[arg(short = 't', long)]
    program_type: Option<String>,

    /// Settings file (exs2xpm.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every .exs file under a directory
    Convert {
        /// Directory searched for .exs files (and samples)
        #[arg(short = 'p', long = "search-path")]
        search_path: PathBuf,

        #[command(flatten)]
        args: ConvertArgs,

        /// Log failing files and continue (overrides the config file)
        #[arg(short, long, overrides_with = "strict")]
        skip_errors: bool,

        /// Stop at the first failing file (overrides the config file)
        #[arg(long, overrides_with = "skip_errors")]
        strict: bool,

        /// Worker threads (default: sequential)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Convert a single .exs file
    File {
        /// Input .exs file
        input: PathBuf,

        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Display the decoded contents of an .exs file
    Info {
        /// Input .exs file
        input: PathBuf,

        /// Show every zone, group and sample
        #[arg(short, long)]
        all: bool,

        /// Per-entry detail and global parameters
        #[arg(long)]
        verbose: bool,
    },
}

impl Commands {
    fn debug_logging(&self) -> bool {
        match self {
            Self::Convert { args, .. } | Self::File { args, .. } => args.verbose,
            Self::Info { .. } => false,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.command.debug_logging() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    match cli.command {
        Commands::Convert {
            search_path,
            args,
            skip_errors,
            strict,
            jobs,
        } => {
            let config = load_config(args.config.as_deref())?;
            let mut options = build_options(&search_path, &args, &config)?;
            options.skip_errors = skip_errors_policy(skip_errors, strict, config.skip_errors);
            options.jobs = jobs.or(config.jobs);

            info!("Converting instruments under {}", search_path.display());
            let report = convert_all(&options)
                .with_context(|| format!("Failed to convert {}", search_path.display()))?;
            print_report(&report);
        }

        Commands::File { input, args } => {
            let config = load_config(args.config.as_deref())?;
            let search_path = input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."))
                .to_path_buf();
            let options = build_options(&search_path, &args, &config)?;

            let index = SampleIndex::build(options.samples_root())
                .context("Failed to index samples")?;
            let converted = convert_file(&input, &options, &index)
                .with_context(|| format!("Failed to convert {}", input.display()))?;

            println!(
                "Converted {} ({} program, {} instruments, {} samples)",
                converted.name, converted.program_type, converted.instruments, converted.samples
            );
            println!("  -> {}", converted.output.display());
        }

        Commands::Info {
            input,
            all,
            verbose,
        } => {
            if !input.exists() {
                anyhow::bail!("File not found: {}", input.display());
            }
            println!("Parsing EXS file: {}", input.display());
            let instrument = exs24::load_exs(&input)
                .with_context(|| format!("Failed to parse EXS file: {}", input.display()))?;
            print!("{}", render_info(&instrument, &InfoOptions { all, verbose }));
        }
    }

    Ok(())
}

/// Command-line flags win; without either, the config file decides
fn skip_errors_policy(skip_errors: bool, strict: bool, configured: bool) -> bool {
    match (skip_errors, strict) {
        (true, _) => true,
        (_, true) => false,
        _ => configured,
    }
}

fn load_config(path: Option<&Path>) -> Result<ConvertConfig> {
    match path {
        Some(path) => ConvertConfig::load(path),
        None => Ok(ConvertConfig::default()),
    }
}

/// Merge command-line flags over the settings file
fn build_options(search_path: &Path, args: &ConvertArgs, config: &ConvertConfig) -> Result<ConvertOptions> {
    let mut options = ConvertOptions::new(search_path, &args.output_path);
    options.samples_path = args.samples_path.clone().or_else(|| config.samples_path.clone());
    options.layers_per_instrument = args
        .layers_per_instrument
        .unwrap_or(config.layers_per_instrument);
    if options.layers_per_instrument == 0 {
        anyhow::bail!("--layers-per-instrument must be at least 1");
    }
    options.program_type = match &args.program_type {
        Some(value) => parse_program_type(value)?,
        None => config.program_type()?,
    };
    options.classifier = config.classifier();
    options.skip_errors = config.skip_errors;
    options.jobs = config.jobs;
    Ok(options)
}

fn print_report(report: &BatchReport) {
    println!();
    println!(
        "Converted {} of {} instruments",
        report.converted.len(),
        report.total()
    );
    for converted in &report.converted {
        println!(
            "  {} [{}] {} instruments, {} samples",
            converted.name, converted.program_type, converted.instruments, converted.samples
        );
    }
    if !report.failed.is_empty() {
        println!();
        println!("Skipped {} files:", report.failed.len());
        for failure in &report.failed {
            println!("  {}: {}", failure.source.display(), failure.reason);
        }
    }
}
