// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-lift CLI
//!
//! Command-line interface for lifting genotype marker tables between genome
//! builds with a chain file.

use clap::{Args, Parser, Subcommand};
use ferro_liftover::liftover::{
    translate, write_intervals, AmbiguityPolicy, ChromStyle, OverlapPolicy,
};
use ferro_liftover::marker::{write_dataset, write_dataset_path, ColumnLayout, Delimiter};
use ferro_liftover::partition::read_mapped_path;
use ferro_liftover::{update_dataset, LiftConfig, LiftError, LiftPipeline};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "ferro-lift")]
#[command(author, version, about = "Chain-based liftover for genotype marker tables")]
#[command(
    long_about = "Lift genotype marker annotation tables between genome builds.

Examples:
  ferro-lift lift --table hapmap3_r3_b36.map --layout plink-map --delimiter whitespace \\
      --chain hg18ToHg19.over.chain.gz -o lifted --prefix hapmap3_hg19
  ferro-lift translate --table markers.tsv --chain-style ucsc > markers.bed
  ferro-lift update --table markers.tsv --mapped lifted.mapped.txt -o markers.hg19.tsv
  ferro-lift config -o lift.toml"
)]
struct Cli {
    /// Log filter (tracing EnvFilter syntax, e.g. "info" or "ferro_liftover=debug")
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads a marker table
#[derive(Args)]
struct TableArgs {
    /// Marker annotation table (plain or .gz)
    #[arg(short, long)]
    table: PathBuf,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Column layout: default, plink-map, or chromosome,position,identifier indices
    #[arg(long)]
    layout: Option<ColumnLayout>,

    /// Field delimiter (tab or whitespace)
    #[arg(long)]
    delimiter: Option<Delimiter>,

    /// Allow repeated marker identifiers in the table
    #[arg(long)]
    allow_duplicates: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lift a marker table through a chain and write mapped, unmapped and lifted files
    Lift {
        #[command(flatten)]
        table: TableArgs,

        /// Chain file (UCSC .chain[.gz] or 7-column rule table)
        #[arg(long, required = true)]
        chain: PathBuf,

        /// Chromosome naming used by the chain (canonical, ucsc, plink-numeric)
        #[arg(long)]
        chain_style: Option<ChromStyle>,

        /// Chromosome naming written to the lifted table
        #[arg(long)]
        output_style: Option<ChromStyle>,

        /// Overlapping chain rules: ambiguous or reject
        #[arg(long)]
        overlap_policy: Option<OverlapPolicy>,

        /// Multiply-mapped markers: conservative or highest-score
        #[arg(long)]
        ambiguity_policy: Option<AmbiguityPolicy>,

        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output file prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Worker threads (0 = all cores)
        #[arg(long)]
        threads: Option<usize>,

        /// Summary format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Write the half-open interval table (chrom, start, end, id)
    Translate {
        #[command(flatten)]
        table: TableArgs,

        /// Chromosome naming to translate labels into
        #[arg(long)]
        chain_style: Option<ChromStyle>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply a mapped-position file to a marker table
    Update {
        #[command(flatten)]
        table: TableArgs,

        /// Mapped positions: identifier, position and optional chromosome
        #[arg(short, long)]
        mapped: PathBuf,

        /// Chromosome naming written to the updated table
        #[arg(long)]
        output_style: Option<ChromStyle>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a sample configuration file
    Config {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_level) {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    if let Err(e) = run(cli.command) {
        match e.downcast_ref::<LiftError>() {
            Some(err) => eprintln!("Error: {}", err.detailed_message()),
            None => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Lift {
            table,
            chain,
            chain_style,
            output_style,
            overlap_policy,
            ambiguity_policy,
            output_dir,
            prefix,
            threads,
            format,
        } => {
            let mut config = load_config(&table)?;
            let c = &mut config;
            override_with(&mut c.chromosomes.chain_style, chain_style);
            override_with(&mut c.chromosomes.output_style, output_style);
            override_with(&mut c.mapping.overlap_policy, overlap_policy);
            override_with(&mut c.mapping.ambiguity_policy, ambiguity_policy);
            override_with(&mut c.mapping.threads, threads);
            override_with(&mut c.output.directory, output_dir);
            override_with(&mut c.output.prefix, prefix);
            config.validate()?;
            run_lift(config, &table.table, &chain, &format)
        }
        Commands::Translate {
            table,
            chain_style,
            output,
        } => {
            let mut config = load_config(&table)?;
            override_with(&mut config.chromosomes.chain_style, chain_style);
            run_translate(&config, &table.table, output.as_deref())
        }
        Commands::Update {
            table,
            mapped,
            output_style,
            output,
        } => {
            let mut config = load_config(&table)?;
            override_with(&mut config.chromosomes.output_style, output_style);
            run_update(&config, &table.table, &mapped, output.as_deref())
        }
        Commands::Config { output } => run_config(output.as_deref()),
    }
}

fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_new(level).map_err(|e| format!("Invalid log level '{}': {}", level, e))?;

    // Logs go to stderr so stdout stays clean for table output
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    Ok(())
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Configuration file (or defaults) with the table flags applied
fn load_config(args: &TableArgs) -> Result<LiftConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            LiftConfig::from_file(path)?
        }
        None => LiftConfig::default(),
    };
    override_with(&mut config.table.layout, args.layout);
    override_with(&mut config.table.delimiter, args.delimiter);
    if args.allow_duplicates {
        config.table.check_duplicates = false;
    }
    config.validate()?;
    Ok(config)
}

fn output_writer(output: Option<&Path>) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn run_lift(
    config: LiftConfig,
    table: &Path,
    chain: &Path,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = LiftPipeline::new(config);
    let run = pipeline.run_files(table, chain)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match format {
        "json" => {
            serde_json::to_writer_pretty(&mut handle, &run.summary)?;
            writeln!(handle)?;
        }
        _ => writeln!(handle, "{}", run.summary)?,
    }
    Ok(())
}

fn run_translate(
    config: &LiftConfig,
    table: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = LiftPipeline::new(config.clone()).read_dataset(table)?;
    let translation = translate(&dataset, config.chromosomes.chain_style);

    let mut out = output_writer(output)?;
    write_intervals(&mut out, &dataset, &translation)?;
    out.flush()?;
    Ok(())
}

fn run_update(
    config: &LiftConfig,
    table: &Path,
    mapped: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = LiftPipeline::new(config.clone()).read_dataset(table)?;
    let records = read_mapped_path(mapped)?;
    let updated = update_dataset(&dataset, &records, config.chromosomes.output_style)?;
    info!(
        "Updated {} of {} marker(s) using {}",
        updated.len(),
        dataset.len(),
        mapped.display()
    );

    match output {
        Some(path) => write_dataset_path(path, &updated)?,
        None => {
            let mut out = output_writer(None)?;
            write_dataset(&mut out, &updated)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn run_config(output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let sample = LiftConfig::sample();
    match output {
        Some(path) => {
            sample.to_file(path)?;
            eprintln!("Wrote sample configuration to {}", path.display());
        }
        None => print!("{}", sample.to_toml_string()?),
    }
    Ok(())
}
