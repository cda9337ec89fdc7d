//! # Variant Explorer
//!
//! Imports annotated VCF files into a variant store and answers free-text
//! searches against it.
//!
//! ## Quick Start
//!
//! ```bash
//! # Import two cohorts in parallel, keeping only PASS records
//! variant-explorer import cohort1.vcf.gz cohort2.vcf.gz --dataset bipmed --assembly hg38 -j 0
//!
//! # Search by gene, position, range or dbSNP id
//! variant-explorer search SCN1A 1:7737651 1:65000-70000 rs35735053 --format tsv
//!
//! # Drop a dataset
//! variant-explorer remove --dataset bipmed
//! ```

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::time::Instant;

use variant_explorer::config::ExplorerConfig;
use variant_explorer::error::{BoxError, ImportError};
use variant_explorer::import_vcf::{iterate_over, ImportOptions, VcfSummary};
use variant_explorer::read_vcf_gz::open_vcf_file;
use variant_explorer::search::SearchInput;
use variant_explorer::service::{parse_queries, VariantExplorer};
use variant_explorer::store::MemoryStore;
use variant_explorer::write_output::{write_variants, OutputFormat};

#[derive(Parser)]
#[command(
    name = "variant-explorer",
    version,
    about = "🧬 Streaming VCF importer and variant search engine",
    long_about = "Imports annotated VCF files (plain or gzip) into a variant store, reducing per-sample depth and genotype quality to distributions, and answers searches by gene symbol, genomic position, genomic range or dbSNP id."
)]
struct Cli {
    /// TOML file with default options
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Variant store snapshot (JSON lines, .gz for compressed)
    #[arg(short = 's', long = "store", global = true, env = "VARIANT_EXPLORER_STORE")]
    store: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import genomic variants from VCF files
    Import(ImportArgs),
    /// Search for variants using queries
    Search(SearchArgs),
    /// Delete variants given a dataset and/or assembly
    Remove(ScopeArgs),
}

#[derive(Args)]
struct ScopeArgs {
    /// Dataset name
    #[arg(short = 'd', long = "dataset")]
    dataset: Option<String>,

    /// Genome version (e.g. hg38)
    #[arg(short = 'a', long = "assembly")]
    assembly: Option<String>,
}

#[derive(Args)]
#[command(after_help = "Variants with the same dataset, assembly, contig, position and alleles \
as an existing one are rejected; run `remove` first to replace a dataset.")]
struct ImportArgs {
    /// Input VCF files (plain or gzip compressed)
    #[arg(value_name = "INPUT_FILE", required = true)]
    input_files: Vec<PathBuf>,

    #[command(flatten)]
    scope: ScopeArgs,

    /// Don't filter variants by the FILTER column
    #[arg(long = "dont-filter")]
    dont_filter: bool,

    /// Just check the VCF files without writing to the store
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Number of files to import in parallel (0 = auto-detect)
    #[arg(short = 'j', long = "threads")]
    threads: Option<usize>,

    /// Compress the store snapshot with gzip
    #[arg(long = "compress")]
    compress: bool,
}

#[derive(Args)]
#[command(after_help = "QUERIES:
    Gene symbol (SCN1A) matches variants annotated with that gene.
    Genomic range (1:15000-16000) matches variants inside the range (1-based, half-open).
    Genomic position (1:12345) matches variants at that position (1-based).
    dbSNP ID (rs12345) matches variants annotated with that identifier.")]
struct SearchArgs {
    /// Queries; results matching any of them are returned
    #[arg(value_name = "QUERY")]
    queries: Vec<String>,

    #[command(flatten)]
    scope: ScopeArgs,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum)]
    format: Option<FormatCli>,

    /// Number of matches to skip
    #[arg(long = "start", default_value_t = 0)]
    start: u64,

    /// Maximum number of matches to print (0 = all)
    #[arg(long = "length", default_value_t = 0)]
    length: u64,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatCli {
    /// One human-readable line per variant
    #[value(name = "console")]
    Console,
    /// JSON array of variants
    #[value(name = "json")]
    Json,
    /// Tab-separated table
    #[value(name = "tsv")]
    Tsv,
    /// Comma-separated table
    #[value(name = "csv")]
    Csv,
}

impl From<FormatCli> for OutputFormat {
    fn from(cli: FormatCli) -> Self {
        match cli {
            FormatCli::Console => OutputFormat::Console,
            FormatCli::Json => OutputFormat::Json,
            FormatCli::Tsv => OutputFormat::Tsv,
            FormatCli::Csv => OutputFormat::Csv,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    let config = ExplorerConfig::load(cli.config.as_deref())
        .with_context(|| format!("reading config {:?}", cli.config))?;
    let store_path = config.store_path(cli.store.clone());

    match cli.command {
        Command::Import(args) => run_import(&config, &store_path, args),
        Command::Search(args) => run_search(&config, &store_path, args),
        Command::Remove(args) => run_remove(&config, &store_path, args),
    }
}

fn run_import(config: &ExplorerConfig, store_path: &Path, args: ImportArgs) -> Result<()> {
    let dataset_id = config.dataset(args.scope.dataset);
    let assembly_id = config.assembly(args.scope.assembly);
    if dataset_id.is_empty() || assembly_id.is_empty() {
        bail!("--dataset and --assembly are required for import");
    }

    for file in &args.input_files {
        if !file.exists() {
            bail!("File '{}' not found", file.display());
        }
    }

    let threads = match args.threads.or(config.threads).unwrap_or(1) {
        0 => num_cpus::get(),
        n => n,
    };
    if threads > 1 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            log::warn!("Could not set thread pool size: {e}, continuing with default pool");
        }
    }

    let filter = !args.dont_filter && config.filter.unwrap_or(true);
    let options = ImportOptions::new(&dataset_id, &assembly_id).with_filter(filter);

    println!("🧬 Variant Explorer import starting...");
    println!("🏷️  Dataset: {dataset_id} / Assembly: {assembly_id}");
    println!(
        "⚡ Files: {} (using {} thread{})",
        args.input_files.len(),
        threads,
        if threads == 1 { "" } else { "s" }
    );
    if args.dry_run {
        println!("🔍 Dry run: nothing will be written to {}", store_path.display());
    }
    println!();

    let explorer = VariantExplorer::new(if args.dry_run {
        MemoryStore::new()
    } else {
        MemoryStore::load_snapshot(store_path)
            .with_context(|| format!("loading store {}", store_path.display()))?
    });

    let start = Instant::now();
    let results: Vec<(&PathBuf, Result<VcfSummary, ImportError>)> = args
        .input_files
        .par_iter()
        .map(|file| {
            let result = import_file(file, &options, &explorer, args.dry_run);
            (file, result)
        })
        .collect();

    let mut failures = 0;
    for (file, result) in &results {
        let (summary, error) = match result {
            Ok(summary) => (summary, None),
            Err(e) => (&e.summary, Some(e)),
        };

        println!("📁 {}", file.display());
        println!("   📊 Total variants: {}", summary.total_variants);
        if filter {
            println!("   ✅ Passed variants: {}", summary.passed_variants);
        }
        if let Some(e) = error {
            failures += 1;
            eprintln!("   ❌ {}", e.source);
        }
    }

    if !args.dry_run {
        let compress = args.compress || store_path.extension().is_some_and(|ext| ext == "gz");
        explorer
            .store()
            .write_snapshot(store_path, compress)
            .with_context(|| format!("writing store {}", store_path.display()))?;
        println!();
        println!(
            "💾 Store {} now holds {} variants",
            store_path.display(),
            explorer.store().len()?
        );
    }
    println!("⏱️  Total time: {:.2?}", start.elapsed());

    if failures > 0 {
        bail!("{failures} of {} files failed to import", results.len());
    }
    Ok(())
}

fn import_file(
    file: &Path,
    options: &ImportOptions,
    explorer: &VariantExplorer<MemoryStore>,
    dry_run: bool,
) -> Result<VcfSummary, ImportError> {
    let reader = open_vcf_file(file).map_err(|e| ImportError {
        summary: VcfSummary::default(),
        source: e.into(),
    })?;

    iterate_over(reader, options, |variant| -> Result<(), BoxError> {
        if !dry_run {
            explorer.insert_variant(variant)?;
        }
        Ok(())
    })
}

fn run_search(config: &ExplorerConfig, store_path: &Path, args: SearchArgs) -> Result<()> {
    let dataset_id = config.dataset(args.scope.dataset);
    let assembly_id = config.assembly(args.scope.assembly);

    let format = match args.format {
        Some(format) => OutputFormat::from(format),
        None => match config.format.as_deref() {
            Some(name) => OutputFormat::from_name(name)
                .with_context(|| format!("unknown output format '{name}' in config"))?,
            None => OutputFormat::Console,
        },
    };

    let queries = parse_queries(&args.queries, &dataset_id, &assembly_id)?;
    let explorer = VariantExplorer::new(
        MemoryStore::load_snapshot(store_path)
            .with_context(|| format!("loading store {}", store_path.display()))?,
    );

    let response = explorer.search(&SearchInput {
        draw: 0,
        start: args.start,
        length: args.length,
        queries,
    })?;
    log::debug!(
        "{} of {} variants matched",
        response.records_filtered,
        response.records_total
    );

    write_variants(&mut stdout().lock(), &response.variants, format)?;
    Ok(())
}

fn run_remove(config: &ExplorerConfig, store_path: &Path, args: ScopeArgs) -> Result<()> {
    let dataset_id = config.dataset(args.dataset);
    let assembly_id = config.assembly(args.assembly);

    let explorer = VariantExplorer::new(
        MemoryStore::load_snapshot(store_path)
            .with_context(|| format!("loading store {}", store_path.display()))?,
    );
    let removed = explorer.remove_variants(&dataset_id, &assembly_id)?;

    let compress = store_path.extension().is_some_and(|ext| ext == "gz");
    explorer.store().write_snapshot(store_path, compress)?;

    println!("🗑️  Removed {removed} variants from {}", store_path.display());
    Ok(())
}
