use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use book_splitter::report::list_reports;
use book_splitter::{split_document, RoutingConfig, RunConfig, RunSummary};

#[derive(Debug, Parser)]
#[command(author, version, about = "Split a book PDF into per-page files filed by section")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Split a single book
    Split(SplitArgs),
    /// Split every PDF under a directory, labelling each by its file name
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Output root directory
    #[arg(short, long)]
    output: PathBuf,

    /// OCR any page whose native text is too short
    #[arg(long, default_value = "false")]
    aggressive_ocr: bool,

    /// Path to routing thresholds JSON file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SplitArgs {
    /// Input PDF
    #[arg(short, long)]
    input: PathBuf,

    /// Root label; also the book token in every file name
    #[arg(short, long)]
    root_label: String,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Directory containing book PDFs
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Split(args) => split_command(args),
        Commands::Batch(args) => batch_command(args),
    }
}

fn load_routing(path: Option<&Path>) -> Result<RoutingConfig> {
    match path {
        Some(path) => {
            info!("Loading routing configuration from: {:?}", path);
            let config = RoutingConfig::load(path)
                .with_context(|| format!("Failed to load config file: {:?}", path))?;
            info!("Routing config: {}", config);
            Ok(config)
        }
        None => Ok(RoutingConfig::default()),
    }
}

fn run_one(
    input: &Path,
    root_label: &str,
    common: &CommonArgs,
    routing: &RoutingConfig,
) -> Result<RunSummary> {
    let mut config = RunConfig::new(input.to_path_buf(), common.output.clone(), root_label);
    config.aggressive_ocr = common.aggressive_ocr;
    config.routing = routing.clone();

    split_document(&config).with_context(|| format!("Failed to split {:?}", input))
}

fn print_summary(summary: &RunSummary) {
    println!("\n=== {} ===", summary.book);
    println!("Pages:     {}", summary.total_pages);
    println!("Written:   {}", summary.written_pages);
    println!("Failed:    {}", summary.failed_pages);
    println!("OCR pages: {}", summary.ocr_pages);
    println!("Debug log: {}", summary.debug_log.display());
    println!("Report:    {}", summary.report.display());
}

fn split_command(args: SplitArgs) -> Result<()> {
    let routing = load_routing(args.common.config.as_deref())?;
    let summary = run_one(&args.input, &args.root_label, &args.common, &routing)?;
    print_summary(&summary);

    if summary.failed_pages > 0 {
        warn!(
            "{} pages could not be written; see {:?}",
            summary.failed_pages, summary.report
        );
    }
    Ok(())
}

fn batch_command(args: BatchArgs) -> Result<()> {
    let routing = load_routing(args.common.config.as_deref())?;

    fs::create_dir_all(&args.common.output).with_context(|| {
        format!("Failed to create output directory: {:?}", args.common.output)
    })?;

    // Find all book files
    let mut book_files: Vec<PathBuf> = WalkDir::new(&args.input)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    book_files.sort();

    info!("Found {} book files", book_files.len());

    if book_files.is_empty() {
        anyhow::bail!("No PDF files found in {:?}", args.input);
    }

    let mut failed_books = 0;
    for (idx, book_path) in book_files.iter().enumerate() {
        info!("Processing {}/{}: {:?}", idx + 1, book_files.len(), book_path);

        let root_label = book_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        match run_one(book_path, &root_label, &args.common, &routing) {
            Ok(summary) => print_summary(&summary),
            Err(e) => {
                warn!("{:#}", e);
                failed_books += 1;
            }
        }
    }

    let reports = list_reports(&args.common.output)?;
    println!(
        "\nProcessed {} books ({} failed); {} reports in {}",
        book_files.len(),
        failed_books,
        reports.len(),
        args.common.output.display()
    );

    Ok(())
}
