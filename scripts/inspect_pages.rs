use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use book_splitter::heading::HeadingClassifier;
use book_splitter::naming::printed_page_number;
use book_splitter::utils::{is_near_blank, non_empty_lines, PdfTextProvider};
use book_splitter::{RoutingConfig, TextProvider};

#[derive(Debug, Parser)]
#[command(author, version, about = "Show how individual pages of a PDF are read and classified")]
struct Args {
    /// Input PDF
    #[arg(short, long)]
    input: PathBuf,

    /// 0-based page indices to inspect (all pages when omitted)
    #[arg(short, long, value_delimiter = ',')]
    pages: Vec<usize>,

    /// Number of leading lines to print per page
    #[arg(long, default_value = "6")]
    lines: usize,

    /// OCR any page whose native text is too short
    #[arg(long, default_value = "false")]
    aggressive_ocr: bool,

    /// Path to routing thresholds JSON file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RoutingConfig::load(path)
            .with_context(|| format!("Failed to load config file: {:?}", path))?,
        None => RoutingConfig::default(),
    };
    let classifier = HeadingClassifier::new(&config)?;
    let mut provider = PdfTextProvider::open(&args.input, &config)
        .with_context(|| format!("Failed to open {:?}", args.input))?;

    let total = provider.page_count();
    info!("Inspecting {:?} ({} pages)", args.input, total);

    let pages: Vec<usize> = if args.pages.is_empty() {
        (0..total).collect()
    } else {
        args.pages.clone()
    };

    for index in pages {
        if index >= total {
            println!("Page {}: out of range (document has {} pages)", index, total);
            continue;
        }

        let page = provider.text_for_page(index, args.aggressive_ocr);
        let heading = classifier.classify(&page.text);
        let near_blank = is_near_blank(
            &page.text,
            config.near_blank_max_chars,
            config.near_blank_max_digits,
        );

        println!(
            "\n--- Page {} (printed: {}, source: {:?}) ---",
            index,
            printed_page_number(&page.text, index),
            page.source
        );
        println!("Heading:    {}", heading);
        println!("Near blank: {}", near_blank);
        for line in non_empty_lines(&page.text).into_iter().take(args.lines) {
            println!("  | {}", line);
        }
    }

    Ok(())
}
