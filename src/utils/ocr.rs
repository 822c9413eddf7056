use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Whether both `pdftoppm` and `tesseract` can be run.
///
/// Note: OCR requires poppler-utils and Tesseract on the system.
/// - Linux: sudo apt-get install poppler-utils tesseract-ocr
/// - Mac: brew install poppler tesseract
pub fn tools_available() -> bool {
    let probe = |tool: &str, arg: &str| {
        Command::new(tool)
            .arg(arg)
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    };
    probe("tesseract", "--version") && probe("pdftoppm", "-v")
}

/// Render one PDF page (1-based number) at 300 dpi and OCR it with Tesseract
pub fn ocr_pdf_page(path: &Path, page_number: u32) -> Result<String> {
    debug!("Performing OCR on page {} of {:?}", page_number, path);

    let temp_dir = std::env::temp_dir().join(format!(
        "book_split_ocr_{}_{}",
        std::process::id(),
        page_number
    ));
    fs::create_dir_all(&temp_dir)
        .with_context(|| format!("Failed to create OCR temp dir {:?}", temp_dir))?;

    let result = render_and_recognize(path, page_number, &temp_dir);

    // Cleanup
    if let Err(e) = fs::remove_dir_all(&temp_dir) {
        warn!("Failed to remove OCR temp dir {:?}: {}", temp_dir, e);
    }

    result
}

fn render_and_recognize(path: &Path, page_number: u32, temp_dir: &Path) -> Result<String> {
    let prefix = temp_dir.join("page");
    let page = page_number.to_string();

    let render = Command::new("pdftoppm")
        .args(["-f", &page, "-l", &page, "-r", "300", "-png", "-singlefile"])
        .arg(path)
        .arg(&prefix)
        .output()
        .context("Failed to run pdftoppm")?;

    if !render.status.success() {
        anyhow::bail!(
            "pdftoppm failed for page {}: {}",
            page_number,
            String::from_utf8_lossy(&render.stderr).trim()
        );
    }

    let image = prefix.with_extension("png");
    let recognize = Command::new("tesseract")
        .arg(&image)
        .arg("stdout")
        .args(["-l", "eng"])
        .output()
        .context("Failed to run tesseract")?;

    if !recognize.status.success() {
        anyhow::bail!(
            "Tesseract failed for page {}: {}",
            page_number,
            String::from_utf8_lossy(&recognize.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&recognize.stdout).into_owned())
}
