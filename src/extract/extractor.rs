//! Text extraction using pdftotext and Tesseract.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Handle command output, extracting stdout on success or returning appropriate error.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, ExtractionError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ExtractionError::ExtractionFailed(format!(
                    "{}: {}",
                    error_prefix, stderr
                )))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}

/// Check if a binary is available in PATH.
fn check_binary(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Declared content type is neither PDF nor an image. Carries the
    /// filename so the caller can name the offending upload.
    #[error("Unsupported file type for {0}")]
    UnsupportedFileType(String),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of text extraction.
#[derive(Debug)]
pub struct ExtractionResult {
    /// Extracted text content.
    pub text: String,
    /// Method used for extraction.
    pub method: ExtractionMethod,
    /// Number of pages processed (for PDFs).
    pub page_count: Option<u32>,
}

/// Method used to extract text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Direct text extraction from PDF.
    PdfToText,
    /// OCR using Tesseract.
    TesseractOcr,
}

/// Text extractor that stages uploads in a scratch directory and shells out
/// to external tools.
#[derive(Clone)]
pub struct TextExtractor {
    /// Directory for staging upload bytes during extraction.
    scratch_dir: PathBuf,
    /// Tesseract language setting.
    tesseract_lang: String,
}

impl TextExtractor {
    /// Create a new text extractor staging files under `scratch_dir`.
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            tesseract_lang: "eng".to_string(),
        }
    }

    /// Set Tesseract language.
    #[allow(dead_code)]
    pub fn with_language(mut self, lang: &str) -> Self {
        self.tesseract_lang = lang.to_string();
        self
    }

    /// Extract text from uploaded bytes based on the declared content type.
    ///
    /// The bytes are written to a temporary file first; the file is removed
    /// when this returns, on success and failure alike.
    pub fn extract(
        &self,
        bytes: &[u8],
        content_type: &str,
        filename: &str,
    ) -> Result<ExtractionResult, ExtractionError> {
        if content_type != "application/pdf" && !content_type.starts_with("image/") {
            return Err(ExtractionError::UnsupportedFileType(filename.to_string()));
        }

        // NamedTempFile removes the staged file when dropped, covering
        // every exit path below.
        let staged = NamedTempFile::new_in(&self.scratch_dir)?;
        std::fs::write(staged.path(), bytes)?;

        if content_type == "application/pdf" {
            self.extract_pdf(staged.path())
        } else {
            self.extract_image(staged.path())
        }
    }

    /// Extract text from a PDF by concatenating per-page text in page order.
    fn extract_pdf(&self, file_path: &Path) -> Result<ExtractionResult, ExtractionError> {
        let page_count = self.pdf_page_count(file_path)?;

        let mut text = String::new();
        for page in 1..=page_count {
            text.push_str(&self.pdf_page_text(file_path, page)?);
        }

        Ok(ExtractionResult {
            text,
            method: ExtractionMethod::PdfToText,
            page_count: Some(page_count),
        })
    }

    /// Get the page count of a PDF via pdfinfo.
    ///
    /// A document pdfinfo cannot read (corrupt, encrypted, mislabeled bytes)
    /// fails extraction outright.
    fn pdf_page_count(&self, file_path: &Path) -> Result<u32, ExtractionError> {
        let output = Command::new("pdfinfo").arg(file_path).output();
        let stdout = handle_cmd_output(
            output,
            "pdfinfo (install poppler-utils)",
            "pdfinfo could not read document",
        )?;

        for line in stdout.lines() {
            if line.starts_with("Pages:") {
                if let Some(count) = line.split_whitespace().nth(1).and_then(|s| s.parse().ok()) {
                    return Ok(count);
                }
            }
        }

        Err(ExtractionError::ExtractionFailed(
            "pdfinfo reported no page count".to_string(),
        ))
    }

    /// Run pdftotext on a single page of a PDF file.
    fn pdf_page_text(&self, file_path: &Path, page: u32) -> Result<String, ExtractionError> {
        let page_str = page.to_string();
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
            .arg(file_path)
            .arg("-") // Output to stdout
            .output();

        handle_cmd_output(
            output,
            "pdftotext (install poppler-utils)",
            &format!("pdftotext failed on page {}", page),
        )
    }

    /// Extract text from an image file using Tesseract.
    fn extract_image(&self, file_path: &Path) -> Result<ExtractionResult, ExtractionError> {
        let output = Command::new("tesseract")
            .arg(file_path)
            .arg("stdout")
            .args(["-l", &self.tesseract_lang])
            .output();

        let text = handle_cmd_output(
            output,
            "tesseract (install tesseract-ocr)",
            "tesseract failed",
        )?;

        Ok(ExtractionResult {
            text,
            method: ExtractionMethod::TesseractOcr,
            page_count: Some(1),
        })
    }

    /// Check if required tools are available.
    pub fn check_tools() -> Vec<(String, bool)> {
        ["pdftotext", "pdfinfo", "tesseract"]
            .iter()
            .map(|tool| (tool.to_string(), check_binary(tool)))
            .collect()
    }
}
