//! Text extraction from uploaded documents.
//!
//! Extracts text using:
//! - pdftotext (Poppler) for PDF text extraction, page by page
//! - Tesseract OCR for image files
//!
//! Uploads arrive as in-memory bytes with a declared content type; the
//! extractor stages them in a scratch file for the external tools and
//! removes the file on every exit path.

mod aggregate;
mod extractor;

pub use aggregate::{aggregate, FILE_DELIMITER};
pub use extractor::{ExtractionError, ExtractionMethod, ExtractionResult, TextExtractor};
