//! Document text extraction: turns an uploaded file into one plain-text string.
//!
//! Dispatch is by file extension only; unsupported names are rejected before any
//! bytes are parsed. Each reader yields an `ExtractedText` whose parts are joined
//! body first, then hyperlink targets, then header/footer text.

pub mod docx;
pub mod ocr;
pub mod pdf;

use std::error::Error as StdError;
use std::fmt;
use std::path::Path;

use bytes::Bytes;
use thiserror::Error;
use tracing::{error, info};

use crate::documents::ocr::TesseractOcr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Image,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::Image => "image",
        })
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported file format for '{filename}': only PDF, DOCX and image (png, jpg, jpeg, gif) files are supported")]
    UnsupportedFormat { filename: String },

    #[error("failed to parse {format} document: {source}")]
    Parse {
        format: DocumentFormat,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl DocumentError {
    fn parse(format: DocumentFormat, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        DocumentError::Parse {
            format,
            source: source.into(),
        }
    }
}

impl DocumentFormat {
    /// Picks the reader for `filename` by its (case-insensitive) extension.
    pub fn from_filename(filename: &str) -> Result<Self, DocumentError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "png" | "jpg" | "jpeg" | "gif" => Ok(DocumentFormat::Image),
            _ => Err(DocumentError::UnsupportedFormat {
                filename: filename.to_string(),
            }),
        }
    }
}

/// Recoverable text of one document, kept in parts until joined.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExtractedText {
    pub body: String,
    pub hyperlinks: Vec<String>,
    pub header_footer: Vec<String>,
}

impl ExtractedText {
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// Joins the non-empty parts with newlines and trims the result.
    pub fn into_text(self) -> String {
        let parts = std::iter::once(self.body.trim().to_string())
            .chain(self.hyperlinks)
            .chain(self.header_footer)
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>();
        parts.join("\n").trim().to_string()
    }
}

/// Dispatches uploads to the PDF, DOCX or OCR reader.
#[derive(Clone)]
pub struct DocumentTextExtractor {
    ocr: TesseractOcr,
}

impl DocumentTextExtractor {
    pub fn new(ocr: TesseractOcr) -> Self {
        Self { ocr }
    }

    pub async fn extract_text(&self, filename: &str, data: Bytes) -> Result<String, DocumentError> {
        let format = DocumentFormat::from_filename(filename).inspect_err(|e| error!("{e}"))?;
        info!("Parsing {format} file '{filename}' ({} bytes)", data.len());

        let extracted = match format {
            DocumentFormat::Pdf => run_blocking(move || pdf::extract_pdf_text(&data)).await,
            DocumentFormat::Docx => run_blocking(move || docx::extract_docx_text(&data)).await,
            DocumentFormat::Image => {
                let extension = Path::new(filename)
                    .extension()
                    .and_then(|v| v.to_str())
                    .unwrap_or("png")
                    .to_ascii_lowercase();
                self.ocr
                    .extract_text(&data, &extension)
                    .await
                    .map(ExtractedText::body)
            }
        };

        match extracted {
            Ok(extracted) => Ok(extracted.into_text()),
            Err(e) => {
                error!("Error parsing {format} file '{filename}': {e:#}");
                Err(DocumentError::parse(format, e))
            }
        }
    }
}

/// Runs a CPU-bound reader on the blocking pool. A panicking reader becomes an error.
async fn run_blocking<F>(reader: F) -> anyhow::Result<ExtractedText>
where
    F: FnOnce() -> anyhow::Result<ExtractedText> + Send + 'static,
{
    tokio::task::spawn_blocking(reader).await?
}
