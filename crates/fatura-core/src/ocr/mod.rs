//! OCR service seam and the image-to-record pipeline.

mod command;

pub use command::CommandOcr;

use tracing::warn;

use crate::error::OcrError;
use crate::invoice::{ExtractionResult, InvoiceParser};

/// Turns an invoice image into text.
///
/// Implementations hold no per-document state and are injected into
/// [`InvoicePipeline`].
pub trait OcrService: Send + Sync {
    /// Recognize the text of one encoded image.
    fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;
}

/// OCR followed by field extraction.
#[derive(Debug, Clone)]
pub struct InvoicePipeline<S, P> {
    ocr: S,
    parser: P,
}

impl<S: OcrService, P: InvoiceParser> InvoicePipeline<S, P> {
    /// Create a pipeline from an OCR service and a parser.
    pub fn new(ocr: S, parser: P) -> Self {
        Self { ocr, parser }
    }

    /// Recognize an image and extract its fields.
    ///
    /// An OCR failure skips the document and is returned as an error.
    pub fn process_image(&self, image: &[u8]) -> Result<ExtractionResult, OcrError> {
        let text = self.ocr.recognize(image).inspect_err(|e| {
            warn!("OCR failed, skipping document: {}", e);
        })?;
        Ok(self.parser.parse(&text))
    }

    /// Extract fields from already recognized text.
    pub fn process_text(&self, text: &str) -> ExtractionResult {
        self.parser.parse(text)
    }

    pub fn ocr(&self) -> &S {
        &self.ocr
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }
}
