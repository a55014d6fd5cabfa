pub mod assess;
pub mod evidence;
pub mod records;
pub mod scoring;

use std::time::Instant;

use pmpj_risk_core::config::EngineConfig;
use pmpj_risk_core::evidence::{EvidenceMatcher, PdfDocumentReader};

pub type CommandResult = Result<serde_json::Value, Box<dyn std::error::Error>>;

pub(crate) fn elapsed_us(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}

/// Matcher backed by the PDF text layer with OCR fallback.
pub(crate) fn pdf_matcher(config: &EngineConfig) -> EvidenceMatcher<PdfDocumentReader> {
    EvidenceMatcher::new(
        PdfDocumentReader::new(config.ocr.clone()),
        config.evidence.clone(),
    )
}
