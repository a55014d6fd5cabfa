//! Document evidence for the internal-control question: text extraction
//! (text layer, then OCR) and keyword detection (exact, known phrase
//! variant, or fuzzy window match).

pub mod extract;
pub mod matcher;
pub mod similarity;

pub use extract::{DocumentReader, ExtractionError};
pub use matcher::{
    EvidenceMatcher, EvidenceStatus, EvidenceVerdict, KeywordHit, MatchKind, TextSource,
};

#[cfg(feature = "pdf")]
pub use extract::PdfDocumentReader;
