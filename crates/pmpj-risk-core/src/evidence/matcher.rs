use serde::{Deserialize, Serialize};

use crate::config::{EvidenceConfig, MAX_PAGES};
use crate::evidence::extract::{DocumentReader, ExtractionError};
use crate::evidence::similarity;

// ---------------------------------------------------------------------------
// Verdict types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStatus {
    /// No document was supplied.
    NoDocument,
    /// Text was extracted; keywords were searched.
    Extracted,
    /// Both extraction paths ran but produced only whitespace.
    NoTextDetected,
    /// Extraction failed; `message` says why.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    TextLayer,
    Ocr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Variant,
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordHit {
    pub keyword: String,
    pub kind: MatchKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceVerdict {
    pub status: EvidenceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<TextSource>,
    /// Lower-cased extracted text, pages separated by newlines.
    pub text: String,
    /// Keywords found, each counted once. Informational only: internal
    /// control grading does not read it.
    pub matched_keywords: u32,
    pub hits: Vec<KeywordHit>,
}

impl EvidenceVerdict {
    fn without_text(status: EvidenceStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            source: None,
            text: String::new(),
            matched_keywords: 0,
            hits: Vec::new(),
        }
    }

    /// True when usable text came out of the document.
    pub fn extraction_succeeded(&self) -> bool {
        self.status == EvidenceStatus::Extracted
    }

    /// A message the caller should show the user, if any.
    pub fn warning(&self) -> Option<String> {
        match self.status {
            EvidenceStatus::Extracted | EvidenceStatus::NoDocument => None,
            EvidenceStatus::NoTextDetected | EvidenceStatus::Error => self.message.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Matcher
// ---------------------------------------------------------------------------

/// Extracts a document's text and checks it for required keywords.
#[derive(Debug, Clone)]
pub struct EvidenceMatcher<R> {
    reader: R,
    config: EvidenceConfig,
}

impl<R: DocumentReader> EvidenceMatcher<R> {
    pub fn new(reader: R, config: EvidenceConfig) -> Self {
        Self { reader, config }
    }

    pub fn config(&self) -> &EvidenceConfig {
        &self.config
    }

    /// Validate `document` against the configured keyword list.
    pub fn validate(&self, document: Option<&[u8]>) -> EvidenceVerdict {
        self.validate_document(document, &self.config.keywords)
    }

    /// Validate `document` against `keywords`. Never fails: extraction
    /// problems come back as an [`EvidenceStatus::Error`] verdict.
    pub fn validate_document(
        &self,
        document: Option<&[u8]>,
        keywords: &[String],
    ) -> EvidenceVerdict {
        let Some(pdf) = document else {
            return EvidenceVerdict::without_text(
                EvidenceStatus::NoDocument,
                "no document supplied",
            );
        };

        let (source, text) = match self.extract_text(pdf) {
            Ok(extracted) => extracted,
            Err(e) => {
                tracing::warn!(error = %e, "document extraction failed");
                return EvidenceVerdict::without_text(EvidenceStatus::Error, e.to_string());
            }
        };

        if text.trim().is_empty() {
            return EvidenceVerdict::without_text(
                EvidenceStatus::NoTextDetected,
                "no text detected in document",
            );
        }

        let fuzzy_text: Vec<char> = text.chars().take(self.config.max_fuzzy_chars).collect();
        let hits: Vec<KeywordHit> = keywords
            .iter()
            .filter_map(|keyword| {
                let kind = self.match_keyword(&text, &fuzzy_text, keyword)?;
                tracing::debug!(keyword = %keyword, ?kind, "keyword found");
                Some(KeywordHit {
                    keyword: keyword.clone(),
                    kind,
                })
            })
            .collect();

        EvidenceVerdict {
            status: EvidenceStatus::Extracted,
            message: None,
            source: Some(source),
            text,
            matched_keywords: hits.len() as u32,
            hits,
        }
    }

    /// Text layer first; OCR only if that yields nothing. A text-layer
    /// failure is not fatal, an OCR failure is.
    fn extract_text(&self, pdf: &[u8]) -> Result<(TextSource, String), ExtractionError> {
        let native = match self.reader.text_layer(pdf, MAX_PAGES) {
            Ok(pages) => join_lowercase(&pages),
            Err(e) => {
                tracing::debug!(error = %e, "text layer unavailable, falling back to OCR");
                String::new()
            }
        };
        if !native.trim().is_empty() {
            return Ok((TextSource::TextLayer, native));
        }

        let pages = self.reader.recognize(pdf, MAX_PAGES)?;
        Ok((TextSource::Ocr, join_lowercase(&pages)))
    }

    fn match_keyword(&self, text: &str, fuzzy_text: &[char], keyword: &str) -> Option<MatchKind> {
        let keyword = keyword.to_lowercase();
        if text.contains(&keyword) {
            return Some(MatchKind::Exact);
        }

        let variant_found = self
            .config
            .phrase_variants
            .iter()
            .map(|v| v.to_lowercase())
            .any(|v| v.contains(&keyword) && text.contains(&v));
        if variant_found {
            return Some(MatchKind::Variant);
        }

        let keyword: Vec<char> = keyword.chars().collect();
        if self.fuzzy_found(fuzzy_text, &keyword) {
            return Some(MatchKind::Fuzzy);
        }
        None
    }

    /// Slide a window of `keyword.len() + window_padding` characters over
    /// the text, one character at a time; windows near the end are shorter.
    fn fuzzy_found(&self, text: &[char], keyword: &[char]) -> bool {
        if text.len() < keyword.len() {
            return false;
        }
        let width = keyword.len() + self.config.window_padding;
        (0..=text.len() - keyword.len()).any(|start| {
            let end = (start + width).min(text.len());
            similarity::ratio(keyword, &text[start..end]) > self.config.fuzzy_threshold
        })
    }
}

fn join_lowercase(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| format!("{}\n", page.to_lowercase()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::time::Duration;

    /// Scripted reader: fixed text-layer and OCR outcomes, counting OCR calls.
    struct FakeReader {
        text_layer: Result<Vec<String>, &'static str>,
        ocr: Result<Vec<String>, &'static str>,
        ocr_calls: Cell<u32>,
        max_pages_seen: Cell<usize>,
    }

    impl FakeReader {
        fn new(
            text_layer: Result<Vec<&str>, &'static str>,
            ocr: Result<Vec<&str>, &'static str>,
        ) -> Self {
            fn owned(r: Result<Vec<&str>, &'static str>) -> Result<Vec<String>, &'static str> {
                r.map(|pages| pages.into_iter().map(String::from).collect())
            }
            Self {
                text_layer: owned(text_layer),
                ocr: owned(ocr),
                ocr_calls: Cell::new(0),
                max_pages_seen: Cell::new(0),
            }
        }
    }

    impl DocumentReader for FakeReader {
        fn text_layer(
            &self,
            _pdf: &[u8],
            max_pages: usize,
        ) -> Result<Vec<String>, ExtractionError> {
            self.max_pages_seen.set(max_pages);
            self.text_layer
                .clone()
                .map_err(|m| ExtractionError::Parse(m.to_string()))
        }

        fn recognize(
            &self,
            _pdf: &[u8],
            _max_pages: usize,
        ) -> Result<Vec<String>, ExtractionError> {
            self.ocr_calls.set(self.ocr_calls.get() + 1);
            self.ocr.clone().map_err(|m| ExtractionError::Ocr(m.to_string()))
        }
    }

    fn matcher(reader: FakeReader) -> EvidenceMatcher<FakeReader> {
        EvidenceMatcher::new(reader, EvidenceConfig::default())
    }

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_no_document() {
        let m = matcher(FakeReader::new(Ok(vec![]), Ok(vec![])));
        let v = m.validate(None);
        assert_eq!(v.status, EvidenceStatus::NoDocument);
        assert_eq!(v.matched_keywords, 0);
        assert!(v.text.is_empty());
        assert!(!v.extraction_succeeded());
        assert_eq!(v.warning(), None);
    }

    #[test]
    fn test_verbatim_keyword_counts_once() {
        let m = matcher(FakeReader::new(Ok(vec!["Lampiran: Analisis Risiko Klien"]), Ok(vec![])));
        let v = m.validate_document(Some(b"%PDF".as_slice()), &keywords(&["Analisis Risiko"]));
        assert_eq!(v.status, EvidenceStatus::Extracted);
        assert_eq!(v.source, Some(TextSource::TextLayer));
        assert_eq!(v.matched_keywords, 1);
        assert_eq!(v.hits[0].kind, MatchKind::Exact);
        assert_eq!(v.text, "lampiran: analisis risiko klien\n");
    }

    #[test]
    fn test_reads_at_most_five_pages() {
        let reader = FakeReader::new(Ok(vec!["cdd"]), Ok(vec![]));
        let m = matcher(reader);
        m.validate(Some(b"%PDF".as_slice()));
        assert_eq!(m.reader.max_pages_seen.get(), 5);
    }

    #[test]
    fn test_no_text_anywhere() {
        let m = matcher(FakeReader::new(Ok(vec!["  ", ""]), Ok(vec!["\n", " "])));
        let v = m.validate(Some(b"%PDF".as_slice()));
        assert_eq!(v.status, EvidenceStatus::NoTextDetected);
        assert_eq!(v.matched_keywords, 0);
        assert!(v.warning().is_some());
        assert_eq!(m.reader.ocr_calls.get(), 1);
    }

    #[test]
    fn test_ocr_fallback_when_text_layer_empty() {
        let m = matcher(FakeReader::new(Ok(vec![""]), Ok(vec!["FORMULIR CUSTOMER DUE DILIGENCE"])));
        let v = m.validate(Some(b"%PDF".as_slice()));
        assert_eq!(v.status, EvidenceStatus::Extracted);
        assert_eq!(v.source, Some(TextSource::Ocr));
        assert!(v.extraction_succeeded());
        assert!(v.hits.iter().any(|h| h.keyword == "Formulir Customer Due Diligence"));
    }

    #[test]
    fn test_ocr_fallback_when_text_layer_errors() {
        let m = matcher(FakeReader::new(Err("broken xref"), Ok(vec!["edd"])));
        let v = m.validate(Some(b"%PDF".as_slice()));
        assert_eq!(v.source, Some(TextSource::Ocr));
        assert_eq!(m.reader.ocr_calls.get(), 1);
    }

    #[test]
    fn test_text_layer_skips_ocr() {
        let m = matcher(FakeReader::new(Ok(vec!["cdd"]), Err("should not run")));
        let v = m.validate(Some(b"%PDF".as_slice()));
        assert_eq!(v.status, EvidenceStatus::Extracted);
        assert_eq!(m.reader.ocr_calls.get(), 0);
    }

    #[test]
    fn test_ocr_failure_is_error_verdict() {
        let m = matcher(FakeReader::new(Ok(vec![]), Err("tesseract crashed")));
        let v = m.validate(Some(b"%PDF".as_slice()));
        assert_eq!(v.status, EvidenceStatus::Error);
        assert_eq!(v.matched_keywords, 0);
        assert!(v.message.as_deref().unwrap().contains("tesseract crashed"));
        assert!(v.warning().is_some());
    }

    #[test]
    fn test_timeout_message() {
        let err = ExtractionError::Timeout(Duration::from_secs(60));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_fuzzy_match_on_ocr_noise() {
        let m = matcher(FakeReader::new(
            Ok(vec!["hasil ana1isis r1siko pengguna jasa"]),
            Ok(vec![]),
        ));
        let v = m.validate_document(Some(b"%PDF".as_slice()), &keywords(&["Analisis Risiko"]));
        assert_eq!(v.matched_keywords, 1);
        assert_eq!(v.hits[0].kind, MatchKind::Fuzzy);
    }

    #[test]
    fn test_unrelated_text_matches_nothing() {
        let m = matcher(FakeReader::new(Ok(vec!["zzzz qqqq"]), Ok(vec![])));
        let v = m.validate_document(
            Some(b"%PDF".as_slice()),
            &keywords(&["Enhanced Due Diligence"]),
        );
        assert_eq!(v.status, EvidenceStatus::Extracted);
        assert_eq!(v.matched_keywords, 0);
    }

    #[test]
    fn test_each_keyword_counted_once() {
        let m = matcher(FakeReader::new(Ok(vec!["cdd cdd cdd edd"]), Ok(vec![])));
        let v = m.validate_document(Some(b"%PDF".as_slice()), &keywords(&["CDD", "EDD"]));
        assert_eq!(v.matched_keywords, 2);
    }

    #[test]
    fn test_keyword_longer_than_text_has_no_fuzzy_windows() {
        let m = matcher(FakeReader::new(Ok(vec!["xy"]), Ok(vec![])));
        let v = m.validate_document(Some(b"%PDF".as_slice()), &keywords(&["Analisis Risiko"]));
        assert_eq!(v.matched_keywords, 0);
    }
}
