use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Upper bound on pages read from any supporting document.
pub const MAX_PAGES: usize = 5;

/// Engine settings. Every field has a default so partial config files work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub evidence: EvidenceConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceConfig {
    /// Keywords searched for in the Q1 supporting document.
    pub keywords: Vec<String>,
    /// Known phrasings; a keyword also matches when a variant containing it
    /// appears verbatim.
    pub phrase_variants: Vec<String>,
    /// A fuzzy window matches when its similarity ratio is strictly above this.
    pub fuzzy_threshold: Decimal,
    /// Extra characters added to the keyword length to size fuzzy windows.
    pub window_padding: usize,
    /// Fuzzy matching only looks at this many leading characters.
    pub max_fuzzy_chars: usize,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            keywords: [
                "Formulir Customer Due Diligence",
                "formulir customer due diligence perorangan",
                "Analisis Risiko",
                "Analisis Resiko",
                "Enhanced Due Diligence",
                "CDD",
                "EDD",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            phrase_variants: [
                "formulir customer due diligence perorangan",
                "formulir customer due diligence",
                "enhanced due diligence",
                "formulir customer due diligence korporasi",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            fuzzy_threshold: dec!(0.6),
            window_padding: 3,
            max_fuzzy_chars: 20_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub resolution_dpi: u32,
    /// Tesseract languages, e.g. "ind+eng".
    pub languages: String,
    pub page_segmentation_mode: u8,
    /// Budget for rasterising and recognising all pages.
    pub timeout_secs: u64,
    pub pdftoppm_bin: String,
    pub tesseract_bin: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            resolution_dpi: 200,
            languages: "ind+eng".to_string(),
            page_segmentation_mode: 6,
            timeout_secs: 60,
            pdftoppm_bin: "pdftoppm".to_string(),
            tesseract_bin: "tesseract".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"ocr": {"timeout_secs": 5}}"#).unwrap();
        assert_eq!(cfg.ocr.timeout_secs, 5);
        assert_eq!(cfg.ocr.resolution_dpi, 200);
        assert_eq!(cfg.evidence.keywords.len(), 7);
        assert_eq!(cfg.evidence.fuzzy_threshold, dec!(0.6));
    }

    #[test]
    fn test_threshold_reads_from_string() {
        let cfg: EvidenceConfig =
            serde_json::from_str(r#"{"fuzzy_threshold": "0.75"}"#).unwrap();
        assert_eq!(cfg.fuzzy_threshold, dec!(0.75));
        assert_eq!(cfg.window_padding, 3);
    }
}
