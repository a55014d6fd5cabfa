use std::time::Instant;

use clap::Args;
use serde_json::json;

use pmpj_risk_core::config::{EngineConfig, MAX_PAGES};
use pmpj_risk_core::types::with_metadata;

use super::{elapsed_us, pdf_matcher, CommandResult};
use crate::input;

/// Arguments for checking a supporting document
#[derive(Args)]
pub struct EvidenceArgs {
    /// Supporting document (PDF)
    #[arg(long)]
    pub document: String,
    /// Keyword to look for; repeat for several. Defaults to the configured list.
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,
    /// Include the extracted text in the output
    #[arg(long)]
    pub show_text: bool,
}

pub fn run_evidence(args: EvidenceArgs, config: &EngineConfig) -> CommandResult {
    let document = input::file::read_document(&args.document)?;
    let matcher = pdf_matcher(config);
    let keywords = if args.keywords.is_empty() {
        matcher.config().keywords.clone()
    } else {
        args.keywords
    };

    let start = Instant::now();
    let mut verdict = matcher.validate_document(Some(document.as_slice()), &keywords);
    let warnings: Vec<String> = verdict.warning().into_iter().collect();
    if !args.show_text {
        verdict.text.clear();
    }

    let output = with_metadata(
        "Evidence: text layer, else OCR; each keyword matched verbatim, \
         via a phrase variant, or by fuzzy window",
        &json!({
            "max_pages": MAX_PAGES,
            "fuzzy_threshold": matcher.config().fuzzy_threshold.to_string(),
            "keywords": keywords,
        }),
        warnings,
        elapsed_us(start),
        verdict,
    );
    Ok(serde_json::to_value(output)?)
}
