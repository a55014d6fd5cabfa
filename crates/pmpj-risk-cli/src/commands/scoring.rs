use std::time::Instant;

use clap::Args;
use serde::Serialize;
use serde_json::json;

use pmpj_risk_core::config::EngineConfig;
use pmpj_risk_core::evidence::EvidenceStatus;
use pmpj_risk_core::scoring::client_volume;
use pmpj_risk_core::scoring::final_risk;
use pmpj_risk_core::scoring::inherent::{score_inherent, InherentRiskInput};
use pmpj_risk_core::scoring::internal_control::{score_internal_control, InternalControlResult};
use pmpj_risk_core::scoring::residual;
use pmpj_risk_core::tables::{self, ENFORCEMENT, REGION};
use pmpj_risk_core::types::with_metadata;
use pmpj_risk_core::{Answer, ControlTier, PmpjError, RiskTier};

use super::{elapsed_us, pdf_matcher, CommandResult};
use crate::input;

/// Arguments for inherent risk scoring
#[derive(Args)]
pub struct InherentArgs {
    /// Path to JSON input file (category counts, enforcement flag, region)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for internal control grading
#[derive(Args)]
pub struct InternalControlArgs {
    /// Answer to Q1 (YA / TIDAK)
    #[arg(long)]
    pub answer: Answer,
    /// Supporting document for Q1 (PDF)
    #[arg(long)]
    pub document: Option<String>,
}

/// Arguments for residual risk
#[derive(Args)]
pub struct ResidualArgs {
    /// Inherent risk tier, e.g. "Tinggi"
    #[arg(long)]
    pub inherent: RiskTier,
    /// Internal control tier, e.g. "Sangat Baik"
    #[arg(long)]
    pub control: ControlTier,
}

/// Arguments for client-volume banding
#[derive(Args)]
pub struct ClientVolumeArgs {
    /// Total clients in the reporting period
    #[arg(long)]
    pub total_clients: u64,
}

/// Arguments for the final risk matrix
#[derive(Args)]
pub struct FinalRiskArgs {
    /// Residual risk severity (1-4)
    #[arg(long)]
    pub residual: u8,
    /// Client-volume severity (1-4)
    #[arg(long)]
    pub client: u8,
}

pub fn run_inherent(args: InherentArgs) -> CommandResult {
    let data: InherentRiskInput =
        input::read_input(args.input.as_deref(), "inherent risk scoring")?;
    let start = Instant::now();
    let result = score_inherent(&data);

    let mut warnings = Vec::new();
    if tables::lookup(REGION, &data.region) == 0 {
        warnings.push(format!("Region '{}' is not a known province; scored 0", data.region));
    }
    if tables::lookup(ENFORCEMENT, &data.enforcement_flag) == 0 {
        warnings.push(format!(
            "Law-enforcement answer '{}' is neither YA nor TIDAK; scored 0",
            data.enforcement_flag
        ));
    }

    let output = with_metadata(
        "Inherent risk: dominant-category weights plus enforcement and region, \
         banded 6-17/18-29/30-41/42-52",
        &json!({
            "tie_break": "first label in table order",
            "empty_counts": "category default label",
        }),
        warnings,
        elapsed_us(start),
        result,
    );
    Ok(serde_json::to_value(output)?)
}

#[derive(Serialize)]
struct InternalControlOutput {
    #[serde(flatten)]
    control: InternalControlResult,
    evidence_status: EvidenceStatus,
    matched_keywords: u32,
}

pub fn run_internal_control(args: InternalControlArgs, config: &EngineConfig) -> CommandResult {
    let document = args
        .document
        .as_deref()
        .map(input::file::read_document)
        .transpose()?;

    let start = Instant::now();
    let verdict = pdf_matcher(config).validate(document.as_deref());
    let control = score_internal_control(
        args.answer,
        document.is_some(),
        verdict.extraction_succeeded(),
    );
    let warnings: Vec<String> = verdict.warning().into_iter().collect();

    let output = with_metadata(
        "Internal control: YA with a readable supporting document scores 37, anything else 141",
        &json!({ "keyword_count_affects_score": false }),
        warnings,
        elapsed_us(start),
        InternalControlOutput {
            control,
            evidence_status: verdict.status,
            matched_keywords: verdict.matched_keywords,
        },
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_residual(args: ResidualArgs) -> CommandResult {
    let start = Instant::now();
    let result = residual::combine(args.inherent, args.control);
    let mut warnings = Vec::new();
    if args.inherent == RiskTier::DiluarRentang || args.control == ControlTier::DiluarRentang {
        warnings.push(
            "Out-of-range tier combined; residual risk defaults to Sangat Tinggi".to_string(),
        );
    }
    let output = with_metadata(
        "Residual risk: inherent tier x internal control tier matrix",
        &json!({ "unknown_combination": "Sangat Tinggi" }),
        warnings,
        elapsed_us(start),
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_client_volume(args: ClientVolumeArgs) -> CommandResult {
    let start = Instant::now();
    let result = client_volume::band(args.total_clients);
    let output = with_metadata(
        "Client volume: <=100 / <=200 / <=300 / >300 clients",
        &json!({ "total_clients": args.total_clients }),
        Vec::new(),
        elapsed_us(start),
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_final_risk(args: FinalRiskArgs) -> CommandResult {
    let start = Instant::now();
    let result = final_risk::finalize(args.residual, args.client);
    if result.tier.is_none() {
        return Err(PmpjError::UndefinedCombination {
            residual: args.residual,
            client: args.client,
        }
        .into());
    }
    let output = with_metadata(
        "Final risk: residual severity x client-volume severity matrix",
        &json!({ "residual": args.residual, "client": args.client }),
        Vec::new(),
        elapsed_us(start),
        result,
    );
    Ok(serde_json::to_value(output)?)
}
