use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PmpjError;

/// Ordinal risk severity, 1 (Rendah) through 4 (Sangat Tinggi).
pub type Severity = u8;

/// Named risk band shared by the inherent, residual, client-volume and
/// final stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "Rendah")]
    Rendah,
    #[serde(rename = "Sedang")]
    Sedang,
    #[serde(rename = "Tinggi")]
    Tinggi,
    #[serde(rename = "Sangat Tinggi")]
    SangatTinggi,
    #[serde(rename = "Diluar Rentang")]
    DiluarRentang,
}

impl RiskTier {
    /// The four in-range tiers, lowest first.
    pub const ORDERED: [RiskTier; 4] = [
        RiskTier::Rendah,
        RiskTier::Sedang,
        RiskTier::Tinggi,
        RiskTier::SangatTinggi,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Rendah => "Rendah",
            RiskTier::Sedang => "Sedang",
            RiskTier::Tinggi => "Tinggi",
            RiskTier::SangatTinggi => "Sangat Tinggi",
            RiskTier::DiluarRentang => "Diluar Rentang",
        }
    }

    /// Ordinal severity; `None` for the out-of-range sentinel.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            RiskTier::Rendah => Some(1),
            RiskTier::Sedang => Some(2),
            RiskTier::Tinggi => Some(3),
            RiskTier::SangatTinggi => Some(4),
            RiskTier::DiluarRentang => None,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskTier {
    type Err = PmpjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            RiskTier::Rendah,
            RiskTier::Sedang,
            RiskTier::Tinggi,
            RiskTier::SangatTinggi,
            RiskTier::DiluarRentang,
        ]
        .into_iter()
        .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| PmpjError::invalid("risk_tier", format!("unknown risk tier '{}'", s)))
    }
}

/// Strength of the notary's internal controls, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlTier {
    #[serde(rename = "Sangat Baik")]
    SangatBaik,
    #[serde(rename = "Baik")]
    Baik,
    #[serde(rename = "Cukup")]
    Cukup,
    #[serde(rename = "Lemah")]
    Lemah,
    #[serde(rename = "Diluar Rentang")]
    DiluarRentang,
}

impl ControlTier {
    pub fn label(&self) -> &'static str {
        match self {
            ControlTier::SangatBaik => "Sangat Baik",
            ControlTier::Baik => "Baik",
            ControlTier::Cukup => "Cukup",
            ControlTier::Lemah => "Lemah",
            ControlTier::DiluarRentang => "Diluar Rentang",
        }
    }
}

impl fmt::Display for ControlTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ControlTier {
    type Err = PmpjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            ControlTier::SangatBaik,
            ControlTier::Baik,
            ControlTier::Cukup,
            ControlTier::Lemah,
            ControlTier::DiluarRentang,
        ]
        .into_iter()
        .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| PmpjError::invalid("control_tier", format!("unknown control tier '{}'", s)))
    }
}

/// Yes/no questionnaire answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Answer {
    #[serde(rename = "YA")]
    Ya,
    #[default]
    #[serde(rename = "TIDAK")]
    Tidak,
}

impl Answer {
    pub fn label(&self) -> &'static str {
        match self {
            Answer::Ya => "YA",
            Answer::Tidak => "TIDAK",
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Answer {
    type Err = PmpjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "YA" => Ok(Answer::Ya),
            "TIDAK" => Ok(Answer::Tidak),
            _ => Err(PmpjError::invalid("answer", format!("expected YA or TIDAK, got '{}'", s))),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
        },
    }
}
