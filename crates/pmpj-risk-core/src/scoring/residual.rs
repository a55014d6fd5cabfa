use serde::{Deserialize, Serialize};

use crate::types::{ControlTier, RiskTier, Severity};

use crate::types::RiskTier::{Rendah as R, SangatTinggi as ST, Sedang as S, Tinggi as T};

/// Residual tier by control strength (rows: Lemah, Cukup, Baik, Sangat Baik)
/// and inherent tier (columns: Rendah, Sedang, Tinggi, Sangat Tinggi).
const RESIDUAL_MATRIX: [[RiskTier; 4]; 4] = [
    [R, S, ST, ST],
    [R, S, T, ST],
    [R, S, S, T],
    [R, R, S, T],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidualRiskResult {
    pub tier: RiskTier,
    pub severity: Severity,
}

fn control_row(control: ControlTier) -> Option<usize> {
    match control {
        ControlTier::Lemah => Some(0),
        ControlTier::Cukup => Some(1),
        ControlTier::Baik => Some(2),
        ControlTier::SangatBaik => Some(3),
        ControlTier::DiluarRentang => None,
    }
}

fn inherent_column(inherent: RiskTier) -> Option<usize> {
    inherent.severity().map(|s| usize::from(s) - 1)
}

/// Combine inherent risk with internal control. Any out-of-range input
/// fails safe to Sangat Tinggi.
pub fn combine(inherent: RiskTier, control: ControlTier) -> ResidualRiskResult {
    let tier = match (control_row(control), inherent_column(inherent)) {
        (Some(row), Some(col)) => RESIDUAL_MATRIX[row][col],
        _ => {
            tracing::warn!(%inherent, %control, "residual lookup miss, failing safe");
            RiskTier::SangatTinggi
        }
    };
    ResidualRiskResult {
        tier,
        severity: tier.severity().unwrap_or(4),
    }
}
