use serde::{Deserialize, Serialize};

use crate::types::{RiskTier, Severity};

use crate::types::RiskTier::{Rendah as R, SangatTinggi as ST, Sedang as S, Tinggi as T};

/// Final tier by residual severity (rows 1-4) and client-volume severity
/// (columns 1-4).
const FINAL_MATRIX: [[RiskTier; 4]; 4] = [
    [R, R, S, T],
    [R, S, S, T],
    [S, S, T, ST],
    [T, T, ST, ST],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRiskResult {
    /// `None` when either severity is outside 1-4.
    pub tier: Option<RiskTier>,
}

fn index(severity: Severity) -> Option<usize> {
    (1..=4).contains(&severity).then(|| usize::from(severity) - 1)
}

/// Combine residual and client-volume severities into the final tier.
/// Undefined combinations return `None` and must be treated as a data error.
pub fn finalize(residual_severity: Severity, client_severity: Severity) -> FinalRiskResult {
    let tier = index(residual_severity)
        .zip(index(client_severity))
        .map(|(row, col)| FINAL_MATRIX[row][col]);
    FinalRiskResult { tier }
}
