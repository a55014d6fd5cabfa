use serde::{Deserialize, Serialize};

use crate::types::{RiskTier, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientVolumeResult {
    pub severity: Severity,
    pub tier: RiskTier,
}

/// Band the notary's total client count for the period.
pub fn band(total_clients: u64) -> ClientVolumeResult {
    let (severity, tier) = match total_clients {
        0..=100 => (1, RiskTier::Rendah),
        101..=200 => (2, RiskTier::Sedang),
        201..=300 => (3, RiskTier::Tinggi),
        _ => (4, RiskTier::SangatTinggi),
    };
    ClientVolumeResult { severity, tier }
}
