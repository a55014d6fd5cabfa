use serde::{Deserialize, Serialize};

use crate::types::{Answer, ControlTier};

/// Score when the self-declared control is backed by a readable document.
pub const EVIDENCED_SCORE: u32 = 37;
/// Score when the control is denied, undocumented or unreadable.
pub const UNEVIDENCED_SCORE: u32 = 141;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalControlResult {
    pub score: u32,
    pub tier: ControlTier,
}

/// Closed-interval banding of the internal-control score. Only 37 and 141
/// are produced today; the middle bands stay reachable for graded scoring.
pub fn control_tier(score: u32) -> ControlTier {
    match score {
        37..=62 => ControlTier::SangatBaik,
        63..=88 => ControlTier::Baik,
        89..=114 => ControlTier::Cukup,
        115..=141 => ControlTier::Lemah,
        _ => ControlTier::DiluarRentang,
    }
}

/// Grade internal control from the Q1 answer and its supporting document.
///
/// Only whether text could be extracted matters here; the keyword match
/// count of the evidence verdict is not consulted.
pub fn score_internal_control(
    self_declared: Answer,
    document_present: bool,
    extraction_succeeded: bool,
) -> InternalControlResult {
    let score = match (self_declared, document_present) {
        (Answer::Tidak, _) | (_, false) => UNEVIDENCED_SCORE,
        (Answer::Ya, true) if extraction_succeeded => EVIDENCED_SCORE,
        (Answer::Ya, true) => UNEVIDENCED_SCORE,
    };
    InternalControlResult {
        score,
        tier: control_tier(score),
    }
}
