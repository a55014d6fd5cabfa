use serde::{Deserialize, Serialize};

use crate::scoring::category::{pick_dominant, CategoryCounts, CategoryScore};
use crate::tables::{self, BUSINESS, COUNTRY, PROFILE, SERVICE};
use crate::types::RiskTier;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Counted and single-choice answers that drive inherent risk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InherentRiskInput {
    #[serde(default)]
    pub profile_counts: CategoryCounts,
    #[serde(default)]
    pub business_counts: CategoryCounts,
    #[serde(default)]
    pub service_counts: CategoryCounts,
    #[serde(default)]
    pub country_counts: CategoryCounts,
    /// "YA" / "TIDAK"; anything else scores 0.
    pub enforcement_flag: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InherentRiskResult {
    pub profile: CategoryScore,
    pub business: CategoryScore,
    pub service: CategoryScore,
    pub country: CategoryScore,
    pub enforcement: CategoryScore,
    pub region: CategoryScore,
    pub total_score: u32,
    pub tier: RiskTier,
}

impl InherentRiskResult {
    /// The six resolved scores, in record order.
    pub fn components(&self) -> [(&'static str, &CategoryScore); 6] {
        [
            ("profil", &self.profile),
            ("bisnis", &self.business),
            ("jasa", &self.service),
            ("negara", &self.country),
            ("apgakkum", &self.enforcement),
            ("wilayah", &self.region),
        ]
    }
}

// ---------------------------------------------------------------------------
// Banding
// ---------------------------------------------------------------------------

/// Closed-interval banding of the inherent total.
pub fn inherent_tier(total: u32) -> RiskTier {
    match total {
        6..=17 => RiskTier::Rendah,
        18..=29 => RiskTier::Sedang,
        30..=41 => RiskTier::Tinggi,
        42..=52 => RiskTier::SangatTinggi,
        _ => RiskTier::DiluarRentang,
    }
}

// ---------------------------------------------------------------------------
// Main public function
// ---------------------------------------------------------------------------

/// Score inherent risk from the category counts, the law-enforcement flag
/// and the office region.
pub fn score_inherent(input: &InherentRiskInput) -> InherentRiskResult {
    let profile = pick_dominant(&PROFILE, &input.profile_counts, PROFILE.default_label);
    let business = pick_dominant(&BUSINESS, &input.business_counts, BUSINESS.default_label);
    let service = pick_dominant(&SERVICE, &input.service_counts, SERVICE.default_label);
    let country = pick_dominant(&COUNTRY, &input.country_counts, COUNTRY.default_label);
    let enforcement = CategoryScore {
        label: input.enforcement_flag.clone(),
        weight: tables::lookup(tables::ENFORCEMENT, &input.enforcement_flag),
    };
    let region = CategoryScore {
        label: input.region.clone(),
        weight: tables::lookup(tables::REGION, &input.region),
    };

    let total_score = [&profile, &business, &service, &country, &enforcement, &region]
        .iter()
        .map(|s| s.weight)
        .sum();
    let tier = inherent_tier(total_score);

    tracing::debug!(total_score, %tier, "inherent risk scored");

    InherentRiskResult {
        profile,
        business,
        service,
        country,
        enforcement,
        region,
        total_score,
        tier,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
