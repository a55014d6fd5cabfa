//! Whole-questionnaire pipeline: validate a submission, run every scoring
//! stage, and lay the outcome out as a stored record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::PmpjError;
use crate::evidence::{DocumentReader, EvidenceMatcher, EvidenceVerdict};
use crate::records::ColumnLayout;
use crate::scoring::category::{total_count, CategoryCounts};
use crate::scoring::client_volume::{self, ClientVolumeResult};
use crate::scoring::final_risk;
use crate::scoring::inherent::{score_inherent, InherentRiskInput, InherentRiskResult};
use crate::scoring::internal_control::{score_internal_control, InternalControlResult};
use crate::scoring::residual::{self, ResidualRiskResult};
use crate::tables::{CategoryTable, BUSINESS, COUNTRY, PRODUCT, PROFILE, SERVICE};
use crate::types::{Answer, RiskTier};
use crate::PmpjResult;

/// Questions after Q2 on the form (Q3 through Q34).
pub const ADDITIONAL_QUESTIONS: usize = 32;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_TIMESTAMP: &str = "Timestamp";
pub const COL_NAME: &str = "Nama Notaris";
pub const COL_NIK: &str = "NIK KTP";
pub const COL_AHU_USERNAME: &str = "Username Akun AHU Online";
pub const COL_PHONE: &str = "Nomor HP";
pub const COL_REGION: &str = "Wilayah";
pub const COL_ADDRESS: &str = "2. Alamat Lengkap Kantor Notaris";
pub const COL_CITY: &str = "Kedudukan Kota/Kabupaten";
pub const COL_TOTAL_CLIENTS: &str = "3. Jumlah Klien Tahun 2024-2025";

pub const IDENTITY_COLUMNS: [&str; 9] = [
    COL_TIMESTAMP,
    COL_NAME,
    COL_NIK,
    COL_AHU_USERNAME,
    COL_PHONE,
    COL_REGION,
    COL_ADDRESS,
    COL_CITY,
    COL_TOTAL_CLIENTS,
];

pub const SUMMARY_COLUMNS: [&str; 9] = [
    "Nilai Inherent Risk",
    "Tingkat Inherent Risk",
    "Nilai Internal Control",
    "Tingkat Internal Control",
    "Tingkat Residual Risk",
    "Nilai Residual Risk",
    "Nilai Risiko Pengguna Jasa",
    "Tingkat Risiko Pengguna Jasa",
    "Tingkat Risiko",
];

const COL_Q1: &str = "1.  Apakah Kantor Notaris ... (CDD/EDD)?";
const COL_Q2: &str = "2.  Apakah Kantor Notaris ... (SOP)?";
const COL_DOC_Q1: &str = "Dokumen_Pendukung (Q1)";
const COL_DOC_Q2: &str = "Dokumen Pendukung (SOP PMPJ) (Q2)";
const COL_KEYWORDS_Q1: &str = "Jumlah Kata Kunci Ditemukan (Q1)";
const COL_ENFORCEMENT: &str =
    "Apakah Notaris pernah dipanggil atau diminta informasi oleh Aparat Penegak Hukum?";

/// Layout of the submission table, keyed by NIK.
pub fn submission_layout() -> ColumnLayout {
    ColumnLayout {
        identity_key: COL_NIK.to_string(),
        identity_columns: IDENTITY_COLUMNS.iter().map(|c| c.to_string()).collect(),
        summary_columns: SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotaryIdentity {
    pub name: String,
    /// National identity number, exactly 16 digits.
    pub nik: String,
    pub ahu_username: String,
    pub phone: String,
    pub office_address: String,
    pub city: String,
    pub region: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionInput {
    pub identity: NotaryIdentity,
    #[serde(default)]
    pub profile_counts: CategoryCounts,
    #[serde(default)]
    pub business_counts: CategoryCounts,
    #[serde(default)]
    pub service_counts: CategoryCounts,
    #[serde(default)]
    pub product_counts: CategoryCounts,
    #[serde(default)]
    pub country_counts: CategoryCounts,
    /// "YA" / "TIDAK": summoned or questioned by law enforcement.
    pub enforcement_contact: String,
    /// Q1: has a client risk-analysis mechanism (CDD/EDD forms).
    pub q1_risk_analysis: Answer,
    /// Q2: has policies and procedures for high-risk clients.
    pub q2_risk_policy: Answer,
    /// Q3..Q34; missing answers are recorded as TIDAK.
    #[serde(default)]
    pub additional_answers: Vec<Answer>,
}

impl SubmissionInput {
    /// Total clients for the period: the sum of the profile counts.
    pub fn total_clients(&self) -> u64 {
        total_count(&self.profile_counts)
    }

    fn inherent_input(&self) -> InherentRiskInput {
        InherentRiskInput {
            profile_counts: self.profile_counts.clone(),
            business_counts: self.business_counts.clone(),
            service_counts: self.service_counts.clone(),
            country_counts: self.country_counts.clone(),
            enforcement_flag: self.enforcement_contact.clone(),
            region: self.identity.region.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn require(field: &str, value: &str) -> PmpjResult<()> {
    if value.trim().is_empty() {
        return Err(PmpjError::invalid(field, "must not be empty"));
    }
    Ok(())
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Reject malformed submissions before any scoring runs.
pub fn validate_submission(input: &SubmissionInput) -> PmpjResult<()> {
    let id = &input.identity;
    require("identity.name", &id.name)?;
    require("identity.nik", &id.nik)?;
    require("identity.ahu_username", &id.ahu_username)?;
    require("identity.phone", &id.phone)?;
    require("identity.office_address", &id.office_address)?;
    require("identity.city", &id.city)?;
    require("identity.region", &id.region)?;

    if !(is_digits(&id.nik) && id.nik.len() == 16) {
        return Err(PmpjError::invalid(
            "identity.nik",
            "NIK must be exactly 16 digits",
        ));
    }
    if !is_digits(&id.phone) {
        return Err(PmpjError::invalid(
            "identity.phone",
            "phone number must contain digits only",
        ));
    }
    if input.additional_answers.len() > ADDITIONAL_QUESTIONS {
        return Err(PmpjError::invalid(
            "additional_answers",
            format!(
                "at most {} answers (Q3-Q34), got {}",
                ADDITIONAL_QUESTIONS,
                input.additional_answers.len()
            ),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub inherent: InherentRiskResult,
    pub evidence: EvidenceVerdict,
    pub internal_control: InternalControlResult,
    pub residual: ResidualRiskResult,
    pub total_clients: u64,
    pub client_volume: ClientVolumeResult,
    pub final_tier: RiskTier,
}

/// Run the full chain for one submission. Only the Q1 document is checked
/// for evidence.
pub fn assess_submission<R: DocumentReader>(
    input: &SubmissionInput,
    q1_document: Option<&[u8]>,
    matcher: &EvidenceMatcher<R>,
) -> PmpjResult<Assessment> {
    validate_submission(input)?;

    let inherent = score_inherent(&input.inherent_input());
    let evidence = matcher.validate(q1_document);
    let internal_control = score_internal_control(
        input.q1_risk_analysis,
        q1_document.is_some(),
        evidence.extraction_succeeded(),
    );
    let residual = residual::combine(inherent.tier, internal_control.tier);
    let total_clients = input.total_clients();
    let client_volume = client_volume::band(total_clients);
    let final_tier = final_risk::finalize(residual.severity, client_volume.severity)
        .tier
        .ok_or(PmpjError::UndefinedCombination {
            residual: residual.severity,
            client: client_volume.severity,
        })?;

    tracing::info!(
        nik = %input.identity.nik,
        inherent = %inherent.tier,
        control = %internal_control.tier,
        residual = %residual.tier,
        final_tier = %final_tier,
        "submission assessed"
    );

    Ok(Assessment {
        inherent,
        evidence,
        internal_control,
        residual,
        total_clients,
        client_volume,
        final_tier,
    })
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// References to the stored supporting documents ("" when not uploaded).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLinks {
    pub risk_analysis: String,
    pub sop: String,
}

/// A complete row for the record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub timestamp: NaiveDateTime,
    pub input: SubmissionInput,
    pub assessment: Assessment,
    pub links: DocumentLinks,
}

/// Capitalise the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

impl SubmissionRecord {
    pub fn new(
        input: SubmissionInput,
        assessment: Assessment,
        links: DocumentLinks,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            timestamp,
            input,
            assessment,
            links,
        }
    }

    pub fn nik(&self) -> &str {
        &self.input.identity.nik
    }

    /// The record as ordered `(column, value)` pairs: identity, category
    /// counts, answers, documents, per-category choices, then summary.
    pub fn to_columns(&self) -> Vec<(String, String)> {
        let id = &self.input.identity;
        let a = &self.assessment;
        let mut cols: Vec<(String, String)> = Vec::new();
        let mut push = |name: &str, value: String| cols.push((name.to_string(), value));

        push(
            COL_TIMESTAMP,
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        );
        push(COL_NAME, title_case(&id.name));
        push(COL_NIK, id.nik.clone());
        push(COL_AHU_USERNAME, id.ahu_username.clone());
        push(COL_PHONE, id.phone.clone());
        push(COL_ADDRESS, id.office_address.clone());
        push(COL_CITY, id.city.clone());
        push(COL_TOTAL_CLIENTS, a.total_clients.to_string());
        push(COL_REGION, id.region.clone());

        let counted: [(&CategoryTable, &CategoryCounts); 5] = [
            (&PROFILE, &self.input.profile_counts),
            (&BUSINESS, &self.input.business_counts),
            (&SERVICE, &self.input.service_counts),
            (&PRODUCT, &self.input.product_counts),
            (&COUNTRY, &self.input.country_counts),
        ];
        for (table, counts) in counted {
            for label in table.labels() {
                push(label, counts.get(label).copied().unwrap_or(0).to_string());
            }
        }

        push(COL_Q1, self.input.q1_risk_analysis.to_string());
        push(COL_Q2, self.input.q2_risk_policy.to_string());
        for i in 0..ADDITIONAL_QUESTIONS {
            let answer = self.input.additional_answers.get(i).copied().unwrap_or_default();
            let n = i + 3;
            push(&format!("{}. Pertanyaan {}", n, n), answer.to_string());
        }

        push(COL_DOC_Q1, self.links.risk_analysis.clone());
        push(COL_DOC_Q2, self.links.sop.clone());
        push(COL_KEYWORDS_Q1, a.evidence.matched_keywords.to_string());
        push(COL_ENFORCEMENT, self.input.enforcement_contact.clone());

        for (key, score) in a.inherent.components() {
            push(&format!("jawaban_{}", key), score.label.clone());
            push(&format!("skor_{}", key), score.weight.to_string());
        }

        let summary = [
            a.inherent.total_score.to_string(),
            a.inherent.tier.to_string(),
            a.internal_control.score.to_string(),
            a.internal_control.tier.to_string(),
            a.residual.tier.to_string(),
            a.residual.severity.to_string(),
            a.client_volume.severity.to_string(),
            a.client_volume.tier.to_string(),
            a.final_tier.to_string(),
        ];
        for (name, value) in SUMMARY_COLUMNS.into_iter().zip(summary) {
            push(name, value);
        }

        cols
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
