use chrono::NaiveDate;
use pmpj_risk_core::config::EvidenceConfig;
use pmpj_risk_core::evidence::{DocumentReader, EvidenceMatcher, EvidenceStatus, ExtractionError};
use pmpj_risk_core::records::{save_record, InMemoryRecordStore};
use pmpj_risk_core::scoring::{client_volume, final_risk, inherent, internal_control, residual};
use pmpj_risk_core::submission::{
    assess_submission, submission_layout, DocumentLinks, NotaryIdentity, SubmissionInput,
    SubmissionRecord, IDENTITY_COLUMNS, SUMMARY_COLUMNS,
};
use pmpj_risk_core::{Answer, ControlTier, PmpjError, RiskTier};

// ===========================================================================
// Helpers
// ===========================================================================

/// Reader that returns a fixed text layer and never needs OCR.
struct TextLayerReader(&'static str);

impl DocumentReader for TextLayerReader {
    fn text_layer(&self, _pdf: &[u8], _max_pages: usize) -> Result<Vec<String>, ExtractionError> {
        Ok(vec![self.0.to_string()])
    }

    fn recognize(&self, _pdf: &[u8], _max_pages: usize) -> Result<Vec<String>, ExtractionError> {
        Ok(vec![])
    }
}

/// Reader whose document is a blank scan that OCR cannot read.
struct BrokenScanReader;

impl DocumentReader for BrokenScanReader {
    fn text_layer(&self, _pdf: &[u8], _max_pages: usize) -> Result<Vec<String>, ExtractionError> {
        Ok(vec![String::new()])
    }

    fn recognize(&self, _pdf: &[u8], _max_pages: usize) -> Result<Vec<String>, ExtractionError> {
        Err(ExtractionError::Ocr("tesseract exited with 1".to_string()))
    }
}

fn notary(nik: &str) -> SubmissionInput {
    SubmissionInput {
        identity: NotaryIdentity {
            name: "siti rahma, s.h., m.kn".to_string(),
            nik: nik.to_string(),
            ahu_username: "siti.rahma".to_string(),
            phone: "081298765432".to_string(),
            office_address: "Jl. Ijen 10, Malang".to_string(),
            city: "Kota Malang".to_string(),
            region: "DKI Jakarta".to_string(),
        },
        enforcement_contact: "TIDAK".to_string(),
        q1_risk_analysis: Answer::Tidak,
        q2_risk_policy: Answer::Tidak,
        ..Default::default()
    }
}

fn timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .unwrap()
}

// ===========================================================================
// Worked examples
// ===========================================================================

#[test]
fn test_all_defaults_in_jakarta_is_sedang() {
    let input = inherent::InherentRiskInput {
        enforcement_flag: "TIDAK".to_string(),
        region: "DKI Jakarta".to_string(),
        ..Default::default()
    };
    let result = inherent::score_inherent(&input);
    // w=1, n=1, h=1, e=8, TIDAK=1, DKI Jakarta=9
    assert_eq!(result.total_score, 21);
    assert_eq!(result.tier, RiskTier::Sedang);
}

#[test]
fn test_denied_control_without_document_is_lemah() {
    let result = internal_control::score_internal_control(Answer::Tidak, false, false);
    assert_eq!(result.score, 141);
    assert_eq!(result.tier, ControlTier::Lemah);
}

#[test]
fn test_tinggi_with_sangat_baik_control_is_sedang() {
    let result = residual::combine(RiskTier::Tinggi, ControlTier::SangatBaik);
    assert_eq!(result.tier, RiskTier::Sedang);
    assert_eq!(result.severity, 2);
}

#[test]
fn test_residual_three_client_two_is_sedang() {
    assert_eq!(final_risk::finalize(3, 2).tier, Some(RiskTier::Sedang));
}

#[test]
fn test_250_clients_is_tinggi() {
    let result = client_volume::band(250);
    assert_eq!(result.severity, 3);
    assert_eq!(result.tier, RiskTier::Tinggi);
}

// ===========================================================================
// Full pipeline
// ===========================================================================

#[test]
fn test_pipeline_without_document() {
    let matcher = EvidenceMatcher::new(TextLayerReader(""), EvidenceConfig::default());
    let input = notary("3573011111111111");
    let a = assess_submission(&input, None, &matcher).unwrap();

    assert_eq!(a.inherent.total_score, 21);
    assert_eq!(a.evidence.status, EvidenceStatus::NoDocument);
    assert_eq!(a.internal_control.score, 141);
    // Sedang inherent with Lemah control stays Sedang
    assert_eq!(a.residual.tier, RiskTier::Sedang);
    assert_eq!(a.total_clients, 0);
    assert_eq!(a.client_volume.severity, 1);
    assert_eq!(a.final_tier, RiskTier::Rendah);
}

#[test]
fn test_pipeline_with_readable_evidence() {
    let matcher = EvidenceMatcher::new(
        TextLayerReader(
            "FORMULIR CUSTOMER DUE DILIGENCE PERORANGAN\nAnalisis Risiko Pengguna Jasa",
        ),
        EvidenceConfig::default(),
    );
    let mut input = notary("3573011111111112");
    input.q1_risk_analysis = Answer::Ya;
    input.enforcement_contact = "YA".to_string();
    input.profile_counts.insert("a. Pengusaha/wiraswasta".into(), 180);
    input.profile_counts.insert("e.  Pegawai Swasta".into(), 70);
    input.business_counts.insert("a. Perdagangan".into(), 100);
    input.service_counts.insert("a.  Pembelian dan Penjualan Properti".into(), 200);
    input.country_counts.insert("c.  Malaysia".into(), 3);

    let a = assess_submission(&input, Some(b"%PDF-1.7".as_slice()), &matcher).unwrap();

    // 9 + 9 + 9 + 7 + 6 + 9 = 49
    assert_eq!(a.inherent.total_score, 49);
    assert_eq!(a.inherent.tier, RiskTier::SangatTinggi);
    assert!(a.evidence.extraction_succeeded());
    assert!(a.evidence.matched_keywords >= 3);
    assert_eq!(a.internal_control.score, 37);
    assert_eq!(a.internal_control.tier, ControlTier::SangatBaik);
    assert_eq!(a.residual.tier, RiskTier::Tinggi);
    assert_eq!(a.total_clients, 250);
    assert_eq!(a.client_volume.severity, 3);
    assert_eq!(a.final_tier, RiskTier::Tinggi);
}

#[test]
fn test_pipeline_unreadable_scan_is_treated_as_no_evidence() {
    let matcher = EvidenceMatcher::new(BrokenScanReader, EvidenceConfig::default());
    let mut input = notary("3573011111111113");
    input.q1_risk_analysis = Answer::Ya;

    let a = assess_submission(&input, Some(b"%PDF-1.7".as_slice()), &matcher).unwrap();
    assert_eq!(a.evidence.status, EvidenceStatus::Error);
    assert!(a.evidence.warning().unwrap().contains("tesseract"));
    assert_eq!(a.internal_control.score, 141);
    assert_eq!(a.internal_control.tier, ControlTier::Lemah);
}

#[test]
fn test_pipeline_rejects_bad_nik_before_scoring() {
    let matcher = EvidenceMatcher::new(TextLayerReader(""), EvidenceConfig::default());
    let input = notary("12345");
    let err = assess_submission(&input, None, &matcher).unwrap_err();
    assert!(matches!(err, PmpjError::InvalidInput { .. }));
}

// ===========================================================================
// Records
// ===========================================================================

#[test]
fn test_record_columns_are_canonically_ordered() {
    let matcher = EvidenceMatcher::new(TextLayerReader(""), EvidenceConfig::default());
    let input = notary("3573011111111114");
    let a = assess_submission(&input, None, &matcher).unwrap();
    let record = SubmissionRecord::new(input, a, DocumentLinks::default(), timestamp());

    let mut store = InMemoryRecordStore::new();
    let out = save_record(&mut store, &record.to_columns(), &submission_layout()).unwrap();
    let header = &out.table.header;

    assert_eq!(&header[..IDENTITY_COLUMNS.len()], &IDENTITY_COLUMNS[..]);
    assert_eq!(
        &header[header.len() - SUMMARY_COLUMNS.len()..],
        &SUMMARY_COLUMNS[..]
    );

    let row = &out.table.rows[0];
    assert_eq!(row["Timestamp"], "2025-03-14 09:30:00");
    assert_eq!(row["Nama Notaris"], "Siti Rahma, S.H., M.Kn");
    assert_eq!(row["Tingkat Inherent Risk"], "Sedang");
    assert_eq!(row["Tingkat Internal Control"], "Lemah");
    assert_eq!(row["Tingkat Risiko"], "Rendah");
    assert_eq!(row["jawaban_profil"], "w. Lain-lain");
    assert_eq!(row["skor_negara"], "8");
    assert_eq!(row["34. Pertanyaan 34"], "TIDAK");
}

#[test]
fn test_resubmission_replaces_previous_record() {
    let matcher = EvidenceMatcher::new(TextLayerReader(""), EvidenceConfig::default());
    let layout = submission_layout();
    let mut store = InMemoryRecordStore::new();

    for nik in ["3573011111111115", "3573011111111116"] {
        let input = notary(nik);
        let a = assess_submission(&input, None, &matcher).unwrap();
        let record = SubmissionRecord::new(input, a, DocumentLinks::default(), timestamp());
        save_record(&mut store, &record.to_columns(), &layout).unwrap();
    }

    let mut input = notary("3573011111111115");
    input.enforcement_contact = "YA".to_string();
    let a = assess_submission(&input, None, &matcher).unwrap();
    let record = SubmissionRecord::new(input, a, DocumentLinks::default(), timestamp());
    let columns = record.to_columns();

    let out = save_record(&mut store, &columns, &layout).unwrap();
    assert_eq!(out.replaced, 1);
    assert_eq!(store.table.len(), 2);
    let row = store.table.find("NIK KTP", "3573011111111115").unwrap();
    assert_eq!(row["skor_apgakkum"], "6");

    // Saving the same record again changes nothing.
    let before = store.table.clone();
    save_record(&mut store, &columns, &layout).unwrap();
    assert_eq!(store.table, before);
}

#[test]
fn test_match_count_does_not_change_control_score() {
    // One keyword or seven: a readable document scores the same.
    let sparse = EvidenceMatcher::new(
        TextLayerReader("lampiran cdd"),
        EvidenceConfig::default(),
    );
    let rich = EvidenceMatcher::new(
        TextLayerReader(
            "formulir customer due diligence perorangan analisis risiko analisis resiko \
             enhanced due diligence cdd edd",
        ),
        EvidenceConfig::default(),
    );
    let mut input = notary("3573011111111117");
    input.q1_risk_analysis = Answer::Ya;

    let a = assess_submission(&input, Some(b"%PDF".as_slice()), &sparse).unwrap();
    let b = assess_submission(&input, Some(b"%PDF".as_slice()), &rich).unwrap();
    assert!(a.evidence.matched_keywords < b.evidence.matched_keywords);
    assert_eq!(a.internal_control, b.internal_control);
}
