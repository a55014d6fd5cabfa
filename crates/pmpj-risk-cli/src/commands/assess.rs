use std::path::Path;
use std::time::Instant;

use chrono::Local;
use clap::Args;
use serde::Serialize;
use serde_json::json;

use pmpj_risk_core::config::EngineConfig;
use pmpj_risk_core::records::{save_record, DocumentStore};
use pmpj_risk_core::submission::{
    assess_submission, submission_layout, Assessment, DocumentLinks, SubmissionInput,
    SubmissionRecord,
};
use pmpj_risk_core::types::with_metadata;
use pmpj_risk_core::Answer;

use super::{elapsed_us, pdf_matcher, CommandResult};
use crate::input;
use crate::store::{pending_path, write_pending, CsvRecordStore, LocalDocumentStore};

/// Arguments for a full questionnaire assessment
#[derive(Args)]
pub struct AssessArgs {
    /// Path to JSON submission (identity, category counts, answers)
    #[arg(long)]
    pub input: Option<String>,
    /// Q1 supporting document: CDD/EDD forms (PDF)
    #[arg(long)]
    pub q1_document: Option<String>,
    /// Q2 supporting document: SOP PMPJ (PDF). Stored, not scored.
    #[arg(long)]
    pub q2_document: Option<String>,
    /// CSV record store to save the submission into
    #[arg(long)]
    pub store: Option<String>,
    /// Directory uploaded documents are copied to when storing
    #[arg(long, default_value = "uploads")]
    pub documents_dir: String,
}

#[derive(Debug, Serialize)]
struct StoredRecord {
    store: String,
    replaced: bool,
    rows: usize,
    documents: DocumentLinks,
}

#[derive(Serialize)]
struct AssessOutput {
    #[serde(flatten)]
    assessment: Assessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    stored: Option<StoredRecord>,
}

struct Upload<'a> {
    path: &'a str,
    bytes: Vec<u8>,
}

fn read_upload(path: Option<&str>) -> Result<Option<Upload<'_>>, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(None);
    };
    Ok(Some(Upload {
        path,
        bytes: input::file::read_document(path)?,
    }))
}

pub fn run_assess(args: AssessArgs, config: &EngineConfig) -> CommandResult {
    let submission: SubmissionInput = input::read_input(args.input.as_deref(), "assessment")?;
    let q1 = read_upload(args.q1_document.as_deref())?;
    let q2 = read_upload(args.q2_document.as_deref())?;

    let start = Instant::now();
    let matcher = pdf_matcher(config);
    let q1_bytes = q1.as_ref().map(|u| u.bytes.as_slice());
    let mut assessment = assess_submission(&submission, q1_bytes, &matcher)?;

    let mut warnings: Vec<String> = assessment.evidence.warning().into_iter().collect();
    if submission.q1_risk_analysis == Answer::Ya && q1.is_none() {
        warnings.push(
            "Q1 answered YA without a supporting document; graded as not evidenced".to_string(),
        );
    }

    let stored = match args.store.as_deref() {
        Some(store) => Some(store_submission(
            Path::new(store),
            &LocalDocumentStore::new(&args.documents_dir),
            &submission,
            &assessment,
            [q1.as_ref(), q2.as_ref()],
        )?),
        None => None,
    };

    assessment.evidence.text.clear();
    let output = with_metadata(
        "PMPJ risk: inherent x internal control -> residual; residual x client volume -> final",
        &json!({
            "evidenced_document": "Q1 only",
            "total_clients": "sum of profile counts",
        }),
        warnings,
        elapsed_us(start),
        AssessOutput { assessment, stored },
    );
    Ok(serde_json::to_value(output)?)
}

/// Copy the uploads, build the record and merge it into the CSV store. If
/// the store cannot be written the record is parked in a pending file.
fn store_submission(
    store: &Path,
    documents: &impl DocumentStore,
    submission: &SubmissionInput,
    assessment: &Assessment,
    [q1, q2]: [Option<&Upload<'_>>; 2],
) -> Result<StoredRecord, Box<dyn std::error::Error>> {
    let links = DocumentLinks {
        risk_analysis: store_upload(documents, "q1", q1)?,
        sop: store_upload(documents, "q2", q2)?,
    };
    let record = SubmissionRecord::new(
        submission.clone(),
        assessment.clone(),
        links.clone(),
        Local::now().naive_local(),
    );
    let columns = record.to_columns();

    let saved = CsvRecordStore::open(store)
        .and_then(|mut csv| save_record(&mut csv, &columns, &submission_layout()));
    match saved {
        Ok(outcome) => Ok(StoredRecord {
            store: store.display().to_string(),
            replaced: outcome.replaced > 0,
            rows: outcome.table.len(),
            documents: links,
        }),
        Err(e) => {
            let pending = pending_path(store, record.nik());
            write_pending(&pending, &columns)?;
            tracing::warn!(error = %e, pending = %pending.display(), "record parked for retry");
            Err(format!(
                "{}; record saved to '{}', retry with `pmpj commit --pending {}`",
                e,
                pending.display(),
                pending.display()
            )
            .into())
        }
    }
}

fn store_upload(
    documents: &impl DocumentStore,
    slot: &str,
    upload: Option<&Upload<'_>>,
) -> Result<String, Box<dyn std::error::Error>> {
    let Some(upload) = upload else {
        return Ok(String::new());
    };
    let name = Path::new(upload.path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf");
    Ok(documents.store(&upload.bytes, &format!("{}_{}", slot, name))?)
}
