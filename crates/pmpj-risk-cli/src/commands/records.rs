use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use serde_json::{json, Map, Value};

use pmpj_risk_core::records::save_record;
use pmpj_risk_core::submission::{submission_layout, COL_NIK};
use pmpj_risk_core::types::with_metadata;

use super::{elapsed_us, CommandResult};
use crate::store::{read_pending, read_table, CsvRecordStore};

/// Arguments for retrying a parked record
#[derive(Args)]
pub struct CommitArgs {
    /// Pending record file written by a failed `assess --store`
    #[arg(long)]
    pub pending: String,
    /// Record store; defaults to the one named in the pending file's name
    #[arg(long)]
    pub store: Option<String>,
}

/// Arguments for listing stored records
#[derive(Args)]
pub struct RecordsArgs {
    /// CSV record store
    #[arg(long)]
    pub store: String,
    /// Only show the record with this NIK
    #[arg(long)]
    pub nik: Option<String>,
}

/// `<store>.pending-<NIK>.json` -> `<store>`
fn store_for_pending(pending: &Path) -> Option<PathBuf> {
    let name = pending.to_str()?;
    let idx = name.rfind(".pending-")?;
    Some(PathBuf::from(&name[..idx]))
}

pub fn run_commit(args: CommitArgs) -> CommandResult {
    let pending = Path::new(&args.pending);
    let store = match args.store {
        Some(s) => PathBuf::from(s),
        None => store_for_pending(pending)
            .ok_or("--store is required when the pending file name does not name the store")?,
    };

    let start = Instant::now();
    let columns = read_pending(pending)?;
    let nik = columns
        .iter()
        .find(|(c, _)| c == COL_NIK)
        .map(|(_, v)| v.clone())
        .unwrap_or_default();

    let mut csv = CsvRecordStore::open(&store)?;
    let outcome = save_record(&mut csv, &columns, &submission_layout())?;
    drop(csv);
    fs::remove_file(pending)?;
    tracing::info!(nik = %nik, store = %store.display(), "pending record committed");

    let output = with_metadata(
        "Commit: merge a parked record into the store, replacing any row with the same NIK",
        &json!({ "pending": args.pending }),
        Vec::new(),
        elapsed_us(start),
        json!({
            "store": store.display().to_string(),
            "nik": nik,
            "replaced": outcome.replaced > 0,
            "rows": outcome.table.len(),
        }),
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_records(args: RecordsArgs) -> CommandResult {
    let start = Instant::now();
    let table = read_table(Path::new(&args.store))?;
    let wanted = args.nik.as_deref().map(str::trim);

    let rows: Vec<Value> = table
        .rows
        .iter()
        .filter(|row| match wanted {
            Some(nik) => row.get(COL_NIK).map(|v| v.trim()) == Some(nik),
            None => true,
        })
        .map(|row| {
            let ordered: Map<String, Value> = table
                .header
                .iter()
                .map(|col| (col.clone(), Value::String(row.get(col).cloned().unwrap_or_default())))
                .collect();
            Value::Object(ordered)
        })
        .collect();

    let warnings = match (wanted, rows.is_empty()) {
        (Some(nik), true) => vec![format!("No record with NIK {}", nik)],
        _ => Vec::new(),
    };

    let output = with_metadata(
        "Stored submission records in column order",
        &json!({ "store": args.store }),
        warnings,
        elapsed_us(start),
        rows,
    );
    Ok(serde_json::to_value(output)?)
}
