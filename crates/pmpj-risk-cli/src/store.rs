use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use chrono::Local;
use pmpj_risk_core::records::{DocumentStore, RecordStore, RecordTable, Row};
use pmpj_risk_core::{PmpjError, PmpjResult};
use tempfile::NamedTempFile;

const LOCK_ATTEMPTS: u32 = 50;
const LOCK_RETRY: Duration = Duration::from_millis(100);

fn store_err(context: &str, path: &Path, e: impl std::fmt::Display) -> PmpjError {
    PmpjError::Store(format!("{} '{}': {}", context, path.display(), e))
}

// ---------------------------------------------------------------------------
// Writer lock
// ---------------------------------------------------------------------------

/// Exclusive writer lock: a `<file>.lock` sibling created atomically and
/// removed on drop.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    pub fn lock_path(store: &Path) -> PathBuf {
        let mut name = store.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Take the lock, retrying briefly while another writer holds it.
    pub fn acquire(store: &Path) -> PmpjResult<Self> {
        Self::acquire_with(store, LOCK_ATTEMPTS, LOCK_RETRY)
    }

    fn acquire_with(store: &Path, attempts: u32, retry: Duration) -> PmpjResult<Self> {
        let path = Self::lock_path(store);
        for attempt in 1..=attempts {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let _ = writeln!(file, "{}", std::process::id());
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(attempt, lock = %path.display(), "record store busy");
                    if attempt < attempts {
                        thread::sleep(retry);
                    }
                }
                Err(e) => return Err(store_err("cannot create lock", &path, e)),
            }
        }
        Err(PmpjError::Store(format!(
            "record store is locked by another writer (remove '{}' if stale)",
            path.display()
        )))
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

// ---------------------------------------------------------------------------
// CSV record store
// ---------------------------------------------------------------------------

/// Record table kept in one CSV file. Holds the writer lock for as long as
/// it is open.
#[derive(Debug)]
pub struct CsvRecordStore {
    path: PathBuf,
    _lock: StoreLock,
}

impl CsvRecordStore {
    pub fn open(path: impl Into<PathBuf>) -> PmpjResult<Self> {
        let path = path.into();
        let lock = StoreLock::acquire(&path)?;
        Ok(Self { path, _lock: lock })
    }
}

/// Read a CSV record table without taking the writer lock.
pub fn read_table(path: &Path) -> PmpjResult<RecordTable> {
    if !path.exists() {
        return Ok(RecordTable::default());
    }
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| store_err("cannot open", path, e))?;

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| store_err("cannot read header of", path, e))?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| store_err("cannot read", path, e))?;
        let row: Row = header
            .iter()
            .enumerate()
            .map(|(i, col)| (col.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }
    Ok(RecordTable { header, rows })
}

impl RecordStore for CsvRecordStore {
    fn read_all(&self) -> PmpjResult<RecordTable> {
        read_table(&self.path)
    }

    fn overwrite_all(&mut self, table: &RecordTable) -> PmpjResult<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| store_err("cannot create", &dir, e))?;

        let mut temp = NamedTempFile::new_in(&dir)
            .map_err(|e| store_err("cannot create temp file in", &dir, e))?;
        {
            let mut writer = csv::Writer::from_writer(temp.as_file_mut());
            for line in table.to_grid() {
                writer
                    .write_record(&line)
                    .map_err(|e| store_err("cannot write", &self.path, e))?;
            }
            writer.flush().map_err(|e| store_err("cannot flush", &self.path, e))?;
        }
        temp.as_file()
            .sync_all()
            .map_err(|e| store_err("cannot sync", &self.path, e))?;
        temp.persist(&self.path)
            .map_err(|e| store_err("cannot replace", &self.path, e))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pending records
// ---------------------------------------------------------------------------

/// Where a record that could not be stored is parked for `pmpj commit`.
pub fn pending_path(store: &Path, nik: &str) -> PathBuf {
    let mut name = store.as_os_str().to_owned();
    name.push(format!(".pending-{}.json", nik.trim()));
    PathBuf::from(name)
}

pub fn write_pending(path: &Path, columns: &[(String, String)]) -> PmpjResult<()> {
    let json = serde_json::to_string_pretty(columns)?;
    fs::write(path, json).map_err(|e| store_err("cannot write", path, e))
}

pub fn read_pending(path: &Path) -> PmpjResult<Vec<(String, String)>> {
    let contents = fs::read_to_string(path).map_err(|e| store_err("cannot read", path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

// ---------------------------------------------------------------------------
// Local document store
// ---------------------------------------------------------------------------

/// Saves uploaded documents under one directory; the reference handed back
/// is the saved file's path.
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    dir: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DocumentStore for LocalDocumentStore {
    /// `filename` is expected as `<slot>_<original name>`; any directory
    /// part is dropped.
    fn store(&self, bytes: &[u8], filename: &str) -> PmpjResult<String> {
        let base = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| PmpjError::Store(format!("invalid document name '{}'", filename)))?;

        fs::create_dir_all(&self.dir).map_err(|e| store_err("cannot create", &self.dir, e))?;
        let target = self
            .dir
            .join(format!("{}_{}", Local::now().format("%Y%m%d_%H%M%S"), base));
        fs::write(&target, bytes).map_err(|e| store_err("cannot write", &target, e))?;
        tracing::info!(path = %target.display(), bytes = bytes.len(), "document stored");
        Ok(target.display().to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
