use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// One stored row: column name → cell value. Absent columns read as "".
pub type Row = BTreeMap<String, String>;

/// A materialised record table: header in display order plus rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTable {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl RecordTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Header followed by every row, cells aligned to the header.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(self.header.clone());
        for row in &self.rows {
            grid.push(
                self.header
                    .iter()
                    .map(|col| row.get(col).cloned().unwrap_or_default())
                    .collect(),
            );
        }
        grid
    }

    /// Row whose identity column equals `identity` (trimmed).
    pub fn find(&self, identity_key: &str, identity: &str) -> Option<&Row> {
        let identity = identity.trim();
        self.rows
            .iter()
            .find(|row| row.get(identity_key).map(|v| v.trim()) == Some(identity))
    }
}

/// Which columns lead and trail the table, and which one identifies a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub identity_key: String,
    pub identity_columns: Vec<String>,
    pub summary_columns: Vec<String>,
}

impl ColumnLayout {
    fn is_pinned(&self, column: &str) -> bool {
        self.identity_columns.iter().any(|c| c == column)
            || self.summary_columns.iter().any(|c| c == column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOutcome {
    pub table: RecordTable,
    /// Rows dropped because they carried the new record's identity.
    pub replaced: usize,
}

/// Canonical header: identity columns, then every other column in first-seen
/// order (existing table first, then the new record), then summary columns.
fn canonical_header(
    existing: &[String],
    new_record: &[(String, String)],
    layout: &ColumnLayout,
) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut header: Vec<String> = Vec::new();

    let middle = existing
        .iter()
        .map(String::as_str)
        .chain(new_record.iter().map(|(c, _)| c.as_str()))
        .filter(|c| !layout.is_pinned(c));

    let ordered = layout
        .identity_columns
        .iter()
        .map(String::as_str)
        .chain(middle)
        .chain(layout.summary_columns.iter().map(String::as_str));

    for column in ordered {
        if seen.insert(column) {
            header.push(column.to_string());
        }
    }
    header
}

/// Merge `new_record` into `existing`, replacing any row with the same
/// identity and appending the new one last.
///
/// Every row in the result carries every header column, missing cells
/// filled with "". Merging the same record twice gives the same table as
/// merging it once.
pub fn merge(
    existing: RecordTable,
    new_record: &[(String, String)],
    layout: &ColumnLayout,
) -> MergeOutcome {
    let header = canonical_header(&existing.header, new_record, layout);

    let identity = new_record
        .iter()
        .find(|(c, _)| *c == layout.identity_key)
        .map(|(_, v)| v.trim().to_string())
        .unwrap_or_default();

    let before = existing.rows.len();
    let mut rows: Vec<Row> = existing
        .rows
        .into_iter()
        .filter(|row| {
            identity.is_empty()
                || row.get(&layout.identity_key).map(|v| v.trim()) != Some(identity.as_str())
        })
        .collect();
    let replaced = before - rows.len();

    rows.push(new_record.iter().cloned().collect());

    for row in &mut rows {
        for column in &header {
            row.entry(column.clone()).or_default();
        }
    }

    if replaced > 0 {
        tracing::warn!(identity = %identity, replaced, "existing record replaced");
    }

    MergeOutcome {
        table: RecordTable { header, rows },
        replaced,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn layout() -> ColumnLayout {
        ColumnLayout {
            identity_key: "NIK".to_string(),
            identity_columns: vec!["Timestamp".to_string(), "NIK".to_string()],
            summary_columns: vec!["Tingkat Risiko".to_string()],
        }
    }

    fn record(nik: &str, risk: &str) -> Vec<(String, String)> {
        vec![
            ("Timestamp".to_string(), "2025-01-01 10:00:00".to_string()),
            ("NIK".to_string(), nik.to_string()),
            ("Q1".to_string(), "YA".to_string()),
            ("Tingkat Risiko".to_string(), risk.to_string()),
        ]
    }

    #[test]
    fn test_merge_into_empty() {
        let out = merge(
            RecordTable::default(),
            &record("3578000000000001", "Sedang"),
            &layout(),
        );
        assert_eq!(out.replaced, 0);
        assert_eq!(
            out.table.header,
            vec!["Timestamp", "NIK", "Q1", "Tingkat Risiko"]
        );
        assert_eq!(out.table.len(), 1);
    }

    #[test]
    fn test_new_identity_appends() {
        let first = merge(
            RecordTable::default(),
            &record("3578000000000001", "Sedang"),
            &layout(),
        )
        .table;
        let out = merge(first, &record("3578000000000002", "Tinggi"), &layout());
        assert_eq!(out.replaced, 0);
        assert_eq!(out.table.len(), 2);
        assert_eq!(out.table.rows[1]["NIK"], "3578000000000002");
    }

    #[test]
    fn test_same_identity_replaces_only_that_row() {
        let mut table = RecordTable::default();
        for nik in ["3578000000000001", "3578000000000002", "3578000000000003"] {
            table = merge(table, &record(nik, "Rendah"), &layout()).table;
        }
        let out = merge(table, &record("3578000000000002", "Tinggi"), &layout());
        assert_eq!(out.replaced, 1);
        assert_eq!(out.table.len(), 3);
        let niks: Vec<&str> = out.table.rows.iter().map(|r| r["NIK"].as_str()).collect();
        assert_eq!(
            niks,
            vec!["3578000000000001", "3578000000000003", "3578000000000002"]
        );
        assert_eq!(out.table.rows[2]["Tingkat Risiko"], "Tinggi");
        assert_eq!(out.table.rows[0]["Tingkat Risiko"], "Rendah");
    }

    #[test]
    fn test_identity_compared_trimmed() {
        let table = RecordTable {
            header: vec!["NIK".to_string()],
            rows: vec![[("NIK".to_string(), " 3578000000000001 ".to_string())]
                .into_iter()
                .collect()],
        };
        let out = merge(table, &record("3578000000000001", "Sedang"), &layout());
        assert_eq!(out.replaced, 1);
        assert_eq!(out.table.len(), 1);
    }

    #[test]
    fn test_legacy_columns_kept_between_identity_and_summary() {
        let table = RecordTable {
            header: vec![
                "NIK".to_string(),
                "Tingkat Risiko".to_string(),
                "Catatan".to_string(),
            ],
            rows: vec![[
                ("NIK".to_string(), "3578000000000009".to_string()),
                ("Tingkat Risiko".to_string(), "Rendah".to_string()),
                ("Catatan".to_string(), "lama".to_string()),
            ]
            .into_iter()
            .collect()],
        };
        let out = merge(table, &record("3578000000000001", "Sedang"), &layout());
        assert_eq!(
            out.table.header,
            vec!["Timestamp", "NIK", "Catatan", "Q1", "Tingkat Risiko"]
        );
        // Missing cells on both sides are filled, never omitted.
        assert_eq!(out.table.rows[0]["Q1"], "");
        assert_eq!(out.table.rows[0]["Timestamp"], "");
        assert_eq!(out.table.rows[1]["Catatan"], "");
    }

    #[test]
    fn test_grid_aligns_cells() {
        let out = merge(
            RecordTable::default(),
            &record("3578000000000001", "Sedang"),
            &layout(),
        );
        let grid = out.table.to_grid();
        assert_eq!(grid.len(), 2);
        assert_eq!(
            grid[1],
            vec!["2025-01-01 10:00:00", "3578000000000001", "YA", "Sedang"]
        );
    }

    #[test]
    fn test_find_by_identity() {
        let out = merge(
            RecordTable::default(),
            &record("3578000000000001", "Sedang"),
            &layout(),
        );
        assert!(out.table.find("NIK", "3578000000000001").is_some());
        assert!(out.table.find("NIK", "3578000000000002").is_none());
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(ids in prop::collection::vec(0u8..6, 0..8), new_id in 0u8..6) {
            let mut table = RecordTable::default();
            for id in &ids {
                let nik = format!("35780000000000{:02}", id);
                table = merge(table, &record(&nik, "Rendah"), &layout()).table;
            }
            let new_record = record(&format!("35780000000000{:02}", new_id), "Tinggi");
            let once = merge(table, &new_record, &layout()).table;
            let twice = merge(once.clone(), &new_record, &layout()).table;
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn at_most_one_row_per_identity(ids in prop::collection::vec(0u8..4, 1..10)) {
            let mut table = RecordTable::default();
            for id in &ids {
                let nik = format!("35780000000000{:02}", id);
                table = merge(table, &record(&nik, "Rendah"), &layout()).table;
            }
            let mut niks: Vec<&str> = table.rows.iter().map(|r| r["NIK"].as_str()).collect();
            let n = niks.len();
            niks.sort_unstable();
            niks.dedup();
            prop_assert_eq!(niks.len(), n);
        }
    }
}
