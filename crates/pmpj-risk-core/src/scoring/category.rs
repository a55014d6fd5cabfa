use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tables::CategoryTable;

/// Per-label client (or deed) counts for one category table.
pub type CategoryCounts = BTreeMap<String, u64>;

/// The label chosen for a category and its table weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub label: String,
    pub weight: u32,
}

/// Resolve the dominant label of a category.
///
/// All-zero (or empty) counts resolve to `default_label`. Otherwise the
/// label with the highest count wins; ties go to the label listed first in
/// the table, and labels the table does not know are considered after all
/// table labels, in sorted order, with weight 0.
pub fn pick_dominant(
    table: &CategoryTable,
    counts: &CategoryCounts,
    default_label: &str,
) -> CategoryScore {
    if counts.values().all(|&c| c == 0) {
        return CategoryScore {
            label: default_label.to_string(),
            weight: table.weight(default_label),
        };
    }

    let known = table
        .labels()
        .map(|label| (label, counts.get(label).copied().unwrap_or(0)));
    let unknown = counts
        .iter()
        .filter(|(label, _)| !table.contains(label))
        .map(|(label, &count)| (label.as_str(), count));

    let mut best: Option<(&str, u64)> = None;
    for (label, count) in known.chain(unknown) {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }

    // Non-empty: at least one count is non-zero.
    let label = best.map(|(l, _)| l).unwrap_or(default_label);
    CategoryScore {
        label: label.to_string(),
        weight: table.weight(label),
    }
}

/// Sum of all counts in a category.
pub fn total_count(counts: &CategoryCounts) -> u64 {
    counts.values().sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
