//! Duplicate detection and merging of imported roster entries

use std::collections::HashSet;

use log::info;
use serde::{Deserialize, Serialize};

use super::LaborEntry;

/// What to do with incoming entries whose name already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Incoming entries replace existing entries of the same name
    #[default]
    Replace,
    /// Incoming duplicates are dropped; only new names are added
    Skip,
}

/// Names in `incoming` that already exist in `existing`, in incoming order
pub fn detect_duplicates(incoming: &[LaborEntry], existing: &[LaborEntry]) -> Vec<String> {
    let existing_names: HashSet<&str> = existing.iter().map(|e| e.name.as_str()).collect();
    incoming
        .iter()
        .filter(|e| existing_names.contains(e.name.as_str()))
        .map(|e| e.name.clone())
        .collect()
}

/// Merge incoming entries into a roster
///
/// Under `Replace`, existing entries not named in `incoming` keep their order and
/// every incoming entry follows in incoming order, so a replaced entry moves to
/// the end. Under `Skip`, existing entries keep their order and new names follow.
pub fn merge_entries(
    existing: Vec<LaborEntry>,
    incoming: Vec<LaborEntry>,
    strategy: MergeStrategy,
) -> Vec<LaborEntry> {
    let duplicates = detect_duplicates(&incoming, &existing);
    info!(
        "merging {} incoming entries ({} duplicates, strategy {:?})",
        incoming.len(),
        duplicates.len(),
        strategy
    );

    match strategy {
        MergeStrategy::Replace => {
            let replaced: HashSet<String> = incoming.iter().map(|e| e.name.clone()).collect();
            let mut merged: Vec<LaborEntry> = existing
                .into_iter()
                .filter(|e| !replaced.contains(&e.name))
                .collect();
            merged.extend(incoming);
            merged
        }
        MergeStrategy::Skip => {
            let duplicates: HashSet<String> = duplicates.into_iter().collect();
            let mut merged = existing;
            merged.extend(incoming.into_iter().filter(|e| !duplicates.contains(&e.name)));
            merged
        }
    }
}
