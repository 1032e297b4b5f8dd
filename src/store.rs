use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::model::Livestream;

/// Write records to a processed CSV, creating parent directories on demand.
/// The header row comes from the record's serde field names, including the
/// preserved `fist_seen_timestamp` spelling.
pub fn write_livestreams_csv(path: &Path, records: &[Livestream]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to open {} for writing", path.display()))?;
    if records.is_empty() {
        writer
            .write_record(Livestream::FIELD_NAMES)
            .with_context(|| format!("failed to write header to {}", path.display()))?;
    }
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("failed to write record to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

/// Load one processed CSV. A missing file is a hard failure: every roster
/// member is expected to have a processed file.
pub fn read_livestreams_csv(path: &Path) -> Result<Vec<Livestream>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: Livestream =
            row.with_context(|| format!("failed to parse record in {}", path.display()))?;
        records.push(record);
    }
    Ok(records)
}

/// Partition records by member id, preserving the input (start-timestamp)
/// order within each member.
pub fn partition_by_member(records: &[Livestream]) -> BTreeMap<String, Vec<Livestream>> {
    let mut by_member: BTreeMap<String, Vec<Livestream>> = BTreeMap::new();
    for record in records {
        by_member
            .entry(record.member_id.clone())
            .or_default()
            .push(record.clone());
    }
    by_member
}
