use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::collections::btree_map::{BTreeMap, Entry};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CalendarConfig;
use crate::error::IngestError;
use crate::model::{LiveEntry, Livestream, assigned_date, member_name_from_title};

/// Scan every snapshot under `<raw_dir>/*/*.json` in lexicographic order
/// (filenames are poll epoch seconds, so this is chronological) and fold
/// repeated observations of the same livestream id into one record.
///
/// Any malformed entry aborts the whole scan; an absent or empty raw tree
/// yields zero records and succeeds.
pub fn scan_snapshots(raw_dir: &Path, calendar: &CalendarConfig) -> Result<Vec<Livestream>> {
    let pattern = raw_dir.join("*/*.json").to_string_lossy().into_owned();
    let mut paths = glob::glob(&pattern)
        .with_context(|| format!("invalid snapshot pattern {pattern}"))?
        .collect::<Result<Vec<PathBuf>, _>>()
        .context("failed to list snapshot files")?;
    paths.sort();

    let mut store: BTreeMap<String, Livestream> = BTreeMap::new();
    let mut announced: BTreeSet<PathBuf> = BTreeSet::new();
    for path in paths {
        if let Some(subdir) = path.parent()
            && announced.insert(subdir.to_path_buf())
        {
            eprintln!("processing {}", subdir.display());
        }
        ingest_snapshot(&path, calendar, &mut store)
            .with_context(|| format!("error processing {}", path.display()))?;
    }

    let mut records: Vec<Livestream> = store.into_values().collect();
    records.sort_by_key(|record| record.start_timestamp);
    Ok(records)
}

fn poll_millis(path: &Path) -> Result<i64, IngestError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let secs: i64 = stem
        .parse()
        .map_err(|_| IngestError::BadSnapshotStem(stem.to_string()))?;
    Ok(secs * 1000)
}

fn ingest_snapshot(
    path: &Path,
    calendar: &CalendarConfig,
    store: &mut BTreeMap<String, Livestream>,
) -> Result<()> {
    let meta = fs::metadata(path).with_context(|| format!("failed to stat {}", path.display()))?;
    if meta.len() == 0 {
        // Empty poll, not an error.
        return Ok(());
    }

    let poll_ms = poll_millis(path)?;
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let entries: Option<Vec<LiveEntry>> =
        serde_json::from_str(&raw).context("failed to parse snapshot JSON")?;

    for entry in entries.unwrap_or_default() {
        // Extraction is checked on every observation, not just the first:
        // a malformed repeat entry is as fatal as a malformed new one.
        let member_name = member_name_from_title(&entry.title, &calendar.title_delimiter)?;
        let date = assigned_date(entry.start_time, calendar)?;
        match store.entry(entry.live_id.clone()) {
            Entry::Occupied(mut seen) => {
                let record = seen.get_mut();
                record.last_seen_timestamp = record.last_seen_timestamp.max(poll_ms);
            }
            Entry::Vacant(slot) => {
                slot.insert(Livestream {
                    livestream_id: entry.live_id,
                    member_id: entry.member_id,
                    member_name,
                    date,
                    start_timestamp: entry.start_time,
                    first_seen_timestamp: poll_ms,
                    last_seen_timestamp: poll_ms,
                });
            }
        }
    }
    Ok(())
}
