use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::model::Livestream;

pub const MEMBER_LABEL: &str = "成员";
pub const TOTAL_LABEL: &str = "总天数";

#[derive(Debug, Clone)]
pub struct MonthlyRow {
    pub member: String,
    pub counts: Vec<u64>,
    pub total: u64,
}

/// Count distinct livestream days per month label. Multiple livestreams on
/// the same assigned date count once; dates outside the listed months are
/// ignored, so the total always equals the sum of the month columns.
pub fn distinct_day_counts(records: &[Livestream], months: &[String]) -> (Vec<u64>, u64) {
    let dates: BTreeSet<NaiveDate> = records.iter().map(|record| record.date).collect();
    let mut per_month: BTreeMap<String, u64> = BTreeMap::new();
    for date in &dates {
        *per_month
            .entry(date.format("%Y-%m").to_string())
            .or_default() += 1;
    }

    let counts: Vec<u64> = months
        .iter()
        .map(|month| per_month.get(month).copied().unwrap_or(0))
        .collect();
    let total = counts.iter().sum();
    (counts, total)
}

pub fn write_monthly_csv(path: &Path, months: &[String], rows: &[MonthlyRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to open {} for writing", path.display()))?;
    let mut header = vec![MEMBER_LABEL.to_string()];
    header.extend(months.iter().cloned());
    header.push(TOTAL_LABEL.to_string());
    writer.write_record(&header)?;

    for row in rows {
        let mut fields = vec![row.member.clone()];
        fields.extend(row.counts.iter().map(ToString::to_string));
        fields.push(row.total.to_string());
        writer.write_record(&fields)?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}
