use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::config::{EventBoundaries, EventConfig};
use crate::model::Livestream;

/// Minutes of display error per observation: the scraper polls on a fixed
/// interval, so each observed end time is only accurate to that interval.
const MARGIN_MINUTES_PER_OBSERVATION: i64 = 10;

pub const HEADER: [&str; 6] = [
    "成员",
    "总选前直播日期",
    "总时间（分）",
    "总选后直播日期",
    "总时间（分）",
    "前后时间比例",
];

#[derive(Debug, Clone, Default)]
pub struct WindowStats {
    pub dates: BTreeSet<NaiveDate>,
    pub duration_minutes: i64,
    pub observations: i64,
}

impl WindowStats {
    fn absorb(&mut self, record: &Livestream) {
        self.dates.insert(record.date);
        self.duration_minutes += duration_minutes(record);
        self.observations += 1;
    }

    pub fn error_margin(&self) -> i64 {
        self.observations * MARGIN_MINUTES_PER_OBSERVATION
    }
}

/// Livestream length in whole minutes, rounded to nearest. Clamped at zero:
/// a poll clock running behind the reported start must not drag a window's
/// duration sum negative.
pub fn duration_minutes(record: &Livestream) -> i64 {
    let span_ms = record.last_seen_timestamp - record.start_timestamp;
    ((span_ms as f64 / 60_000.0).round() as i64).max(0)
}

/// Split records into the pre window `[midterm, closure)` and the post
/// window `[closure, cutoff)` by start timestamp. Records outside both
/// windows are ignored.
pub fn split_windows(
    records: &[Livestream],
    bounds: &EventBoundaries,
) -> (WindowStats, WindowStats) {
    let mut pre = WindowStats::default();
    let mut post = WindowStats::default();
    for record in records {
        let start = record.start_timestamp;
        if (bounds.midterm_ms..bounds.closure_ms).contains(&start) {
            pre.absorb(record);
        } else if (bounds.closure_ms..bounds.cutoff_ms).contains(&start) {
            post.absorb(record);
        }
    }
    (pre, post)
}

/// Dates rendered as unpadded `M-D`, ascending, space-joined.
pub fn format_dates(dates: &BTreeSet<NaiveDate>) -> String {
    dates
        .iter()
        .map(|date| format!("{}-{}", date.month(), date.day()))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn with_margin(minutes: i64, margin: i64) -> String {
    format!("{minutes}±{margin}")
}

/// The ratio column: pre/post duration when the post window has activity,
/// otherwise one of the configured marker strings.
pub fn ratio_cell(
    pre: &WindowStats,
    post: &WindowStats,
    member_name: &str,
    event: &EventConfig,
) -> String {
    if post.duration_minutes > 0 {
        format!(
            "≈{:.2}",
            pre.duration_minutes as f64 / post.duration_minutes as f64
        )
    } else if pre.duration_minutes > 0 {
        event.no_post_marker.clone()
    } else if member_name == event.special_absent_member {
        event.special_absent_marker.clone()
    } else {
        event.absent_marker.clone()
    }
}

pub fn member_row(
    member_name: &str,
    records: &[Livestream],
    bounds: &EventBoundaries,
    event: &EventConfig,
) -> [String; 6] {
    let (pre, post) = split_windows(records, bounds);
    [
        member_name.to_string(),
        format_dates(&pre.dates),
        with_margin(pre.duration_minutes, pre.error_margin()),
        format_dates(&post.dates),
        with_margin(post.duration_minutes, post.error_margin()),
        ratio_cell(&pre, &post, member_name, event),
    ]
}

pub fn write_prepost_csv(path: &Path, rows: &[[String; 6]]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to open {} for writing", path.display()))?;
    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}
