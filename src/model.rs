use anyhow::Result;
use chrono::{FixedOffset, NaiveDate, TimeZone, Timelike};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::CalendarConfig;
use crate::error::IngestError;

/// One observation inside a raw snapshot. Identifiers arrive as either JSON
/// strings or numbers depending on the scraper vintage; both normalize to
/// strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEntry {
    #[serde(deserialize_with = "id_string")]
    pub live_id: String,
    #[serde(deserialize_with = "id_string")]
    pub member_id: String,
    pub title: String,
    pub start_time: i64,
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Num(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

/// The deduplicated livestream record, one per distinct livestream id.
/// `fist_seen_timestamp` is the historical CSV header spelling; downstream
/// consumers depend on it byte-for-byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Livestream {
    pub livestream_id: String,
    pub member_id: String,
    pub member_name: String,
    pub date: NaiveDate,
    pub start_timestamp: i64,
    #[serde(rename = "fist_seen_timestamp")]
    pub first_seen_timestamp: i64,
    pub last_seen_timestamp: i64,
}

impl Livestream {
    /// CSV column order; mirrors the serde field names above.
    pub const FIELD_NAMES: [&'static str; 7] = [
        "livestream_id",
        "member_id",
        "member_name",
        "date",
        "start_timestamp",
        "fist_seen_timestamp",
        "last_seen_timestamp",
    ];
}

/// Member name is the title prefix before the first delimiter. A title that
/// starts with the delimiter (or an empty title) is a fatal ingest error.
pub fn member_name_from_title(title: &str, delimiter: &str) -> Result<String, IngestError> {
    let name = title.split(delimiter).next().unwrap_or_default();
    if name.is_empty() {
        return Err(IngestError::EmptyMemberName {
            title: title.to_string(),
        });
    }
    Ok(name.to_string())
}

/// Local calendar date for a start instant, with starts before the boundary
/// hour counted as the previous day.
pub fn assigned_date(start_ms: i64, calendar: &CalendarConfig) -> Result<NaiveDate, IngestError> {
    let offset = FixedOffset::east_opt(calendar.utc_offset_hours * 3600)
        .ok_or(IngestError::StartOutOfRange(start_ms))?;
    let local = offset
        .timestamp_millis_opt(start_ms)
        .single()
        .ok_or(IngestError::StartOutOfRange(start_ms))?;
    let date = local.date_naive();
    if local.hour() < calendar.day_boundary_hour {
        date.pred_opt().ok_or(IngestError::StartOutOfRange(start_ms))
    } else {
        Ok(date)
    }
}
