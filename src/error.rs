use thiserror::Error;

/// Fatal ingest anomalies. Any of these aborts the whole run; there is no
/// per-record recovery.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("live entry title {title:?} yields an empty member name")]
    EmptyMemberName { title: String },
    #[error("snapshot filename stem {0:?} is not an epoch-seconds timestamp")]
    BadSnapshotStem(String),
    #[error("start timestamp {0} is out of range for the configured offset")]
    StartOutOfRange(i64),
}
