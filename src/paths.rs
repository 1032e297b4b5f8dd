use std::env;
use std::path::PathBuf;

/// Fixed data layout, rooted at `LIVESTAT_DATA_DIR` (default `./data`).
/// Every directory can be overridden individually for tests.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub raw_dir: PathBuf,
    pub members_dir: PathBuf,
    pub monthly_dir: PathBuf,
    pub prepost_dir: PathBuf,
    pub master_file: PathBuf,
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths() -> DataPaths {
    let data_dir = env_or_default_path("LIVESTAT_DATA_DIR", PathBuf::from("data"));

    let raw_dir = env_or_default_path("LIVESTAT_RAW_DIR", data_dir.join("raw"));
    let processed_dir = env_or_default_path("LIVESTAT_PROCESSED_DIR", data_dir.join("processed"));
    let members_dir = env_or_default_path("LIVESTAT_MEMBERS_DIR", processed_dir.join("members"));
    let probes_dir = env_or_default_path("LIVESTAT_PROBES_DIR", data_dir.join("probes"));
    let monthly_dir = probes_dir.join("monthly");
    let prepost_dir = probes_dir.join("prepost");
    let master_file = processed_dir.join("master.csv");

    DataPaths {
        raw_dir,
        members_dir,
        monthly_dir,
        prepost_dir,
        master_file,
    }
}
