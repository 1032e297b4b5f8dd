use anyhow::Result;

use crate::commands::CommandReport;
use crate::config::load_config;
use crate::ingest::scan_snapshots;
use crate::paths::resolve_paths;
use crate::store::{partition_by_member, write_livestreams_csv};

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths();
    let cfg = load_config()?;
    let mut report = CommandReport::new();

    let records = scan_snapshots(&paths.raw_dir, &cfg.calendar)?;
    if records.is_empty() {
        // An absent raw tree is silent success today; surface it without
        // changing the exit code.
        report.detail(format!(
            "no snapshot entries found under {}; writing empty outputs",
            paths.raw_dir.display()
        ));
    }

    write_livestreams_csv(&paths.master_file, &records)?;
    report.detail(format!(
        "dumped {} records to {}",
        records.len(),
        paths.master_file.display()
    ));

    let by_member = partition_by_member(&records);
    for (member_id, member_records) in &by_member {
        let path = paths.members_dir.join(format!("{member_id}.csv"));
        write_livestreams_csv(&path, member_records)?;
        report.detail(format!(
            "dumped {} records to {}",
            member_records.len(),
            path.display()
        ));
    }
    report.detail(format!("members written: {}", by_member.len()));

    Ok(report)
}
