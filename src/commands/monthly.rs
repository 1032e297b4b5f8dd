use anyhow::{Context, Result};

use crate::commands::CommandReport;
use crate::config::load_config;
use crate::paths::resolve_paths;
use crate::probes::monthly::{MonthlyRow, distinct_day_counts, write_monthly_csv};
use crate::store::read_livestreams_csv;

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths();
    let cfg = load_config()?;
    let mut report = CommandReport::new();

    for group in &cfg.groups {
        let mut rows = Vec::with_capacity(group.members.len());
        for member in &group.members {
            let path = paths.members_dir.join(format!("{}.csv", member.id));
            let records = read_livestreams_csv(&path)
                .with_context(|| format!("no processed file for member {}", member.name))?;
            let (counts, total) = distinct_day_counts(&records, &cfg.months);
            rows.push(MonthlyRow {
                member: member.name.clone(),
                counts,
                total,
            });
        }

        let out = paths.monthly_dir.join(format!("{}.csv", group.name));
        write_monthly_csv(&out, &cfg.months, &rows)?;
        report.detail(format!("dumped {} rows to {}", rows.len(), out.display()));
    }

    Ok(report)
}
