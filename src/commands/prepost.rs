use anyhow::{Context, Result};

use crate::commands::CommandReport;
use crate::config::load_config;
use crate::paths::resolve_paths;
use crate::probes::prepost::{member_row, write_prepost_csv};
use crate::store::read_livestreams_csv;

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths();
    let cfg = load_config()?;
    let bounds = cfg.event.boundaries()?;
    let mut report = CommandReport::new();

    for group in &cfg.groups {
        let mut rows = Vec::with_capacity(group.members.len());
        for member in &group.members {
            let path = paths.members_dir.join(format!("{}.csv", member.id));
            let records = read_livestreams_csv(&path)
                .with_context(|| format!("no processed file for member {}", member.name))?;
            rows.push(member_row(&member.name, &records, &bounds, &cfg.event));
        }

        let out = paths.prepost_dir.join(format!("{}.csv", group.name));
        write_prepost_csv(&out, &rows)?;
        report.detail(format!("dumped {} rows to {}", rows.len(), out.display()));
    }

    Ok(report)
}
