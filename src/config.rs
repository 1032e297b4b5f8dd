use anyhow::{Result, anyhow};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Date-bucketing parameters. Livestream dates are taken in a fixed UTC
/// offset, and anything before the boundary hour counts as the previous day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub utc_offset_hours: i32,
    pub day_boundary_hour: u32,
    pub title_delimiter: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 8,
            day_boundary_hour: 5,
            title_delimiter: "的".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberSpec {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    pub members: Vec<MemberSpec>,
}

/// Pre/post comparison window boundaries and the marker strings used when a
/// window has no activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub midterm: String,
    pub closure: String,
    pub cutoff: String,
    pub no_post_marker: String,
    pub absent_marker: String,
    pub special_absent_member: String,
    pub special_absent_marker: String,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            midterm: "2018-07-08T22:00:00+08:00".to_string(),
            closure: "2018-07-28T12:00:00+08:00".to_string(),
            cutoff: "2018-08-09T00:00:00+08:00".to_string(),
            no_post_marker: "总选后不直播".to_string(),
            absent_marker: "查无此人".to_string(),
            special_absent_member: "黄婷婷".to_string(),
            special_absent_marker: "亭亭净植".to_string(),
        }
    }
}

/// Window boundaries resolved to epoch milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct EventBoundaries {
    pub midterm_ms: i64,
    pub closure_ms: i64,
    pub cutoff_ms: i64,
}

impl EventConfig {
    pub fn boundaries(&self) -> Result<EventBoundaries> {
        let parse = |label: &str, value: &str| -> Result<i64> {
            let dt = DateTime::parse_from_rfc3339(value)
                .map_err(|err| anyhow!("invalid event {label} instant {value:?}: {err}"))?;
            Ok(dt.timestamp_millis())
        };
        Ok(EventBoundaries {
            midterm_ms: parse("midterm", &self.midterm)?,
            closure_ms: parse("closure", &self.closure)?,
            cutoff_ms: parse("cutoff", &self.cutoff)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivestatConfig {
    pub calendar: CalendarConfig,
    pub months: Vec<String>,
    pub groups: Vec<GroupSpec>,
    pub event: EventConfig,
}

impl Default for LivestatConfig {
    fn default() -> Self {
        Self {
            calendar: CalendarConfig::default(),
            months: default_months(),
            groups: default_groups(),
            event: EventConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialLivestatConfig {
    calendar: Option<CalendarConfig>,
    months: Option<Vec<String>>,
    groups: Option<Vec<GroupSpec>>,
    event: Option<EventConfig>,
}

fn default_months() -> Vec<String> {
    [
        "2017-12", "2018-01", "2018-02", "2018-03", "2018-04", "2018-05", "2018-06", "2018-07",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn group(name: &str, members: &[(&str, u64)]) -> GroupSpec {
    GroupSpec {
        name: name.to_string(),
        members: members
            .iter()
            .map(|(name, id)| MemberSpec {
                name: name.to_string(),
                id: id.to_string(),
            })
            .collect(),
    }
}

fn default_groups() -> Vec<GroupSpec> {
    vec![
        group(
            "g1",
            &[
                ("李艺彤", 16),
                ("黄婷婷", 22),
                ("冯薪朵", 7),
                ("陆婷", 34),
                ("莫寒", 35),
                ("赵粤", 27),
                ("许佳琪", 21),
                ("戴萌", 38),
                ("钱蓓婷", 36),
                ("林思意", 24),
                ("谢蕾蕾", 63572),
                ("吴哲晗", 39),
                ("孔肖吟", 19),
                ("苏杉杉", 327597),
                ("段艺璇", 63554),
                ("张语格", 1),
            ],
        ),
        group(
            "g2",
            &[
                ("孙芮", 8),
                ("郑丹妮", 327575),
                ("宋昕冉", 6738),
                ("张丹三", 6747),
                ("刘力菲", 327567),
                ("徐子轩", 14),
                ("杨冰怡", 6744),
                ("韩家乐", 459999),
                ("易嘉爱", 33),
                ("万丽娜", 25),
                ("张雨鑫", 5574),
                ("姜杉", 63560),
                ("冯思佳", 327587),
                ("刘增艳", 63566),
                ("张怡", 63582),
                ("费沁源", 63555),
            ],
        ),
        group(
            "g3",
            &[
                ("张怀瑾", 407127),
                ("陈珂", 63548),
                ("马玉灵", 327596),
                ("唐莉佳", 327571),
                ("陈倩楠", 327601),
                ("黄恩茹", 407106),
                ("胡晓慧", 63559),
                ("李宇琪", 20),
                ("李钊", 6735),
                ("左婧媛", 327577),
                ("陈美君", 63549),
                ("洪珮雲", 63558),
                ("徐诗琪", 399674),
                ("赵佳蕊", 460005),
                ("青钰雯", 327581),
                ("王诗蒙", 459989),
            ],
        ),
        group(
            "g4",
            &[
                ("沈梦瑶", 49005),
                ("肖文铃", 327573),
                ("卢静", 327569),
                ("许杨玉琢", 5566),
                ("王雨煊", 407168),
                ("谢妮", 45),
                ("刘倩倩", 327568),
                ("孙珍妮", 286977),
                ("李梓", 327591),
                ("高源婧", 63557),
                ("刘姝贤", 327579),
                ("葛司琪", 407104),
                ("张琼予", 327560),
                ("蒋芸", 17),
                ("袁雨桢", 5),
                ("祁静", 399672),
                ("闫明筠", 6745),
                ("胡丽芝", 528094),
            ],
        ),
    ]
}

fn env_or_i32(var: &str, fallback: i32) -> i32 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<i32>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_u32(var: &str, fallback: u32) -> u32 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u32>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn is_month_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    bytes.len() == 7
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..].iter().all(u8::is_ascii_digit)
}

fn validate(cfg: &LivestatConfig) -> Result<()> {
    if cfg.calendar.day_boundary_hour >= 24 {
        return Err(anyhow!("invalid day boundary hour: must be 0..=23"));
    }
    if !(-14..=14).contains(&cfg.calendar.utc_offset_hours) {
        return Err(anyhow!("invalid utc offset: must be within -14..=14 hours"));
    }
    if cfg.calendar.title_delimiter.is_empty() {
        return Err(anyhow!("invalid title delimiter: cannot be empty"));
    }
    if cfg.months.is_empty() {
        return Err(anyhow!("invalid months: at least one YYYY-MM label required"));
    }
    for month in &cfg.months {
        if !is_month_label(month) {
            return Err(anyhow!("invalid month label {month:?}: expected YYYY-MM"));
        }
    }
    if cfg.groups.is_empty() {
        return Err(anyhow!("invalid groups: at least one group required"));
    }
    for group in &cfg.groups {
        if group.name.trim().is_empty() {
            return Err(anyhow!("invalid group: name cannot be empty"));
        }
        for member in &group.members {
            if member.name.trim().is_empty() || member.id.trim().is_empty() {
                return Err(anyhow!(
                    "invalid member in group {}: name and id required",
                    group.name
                ));
            }
        }
    }
    let bounds = cfg.event.boundaries()?;
    if !(bounds.midterm_ms < bounds.closure_ms && bounds.closure_ms < bounds.cutoff_ms) {
        return Err(anyhow!(
            "invalid event boundaries: require midterm < closure < cutoff"
        ));
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("LIVESTAT_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let home = dirs::home_dir()?;
    Some(home.join(".livestat").join("config.toml"))
}

fn merge_file_config(base: &mut LivestatConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    let parsed: PartialLivestatConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse config {}: {err}", path.display()))?;
    if let Some(calendar) = parsed.calendar {
        base.calendar = calendar;
    }
    if let Some(months) = parsed.months {
        base.months = months;
    }
    if let Some(groups) = parsed.groups {
        base.groups = groups;
    }
    if let Some(event) = parsed.event {
        base.event = event;
    }
    Ok(())
}

pub fn load_config() -> Result<LivestatConfig> {
    let mut cfg = LivestatConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.calendar.utc_offset_hours =
        env_or_i32("LIVESTAT_UTC_OFFSET_HOURS", cfg.calendar.utc_offset_hours);
    cfg.calendar.day_boundary_hour = env_or_u32(
        "LIVESTAT_DAY_BOUNDARY_HOUR",
        cfg.calendar.day_boundary_hour,
    );

    validate(&cfg)?;
    Ok(cfg)
}
