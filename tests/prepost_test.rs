use std::fs;
use std::path::Path;
use tempfile::tempdir;

const PROCESSED_HEADER: &str =
    "livestream_id,member_id,member_name,date,start_timestamp,fist_seen_timestamp,last_seen_timestamp";

fn write_member_csv(members_dir: &Path, member_id: &str, rows: &[&str]) {
    fs::create_dir_all(members_dir).expect("mkdir members");
    let mut body = format!("{PROCESSED_HEADER}\n");
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(members_dir.join(format!("{member_id}.csv")), body).expect("write member csv");
}

// Pre window [1h, 2h), post window [2h, 3h) on the epoch-millisecond axis.
fn test_config(path: &Path) {
    let config = r#"
[[groups]]
name = "t1"
members = [
    { name = "张三", id = "M1" },
    { name = "李四", id = "M2" },
    { name = "王五", id = "M3" },
    { name = "黄婷婷", id = "M4" },
]

[event]
midterm = "1970-01-01T01:00:00+00:00"
closure = "1970-01-01T02:00:00+00:00"
cutoff = "1970-01-01T03:00:00+00:00"
"#;
    fs::write(path, config).expect("write config");
}

#[test]
fn prepost_reports_windows_margins_and_markers() {
    let tmp = tempdir().expect("tempdir");
    let data_dir = tmp.path().join("data");
    let members_dir = data_dir.join("processed/members");
    let config_path = tmp.path().join("config.toml");
    test_config(&config_path);

    // 张三: pre-window activity only (10 minutes on 7-9).
    write_member_csv(
        &members_dir,
        "M1",
        &["L1,M1,张三,2018-07-09,3700000,3700000,4300000"],
    );
    // 李四: 20 pre minutes against 10 post minutes, two distinct pre dates.
    write_member_csv(
        &members_dir,
        "M2",
        &[
            "L2,M2,李四,2018-07-09,3700000,3700000,4300000",
            "L3,M2,李四,2018-07-10,4400000,4400000,5000000",
            "L4,M2,李四,2018-07-29,7300000,7300000,7900000",
        ],
    );
    // 王五: no activity in either window.
    write_member_csv(&members_dir, "M3", &[]);
    // 黄婷婷: also empty, but gets the special marker.
    write_member_csv(&members_dir, "M4", &[]);

    assert_cmd::cargo::cargo_bin_cmd!("livestat")
        .current_dir(tmp.path())
        .env("LIVESTAT_DATA_DIR", &data_dir)
        .env("LIVESTAT_CONFIG_PATH", &config_path)
        .arg("prepost")
        .assert()
        .success();

    let out = fs::read_to_string(data_dir.join("probes/prepost/t1.csv")).expect("read output");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines[0],
        "成员,总选前直播日期,总时间（分）,总选后直播日期,总时间（分）,前后时间比例"
    );
    assert_eq!(lines[1], "张三,7-9,10±10,,0±0,总选后不直播");
    assert_eq!(lines[2], "李四,7-9 7-10,20±20,7-29,10±10,≈2.00");
    assert_eq!(lines[3], "王五,,0±0,,0±0,查无此人");
    assert_eq!(lines[4], "黄婷婷,,0±0,,0±0,亭亭净植");
    assert_eq!(lines.len(), 5);
}
