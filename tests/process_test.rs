use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_snapshot(raw_dir: &Path, subdir: &str, epoch_secs: u64, body: &str) {
    let dir = raw_dir.join(subdir);
    fs::create_dir_all(&dir).expect("mkdir snapshots");
    fs::write(dir.join(format!("{epoch_secs}.json")), body).expect("write snapshot");
}

#[test]
fn process_deduplicates_and_writes_master_and_member_csvs() {
    let tmp = tempdir().expect("tempdir");
    let data_dir = tmp.path().join("data");
    let raw_dir = data_dir.join("raw");

    let a1 = r#"{"liveId":"A1","memberId":"M1","title":"张三的直播","startTime":1000000}"#;
    // 1970-01-02T04:30+08:00, before the 5am boundary.
    let b2 = r#"{"liveId":"B2","memberId":"M2","title":"李四的直播","startTime":73800000}"#;
    write_snapshot(&raw_dir, "batch-a", 1000, &format!("[{a1}]"));
    write_snapshot(&raw_dir, "batch-a", 2000, &format!("[{a1},{b2}]"));
    write_snapshot(&raw_dir, "batch-b", 3000, "");
    write_snapshot(&raw_dir, "batch-b", 4000, "null");

    assert_cmd::cargo::cargo_bin_cmd!("livestat")
        .current_dir(tmp.path())
        .env("LIVESTAT_DATA_DIR", &data_dir)
        .env("LIVESTAT_CONFIG_PATH", tmp.path().join("no-config.toml"))
        .arg("process")
        .assert()
        .success();

    let master = fs::read_to_string(data_dir.join("processed/master.csv")).expect("read master");
    let lines: Vec<&str> = master.lines().collect();
    assert_eq!(
        lines[0],
        "livestream_id,member_id,member_name,date,start_timestamp,fist_seen_timestamp,last_seen_timestamp"
    );
    // Repeated observation of A1 folds into one record with advanced last-seen.
    assert_eq!(lines[1], "A1,M1,张三,1970-01-01,1000000,1000000,2000000");
    // Pre-5am start shifts to the previous day.
    assert_eq!(lines[2], "B2,M2,李四,1970-01-01,73800000,2000000,2000000");
    assert_eq!(lines.len(), 3);

    let member = fs::read_to_string(data_dir.join("processed/members/M1.csv")).expect("read M1");
    assert!(member.contains("A1,M1,张三"));
    assert!(!member.contains("B2"));
    assert!(data_dir.join("processed/members/M2.csv").exists());
}

#[test]
fn process_aborts_on_malformed_entry_and_names_the_file() {
    let tmp = tempdir().expect("tempdir");
    let data_dir = tmp.path().join("data");
    write_snapshot(
        &data_dir.join("raw"),
        "batch-a",
        5000,
        r#"[{"liveId":"A1","memberId":"M1"}]"#,
    );

    assert_cmd::cargo::cargo_bin_cmd!("livestat")
        .current_dir(tmp.path())
        .env("LIVESTAT_DATA_DIR", &data_dir)
        .env("LIVESTAT_CONFIG_PATH", tmp.path().join("no-config.toml"))
        .arg("process")
        .assert()
        .failure()
        .stderr(predicates::str::contains("5000.json"));
}

#[test]
fn process_succeeds_on_missing_raw_dir_with_empty_outputs() {
    let tmp = tempdir().expect("tempdir");
    let data_dir = tmp.path().join("data");

    assert_cmd::cargo::cargo_bin_cmd!("livestat")
        .current_dir(tmp.path())
        .env("LIVESTAT_DATA_DIR", &data_dir)
        .env("LIVESTAT_CONFIG_PATH", tmp.path().join("no-config.toml"))
        .arg("process")
        .assert()
        .success()
        .stdout(predicates::str::contains("no snapshot entries found"));

    let master = fs::read_to_string(data_dir.join("processed/master.csv")).expect("read master");
    assert_eq!(master.lines().count(), 1);
}
