mod common;

use std::collections::BTreeMap;
use std::fs;

use assert_cmd::Command;
use common::{LogBuilder, sample_log};
use lcm2foxglove::{ConvertOptions, convert_log};
use predicates::prelude::*;
use tempfile::TempDir;

fn cli() -> Command {
    Command::cargo_bin("lcm2foxglove").unwrap()
}

/// topic → (schema name, [(sequence, log_time)])
fn read_mcap(path: &std::path::Path) -> BTreeMap<String, (String, Vec<(u32, u64)>)> {
    let bytes = fs::read(path).unwrap();
    let mut out: BTreeMap<String, (String, Vec<(u32, u64)>)> = BTreeMap::new();
    for msg in mcap::MessageStream::new(&bytes).unwrap() {
        let msg = msg.unwrap();
        assert_eq!(msg.log_time, msg.publish_time);
        assert_eq!(msg.channel.message_encoding, "protobuf");
        let schema = msg.channel.schema.as_ref().unwrap();
        assert_eq!(schema.encoding, "protobuf");
        let entry = out
            .entry(msg.channel.topic.clone())
            .or_insert_with(|| (schema.name.clone(), Vec::new()));
        entry.1.push((msg.sequence, msg.log_time));
    }
    out
}

#[test]
fn test_inspect_command() {
    let log = sample_log().write_temp();

    cli()
        .arg("inspect")
        .arg(log.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Channel"))
        .stdout(predicate::str::contains("BROOM_L"))
        .stdout(predicate::str::contains("foxglove.LaserScan"))
        .stdout(predicate::str::contains("Total messages: 5"));
}

#[test]
fn test_inspect_json_reports_counts() {
    let log = sample_log().write_temp();

    let output = cli().args(["inspect", "--json"]).arg(log.path()).output().unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let channels = summary["channels"].as_array().unwrap();
    let broom_l = channels.iter().find(|c| c["topic_name"] == "BROOM_L").unwrap();
    assert_eq!(broom_l["message_count"], 3);
    assert_eq!(summary["schemas"].as_array().unwrap().len(), 5);
    assert_eq!(summary["time_range"]["start_time_ns"], 100_000);
    assert_eq!(summary["time_range"]["end_time_ns"], 300_000);
}

#[test]
fn test_inspect_missing_file_fails() {
    cli()
        .args(["inspect", "/nonexistent/run.lcm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open LCM log"));
}

#[test]
fn test_convert_command() {
    let log = sample_log().write_temp();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("run.mcap");

    cli().arg("convert").arg(log.path()).arg(&out).assert().success();

    let topics = read_mcap(&out);
    assert_eq!(topics.keys().collect::<Vec<_>>(), vec!["BROOM_L", "CAM_THUMB_RFR", "VELODYNE"]);

    let (schema, broom) = &topics["BROOM_L"];
    assert_eq!(schema, "foxglove.LaserScan");
    assert_eq!(broom, &vec![(0, 100_000), (1, 200_000), (2, 300_000)]);
    assert_eq!(topics["VELODYNE"].0, "foxglove.PointCloud");
    assert_eq!(topics["CAM_THUMB_RFR"].0, "foxglove.CompressedImage");
}

#[test]
fn test_convert_with_filters() {
    let log = sample_log().write_temp();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("filtered.mcap");

    let options = ConvertOptions {
        log_path: log.path().to_path_buf(),
        output_path: out.clone(),
        channel_regex: Some("^(BROOM|VELO)".to_string()),
        start_time: Some(0.00004),
        end_time: Some(0.00015),
        ..Default::default()
    };
    let stats = convert_log(&options).unwrap();

    // offsets are relative to the first indexed message at 100 µs
    assert_eq!(stats.written, 2);
    assert_eq!(stats.per_channel.get("BROOM_L"), Some(&1));
    assert_eq!(stats.per_channel.get("VELODYNE"), Some(&1));
    let topics = read_mcap(&out);
    assert_eq!(topics["BROOM_L"].1, vec![(0, 200_000)]);
    assert_eq!(topics["VELODYNE"].1, vec![(0, 150_000)]);
    assert!(!topics.contains_key("CAM_THUMB_RFR"));
}

#[test]
fn test_convert_end_offset_is_inclusive() {
    let log = LogBuilder::new()
        .broom("BROOM_L", 100)
        .broom("BROOM_L", 165)
        .broom("BROOM_L", 229)
        .write_temp();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("boundary.mcap");

    cli()
        .arg("convert")
        .arg(log.path())
        .arg(&out)
        .args(["--end", "0.000065"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan: 2 messages kept"));

    let options = ConvertOptions {
        log_path: log.path().to_path_buf(),
        output_path: out.clone(),
        start_time: Some(0.000065),
        end_time: Some(0.000129),
        ..Default::default()
    };
    let stats = convert_log(&options).unwrap();
    assert_eq!(stats.written, 2);
    assert_eq!(read_mcap(&out)["BROOM_L"].1, vec![(0, 165_000), (1, 229_000)]);
}

#[test]
fn test_convert_rejects_negative_end() {
    let log = sample_log().write_temp();
    let dir = TempDir::new().unwrap();

    cli()
        .arg("convert")
        .arg(log.path())
        .arg(dir.path().join("neg.mcap"))
        .args(["--end=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("end must be a non-negative number"));
}

#[test]
fn test_convert_skips_reserved_channel_messages() {
    let log = sample_log().write_temp();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("reserved.mcap");

    let options = ConvertOptions {
        log_path: log.path().to_path_buf(),
        output_path: out.clone(),
        channels: vec!["GPS_TO_LOCAL".to_string(), "BROOM_L".to_string()],
        include_reserved: true,
        ..Default::default()
    };
    let stats = convert_log(&options).unwrap();
    assert_eq!(stats.written, 3);
    assert_eq!(stats.skipped, 1);
    assert!(!read_mcap(&out).contains_key("GPS_TO_LOCAL"));
}

#[test]
fn test_convert_dry_run_writes_nothing() {
    let log = sample_log().write_temp();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("dry.mcap");

    cli()
        .arg("convert")
        .arg(log.path())
        .arg(&out)
        .args(["--dry-run", "--channel", "BROOM_L"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan: 3 messages kept"));
    assert!(!out.exists());
}

#[test]
fn test_convert_rejects_bad_regex() {
    let log = sample_log().write_temp();
    let dir = TempDir::new().unwrap();

    cli()
        .arg("convert")
        .arg(log.path())
        .arg(dir.path().join("x.mcap"))
        .args(["--channel-regex", "("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid channel regex"));
}

#[test]
fn test_schema_command() {
    cli()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("VELODYNE"))
        .stdout(predicate::str::contains("foxglove.PointCloud"))
        .stdout(predicate::str::contains("reserved"));
}
