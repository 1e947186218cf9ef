use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{monaco_snapshot, pg, segmented_snapshot, setup_test_db, temp_dir, write_snapshot};

fn analyze_args<'a>(snap: &'a str, db: &'a str, out: &'a str, event: &'a str) -> Vec<&'a str> {
    vec![
        "--snapshot", snap, "--cache-db", db, "--test", "analyze", "2024", event, "--session",
        "Q", "--out-dir", out,
    ]
}

#[test]
fn test_init_creates_cache_database() {
    let db = setup_test_db("cli_init");

    pg().args(["--cache-db", &db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    assert!(fs::metadata(&db).is_ok());
}

#[test]
fn test_analyze_writes_both_charts() {
    let db = setup_test_db("cli_analyze");
    let snap = write_snapshot("cli_analyze", &monaco_snapshot());
    let out = temp_dir("cli_analyze");
    let out_s = out.to_string_lossy().to_string();

    pg().args(analyze_args(&snap, &db, &out_s, "Monaco"))
        .assert()
        .success()
        .stdout(
            contains("Top 5 Fastest Qualifying Laps")
                .and(contains("Pole position"))
                .and(contains("1:10.270"))
                .and(contains("+0.154"))
                .and(contains("SAR"))
                .and(contains("gap_to_pole.pdf"))
                .and(contains("speed_comparison.pdf")),
        );

    for name in ["gap_to_pole.pdf", "speed_comparison.pdf"] {
        let bytes = fs::read(out.join(name)).expect("chart written");
        assert!(bytes.starts_with(b"%PDF"), "{name}");
    }

    pg().args(["--cache-db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("analyze"));
}

#[test]
fn test_analyze_channel_switches_the_line_chart() {
    let db = setup_test_db("cli_analyze_channel");
    let snap = write_snapshot("cli_analyze_channel", &monaco_snapshot());
    let out = temp_dir("cli_analyze_channel");
    let out_s = out.to_string_lossy().to_string();

    let mut args = analyze_args(&snap, &db, &out_s, "Monaco");
    args.extend(["--channel", "throttle"]);

    pg().args(&args)
        .assert()
        .success()
        .stdout(
            contains("Charles LECLERC (LEC)")
                .and(contains("LEC lap 12: top speed 282 km/h, average 227.1 km/h"))
                .and(contains("throttle_comparison.pdf")),
        );

    assert!(out.join("gap_to_pole.pdf").exists());
    assert!(out.join("throttle_comparison.pdf").exists());
    assert!(!out.join("speed_comparison.pdf").exists());
}

#[test]
fn test_analyze_channel_missing_writes_nothing() {
    let db = setup_test_db("cli_analyze_no_channel");
    let snap = write_snapshot("cli_analyze_no_channel", &monaco_snapshot());
    let out = temp_dir("cli_analyze_no_channel");
    let out_s = out.to_string_lossy().to_string();

    let mut args = analyze_args(&snap, &db, &out_s, "Monaco");
    args.extend(["--channel", "gear", "--drivers", "LEC,SAI"]);

    pg().args(&args)
        .assert()
        .failure()
        .stderr(contains("SAI on lap 11 has no gear channel"));

    assert!(!out.join("gap_to_pole.pdf").exists());
    assert!(!out.join("gear_comparison.pdf").exists());
}

#[test]
fn test_analyze_rejects_unknown_channel() {
    pg().args(["analyze", "2024", "Monaco", "--channel", "tyre"])
        .assert()
        .failure()
        .stderr(contains("invalid value 'tyre'"));
}

#[test]
fn test_analyze_top_limits_table() {
    let db = setup_test_db("cli_analyze_top");
    let snap = write_snapshot("cli_analyze_top", &monaco_snapshot());
    let out = temp_dir("cli_analyze_top");
    let out_s = out.to_string_lossy().to_string();

    let mut args = analyze_args(&snap, &db, &out_s, "Monaco");
    args.extend(["--top", "3", "--no-telemetry"]);

    pg().args(&args)
        .assert()
        .success()
        .stdout(contains("Top 3 Fastest Qualifying Laps").and(contains("1:10.567").not()));

    assert!(out.join("gap_to_pole.pdf").exists());
    assert!(!out.join("speed_comparison.pdf").exists());
}

#[test]
fn test_analyze_unknown_event_writes_nothing() {
    let db = setup_test_db("cli_analyze_unknown");
    let snap = write_snapshot("cli_analyze_unknown", &monaco_snapshot());
    let out = temp_dir("cli_analyze_unknown");
    let out_s = out.to_string_lossy().to_string();

    pg().args(analyze_args(&snap, &db, &out_s, "Atlantis"))
        .assert()
        .failure()
        .stderr(contains("Session data unavailable"));

    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_analyze_missing_telemetry_writes_nothing() {
    let mut doc = monaco_snapshot();
    doc["telemetry"]
        .as_array_mut()
        .unwrap()
        .retain(|t| t["driver"] != "PIA");

    let db = setup_test_db("cli_analyze_no_tel");
    let snap = write_snapshot("cli_analyze_no_tel", &doc);
    let out = temp_dir("cli_analyze_no_tel");
    let out_s = out.to_string_lossy().to_string();

    pg().args(analyze_args(&snap, &db, &out_s, "Monaco"))
        .assert()
        .failure()
        .stderr(contains("No telemetry recorded for PIA on lap 14"));

    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_analyze_single_driver_fails() {
    let mut doc = monaco_snapshot();
    doc["laps"]
        .as_array_mut()
        .unwrap()
        .retain(|l| l["driver"] == "LEC");

    let db = setup_test_db("cli_analyze_single");
    let snap = write_snapshot("cli_analyze_single", &doc);
    let out = temp_dir("cli_analyze_single");
    let out_s = out.to_string_lossy().to_string();

    pg().args(analyze_args(&snap, &db, &out_s, "Monaco"))
        .assert()
        .failure()
        .stderr(contains("at least two ranked drivers"));

    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_analyze_keeps_existing_charts_without_force() {
    let db = setup_test_db("cli_analyze_existing");
    let snap = write_snapshot("cli_analyze_existing", &monaco_snapshot());
    let out = temp_dir("cli_analyze_existing");
    let out_s = out.to_string_lossy().to_string();
    fs::write(out.join("gap_to_pole.pdf"), "old").unwrap();

    pg().args(analyze_args(&snap, &db, &out_s, "Monaco"))
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("not overwritten"));

    assert_eq!(fs::read_to_string(out.join("gap_to_pole.pdf")).unwrap(), "old");
    assert!(!out.join("speed_comparison.pdf").exists());

    let mut args = analyze_args(&snap, &db, &out_s, "Monaco");
    args.push("--force");
    pg().args(&args).assert().success();

    let bytes = fs::read(out.join("gap_to_pole.pdf")).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_analyze_rejects_bad_driver_pair() {
    let db = setup_test_db("cli_analyze_pair");
    let snap = write_snapshot("cli_analyze_pair", &monaco_snapshot());
    let out = temp_dir("cli_analyze_pair");
    let out_s = out.to_string_lossy().to_string();

    let mut args = analyze_args(&snap, &db, &out_s, "Monaco");
    args.extend(["--drivers", "LEC"]);

    pg().args(&args)
        .assert()
        .failure()
        .stderr(contains("does not name two drivers"));
}

#[test]
fn test_rank_prints_all_drivers() {
    let db = setup_test_db("cli_rank");
    let snap = write_snapshot("cli_rank", &monaco_snapshot());

    pg().args([
        "--snapshot", &snap, "--cache-db", &db, "rank", "2024", "monte carlo", "-s", "qualifying",
    ])
    .assert()
    .success()
    .stdout(
        contains("Top 6 Fastest Qualifying Laps")
            .and(contains("VER"))
            .and(contains("+0.297"))
            .and(contains("No timed lap, not ranked: SAR")),
    );
}

#[test]
fn test_rank_segments_prints_q1_q2_q3() {
    let db = setup_test_db("cli_rank_segments");
    let snap = write_snapshot("cli_rank_segments", &segmented_snapshot());

    pg().args([
        "--snapshot", &snap, "--cache-db", &db, "rank", "2023", "Miami", "-s", "Q", "--segments",
    ])
    .assert()
    .success()
    .stdout(
        contains("Started 2023-05-06 20:00 UTC")
            .and(contains("Max VERSTAPPEN (VER)"))
            .and(contains("Qualifying by Segment"))
            .and(contains("Q3"))
            .and(contains("1:28.412"))
            .and(contains("+0.372"))
            .and(contains("+0.788"))
            .and(contains("+1.223")),
    );
}

#[test]
fn test_rank_segments_without_segment_data_warns() {
    let db = setup_test_db("cli_rank_no_segments");
    let snap = write_snapshot("cli_rank_no_segments", &monaco_snapshot());

    pg().args([
        "--snapshot", &snap, "--cache-db", &db, "rank", "2024", "Monaco", "-s", "Q", "--segments",
    ])
    .assert()
    .success()
    .stdout(contains("Top 6 Fastest").and(contains("has no qualifying segments")));
}

#[test]
fn test_invalid_session_type_is_rejected() {
    pg().args(["rank", "2024", "Monaco", "--session", "Q9"])
        .assert()
        .failure()
        .stderr(contains("Invalid session type"));
}

#[test]
fn test_offline_miss_is_unavailable() {
    let db = setup_test_db("cli_offline_miss");

    pg().args(["--cache-db", &db, "--offline", "rank", "2024", "Monaco"])
        .assert()
        .failure()
        .stderr(contains("not cached"));
}

#[test]
fn test_cache_list_and_clear() {
    let db = setup_test_db("cli_cache");

    pg().args(["--cache-db", &db, "cache", "--list"])
        .assert()
        .success()
        .stdout(contains("No cached sessions"));

    pg().args(["--cache-db", &db, "cache", "--info", "--clear"])
        .assert()
        .success()
        .stdout(contains("Cached sessions:").and(contains("Cache cleared: 0 session(s)")));
}
