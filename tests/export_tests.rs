mod common;
use common::{monaco_snapshot, pg, setup_test_db, temp_out, write_snapshot};

use polegap::export::{ExportFormat, ExportLogic, RankingExport};
use polegap::models::{SessionKind, SessionRequest};
use polegap::source::{SessionSnapshot, SessionSource, SnapshotSource};
use predicates::str::contains;
use std::fs;
use std::path::Path;

fn export_args<'a>(snap: &'a str, db: &'a str, format: &'a str, file: &'a str) -> Vec<&'a str> {
    vec![
        "--snapshot", snap, "--cache-db", db, "export", "2024", "Monaco", "--format", format,
        "--file", file,
    ]
}

#[test]
fn test_export_csv() {
    let db = setup_test_db("export_csv");
    let snap = write_snapshot("export_csv", &monaco_snapshot());
    let out = temp_out("export_csv", "csv");

    pg().args(export_args(&snap, &db, "csv", &out))
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read exported csv");
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "position,driver,driver_number,team,lap_number,lap_time,lap_time_s,gap,gap_s"
    );
    assert!(lines.next().unwrap().starts_with("1,LEC,16,Ferrari,12,1:10.270,"));
    assert_eq!(content.lines().count(), 7);
    assert!(!content.contains("SAR"));
}

#[test]
fn test_export_json() {
    let db = setup_test_db("export_json");
    let snap = write_snapshot("export_json_snap", &monaco_snapshot());
    let out = temp_out("export_json", "json");

    pg().args(export_args(&snap, &db, "json", &out))
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read exported json");
    let rows: serde_json::Value = serde_json::from_str(&content).unwrap();
    let rows = rows.as_array().unwrap();

    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["driver"], "LEC");
    assert_eq!(rows[0]["gap"], "+0.000");
    assert_eq!(rows[1]["driver"], "PIA");
    assert_eq!(rows[1]["gap_s"].as_f64(), Some(0.154));

    pg().args(["--cache-db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("export"));
}

#[test]
fn test_export_xlsx_and_pdf() {
    let db = setup_test_db("export_xlsx_pdf");
    let snap = write_snapshot("export_xlsx_pdf", &monaco_snapshot());

    let xlsx = temp_out("export_xlsx_pdf", "xlsx");
    pg().args(export_args(&snap, &db, "xlsx", &xlsx))
        .assert()
        .success();
    assert!(fs::read(&xlsx).unwrap().starts_with(b"PK"));

    let pdf = temp_out("export_xlsx_pdf", "pdf");
    pg().args(export_args(&snap, &db, "pdf", &pdf))
        .assert()
        .success();
    assert!(fs::read(&pdf).unwrap().starts_with(b"%PDF"));
}

#[test]
fn test_export_refuses_overwrite_without_force() {
    let db = setup_test_db("export_overwrite");
    let snap = write_snapshot("export_overwrite", &monaco_snapshot());
    let out = temp_out("export_overwrite", "csv");
    fs::write(&out, "keep me").unwrap();

    pg().args(export_args(&snap, &db, "csv", &out))
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("not overwritten"));
    assert_eq!(fs::read_to_string(&out).unwrap(), "keep me");

    let mut args = export_args(&snap, &db, "csv", &out);
    args.push("--force");
    pg().args(&args).assert().success();
    assert!(fs::read_to_string(&out).unwrap().starts_with("position,"));
}

#[test]
fn test_ranking_export_rows() {
    let snapshot: SessionSnapshot = serde_json::from_value(monaco_snapshot()).unwrap();
    let mut source = SnapshotSource::from_snapshot(snapshot);
    let session = source
        .load_session(&SessionRequest::new(2024, "Monaco", SessionKind::Qualifying))
        .unwrap();

    let out = temp_out("ranking_export_rows", "json");
    let count = ExportLogic::export(&session, ExportFormat::Json, Path::new(&out), false).unwrap();
    assert_eq!(count, 6);

    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let last = rows.last().unwrap();
    assert_eq!(last["position"], 6);
    assert_eq!(last["driver"], "VER");
    assert_eq!(last["lap_time"], "1:10.567");
    assert_eq!(last["gap"], "+0.297");

    // a fresh session ranks into the same export rows
    let (_, gaps) = polegap::core::analysis::rank_session(&session).unwrap();
    let again = RankingExport::from_gaps(&gaps);
    assert_eq!(again.len(), 6);
    assert_eq!(again[5].driver_number, Some(1));
}
