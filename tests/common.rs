#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use serde_json::{Value, json};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn pg() -> Command {
    cargo_bin_cmd!("polegap")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_polegap.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh, empty output directory inside tempdir
pub fn temp_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_polegap_out", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

fn trace(driver: &str, lap: u32, top: f64) -> Value {
    trace_with(driver, lap, top, false)
}

/// 21 samples, 160 m apart: a 90 km/h corner every fifth sample and a
/// straight peaking at `top - 8` in between. With `channels` the samples
/// also carry throttle, brake, gear and rpm.
fn trace_with(driver: &str, lap: u32, top: f64, channels: bool) -> Value {
    let samples: Vec<Value> = (0..=20)
        .map(|i| {
            let d = i as f64 * 160.0;
            let corner = i % 5 == 0;
            let speed = if corner { 90.0 } else { top - (i % 5) as f64 * 8.0 };
            if channels {
                json!({
                    "distance": d,
                    "speed": speed,
                    "throttle": if corner { 20.0 } else { 100.0 },
                    "brake": if corner { 100.0 } else { 0.0 },
                    "gear": if corner { 2 } else { 8 - (i % 5) },
                    "rpm": if corner { 7200 } else { 11800 - (i % 5) * 100 }
                })
            } else {
                json!({ "distance": d, "speed": speed })
            }
        })
        .collect();
    json!({ "driver": driver, "lap_number": lap, "samples": samples })
}

/// Monaco 2024 qualifying: six timed drivers, one without a time, and
/// telemetry for LEC, PIA and SAI. Only SAI's telemetry lacks the throttle,
/// brake, gear and rpm channels.
pub fn monaco_snapshot() -> Value {
    json!({
        "session": {
            "year": 2024,
            "event": "Monaco",
            "kind": "Q",
            "session_key": 9523,
            "meeting_name": "Monaco Grand Prix",
            "location": "Monte Carlo"
        },
        "drivers": [
            { "driver_number": 16, "abbreviation": "LEC", "full_name": "Charles LECLERC", "team": "Ferrari", "team_colour": "E80020" },
            { "driver_number": 81, "abbreviation": "PIA", "team": "McLaren", "team_colour": "FF8000" },
            { "driver_number": 55, "abbreviation": "SAI", "team": "Ferrari", "team_colour": "E80020" },
            { "driver_number": 4, "abbreviation": "NOR", "team": "McLaren", "team_colour": "FF8000" },
            { "driver_number": 63, "abbreviation": "RUS", "team": "Mercedes", "team_colour": "27F4D2" },
            { "driver_number": 1, "abbreviation": "VER", "team": "Red Bull Racing", "team_colour": "3671C6" },
            { "driver_number": 2, "abbreviation": "SAR", "team": "Williams", "team_colour": "64C4FF" }
        ],
        "laps": [
            { "driver": "LEC", "lap_number": 9, "lap_time": "1:10.630" },
            { "driver": "LEC", "lap_number": 12, "lap_time": "1:10.270" },
            { "driver": "PIA", "lap_number": 14, "lap_time": 70.424 },
            { "driver": "SAI", "lap_number": 11, "lap_time": "1:10.518" },
            { "driver": "NOR", "lap_number": 13, "lap_time": "1:10.542" },
            { "driver": "RUS", "lap_number": 10, "lap_time": "1:10.543" },
            { "driver": "VER", "lap_number": 12, "lap_time": "1:10.567" },
            { "driver": "VER", "lap_number": 1, "lap_time": "1:09.000", "pit_out": true },
            { "driver": "SAR", "lap_number": 3, "lap_time": null }
        ],
        "telemetry": [
            trace_with("LEC", 12, 290.0, true),
            trace_with("PIA", 14, 286.0, true),
            trace("SAI", 11, 288.0)
        ]
    })
}

/// Miami 2023 qualifying with lap start times and no segment tags: VER,
/// PER and LEC reach Q3, ALB is out in Q2 and SAR in Q1.
pub fn segmented_snapshot() -> Value {
    let lap = |driver: &str, n: u32, time: Option<&str>, at: &str| {
        json!({
            "driver": driver,
            "lap_number": n,
            "lap_time": time,
            "set_at": format!("2023-05-06T{at}Z"),
            "pit_out": time.is_none()
        })
    };
    json!({
        "session": {
            "year": 2023,
            "event": "Miami",
            "kind": "Q",
            "meeting_name": "Miami Grand Prix",
            "location": "Miami",
            "date_start": "2023-05-06T20:00:00Z"
        },
        "drivers": [
            { "driver_number": 1, "abbreviation": "VER", "full_name": "Max VERSTAPPEN", "team": "Red Bull Racing" },
            { "driver_number": 11, "abbreviation": "PER", "full_name": "Sergio PEREZ", "team": "Red Bull Racing" },
            { "driver_number": 16, "abbreviation": "LEC", "team": "Ferrari" },
            { "driver_number": 23, "abbreviation": "ALB", "team": "Williams" },
            { "driver_number": 2, "abbreviation": "SAR", "team": "Williams" }
        ],
        "laps": [
            lap("VER", 1, None, "20:03:00"),
            lap("VER", 2, Some("1:28.877"), "20:05:00"),
            lap("PER", 2, Some("1:29.005"), "20:05:30"),
            lap("LEC", 2, Some("1:29.254"), "20:06:00"),
            lap("ALB", 2, Some("1:29.900"), "20:06:30"),
            lap("SAR", 3, Some("1:30.100"), "20:10:00"),
            lap("VER", 5, Some("1:28.412"), "20:27:00"),
            lap("PER", 5, Some("1:28.635"), "20:27:30"),
            lap("LEC", 5, Some("1:28.770"), "20:28:00"),
            lap("ALB", 5, Some("1:29.200"), "20:28:30"),
            lap("VER", 8, Some("1:27.893"), "20:47:00"),
            lap("PER", 8, Some("1:28.265"), "20:47:30"),
            lap("LEC", 8, Some("1:28.371"), "20:48:00")
        ]
    })
}

/// Write a snapshot document to the temp dir and return its path.
pub fn write_snapshot(name: &str, doc: &Value) -> String {
    let path = temp_out(name, "json");
    fs::write(&path, serde_json::to_string_pretty(doc).expect("serialize snapshot"))
        .expect("write snapshot");
    path
}
