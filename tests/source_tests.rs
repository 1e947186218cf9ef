mod common;
use common::{monaco_snapshot, setup_test_db, write_snapshot};

use chrono::{TimeDelta, TimeZone, Utc};
use polegap::db::cache;
use polegap::db::pool::DbPool;
use polegap::errors::AppError;
use polegap::models::{LapRecord, SessionKind, SessionRequest};
use polegap::source::distance::{TimedSpeed, integrate_distance};
use polegap::source::openf1::{ApiMeeting, best_meeting, parse_api_date, score_meeting};
use polegap::source::{CachedSource, SessionSnapshot, SessionSource, SnapshotSource};
use std::path::Path;

fn request() -> SessionRequest {
    SessionRequest::new(2024, "Monaco", SessionKind::Qualifying)
}

fn meeting(key: u32, name: &str, location: &str, date: &str) -> ApiMeeting {
    ApiMeeting {
        meeting_key: key,
        meeting_name: Some(name.to_string()),
        meeting_official_name: None,
        location: Some(location.to_string()),
        country_name: None,
        circuit_short_name: None,
        date_start: Some(date.to_string()),
    }
}

#[test]
fn test_snapshot_file_roundtrip_through_source() {
    let path = write_snapshot("snapshot_file_source", &monaco_snapshot());
    let mut source = SnapshotSource::open(Path::new(&path)).unwrap();

    let session = source.load_session(&request()).unwrap();
    assert_eq!(session.info.title(), "2024 Monaco Grand Prix - Qualifying");
    assert_eq!(session.drivers.len(), 7);

    // "1:10.630" text and 70.424 seconds both load as millisecond durations
    let lec = session.laps_for("lec").next().unwrap();
    assert_eq!(lec.lap_time, Some(TimeDelta::milliseconds(70_630)));
    let pia = session.laps_for("PIA").next().unwrap();
    assert_eq!(pia.lap_time, Some(TimeDelta::milliseconds(70_424)));
}

#[test]
fn test_snapshot_with_overflowing_lap_time_is_rejected() {
    let mut doc = monaco_snapshot();
    doc["laps"][0]["lap_time"] = serde_json::json!("999999999999999:00");
    assert!(serde_json::from_value::<SessionSnapshot>(doc.clone()).is_err());

    let path = write_snapshot("snapshot_overflowing_lap", &doc);
    assert!(matches!(
        SnapshotSource::open(Path::new(&path)),
        Err(AppError::Json(_))
    ));

    doc["laps"][0]["lap_time"] = serde_json::json!(1e300);
    assert!(serde_json::from_value::<SessionSnapshot>(doc).is_err());
}

#[test]
fn test_snapshot_matches_meeting_and_location_names() {
    let snapshot: SessionSnapshot = serde_json::from_value(monaco_snapshot()).unwrap();
    let mut source = SnapshotSource::from_snapshot(snapshot);

    for event in ["Monte Carlo", "monaco grand prix"] {
        let req = SessionRequest::new(2024, event, SessionKind::Qualifying);
        assert!(source.load_session(&req).is_ok(), "{event}");
    }

    let wrong_year = SessionRequest::new(2023, "Monaco", SessionKind::Qualifying);
    assert!(matches!(
        source.load_session(&wrong_year),
        Err(AppError::DataUnavailable(_))
    ));
}

#[test]
fn test_missing_snapshot_file_is_unavailable() {
    let err = SnapshotSource::open(Path::new("/nonexistent/polegap/snapshot.json"))
        .err()
        .unwrap();
    assert!(matches!(err, AppError::DataUnavailable(_)));
}

#[test]
fn test_cached_source_serves_second_load_offline() {
    let db = setup_test_db("cached_source_offline");
    let snapshot: SessionSnapshot = serde_json::from_value(monaco_snapshot()).unwrap();

    {
        let pool = DbPool::open_migrated(&db).unwrap();
        let mut online = CachedSource::new(SnapshotSource::from_snapshot(snapshot), pool);
        let session = online.load_session(&request()).unwrap();

        let mut pole = LapRecord::new("LEC", "Ferrari", None);
        pole.lap_number = Some(12);
        let trace = online.load_telemetry(&session.info, &pole).unwrap();
        assert!(!trace.is_empty());

        let stats = cache::stats(&online.pool().conn).unwrap();
        assert_eq!(stats.sessions, 1);
        assert_eq!(stats.traces, 1);
    }

    let pool = DbPool::open_migrated(&db).unwrap();
    let mut offline = CachedSource::<SnapshotSource>::offline(pool);
    let session = offline.load_session(&request()).unwrap();
    assert_eq!(session.laps.len(), 9);

    let mut pole = LapRecord::new("LEC", "Ferrari", None);
    pole.lap_number = Some(12);
    let trace = offline.load_telemetry(&session.info, &pole).unwrap();
    assert_eq!(trace.samples.len(), 21);

    let other = SessionRequest::new(2024, "Monza", SessionKind::Qualifying);
    assert!(matches!(
        offline.load_session(&other),
        Err(AppError::DataUnavailable(_))
    ));

    let (sessions, traces) = cache::clear(&offline.pool().conn).unwrap();
    assert_eq!((sessions, traces), (1, 1));
}

#[test]
fn test_integrate_distance_from_speed() {
    let t0 = Utc.with_ymd_and_hms(2024, 5, 25, 14, 0, 0).unwrap();
    let point = |ms: i64, speed: f64| TimedSpeed {
        date: t0 + TimeDelta::milliseconds(ms),
        speed,
        throttle: None,
        brake: None,
        gear: None,
        rpm: None,
    };

    let samples = integrate_distance(&[
        point(0, 180.0),
        point(1_000, 180.0),
        point(1_500, 360.0),
        point(1_200, 100.0),
    ]);

    assert_eq!(samples[0].distance, 0.0);
    assert!((samples[1].distance - 50.0).abs() < 1e-9);
    assert!((samples[2].distance - 100.0).abs() < 1e-9);
    // an out-of-order timestamp adds nothing
    assert!((samples[3].distance - 100.0).abs() < 1e-9);
}

#[test]
fn test_best_meeting_prefers_exact_names() {
    let meetings = vec![
        meeting(1, "Emilia Romagna Grand Prix", "Imola", "2024-05-17T11:30:00+00:00"),
        meeting(2, "Monaco Grand Prix", "Monaco", "2024-05-24T11:30:00+00:00"),
        meeting(3, "Saudi Arabian Grand Prix", "Jeddah", "2024-03-07T13:30:00+00:00"),
    ];

    assert_eq!(best_meeting(&meetings, "monaco").unwrap().meeting_key, 2);
    assert_eq!(best_meeting(&meetings, "Emilia Romagna").unwrap().meeting_key, 1);
    assert_eq!(best_meeting(&meetings, "saudi").unwrap().meeting_key, 3);
    assert!(best_meeting(&meetings, "Atlantis").is_none());

    assert_eq!(score_meeting(&meetings[1], "Monaco Grand Prix"), 3);
    assert_eq!(score_meeting(&meetings[0], "romagna"), 1);
}

#[test]
fn test_best_meeting_tie_goes_to_earliest() {
    let meetings = vec![
        meeting(10, "United States Grand Prix", "Austin", "2024-10-18T17:30:00+00:00"),
        meeting(11, "Las Vegas Grand Prix", "Las Vegas", "2024-11-21T02:30:00+00:00"),
        meeting(12, "Miami Grand Prix", "Miami", "2024-05-03T16:30:00+00:00"),
    ];
    assert_eq!(best_meeting(&meetings, "grand prix").unwrap().meeting_key, 12);
}

#[test]
fn test_parse_api_date_with_and_without_offset() {
    let with_offset = parse_api_date("2024-05-25T14:00:00.123000+00:00").unwrap();
    let naive = parse_api_date("2024-05-25T14:00:00.123").unwrap();
    assert_eq!(with_offset, naive);
    assert!(parse_api_date("yesterday").is_none());
}
