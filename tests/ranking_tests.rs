use chrono::{TimeDelta, TimeZone, Utc};
use polegap::core::gaps::{compute_gaps, intervals};
use polegap::core::ranking::rank;
use polegap::core::report::ranking_rows;
use polegap::errors::AppError;
use polegap::models::LapRecord;
use polegap::utils::time::seconds_to_delta;

fn record(driver: &str, secs: Option<f64>) -> LapRecord {
    LapRecord::new(driver, "Team", secs.and_then(seconds_to_delta))
}

fn ms(v: i64) -> TimeDelta {
    TimeDelta::milliseconds(v)
}

#[test]
fn test_rank_orders_by_lap_time() {
    let records = vec![
        record("AAA", Some(90.0)),
        record("BBB", Some(91.5)),
        record("CCC", Some(89.8)),
    ];

    let ranking = rank(&records).expect("ranking");
    let order: Vec<&str> = ranking.ranked().iter().map(|r| r.driver.as_str()).collect();

    assert_eq!(order, ["CCC", "AAA", "BBB"]);
    assert_eq!(ranking.pole().driver, "CCC");
    assert_eq!(ranking.pole_time(), ms(89_800));
    assert_eq!(ranking.position_of("bbb"), Some(3));
    assert!(ranking.excluded.is_empty());
}

#[test]
fn test_gaps_to_pole() {
    let records = vec![
        record("AAA", Some(90.0)),
        record("BBB", Some(91.5)),
        record("CCC", Some(89.8)),
    ];
    let ranking = rank(&records).unwrap();
    let gaps = compute_gaps(ranking.ranked(), ranking.pole_time()).unwrap();

    let got: Vec<(&str, Option<TimeDelta>)> = gaps
        .iter()
        .map(|r| (r.driver.as_str(), r.gap_to_pole))
        .collect();

    assert_eq!(
        got,
        [
            ("CCC", Some(ms(0))),
            ("AAA", Some(ms(200))),
            ("BBB", Some(ms(1_700))),
        ]
    );
    assert!(gaps.windows(2).all(|w| w[0].gap_to_pole <= w[1].gap_to_pole));
}

#[test]
fn test_null_lap_is_excluded_not_ranked() {
    let records = vec![
        record("AAA", Some(90.0)),
        record("NUL", None),
        record("BBB", Some(90.4)),
    ];

    let ranking = rank(&records).unwrap();

    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking.excluded.len(), 1);
    assert_eq!(ranking.excluded[0].driver, "NUL");
    assert_eq!(ranking.position_of("NUL"), None);
}

#[test]
fn test_empty_input_is_empty_session() {
    let err = rank(&[]).unwrap_err();
    assert!(matches!(err, AppError::EmptySession));
}

#[test]
fn test_all_null_laps_is_no_valid_lap() {
    let records = vec![record("AAA", None), record("BBB", None)];
    let err = rank(&records).unwrap_err();
    assert!(matches!(err, AppError::NoValidLap(_)));
    assert!(err.to_string().contains("AAA"));
}

#[test]
fn test_tie_broken_by_who_set_it_first() {
    let mut early = record("ZZZ", Some(80.0));
    early.set_at = Some(Utc.with_ymd_and_hms(2024, 5, 25, 14, 10, 0).unwrap());
    let mut late = record("AAA", Some(80.0));
    late.set_at = Some(Utc.with_ymd_and_hms(2024, 5, 25, 14, 20, 0).unwrap());
    let undated = record("BBB", Some(80.0));

    let ranking = rank(&[undated, late, early]).unwrap();
    let order: Vec<&str> = ranking.ranked().iter().map(|r| r.driver.as_str()).collect();

    assert_eq!(order, ["ZZZ", "AAA", "BBB"]);
}

#[test]
fn test_tie_without_timestamps_is_alphabetical_and_shares_gap() {
    let records = vec![
        record("POL", Some(79.0)),
        record("NNN", Some(80.0)),
        record("MMM", Some(80.0)),
    ];
    let ranking = rank(&records).unwrap();
    let gaps = compute_gaps(ranking.ranked(), ranking.pole_time()).unwrap();

    assert_eq!(gaps[1].driver, "MMM");
    assert_eq!(gaps[2].driver, "NNN");
    assert_eq!(gaps[1].gap_to_pole, gaps[2].gap_to_pole);
}

#[test]
fn test_pole_stays_valid_when_excluded_is_cleared() {
    let records = vec![record("NUL", None), record("AAA", Some(90.0))];
    let mut ranking = rank(&records).unwrap();

    ranking.excluded.clear();

    assert_eq!(ranking.len(), 1);
    assert_eq!(ranking.pole(), &ranking.ranked()[0]);
    assert_eq!(ranking.pole().driver, "AAA");
    assert!(ranking.ranked().iter().all(LapRecord::has_time));
}

#[test]
fn test_ranking_is_idempotent() {
    let records = vec![
        record("AAA", Some(90.0)),
        record("BBB", Some(91.5)),
        record("CCC", Some(89.8)),
    ];
    let once = rank(&records).unwrap();
    let twice = rank(once.ranked()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_faster_than_pole_is_gap_error() {
    let records = vec![record("AAA", Some(90.0)), record("BBB", Some(89.0))];
    let err = compute_gaps(&records, ms(90_000)).unwrap_err();
    assert!(matches!(err, AppError::Gap(_)));
}

#[test]
fn test_intervals_to_car_ahead() {
    let records = vec![
        record("CCC", Some(89.8)),
        record("AAA", Some(90.0)),
        record("BBB", Some(91.5)),
    ];
    let ranking = rank(&records).unwrap();
    let gaps = compute_gaps(ranking.ranked(), ranking.pole_time()).unwrap();

    assert_eq!(intervals(&gaps), [None, Some(ms(200)), Some(ms(1_500))]);
}

#[test]
fn test_ranking_rows_format() {
    let records = vec![
        record("CCC", Some(89.8)),
        record("AAA", Some(90.0)),
        record("BBB", Some(91.5)),
    ];
    let ranking = rank(&records).unwrap();
    let gaps = compute_gaps(ranking.ranked(), ranking.pole_time()).unwrap();

    let rows = ranking_rows(&gaps, Some(2));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1], "CCC");
    assert_eq!(rows[0][3], "1:29.800");
    assert_eq!(rows[0][4], "POLE");
    assert_eq!(rows[1][4], "+0.200");

    assert_eq!(ranking_rows(&gaps, Some(10)).len(), 3);
}

#[test]
fn test_single_driver_is_pole_with_zero_gap() {
    let records = vec![record("SOL", Some(88.123))];
    let ranking = rank(&records).unwrap();
    let gaps = compute_gaps(ranking.ranked(), ranking.pole_time()).unwrap();

    assert_eq!(ranking.pole().driver, "SOL");
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].gap_to_pole, Some(TimeDelta::zero()));
}
