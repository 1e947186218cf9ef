//! Session source backed by the public OpenF1 API (https://openf1.org).

use crate::errors::{AppError, AppResult};
use crate::models::{
    DriverInfo, Lap, LapRecord, Session, SessionInfo, SessionRequest, TelemetryTrace,
};
use crate::source::SessionSource;
use crate::source::distance::{TimedSpeed, integrate_distance};
use crate::source::segments::{QUALIFYING_SEGMENTS, tag_segments};
use crate::ui::messages::info;
use crate::utils::time::seconds_to_delta;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openf1.org/v1";

/// Query timestamps are sent without offset (OpenF1 reads them as UTC),
/// which keeps '+' out of the query string.
const QUERY_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMeeting {
    pub meeting_key: u32,
    #[serde(default)]
    pub meeting_name: Option<String>,
    #[serde(default)]
    pub meeting_official_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub circuit_short_name: Option<String>,
    #[serde(default)]
    pub date_start: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiSession {
    session_key: u32,
    session_name: String,
    #[serde(default)]
    date_start: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiDriver {
    driver_number: u32,
    #[serde(default)]
    name_acronym: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    team_name: Option<String>,
    #[serde(default)]
    team_colour: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiLap {
    driver_number: u32,
    lap_number: u32,
    #[serde(default)]
    lap_duration: Option<f64>,
    #[serde(default)]
    date_start: Option<String>,
    #[serde(default)]
    is_pit_out_lap: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiCarData {
    date: String,
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default)]
    throttle: Option<f64>,
    #[serde(default)]
    brake: Option<f64>,
    #[serde(default)]
    n_gear: Option<u8>,
    #[serde(default)]
    rpm: Option<u32>,
}

/// Parse an OpenF1 timestamp. Most carry an offset, a few older records
/// do not and are UTC.
pub fn parse_api_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// How well a meeting answers an event name: 3 for an exact name, 2 for
/// the name without "Grand Prix", 1 for a substring, 0 for no match.
pub fn score_meeting(meeting: &ApiMeeting, event: &str) -> u8 {
    let wanted = event.trim().to_lowercase();
    if wanted.is_empty() {
        return 0;
    }

    let names: Vec<String> = [
        meeting.meeting_name.as_deref(),
        meeting.location.as_deref(),
        meeting.country_name.as_deref(),
        meeting.circuit_short_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::to_lowercase)
    .collect();

    if names.iter().any(|n| *n == wanted) {
        return 3;
    }
    if names
        .iter()
        .any(|n| n.trim_end_matches("grand prix").trim() == wanted)
    {
        return 2;
    }
    let official = meeting
        .meeting_official_name
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();
    if names.iter().any(|n| n.contains(&wanted)) || official.contains(&wanted) {
        return 1;
    }
    0
}

/// Best scoring meeting; the earliest one wins a tie.
pub fn best_meeting<'a>(meetings: &'a [ApiMeeting], event: &str) -> Option<&'a ApiMeeting> {
    meetings
        .iter()
        .map(|m| (score_meeting(m, event), m))
        .filter(|(score, _)| *score > 0)
        .max_by(|(sa, ma), (sb, mb)| {
            sa.cmp(sb).then_with(|| {
                let start = |m: &ApiMeeting| {
                    m.date_start
                        .as_deref()
                        .and_then(parse_api_date)
                        .unwrap_or(DateTime::<Utc>::MAX_UTC)
                };
                start(mb).cmp(&start(ma))
            })
        })
        .map(|(_, m)| m)
}

pub struct OpenF1Source {
    client: Client,
    base_url: String,
}

impl OpenF1Source {
    pub fn new(base_url: &str, timeout_secs: u64) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("polegap/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET an endpoint returning a JSON array. OpenF1 answers 404 when a
    /// filter matches nothing, which is an empty result here.
    fn fetch<T: DeserializeOwned>(&self, endpoint: &str, query: &str) -> AppResult<Vec<T>> {
        let url = format!("{}/{}?{}", self.base_url, endpoint, query);
        let response = self.client.get(&url).send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let response = response.error_for_status()?;
        Ok(response.json::<Vec<T>>()?)
    }
}

impl SessionSource for OpenF1Source {
    fn name(&self) -> &str {
        "openf1"
    }

    fn load_session(&mut self, request: &SessionRequest) -> AppResult<Session> {
        info(format!(
            "Looking up {} {} on OpenF1...",
            request.year, request.event
        ));

        let meetings: Vec<ApiMeeting> = self.fetch("meetings", &format!("year={}", request.year))?;
        if meetings.is_empty() {
            return Err(AppError::DataUnavailable(format!(
                "no events published for {}",
                request.year
            )));
        }

        let meeting = best_meeting(&meetings, &request.event).ok_or_else(|| {
            AppError::DataUnavailable(format!(
                "no event matching '{}' in {}",
                request.event, request.year
            ))
        })?;

        let sessions: Vec<ApiSession> =
            self.fetch("sessions", &format!("meeting_key={}", meeting.meeting_key))?;
        let wanted = request.kind.api_names();
        let session = sessions
            .iter()
            .find(|s| wanted.iter().any(|w| s.session_name.eq_ignore_ascii_case(w)))
            .ok_or_else(|| {
                AppError::DataUnavailable(format!(
                    "{} has no {} session",
                    meeting.meeting_name.as_deref().unwrap_or(&request.event),
                    request.kind
                ))
            })?;

        info(format!("Loading {} laps...", session.session_name));

        let api_drivers: Vec<ApiDriver> =
            self.fetch("drivers", &format!("session_key={}", session.session_key))?;
        let api_laps: Vec<ApiLap> =
            self.fetch("laps", &format!("session_key={}", session.session_key))?;

        if api_laps.is_empty() {
            return Err(AppError::DataUnavailable(format!(
                "no lap data for session {}",
                session.session_key
            )));
        }

        let drivers: Vec<DriverInfo> = api_drivers
            .into_iter()
            .map(|d| DriverInfo {
                driver_number: d.driver_number,
                abbreviation: d
                    .name_acronym
                    .unwrap_or_else(|| format!("#{}", d.driver_number)),
                full_name: d.full_name,
                team: d.team_name.unwrap_or_default(),
                team_colour: d.team_colour,
            })
            .collect();

        let by_number: HashMap<u32, &str> = drivers
            .iter()
            .map(|d| (d.driver_number, d.abbreviation.as_str()))
            .collect();

        let mut laps: Vec<Lap> = api_laps
            .into_iter()
            .map(|l| Lap {
                driver: by_number
                    .get(&l.driver_number)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("#{}", l.driver_number)),
                lap_number: l.lap_number,
                lap_time: l.lap_duration.and_then(seconds_to_delta),
                set_at: l.date_start.as_deref().and_then(parse_api_date),
                pit_out: l.is_pit_out_lap.unwrap_or(false),
                segment: None,
            })
            .collect();

        if request.kind.is_qualifying() {
            tag_segments(&mut laps, QUALIFYING_SEGMENTS);
        }

        Ok(Session {
            info: SessionInfo {
                year: request.year,
                event: request.event.clone(),
                kind: request.kind,
                session_key: Some(session.session_key),
                meeting_name: meeting.meeting_name.clone(),
                location: meeting.location.clone(),
                date_start: session.date_start.as_deref().and_then(parse_api_date),
            },
            drivers,
            laps,
        })
    }

    fn load_telemetry(
        &mut self,
        session: &SessionInfo,
        record: &LapRecord,
    ) -> AppResult<TelemetryTrace> {
        let mut trace = TelemetryTrace {
            driver: record.driver.clone(),
            lap_number: record.lap_number.unwrap_or(0),
            samples: Vec::new(),
        };

        let (Some(session_key), Some(number), Some(start), Some(lap_time)) = (
            session.session_key,
            record.driver_number,
            record.set_at,
            record.lap_time,
        ) else {
            return Ok(trace);
        };
        let Some(end) = start.checked_add_signed(lap_time) else {
            return Ok(trace);
        };
        info(format!(
            "Fetching car data for {} lap {}...",
            record.driver, trace.lap_number
        ));

        let query = format!(
            "session_key={}&driver_number={}&date>={}&date<={}",
            session_key,
            number,
            start.format(QUERY_DATE_FORMAT),
            end.format(QUERY_DATE_FORMAT)
        );
        let rows: Vec<ApiCarData> = self.fetch("car_data", &query)?;

        let mut points: Vec<TimedSpeed> = rows
            .into_iter()
            .filter_map(|row| {
                Some(TimedSpeed {
                    date: parse_api_date(&row.date)?,
                    speed: row.speed?,
                    throttle: row.throttle,
                    brake: row.brake,
                    gear: row.n_gear,
                    rpm: row.rpm,
                })
            })
            .collect();
        points.sort_by_key(|p| p.date);

        trace.samples = integrate_distance(&points);
        Ok(trace)
    }
}
