use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    #[serde(rename = "FP1")]
    Practice1,
    #[serde(rename = "FP2")]
    Practice2,
    #[serde(rename = "FP3")]
    Practice3,
    #[serde(rename = "SQ")]
    SprintQualifying,
    #[serde(rename = "S")]
    Sprint,
    #[serde(rename = "Q")]
    Qualifying,
    #[serde(rename = "R")]
    Race,
}

impl SessionKind {
    /// Short identifier used on the command line and as cache key.
    pub fn code(&self) -> &'static str {
        match self {
            SessionKind::Practice1 => "FP1",
            SessionKind::Practice2 => "FP2",
            SessionKind::Practice3 => "FP3",
            SessionKind::SprintQualifying => "SQ",
            SessionKind::Sprint => "S",
            SessionKind::Qualifying => "Q",
            SessionKind::Race => "R",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionKind::Practice1 => "Practice 1",
            SessionKind::Practice2 => "Practice 2",
            SessionKind::Practice3 => "Practice 3",
            SessionKind::SprintQualifying => "Sprint Qualifying",
            SessionKind::Sprint => "Sprint",
            SessionKind::Qualifying => "Qualifying",
            SessionKind::Race => "Race",
        }
    }

    /// Session names as published by OpenF1. The sprint qualifying session
    /// was called "Sprint Shootout" in 2023.
    pub fn api_names(&self) -> &'static [&'static str] {
        match self {
            SessionKind::Practice1 => &["Practice 1"],
            SessionKind::Practice2 => &["Practice 2"],
            SessionKind::Practice3 => &["Practice 3"],
            SessionKind::SprintQualifying => &["Sprint Qualifying", "Sprint Shootout"],
            SessionKind::Sprint => &["Sprint"],
            SessionKind::Qualifying => &["Qualifying"],
            SessionKind::Race => &["Race"],
        }
    }

    /// The fastest lap of these sessions decides a starting grid.
    pub fn is_qualifying(&self) -> bool {
        matches!(self, SessionKind::Qualifying | SessionKind::SprintQualifying)
    }
}

impl FromStr for SessionKind {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        let normalized: String = s
            .trim()
            .to_ascii_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect();

        match normalized.as_str() {
            "FP1" | "PRACTICE1" => Ok(SessionKind::Practice1),
            "FP2" | "PRACTICE2" => Ok(SessionKind::Practice2),
            "FP3" | "PRACTICE3" => Ok(SessionKind::Practice3),
            "SQ" | "SPRINTQUALIFYING" | "SPRINTSHOOTOUT" | "SS" => {
                Ok(SessionKind::SprintQualifying)
            }
            "S" | "SPRINT" => Ok(SessionKind::Sprint),
            "Q" | "QUALIFYING" | "QUALI" => Ok(SessionKind::Qualifying),
            "R" | "RACE" => Ok(SessionKind::Race),
            _ => Err(AppError::InvalidSessionType(s.to_string())),
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
