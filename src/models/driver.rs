use serde::{Deserialize, Serialize};

/// A driver entered in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverInfo {
    pub driver_number: u32,
    /// Three-letter identifier, e.g. "VER".
    pub abbreviation: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub team: String,
    /// Hex colour without '#', e.g. "3671C6".
    #[serde(default)]
    pub team_colour: Option<String>,
}
