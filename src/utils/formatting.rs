//! Formatting utilities used for CLI outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Parse "VER,PER" (or "VER PER") into two driver identifiers.
pub fn parse_driver_pair(input: &str) -> Option<(String, String)> {
    let parts: Vec<String> = input
        .split([',', ' ', ':'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .collect();

    match parts.as_slice() {
        [a, b] => Some((a.clone(), b.clone())),
        _ => None,
    }
}
