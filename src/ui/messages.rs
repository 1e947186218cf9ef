//! Console messages shown to the user, one icon and colour per kind.

use ansi_term::{Colour, Style};
use std::fmt;

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

fn tag(colour: Colour, icon: &str) -> String {
    Style::new().bold().fg(colour).paint(icon).to_string()
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Blue, ICON_INFO), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Green, ICON_OK), msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Yellow, ICON_WARN), msg);
}

/// Goes to stderr.
pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", tag(Colour::Red, ICON_ERR), msg);
}

/// Section header above a table.
pub fn header<T: fmt::Display>(msg: T) {
    let rule = "=".repeat(22);
    println!(
        "{}\n",
        Style::new().bold().fg(Colour::Blue).paint(format!("{rule} {msg}"))
    );
}
