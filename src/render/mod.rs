//! Chart data model and renderers.
//!
//! The analysis hands over plain data (labels and values for the gap
//! chart, x/y series for the speed chart); a `ChartRenderer` turns it into
//! file bytes. Files are only written once every chart has rendered.

pub mod pdf;
mod pdf_charts;
pub mod scale;

pub use pdf_charts::PdfChartRenderer;

use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse "3671C6" or "#3671C6".
    pub fn from_hex(hex: &str) -> Option<Self> {
        let h = hex.trim().trim_start_matches('#');
        if h.len() != 6 || !h.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub(crate) fn unit(&self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

/// Colours used when the session has no team colour for a series.
pub const PALETTE: [Rgb; 6] = [
    Rgb(31, 119, 180),
    Rgb(255, 127, 14),
    Rgb(44, 160, 44),
    Rgb(214, 39, 40),
    Rgb(148, 103, 189),
    Rgb(140, 86, 75),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: Option<Rgb>,
}

/// Categorical chart: one bar per label.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn labels(&self) -> Vec<&str> {
        self.bars.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.value).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: Option<Rgb>,
}

/// Overlaid x/y series sharing both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<LineSeries>,
}

pub trait ChartRenderer {
    /// File extension of the produced documents, without the dot.
    fn extension(&self) -> &'static str;

    fn render_bar_chart(&self, chart: &BarChart) -> AppResult<Vec<u8>>;

    fn render_line_chart(&self, chart: &LineChart) -> AppResult<Vec<u8>>;
}

/// A rendered chart waiting to be written.
#[derive(Debug, Clone)]
pub struct ChartArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ChartArtifact {
    pub fn new(stem: &str, extension: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format!("{stem}.{extension}"),
            bytes,
        }
    }
}

/// Write every artifact into `dir`. All targets are checked before the
/// first file is written, so a refused overwrite leaves nothing behind.
/// Charts are staged as hidden temp files and renamed into place once all
/// of them are on disk; a failure removes whatever this call wrote.
pub fn write_artifacts(
    dir: &Path,
    artifacts: &[ChartArtifact],
    force: bool,
) -> AppResult<Vec<PathBuf>> {
    if artifacts.is_empty() {
        return Err(AppError::Render("nothing to write".to_string()));
    }

    fs::create_dir_all(dir)?;

    let paths: Vec<PathBuf> = artifacts.iter().map(|a| dir.join(&a.file_name)).collect();
    for path in &paths {
        ensure_writable(path, force)?;
    }

    let mut staged: Vec<PathBuf> = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let tmp = dir.join(format!(".{}.tmp", artifact.file_name));
        if let Err(e) = fs::write(&tmp, &artifact.bytes) {
            fs::remove_file(&tmp).ok();
            remove_all(&staged);
            return Err(e.into());
        }
        staged.push(tmp);
    }

    for (i, (tmp, path)) in staged.iter().zip(&paths).enumerate() {
        if let Err(e) = fs::rename(tmp, path) {
            remove_all(&paths[..i]);
            remove_all(&staged[i..]);
            return Err(e.into());
        }
    }

    Ok(paths)
}

fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        fs::remove_file(path).ok();
    }
}
