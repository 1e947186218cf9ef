//! Axis ranges with round tick steps.

/// A linear axis from `min` to `max` with ticks every `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Round a raw step to 1, 2, 2.5 or 5 times a power of ten.
pub fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 2.5 {
        2.5
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

impl Axis {
    /// Smallest axis with round bounds that covers `lo..=hi` using about
    /// `target_ticks` intervals.
    pub fn covering(lo: f64, hi: f64, target_ticks: usize) -> Self {
        let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        if !lo.is_finite() || !hi.is_finite() {
            lo = 0.0;
            hi = 1.0;
        }
        if (hi - lo).abs() < f64::EPSILON {
            if lo == 0.0 {
                hi = 1.0;
            } else {
                let pad = lo.abs() * 0.1;
                lo -= pad;
                hi += pad;
            }
        }

        let step = nice_step((hi - lo) / target_ticks.max(1) as f64);
        Self {
            min: (lo / step).floor() * step,
            max: (hi / step).ceil() * step,
            step,
        }
    }

    /// Axis starting at zero, for values that are never negative.
    pub fn from_zero(hi: f64, target_ticks: usize) -> Self {
        Self::covering(0.0, hi.max(0.0), target_ticks)
    }

    pub fn ticks(&self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round() as usize;
        (0..=count)
            .map(|i| self.min + i as f64 * self.step)
            .collect()
    }

    /// Map a value onto the pixel span `from..to`.
    pub fn project(&self, value: f64, from: f32, to: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return from;
        }
        let t = ((value - self.min) / span).clamp(0.0, 1.0);
        from + (to - from) * t as f32
    }

    /// Decimals needed to print tick labels without noise.
    pub fn label_decimals(&self) -> usize {
        (0..6)
            .find(|d| {
                let scaled = self.step * 10f64.powi(*d as i32);
                (scaled - scaled.round()).abs() < 1e-6
            })
            .unwrap_or(6)
    }

    pub fn format_tick(&self, value: f64) -> String {
        format!("{:.*}", self.label_decimals(), value)
    }
}
