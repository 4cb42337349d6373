//! Slider range and step grid.

use serde::Serialize;

const GRID_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SliderRange {
    /// Browser defaults for `<input type="range">`.
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
        }
    }
}

impl SliderRange {
    /// Read `min`/`max`/`step`, falling back to the defaults for missing or
    /// unparsable values. An inverted range collapses to `min`.
    pub fn from_attrs(min: Option<&str>, max: Option<&str>, step: Option<&str>) -> Self {
        let d = Self::default();
        let parse = |v: Option<&str>, fallback: f64| {
            v.and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|n| n.is_finite())
                .unwrap_or(fallback)
        };
        let min = parse(min, d.min);
        let max = parse(max, d.max).max(min);
        let step = parse(step, d.step);
        Self { min, max, step }
    }

    /// Highest point on the step grid that fits the range. Equals `max`
    /// when the span is a whole number of steps.
    pub fn top(&self) -> f64 {
        if self.step <= 0.0 {
            return self.max;
        }
        // tolerance keeps 0.3 / 0.1 at three steps
        let steps = ((self.max - self.min) / self.step + GRID_EPSILON).floor();
        (self.min + steps * self.step).min(self.max)
    }

    /// Nearest point on the step grid (ties to even), kept within
    /// `min..=top`. A non-positive step only clamps to `min..=max`.
    pub fn quantize(&self, raw: f64) -> f64 {
        if self.step <= 0.0 {
            return raw.clamp(self.min, self.max);
        }
        let steps = ((raw - self.min) / self.step).round_ties_even();
        (self.min + steps * self.step).clamp(self.min, self.top())
    }

    /// Value a slider starts at: the markup `value` or `min`, quantized.
    pub fn initial(&self, value: Option<f64>) -> f64 {
        self.quantize(value.unwrap_or(self.min))
    }
}
