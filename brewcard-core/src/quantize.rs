//! Stepped numeric scales shared by knobs, faders and steppers.
//!
//! A [`QuantizedRange`] owns the `min`/`max`/`step` rules. A [`Travel`]
//! describes the physical range of the gesture that drives it (degrees of
//! knob rotation, pixels of fader track). Every value a range hands back is
//! `min + k * step` for some integer `k` and lies within `[min, max]`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{BrewError, BrewResult};

/// Delay before a held stepper button starts repeating.
pub const DEFAULT_HOLD_DELAY: Duration = Duration::from_millis(400);

/// Interval between repeats while a stepper button stays held.
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(80);

/// Slack when counting whole steps in `max - min`.
const STEP_EPSILON: f32 = 1e-3;

/// Direction of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepDirection {
    /// Towards `max`.
    Increment,
    /// Towards `min`.
    Decrement,
}

impl StepDirection {
    /// `+1.0` or `-1.0`.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Increment => 1.0,
            Self::Decrement => -1.0,
        }
    }
}

/// A bounded, stepped numeric scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantizedRange {
    min: f32,
    max: f32,
    step: f32,
}

impl QuantizedRange {
    /// Create a range.
    ///
    /// # Errors
    ///
    /// Returns [`BrewError::InvalidRange`] unless all values are finite,
    /// `min <= max` and `step > 0`.
    pub fn new(min: f32, max: f32, step: f32) -> BrewResult<Self> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(BrewError::InvalidRange(format!(
                "non-finite bounds {min}..{max} step {step}"
            )));
        }
        if min > max {
            return Err(BrewError::InvalidRange(format!("min {min} > max {max}")));
        }
        if step <= 0.0 {
            return Err(BrewError::InvalidRange(format!("step {step} must be positive")));
        }
        Ok(Self { min, max, step })
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Step size.
    #[must_use]
    pub const fn step_size(&self) -> f32 {
        self.step
    }

    /// Number of whole steps that fit between `min` and `max`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn steps(&self) -> u32 {
        ((self.max - self.min) / self.step + STEP_EPSILON).floor() as u32
    }

    /// Snap any value onto the grid, inside the bounds.
    ///
    /// NaN snaps to `min`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn snap(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        let max_k = self.steps() as f32;
        let k = ((value - self.min) / self.step).round().clamp(0.0, max_k);
        (self.min + k * self.step).clamp(self.min, self.max)
    }

    /// Map a gesture signal onto the scale.
    ///
    /// The signal is clamped to `travel` first, so overdrags saturate at the
    /// ends instead of wrapping.
    #[must_use]
    pub fn continuous_to_value(&self, signal: f32, travel: Travel) -> f32 {
        let normalized = travel.normalize(signal);
        self.snap(self.min + normalized * (self.max - self.min))
    }

    /// Where on `travel` a value sits. Inverse of
    /// [`QuantizedRange::continuous_to_value`] for on-grid values.
    #[must_use]
    pub fn value_to_signal(&self, value: f32, travel: Travel) -> f32 {
        let span = self.max - self.min;
        let normalized = if span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        travel.denormalize(normalized)
    }

    /// One step from `current`, clamped to the bounds.
    #[must_use]
    pub fn step(&self, direction: StepDirection, current: f32) -> f32 {
        self.snap(current + direction.sign() * self.step)
    }

    /// Parse free-form typed text into an on-grid value.
    ///
    /// # Errors
    ///
    /// Returns [`BrewError::InvalidNumericInput`] when the text is not a
    /// finite number. Callers keep their previous value in that case.
    pub fn parse_typed_value(&self, text: &str) -> BrewResult<f32> {
        let trimmed = text.trim();
        match trimmed.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(self.snap(v.clamp(self.min, self.max))),
            _ => Err(BrewError::InvalidNumericInput(text.to_string())),
        }
    }

    /// Display string: one decimal for fractional steps, integer otherwise.
    #[must_use]
    pub fn format_value(&self, value: f32) -> String {
        if self.step < 1.0 {
            format!("{value:.1}")
        } else {
            format!("{value:.0}")
        }
    }

    /// Fraction of the way from `min` to `max`, as a whole percentage.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn percentage(&self, value: f32) -> i32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0;
        }
        (((value - self.min) / span) * 100.0).round() as i32
    }
}

/// Physical range of a control gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Travel {
    /// Signal at `min`.
    pub start: f32,
    /// Signal at `max`.
    pub end: f32,
}

impl Travel {
    /// A 270° knob sweep, from -135° to 135°.
    pub const ROTARY: Self = Self {
        start: -135.0,
        end: 135.0,
    };

    /// Create a travel range.
    #[must_use]
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Linear travel from 0 to `length` (fader track). Negative lengths
    /// collapse to zero travel.
    #[must_use]
    pub fn linear(length: f32) -> Self {
        Self::new(0.0, if length.is_finite() { length.max(0.0) } else { 0.0 })
    }

    /// Length of the travel.
    #[must_use]
    pub fn span(&self) -> f32 {
        self.end - self.start
    }

    /// Clamp a signal onto the travel.
    #[must_use]
    pub fn clamp(&self, signal: f32) -> f32 {
        if signal.is_nan() || self.span() <= 0.0 || !self.span().is_finite() {
            return self.start;
        }
        signal.clamp(self.start, self.end)
    }

    /// Map a signal into `[0, 1]`. Zero-length travel maps to 0.
    #[must_use]
    pub fn normalize(&self, signal: f32) -> f32 {
        let span = self.span();
        if span <= 0.0 || !span.is_finite() {
            return 0.0;
        }
        (self.clamp(signal) - self.start) / span
    }

    /// Map `[0, 1]` back onto the travel.
    #[must_use]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.start + normalized.clamp(0.0, 1.0) * self.span().max(0.0)
    }
}

/// Auto-repeat schedule for a held stepper button.
///
/// Fires once on press, then again at `delay + interval`, `delay + 2 *
/// interval`, ... until released. Time is supplied by the caller as the
/// elapsed duration since the press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldRepeat {
    delay: Duration,
    interval: Duration,
    fired: u32,
}

impl HoldRepeat {
    /// Create a schedule. The press itself counts as the first fire.
    #[must_use]
    pub fn new(delay: Duration, interval: Duration) -> Self {
        Self {
            delay,
            interval,
            fired: 1,
        }
    }

    /// Total fires so far, including the press.
    #[must_use]
    pub const fn fired(&self) -> u32 {
        self.fired
    }

    /// Number of new fires due at `elapsed` since the press.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let due = self.total_due(elapsed);
        let new = due.saturating_sub(self.fired);
        self.fired = self.fired.max(due);
        new
    }

    fn total_due(&self, elapsed: Duration) -> u32 {
        if self.interval.is_zero() || elapsed < self.delay + self.interval {
            return 1;
        }
        let repeats = (elapsed - self.delay).as_millis() / self.interval.as_millis().max(1);
        1 + u32::try_from(repeats).unwrap_or(u32::MAX - 1)
    }
}

impl Default for HoldRepeat {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_DELAY, DEFAULT_REPEAT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dose() -> QuantizedRange {
        QuantizedRange::new(5.0, 50.0, 0.5).expect("range")
    }

    #[test]
    fn test_rejects_bad_ranges() {
        assert!(QuantizedRange::new(10.0, 5.0, 1.0).is_err());
        assert!(QuantizedRange::new(0.0, 5.0, 0.0).is_err());
        assert!(QuantizedRange::new(0.0, f32::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_rotary_extremes_saturate() {
        let range = dose();
        assert_eq!(range.continuous_to_value(-500.0, Travel::ROTARY), 5.0);
        assert_eq!(range.continuous_to_value(500.0, Travel::ROTARY), 50.0);
        assert_eq!(range.continuous_to_value(0.0, Travel::ROTARY), 27.5);
    }

    #[test]
    fn test_snap_rounds_to_nearest_step() {
        let water = QuantizedRange::new(30.0, 500.0, 5.0).expect("range");
        assert_eq!(water.snap(272.4), 270.0);
        assert_eq!(water.snap(272.6), 275.0);
        assert_eq!(water.snap(f32::NAN), 30.0);
    }

    #[test]
    fn test_uneven_range_never_exceeds_max() {
        let range = QuantizedRange::new(0.0, 10.0, 3.0).expect("range");
        assert_eq!(range.steps(), 3);
        assert_eq!(range.snap(10.0), 9.0);
        assert_eq!(range.step(StepDirection::Increment, 9.0), 9.0);
    }

    #[test]
    fn test_grid_anchored_at_min() {
        let range = QuantizedRange::new(5.0, 50.0, 2.0).expect("range");
        assert_eq!(range.snap(6.4), 7.0);
        assert_eq!(range.snap(8.2), 9.0);
        assert_eq!(range.step(StepDirection::Increment, 5.0), 7.0);
        assert_eq!(range.step(StepDirection::Decrement, 7.0), 5.0);
        assert_eq!(range.snap(50.0), 49.0);
        assert_eq!(range.continuous_to_value(135.0, Travel::ROTARY), 49.0);
    }

    #[test]
    fn test_step_clamps() {
        let temp = QuantizedRange::new(80.0, 100.0, 1.0).expect("range");
        assert_eq!(temp.step(StepDirection::Increment, 99.0), 100.0);
        assert_eq!(temp.step(StepDirection::Increment, 100.0), 100.0);
        assert_eq!(temp.step(StepDirection::Decrement, 80.0), 80.0);
    }

    #[test]
    fn test_parse_typed_value() {
        let range = dose();
        assert_eq!(range.parse_typed_value(" 18.3 ").expect("parse"), 18.5);
        assert_eq!(range.parse_typed_value("999").expect("parse"), 50.0);
        assert!(matches!(
            range.parse_typed_value("abc"),
            Err(BrewError::InvalidNumericInput(_))
        ));
        assert!(range.parse_typed_value("NaN").is_err());
        assert!(range.parse_typed_value("").is_err());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(dose().format_value(18.0), "18.0");
        let temp = QuantizedRange::new(80.0, 100.0, 1.0).expect("range");
        assert_eq!(temp.format_value(93.0), "93");
    }

    #[test]
    fn test_zero_travel_maps_to_min() {
        let range = dose();
        assert_eq!(range.continuous_to_value(12.0, Travel::linear(0.0)), 5.0);
    }

    #[test]
    fn test_hold_repeat_schedule() {
        let mut hold = HoldRepeat::default();
        assert_eq!(hold.advance(Duration::from_millis(100)), 0);
        assert_eq!(hold.advance(Duration::from_millis(479)), 0);
        assert_eq!(hold.advance(Duration::from_millis(480)), 1);
        assert_eq!(hold.advance(Duration::from_millis(720)), 3);
        assert_eq!(hold.fired(), 5);
        // Time going backwards never un-fires.
        assert_eq!(hold.advance(Duration::from_millis(10)), 0);
    }
}
