//! Knob, fader and stepper controls built on [`QuantizedRange`].
//!
//! Each control keeps the last value it reported and only reports again when
//! the quantized value actually changes, so a host can tie a haptic tick to
//! every `Some(_)` it receives.

use std::time::Duration;

use crate::config::StationConfig;
use crate::quantize::{HoldRepeat, QuantizedRange, StepDirection, Travel};
use crate::BrewResult;

/// Degrees of knob rotation per pixel of vertical drag.
pub const KNOB_SENSITIVITY: f32 = 1.5;

/// Fader knob width in pixels.
pub const FADER_KNOB_SIZE: f32 = 28.0;

/// Rotary knob driven by vertical drags. Dragging up turns clockwise.
#[derive(Debug, Clone)]
pub struct RotaryKnob {
    range: QuantizedRange,
    value: f32,
    rotation: f32,
    sensitivity: f32,
    drag_start: Option<f32>,
}

impl RotaryKnob {
    /// Create a knob showing `value`.
    #[must_use]
    pub fn new(range: QuantizedRange, value: f32) -> Self {
        let value = range.snap(value);
        Self {
            range,
            value,
            rotation: range.value_to_signal(value, Travel::ROTARY),
            sensitivity: KNOB_SENSITIVITY,
            drag_start: None,
        }
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Current indicator rotation in degrees.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Begin a drag.
    pub fn begin_drag(&mut self) {
        self.drag_start = Some(self.range.value_to_signal(self.value, Travel::ROTARY));
    }

    /// Feed the cumulative vertical translation of the drag.
    ///
    /// Returns the new value when it changed.
    pub fn drag(&mut self, translation_y: f32) -> Option<f32> {
        let start = self.drag_start?;
        if !translation_y.is_finite() {
            return None;
        }
        self.rotation = Travel::ROTARY.clamp(start - translation_y * self.sensitivity);
        let next = self.range.continuous_to_value(self.rotation, Travel::ROTARY);
        self.report(next)
    }

    /// End the drag, snapping the indicator onto the committed value.
    pub fn end_drag(&mut self) -> f32 {
        self.drag_start = None;
        self.rotation = self.range.value_to_signal(self.value, Travel::ROTARY);
        self.value
    }

    /// Display text such as `18.0g`.
    #[must_use]
    pub fn display(&self, unit: &str) -> String {
        format!("{}{unit}", self.range.format_value(self.value))
    }

    fn report(&mut self, next: f32) -> Option<f32> {
        if (next - self.value).abs() > f32::EPSILON {
            self.value = next;
            Some(next)
        } else {
            None
        }
    }
}

/// Horizontal fader. Travel is the measured track width minus the knob.
#[derive(Debug, Clone)]
pub struct FaderSlider {
    range: QuantizedRange,
    value: f32,
    track_width: f32,
    knob_size: f32,
    knob_offset: f32,
    drag_start: Option<f32>,
}

impl FaderSlider {
    /// Create a fader on a track `track_width` pixels wide.
    #[must_use]
    pub fn new(range: QuantizedRange, value: f32, track_width: f32) -> Self {
        let mut fader = Self {
            range,
            value: range.snap(value),
            track_width,
            knob_size: FADER_KNOB_SIZE,
            knob_offset: 0.0,
            drag_start: None,
        };
        fader.knob_offset = fader.offset_for(fader.value);
        fader
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Knob offset from the left of the track.
    #[must_use]
    pub const fn knob_offset(&self) -> f32 {
        self.knob_offset
    }

    /// Width of the filled part of the track.
    #[must_use]
    pub fn fill_width(&self) -> f32 {
        self.knob_offset + self.knob_size / 2.0
    }

    /// Value as a whole percentage of the range.
    #[must_use]
    pub fn percentage(&self) -> i32 {
        self.range.percentage(self.value)
    }

    /// The track was re-measured.
    pub fn set_track_width(&mut self, track_width: f32) {
        self.track_width = track_width;
        self.knob_offset = self.offset_for(self.value);
    }

    /// Begin a drag.
    pub fn begin_drag(&mut self) {
        self.drag_start = Some(self.offset_for(self.value));
    }

    /// Feed the cumulative horizontal translation. Returns the new value
    /// when it changed.
    pub fn drag(&mut self, translation_x: f32) -> Option<f32> {
        let start = self.drag_start?;
        if !translation_x.is_finite() {
            return None;
        }
        let travel = self.travel();
        self.knob_offset = travel.clamp(start + translation_x);
        let next = self.range.continuous_to_value(self.knob_offset, travel);
        if (next - self.value).abs() > f32::EPSILON {
            self.value = next;
            Some(next)
        } else {
            None
        }
    }

    /// End the drag, snapping the knob onto the committed value.
    pub fn end_drag(&mut self) -> f32 {
        self.drag_start = None;
        self.knob_offset = self.offset_for(self.value);
        self.value
    }

    fn travel(&self) -> Travel {
        Travel::linear(self.track_width - self.knob_size)
    }

    fn offset_for(&self, value: f32) -> f32 {
        self.range.value_to_signal(value, self.travel())
    }
}

/// Plus/minus stepper with hold-to-repeat and typed entry.
#[derive(Debug, Clone)]
pub struct NumericStepper {
    range: QuantizedRange,
    value: f32,
    hold_delay: Duration,
    repeat_interval: Duration,
    held: Option<(StepDirection, HoldRepeat)>,
}

impl NumericStepper {
    /// Create a stepper showing `value`.
    #[must_use]
    pub fn new(range: QuantizedRange, value: f32) -> Self {
        Self {
            range,
            value: range.snap(value),
            hold_delay: crate::quantize::DEFAULT_HOLD_DELAY,
            repeat_interval: crate::quantize::DEFAULT_REPEAT_INTERVAL,
            held: None,
        }
    }

    /// Create a stepper using the station's hold-to-repeat timing.
    #[must_use]
    pub fn from_config(range: QuantizedRange, value: f32, config: &StationConfig) -> Self {
        Self::new(range, value).with_repeat(config.hold_delay(), config.repeat_interval())
    }

    /// Override the hold-to-repeat timing.
    #[must_use]
    pub fn with_repeat(mut self, hold_delay: Duration, repeat_interval: Duration) -> Self {
        self.hold_delay = hold_delay;
        self.repeat_interval = repeat_interval;
        self
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Whether a button is held.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held.is_some()
    }

    /// Single tap. Returns the new value when it changed.
    pub fn tap(&mut self, direction: StepDirection) -> Option<f32> {
        let next = self.range.step(direction, self.value);
        if (next - self.value).abs() > f32::EPSILON {
            self.value = next;
            Some(next)
        } else {
            None
        }
    }

    /// Button pressed: steps once and arms the repeat schedule.
    pub fn press(&mut self, direction: StepDirection) -> Option<f32> {
        self.held = Some((
            direction,
            HoldRepeat::new(self.hold_delay, self.repeat_interval),
        ));
        self.tap(direction)
    }

    /// Advance the held button to `elapsed` since the press and apply any
    /// repeats that fell due. Returns the value when it changed.
    pub fn tick(&mut self, elapsed: Duration) -> Option<f32> {
        let (direction, due) = match self.held.as_mut() {
            Some((direction, hold)) => (*direction, hold.advance(elapsed)),
            None => return None,
        };
        let before = self.value;
        for _ in 0..due {
            if self.tap(direction).is_none() {
                break;
            }
        }
        ((self.value - before).abs() > f32::EPSILON).then_some(self.value)
    }

    /// Button released.
    pub fn release(&mut self) {
        self.held = None;
    }

    /// Text shown when entering edit mode.
    #[must_use]
    pub fn edit_text(&self) -> String {
        self.range.format_value(self.value)
    }

    /// Commit typed text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BrewError::InvalidNumericInput`] for non-numeric text;
    /// the value is left unchanged.
    pub fn submit_text(&mut self, text: &str) -> BrewResult<f32> {
        match self.range.parse_typed_value(text) {
            Ok(v) => {
                self.value = v;
                Ok(v)
            }
            Err(e) => {
                tracing::debug!("Rejected typed value: {e}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> QuantizedRange {
        QuantizedRange::new(30.0, 500.0, 5.0).expect("range")
    }

    #[test]
    fn test_knob_drag_up_increases() {
        let range = QuantizedRange::new(5.0, 50.0, 0.5).expect("range");
        let mut knob = RotaryKnob::new(range, 18.0);
        knob.begin_drag();
        let changed = knob.drag(-20.0).expect("value changes");
        assert!(changed > 18.0);
        assert_eq!(knob.drag(-20.0), None);
    }

    #[test]
    fn test_knob_saturates() {
        let mut knob = RotaryKnob::new(water(), 270.0);
        knob.begin_drag();
        knob.drag(-10_000.0);
        assert_eq!(knob.value(), 500.0);
        assert_eq!(knob.rotation(), 135.0);
        knob.drag(10_000.0);
        assert_eq!(knob.value(), 30.0);
        assert_eq!(knob.end_drag(), 30.0);
        assert_eq!(knob.rotation(), -135.0);
    }

    #[test]
    fn test_knob_ignores_drag_without_begin() {
        let mut knob = RotaryKnob::new(water(), 270.0);
        assert_eq!(knob.drag(-50.0), None);
        assert_eq!(knob.display("g"), "270g");
    }

    #[test]
    fn test_fader_track_edges() {
        let range = QuantizedRange::new(0.0, 100.0, 1.0).expect("range");
        let mut fader = FaderSlider::new(range, 0.0, 228.0);
        assert_eq!(fader.knob_offset(), 0.0);

        fader.begin_drag();
        assert_eq!(fader.drag(100.0), Some(50.0));
        assert_eq!(fader.drag(5_000.0), Some(100.0));
        assert_eq!(fader.knob_offset(), 200.0);
        assert_eq!(fader.fill_width(), 214.0);
        assert_eq!(fader.percentage(), 100);
    }

    #[test]
    fn test_fader_narrow_track_pins_to_min() {
        let range = QuantizedRange::new(0.0, 10.0, 1.0).expect("range");
        let mut fader = FaderSlider::new(range, 5.0, 20.0);
        fader.begin_drag();
        assert_eq!(fader.drag(50.0), Some(0.0));
    }

    #[test]
    fn test_stepper_hold_repeats_until_max() {
        let temp = QuantizedRange::new(80.0, 100.0, 1.0).expect("range");
        let mut stepper = NumericStepper::new(temp, 97.0);

        assert_eq!(stepper.press(StepDirection::Increment), Some(98.0));
        assert_eq!(stepper.tick(Duration::from_millis(300)), None);
        assert_eq!(stepper.tick(Duration::from_millis(480)), Some(99.0));
        assert_eq!(stepper.tick(Duration::from_millis(2_000)), Some(100.0));
        assert_eq!(stepper.tick(Duration::from_millis(3_000)), None);

        stepper.release();
        assert!(!stepper.is_held());
        assert_eq!(stepper.tick(Duration::from_millis(4_000)), None);
    }

    #[test]
    fn test_stepper_uses_configured_timing() {
        let config = StationConfig::from_json(r#"{"hold_delay_ms": 100, "repeat_interval_ms": 50}"#)
            .expect("config");
        let mut quick = NumericStepper::from_config(water(), 100.0, &config);
        let mut stock = NumericStepper::from_config(water(), 100.0, &StationConfig::default());

        quick.press(StepDirection::Increment);
        stock.press(StepDirection::Increment);
        assert_eq!(quick.tick(Duration::from_millis(150)), Some(110.0));
        assert_eq!(stock.tick(Duration::from_millis(150)), None);
        assert_eq!(quick.tick(Duration::from_millis(300)), Some(125.0));
    }

    #[test]
    fn test_stepper_bad_text_keeps_value() {
        let temp = QuantizedRange::new(80.0, 100.0, 1.0).expect("range");
        let mut stepper = NumericStepper::new(temp, 93.0);
        assert!(stepper.submit_text("hot").is_err());
        assert_eq!(stepper.value(), 93.0);
        assert_eq!(stepper.submit_text("95.4").expect("submit"), 95.0);
        assert_eq!(stepper.edit_text(), "95");
    }
}
