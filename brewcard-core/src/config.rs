//! Station layout and interaction configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::card::{CardPresentation, CardTheme};
use crate::catalog::FilterName;
use crate::drag::DEFAULT_LIFT_SCALE;
use crate::geometry::{Position, Size};
use crate::{BrewError, BrewResult};

/// Tunables for a composition screen.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Card footprint on the preview canvas.
    pub card_size: Size,
    /// Where a fresh card sits on the preview canvas.
    pub initial_card_position: Position,
    /// Border consumed by a frame on every side, in preview pixels.
    pub frame_border_inset: f32,
    /// Scale applied to the card while it is held.
    pub lift_scale: f32,
    /// Filter selected when a composition is created.
    pub default_filter: FilterName,
    /// Card theme selected when a composition is created.
    pub default_card_theme: CardTheme,
    /// Flavor separator variant.
    pub presentation: CardPresentation,
    /// Delay before a held stepper repeats.
    pub hold_delay_ms: u64,
    /// Stepper repeat interval.
    pub repeat_interval_ms: u64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            card_size: Size::new(200.0, 150.0),
            initial_card_position: Position::new(8.0, 80.0),
            frame_border_inset: 16.0,
            lift_scale: DEFAULT_LIFT_SCALE,
            default_filter: FilterName::CoralHaze,
            default_card_theme: CardTheme::Light,
            presentation: CardPresentation::Station,
            hold_delay_ms: 400,
            repeat_interval_ms: 80,
        }
    }
}

impl StationConfig {
    /// Parse and validate from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is unusable.
    pub fn from_json(json: &str) -> BrewResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_json_file(path: impl AsRef<Path>) -> BrewResult<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading station config from {}", path.display());
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Check values that would break clamping or scaling.
    ///
    /// # Errors
    ///
    /// Returns [`BrewError::Config`] describing the first bad value.
    pub fn validate(&self) -> BrewResult<()> {
        if self.card_size.is_degenerate() {
            return Err(BrewError::Config(format!(
                "card_size must be positive, got {:?}",
                self.card_size
            )));
        }
        if !self.initial_card_position.is_finite() {
            return Err(BrewError::Config("initial_card_position must be finite".into()));
        }
        if !self.frame_border_inset.is_finite() || self.frame_border_inset < 0.0 {
            return Err(BrewError::Config(format!(
                "frame_border_inset must be >= 0, got {}",
                self.frame_border_inset
            )));
        }
        if !self.lift_scale.is_finite() || self.lift_scale <= 0.0 {
            return Err(BrewError::Config(format!(
                "lift_scale must be > 0, got {}",
                self.lift_scale
            )));
        }
        if self.repeat_interval_ms == 0 {
            return Err(BrewError::Config("repeat_interval_ms must be > 0".into()));
        }
        Ok(())
    }

    /// Hold delay as a duration.
    #[must_use]
    pub const fn hold_delay(&self) -> Duration {
        Duration::from_millis(self.hold_delay_ms)
    }

    /// Repeat interval as a duration.
    #[must_use]
    pub const fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_interval_ms)
    }
}
