//! Recipe metadata carried between screens.

use serde::{Deserialize, Serialize};

use crate::BrewResult;

/// Highest star rating.
pub const MAX_RATING: u8 = 5;

/// Brew attributes entered by the user. Empty strings mean "not set".
///
/// The JSON form uses camelCase keys and every key is optional, so partial
/// payloads from older screens still parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeFields {
    /// Coffee name.
    pub coffee_name: String,
    /// Roaster.
    pub roaster: String,
    /// Origin.
    pub origin: String,
    /// Dose in grams.
    pub dose: String,
    /// Water in grams.
    pub water: String,
    /// Ratio as typed, e.g. `1:15`.
    pub ratio: String,
    /// Grind size.
    pub grind_size: String,
    /// Water temperature in °C.
    pub temperature: String,
    /// Brew time, e.g. `3:30`.
    pub brew_time: String,
    /// Brew method.
    pub brew_method: String,
    /// Flavor notes in entry order.
    pub flavor_notes: Vec<String>,
    /// Star rating, 0 to 5.
    pub rating: u8,
}

impl RecipeFields {
    /// Parse the serialized payload handed over by the form screens.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid JSON.
    pub fn from_payload(json: &str) -> BrewResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize for hand-off to the next screen.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_payload(&self) -> BrewResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether a card should be drawn at all.
    #[must_use]
    pub fn has_card_content(&self) -> bool {
        is_set(&self.coffee_name) || is_set(&self.dose) || is_set(&self.brew_method)
    }

    /// Rating clamped to [`MAX_RATING`].
    #[must_use]
    pub fn clamped_rating(&self) -> u8 {
        self.rating.min(MAX_RATING)
    }

    /// Ratio derived from dose and water, e.g. `1:15.0`.
    ///
    /// `None` when either value is missing, unparsable or the dose is not
    /// positive.
    #[must_use]
    pub fn computed_ratio(&self) -> Option<String> {
        computed_ratio(&self.dose, &self.water)
    }
}

/// Format `water / dose` as `1:{ratio:.1}`.
#[must_use]
pub fn computed_ratio(dose: &str, water: &str) -> Option<String> {
    let dose: f32 = dose.trim().parse().ok()?;
    let water: f32 = water.trim().parse().ok()?;
    if !(dose.is_finite() && water.is_finite()) || dose <= 0.0 {
        return None;
    }
    Some(format!("1:{:.1}", water / dose))
}

pub(crate) fn is_set(value: &str) -> bool {
    !value.trim().is_empty()
}
