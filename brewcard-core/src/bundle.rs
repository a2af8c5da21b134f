//! Finalized layout handed to the render/export collaborator.

use serde::{Deserialize, Serialize};

use crate::card::{CardContent, CardTheme};
use crate::catalog::{FilterName, FilterProfile};
use crate::composition::CompositionId;
use crate::geometry::{Position, Size};
use crate::BrewResult;

/// Everything a renderer needs to flatten a composition, in export-canvas
/// pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    /// Composition this bundle was finalized from.
    pub composition_id: CompositionId,
    /// Source photo.
    pub photo_uri: String,
    /// Export canvas size.
    pub canvas_size: Size,
    /// Top-left of the card container inside the canvas (the frame border).
    pub container_origin: Position,
    /// Card container size.
    pub container_size: Size,
    /// Card position, relative to the container.
    pub position: Position,
    /// Card footprint.
    pub card_size: Size,
    /// Preview-to-export scale factor that was applied.
    pub scale_factor: f32,
    /// Active filter.
    pub filter: FilterName,
    /// Profile of the active filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_profile: Option<FilterProfile>,
    /// Active frame id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
    /// Active frame asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_asset: Option<String>,
    /// Card colour scheme.
    pub card_theme: CardTheme,
    /// Card text, or `None` when the card is suppressed.
    pub card: Option<CardContent>,
}

impl ExportBundle {
    /// Card top-left in canvas coordinates.
    #[must_use]
    pub fn card_origin_in_canvas(&self) -> Position {
        Position::new(
            self.container_origin.x + self.position.x,
            self.container_origin.y + self.position.y,
        )
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> BrewResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a bundle.
    pub fn from_json(json: &str) -> BrewResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
