//! Session files: a saved station screen as JSON.

use std::path::Path;
use std::sync::Arc;

use brewcard_core::{
    BrewResult, CardTheme, Catalogs, CompositionModel, FilterName, Position, RecipeFields, Size,
    StationConfig,
};
use serde::{Deserialize, Serialize};

/// Everything needed to rebuild a composition outside the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
    /// Photo URI.
    pub photo_uri: String,
    /// Recipe entered on the form screens.
    #[serde(default)]
    pub recipe: RecipeFields,
    /// Selected filter.
    #[serde(default)]
    pub filter: FilterName,
    /// Selected frame.
    #[serde(default)]
    pub frame_id: Option<String>,
    /// Card colour scheme.
    #[serde(default)]
    pub card_theme: CardTheme,
    /// Card position on the preview, if the user moved it.
    #[serde(default)]
    pub card_position: Option<Position>,
    /// Measured preview canvas.
    pub preview: Size,
}

impl SessionFile {
    /// Parse a session from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a session.
    pub fn from_json(json: &str) -> BrewResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a session from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> BrewResult<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading session from {}", path.display());
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Rebuild the composition the session describes.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty photo URI or an unknown filter/frame.
    pub fn to_composition(
        &self,
        config: StationConfig,
        catalogs: Arc<Catalogs>,
    ) -> BrewResult<CompositionModel> {
        let mut model = CompositionModel::new(self.preview, config, catalogs);
        model.load_photo(self.photo_uri.clone())?;
        model.set_filter(self.filter)?;
        model.set_frame(self.frame_id.as_deref())?;
        model.set_card_theme(self.card_theme)?;
        if let Some(position) = self.card_position {
            model.commit_card_position(position)?;
        }
        Ok(model)
    }
}
