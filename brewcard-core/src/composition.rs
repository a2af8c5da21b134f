//! The layered composition: photo, filter, frame and data card.
//!
//! ```text
//! Empty ──load_photo──► PhotoLoaded ──┬─ set_filter      (styled)
//!                                     ├─ set_frame       (framed)
//!                                     └─ card drag/commit (card positioned)
//! ```
//!
//! The card may only sit inside the permitted container: the preview canvas,
//! shrunk by the frame border on every side while a frame is active. Any
//! change to that container re-clamps the committed card position.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bundle::ExportBundle;
use crate::card::{CardContent, CardContentFormatter, CardTheme};
use crate::catalog::{Catalogs, FilterName, FilterProfile, FrameAsset, Tint};
use crate::config::StationConfig;
use crate::drag::{BoundedDragController, DragOutcome};
use crate::event::TouchEvent;
use crate::geometry::{Offset, Position, Size};
use crate::recipe::RecipeFields;
use crate::scale::{self, CoordinateScaler};
use crate::{BrewError, BrewResult};

/// Unique identifier for a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositionId(Uuid);

impl CompositionId {
    /// Create a new unique composition ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CompositionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CompositionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a photo is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionStage {
    /// Nothing to style yet.
    Empty,
    /// Photo present; filter, frame and card operations are available.
    PhotoLoaded,
}

/// One visual layer, bottom to top.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    /// Base photo.
    Photo {
        /// Photo URI.
        uri: String,
    },
    /// Filter overlay.
    Filter {
        /// Filter name.
        name: FilterName,
        /// Overlay colour.
        tint: Option<Tint>,
        /// Whether scan lines are drawn.
        scan_lines: bool,
    },
    /// Decorative frame.
    Frame(FrameAsset),
    /// Data card.
    Card {
        /// Live position inside the container.
        position: Position,
        /// Card footprint.
        size: Size,
        /// Visual scale (lift while held).
        scale: f32,
        /// Colour scheme.
        theme: CardTheme,
    },
}

/// A single composition being edited on the station screen.
#[derive(Debug, Clone)]
pub struct CompositionModel {
    id: CompositionId,
    config: StationConfig,
    catalogs: Arc<Catalogs>,
    formatter: CardContentFormatter,
    preview_canvas: Size,
    photo_uri: Option<String>,
    filter: FilterName,
    frame: Option<FrameAsset>,
    card_theme: CardTheme,
    card: BoundedDragController,
    card_positioned: bool,
}

impl CompositionModel {
    /// Create an empty composition on a preview canvas.
    #[must_use]
    pub fn new(preview_canvas: Size, config: StationConfig, catalogs: Arc<Catalogs>) -> Self {
        let filter = if catalogs.filters.contains(config.default_filter) {
            config.default_filter
        } else {
            tracing::warn!(
                "Default filter {} missing from catalog, using none",
                config.default_filter
            );
            FilterName::None
        };
        let card = BoundedDragController::new(config.initial_card_position.clamp_within(
            preview_canvas,
            config.card_size,
        ))
        .with_lift_scale(config.lift_scale);

        Self {
            id: CompositionId::new(),
            formatter: CardContentFormatter::new(config.presentation),
            card_theme: config.default_card_theme,
            config,
            catalogs,
            preview_canvas,
            photo_uri: None,
            filter,
            frame: None,
            card,
            card_positioned: false,
        }
    }

    /// Create with the default config and built-in catalogs.
    #[must_use]
    pub fn with_defaults(preview_canvas: Size) -> Self {
        Self::new(
            preview_canvas,
            StationConfig::default(),
            Arc::new(Catalogs::builtin()),
        )
    }

    /// Composition identifier.
    #[must_use]
    pub const fn id(&self) -> CompositionId {
        self.id
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> CompositionStage {
        if self.photo_uri.is_some() {
            CompositionStage::PhotoLoaded
        } else {
            CompositionStage::Empty
        }
    }

    /// Loaded photo.
    #[must_use]
    pub fn photo_uri(&self) -> Option<&str> {
        self.photo_uri.as_deref()
    }

    /// Active filter.
    #[must_use]
    pub const fn filter(&self) -> FilterName {
        self.filter
    }

    /// Profile of the active filter.
    #[must_use]
    pub fn filter_profile(&self) -> Option<&FilterProfile> {
        self.catalogs.filters.get(self.filter)
    }

    /// Active frame.
    #[must_use]
    pub const fn frame(&self) -> Option<&FrameAsset> {
        self.frame.as_ref()
    }

    /// Card colour scheme.
    #[must_use]
    pub const fn card_theme(&self) -> CardTheme {
        self.card_theme
    }

    /// Preview canvas size.
    #[must_use]
    pub const fn preview_canvas(&self) -> Size {
        self.preview_canvas
    }

    /// Card footprint on the preview.
    #[must_use]
    pub const fn card_size(&self) -> Size {
        self.config.card_size
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &StationConfig {
        &self.config
    }

    /// Whether a non-`none` filter is active.
    #[must_use]
    pub fn is_styled(&self) -> bool {
        self.filter != FilterName::None
    }

    /// Whether a frame is active.
    #[must_use]
    pub const fn is_framed(&self) -> bool {
        self.frame.is_some()
    }

    /// Whether the user has placed the card.
    #[must_use]
    pub const fn is_card_positioned(&self) -> bool {
        self.card_positioned
    }

    /// Committed card position, relative to the card container.
    #[must_use]
    pub const fn card_position(&self) -> Position {
        self.card.committed()
    }

    /// Card position to draw right now.
    #[must_use]
    pub fn card_live_position(&self) -> Position {
        self.card.live_position()
    }

    /// Whether the card is being dragged.
    #[must_use]
    pub const fn is_card_dragging(&self) -> bool {
        self.card.is_dragging()
    }

    /// Border consumed by the active frame (0 without a frame).
    #[must_use]
    pub fn frame_inset(&self) -> f32 {
        if self.frame.is_some() {
            self.config.frame_border_inset
        } else {
            0.0
        }
    }

    /// Area the card may occupy.
    #[must_use]
    pub fn card_container(&self) -> Size {
        self.preview_canvas.inset(self.frame_inset())
    }

    /// Top-left of the card container inside the preview canvas.
    #[must_use]
    pub fn card_container_origin(&self) -> Position {
        let inset = self.frame_inset();
        Position::new(inset, inset)
    }

    /// Load or replace the photo. Styling survives a replacement.
    ///
    /// # Errors
    ///
    /// Returns [`BrewError::PhotoRequired`] for an empty URI.
    pub fn load_photo(&mut self, uri: impl Into<String>) -> BrewResult<()> {
        let uri = uri.into();
        if uri.trim().is_empty() {
            return Err(BrewError::PhotoRequired);
        }
        tracing::info!("Photo loaded into composition {}", self.id);
        self.photo_uri = Some(uri);
        Ok(())
    }

    /// Select a filter.
    ///
    /// # Errors
    ///
    /// Fails without a photo or when the filter is not in the catalog.
    pub fn set_filter(&mut self, filter: FilterName) -> BrewResult<()> {
        self.ensure_photo()?;
        if !self.catalogs.filters.contains(filter) {
            return Err(BrewError::UnknownFilter(filter.to_string()));
        }
        tracing::debug!("Filter {} -> {}", self.filter, filter);
        self.filter = filter;
        Ok(())
    }

    /// Select or clear the frame, re-clamping the card into the new bounds.
    /// A card mid-drag is pulled inside too, so its release stays in bounds.
    ///
    /// Returns `true` if the committed card position had to move.
    ///
    /// # Errors
    ///
    /// Fails without a photo or when the frame id is not in the catalog.
    pub fn set_frame(&mut self, frame_id: Option<&str>) -> BrewResult<bool> {
        self.ensure_photo()?;
        self.frame = match frame_id {
            Some(id) => Some(
                self.catalogs
                    .frames
                    .get(id)
                    .cloned()
                    .ok_or_else(|| BrewError::UnknownFrame(id.to_string()))?,
            ),
            None => None,
        };
        tracing::debug!(
            "Frame set to {:?}",
            self.frame.as_ref().map(|f| f.id.as_str())
        );
        Ok(self.reclamp_card())
    }

    /// Select the card colour scheme.
    ///
    /// # Errors
    ///
    /// Fails without a photo.
    pub fn set_card_theme(&mut self, theme: CardTheme) -> BrewResult<()> {
        self.ensure_photo()?;
        self.card_theme = theme;
        Ok(())
    }

    /// The preview canvas was re-measured (rotation, layout change).
    ///
    /// Degenerate sizes are ignored. Returns `true` if the card had to move.
    pub fn set_preview_canvas(&mut self, canvas: Size) -> bool {
        if canvas.is_degenerate() {
            tracing::warn!("Ignoring degenerate preview canvas {:?}", canvas);
            return false;
        }
        self.preview_canvas = canvas;
        self.reclamp_card()
    }

    /// Place the card directly (e.g. restoring a saved layout). The position
    /// is clamped into the container.
    ///
    /// # Errors
    ///
    /// Fails without a photo or while the card is being dragged.
    pub fn commit_card_position(&mut self, position: Position) -> BrewResult<Position> {
        self.ensure_photo()?;
        if self.card.is_dragging() {
            return Err(BrewError::DragInProgress);
        }
        let container = self.card_container();
        let committed = self
            .card
            .set_committed(position, container, self.config.card_size);
        self.card_positioned = true;
        Ok(committed)
    }

    /// Start dragging the card.
    ///
    /// # Errors
    ///
    /// Fails without a photo or if a drag is already active.
    pub fn begin_card_drag(&mut self) -> BrewResult<()> {
        self.ensure_photo()?;
        self.card.start().map(|_| ())
    }

    /// Move the card by the gesture's cumulative translation.
    ///
    /// # Errors
    ///
    /// Fails if no drag is active.
    pub fn drag_card(&mut self, translation: Offset) -> BrewResult<Position> {
        let container = self.card_container();
        self.card
            .update(translation, container, self.config.card_size)
    }

    /// Release the card, committing its position.
    ///
    /// # Errors
    ///
    /// Fails if no drag is active.
    pub fn end_card_drag(&mut self) -> BrewResult<Position> {
        let committed = self.card.end()?;
        self.card_positioned = true;
        Ok(committed)
    }

    /// Route a raw touch event to the card.
    ///
    /// # Errors
    ///
    /// Fails without a photo.
    pub fn handle_card_touch(&mut self, event: &TouchEvent) -> BrewResult<DragOutcome> {
        self.ensure_photo()?;
        let container = self.card_container();
        let outcome = self
            .card
            .handle_touch(event, container, self.config.card_size);
        if matches!(outcome, DragOutcome::Committed(_)) {
            self.card_positioned = true;
        }
        Ok(outcome)
    }

    /// Card text for `recipe`, or `None` when the card is suppressed.
    #[must_use]
    pub fn card_content(&self, recipe: &RecipeFields) -> Option<CardContent> {
        self.formatter.format(recipe)
    }

    /// Visible layers, bottom to top.
    #[must_use]
    pub fn layers(&self, recipe: &RecipeFields) -> Vec<Layer> {
        let Some(uri) = &self.photo_uri else {
            return Vec::new();
        };
        let mut layers = vec![Layer::Photo { uri: uri.clone() }];
        if let Some(profile) = self.filter_profile().filter(|p| p.has_overlay()) {
            layers.push(Layer::Filter {
                name: profile.name,
                tint: profile.tint,
                scan_lines: profile.scan_lines,
            });
        }
        if let Some(frame) = &self.frame {
            layers.push(Layer::Frame(frame.clone()));
        }
        if recipe.has_card_content() {
            layers.push(Layer::Card {
                position: self.card.live_position(),
                size: self.config.card_size,
                scale: self.card.visual_scale(),
                theme: self.card_theme,
            });
        }
        layers
    }

    /// Produce the export layout for a canvas of `export_canvas` pixels.
    ///
    /// The committed card position is carried from the measured preview width
    /// to the measured export width, then clamped into the export container.
    ///
    /// # Errors
    ///
    /// Fails without a photo or when `export_canvas` is degenerate.
    pub fn finalize(&self, recipe: &RecipeFields, export_canvas: Size) -> BrewResult<ExportBundle> {
        let photo_uri = self.photo_uri.clone().ok_or(BrewError::PhotoRequired)?;
        if export_canvas.is_degenerate() {
            return Err(BrewError::DegenerateGeometry(format!(
                "export canvas {}x{}",
                export_canvas.width, export_canvas.height
            )));
        }

        let scaler = CoordinateScaler::new(self.preview_canvas.width, export_canvas.width).ok();
        let factor = scaler.map_or(1.0, |s| s.factor());
        let inset = scaler.map_or(self.frame_inset(), |s| s.apply_length(self.frame_inset()));
        let container_size = export_canvas.inset(inset);
        let card_size = scaler.map_or(self.config.card_size, |s| s.apply_size(self.config.card_size));
        let position = scale::reconcile(
            self.card.committed(),
            self.preview_canvas.width,
            export_canvas.width,
            container_size,
            card_size,
        );

        tracing::info!(
            "Finalized composition {} at {}x{} (scale {:.3})",
            self.id,
            export_canvas.width,
            export_canvas.height,
            factor
        );

        Ok(ExportBundle {
            composition_id: self.id,
            photo_uri,
            canvas_size: export_canvas,
            container_origin: Position::new(inset, inset),
            container_size,
            position,
            card_size,
            scale_factor: factor,
            filter: self.filter,
            filter_profile: self.filter_profile().cloned(),
            frame_id: self.frame.as_ref().map(|f| f.id.clone()),
            frame_asset: self.frame.as_ref().map(|f| f.asset.clone()),
            card_theme: self.card_theme,
            card: self.card_content(recipe),
        })
    }

    fn ensure_photo(&self) -> BrewResult<()> {
        if self.photo_uri.is_some() {
            Ok(())
        } else {
            Err(BrewError::PhotoRequired)
        }
    }

    fn reclamp_card(&mut self) -> bool {
        let container = self.card_container();
        self.card.reclamp(container, self.config.card_size)
    }
}
