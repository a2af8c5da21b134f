//! # Brewcard Core
//!
//! Platform-neutral logic behind the brew card station: a photo, an optional
//! filter and frame, and a draggable card of recipe data on top.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                brewcard-core                │
//! ├─────────────────────────────────────────────┤
//! │  Composition       │  Card Formatter        │
//! │  - Photo/filter    │  - Line ordering       │
//! │  - Frame inset     │  - Suppression         │
//! │  - Export bundle   │  - Stars, watermark    │
//! ├─────────────────────────────────────────────┤
//! │  Drag Controller   │  Quantized Controls    │
//! │  - Clamping        │  - Knob / fader        │
//! │  - Touch routing   │  - Stepper, hold       │
//! ├─────────────────────────────────────────────┤
//! │  Coordinate Scaler │  Catalogs & Config     │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bundle;
pub mod card;
pub mod catalog;
pub mod composition;
pub mod config;
pub mod control;
pub mod drag;
pub mod error;
pub mod event;
pub mod geometry;
pub mod quantize;
pub mod recipe;
pub mod scale;

pub use bundle::ExportBundle;
pub use card::{
    render_stars, truncate_with_ellipsis, CardContent, CardContentFormatter, CardLine,
    CardPresentation, CardTheme, WATERMARK,
};
pub use catalog::{
    Catalogs, FilterCatalog, FilterName, FilterProfile, FrameAsset, FrameCatalog, Tint,
};
pub use composition::{CompositionId, CompositionModel, CompositionStage, Layer};
pub use config::StationConfig;
pub use control::{FaderSlider, NumericStepper, RotaryKnob};
pub use drag::{BoundedDragController, DragOutcome, DragSession};
pub use error::{BrewError, BrewResult};
pub use event::{TouchEvent, TouchPhase, TouchPoint};
pub use geometry::{Offset, Position, Size};
pub use quantize::{HoldRepeat, QuantizedRange, StepDirection, Travel};
pub use recipe::RecipeFields;
pub use scale::{reconcile, rescale, rescale_size, CoordinateScaler};

/// Brewcard core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
