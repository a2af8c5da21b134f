//! Mapping positions between canvases of different pixel widths.
//!
//! The preview canvas and the export canvas share an aspect ratio but not a
//! pixel size. A position committed on the preview is carried to the export
//! canvas by a single uniform factor, `target_width / source_width`, measured
//! from the real canvases at export time.

use crate::geometry::{Position, Size};
use crate::{BrewError, BrewResult};

/// A validated scale between two canvas widths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateScaler {
    source_width: f32,
    target_width: f32,
}

impl CoordinateScaler {
    /// Build a scaler from the measured source and target widths.
    ///
    /// # Errors
    ///
    /// Returns [`BrewError::DegenerateGeometry`] if either width is zero,
    /// negative or non-finite.
    pub fn new(source_width: f32, target_width: f32) -> BrewResult<Self> {
        if !source_width.is_finite() || source_width <= 0.0 {
            return Err(BrewError::DegenerateGeometry(format!(
                "source canvas width {source_width}"
            )));
        }
        if !target_width.is_finite() || target_width <= 0.0 {
            return Err(BrewError::DegenerateGeometry(format!(
                "target canvas width {target_width}"
            )));
        }
        Ok(Self {
            source_width,
            target_width,
        })
    }

    /// The uniform scale factor.
    #[must_use]
    pub fn factor(&self) -> f32 {
        self.target_width / self.source_width
    }

    /// The scaler for the opposite direction.
    #[must_use]
    pub const fn inverse(&self) -> Self {
        Self {
            source_width: self.target_width,
            target_width: self.source_width,
        }
    }

    /// Scale a position. No clamping is applied.
    #[must_use]
    pub fn apply(&self, position: Position) -> Position {
        let factor = self.factor();
        Position::new(position.x * factor, position.y * factor)
    }

    /// Scale a size.
    #[must_use]
    pub fn apply_size(&self, size: Size) -> Size {
        size.scaled(self.factor())
    }

    /// Scale a length (e.g. a frame border inset).
    #[must_use]
    pub fn apply_length(&self, length: f32) -> f32 {
        length * self.factor()
    }
}

/// Map `position` from a canvas `source_width` wide to one `target_width` wide.
///
/// # Errors
///
/// Returns [`BrewError::DegenerateGeometry`] if either width is unusable.
pub fn rescale(position: Position, source_width: f32, target_width: f32) -> BrewResult<Position> {
    CoordinateScaler::new(source_width, target_width).map(|s| s.apply(position))
}

/// Map `size` by the same factor as [`rescale`].
///
/// # Errors
///
/// Returns [`BrewError::DegenerateGeometry`] if either width is unusable.
pub fn rescale_size(size: Size, source_width: f32, target_width: f32) -> BrewResult<Size> {
    CoordinateScaler::new(source_width, target_width).map(|s| s.apply_size(size))
}

/// Rescale and then clamp into the target container.
///
/// Degenerate widths leave the position unchanged apart from clamping, so
/// the result is always finite and inside `target_container`.
#[must_use]
pub fn reconcile(
    position: Position,
    source_width: f32,
    target_width: f32,
    target_container: Size,
    element: Size,
) -> Position {
    let scaled = match rescale(position, source_width, target_width) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("Skipping rescale: {e}");
            position
        }
    };
    scaled.clamp_within(target_container, element)
}
