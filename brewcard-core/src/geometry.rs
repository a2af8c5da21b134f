//! Canvas-local geometry: positions, offsets and sizes.
//!
//! All values are pixels in a canvas's own coordinate space with a top-left
//! origin. Clamping helpers never produce NaN, whatever the input.

use serde::{Deserialize, Serialize};

/// A point in canvas-local pixels (top-left origin).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Pixels from the left edge.
    pub x: f32,
    /// Pixels from the top edge.
    pub y: f32,
}

impl Position {
    /// The top-left corner.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate by a pointer offset.
    #[must_use]
    pub fn offset_by(self, offset: Offset) -> Self {
        Self {
            x: self.x + offset.dx,
            y: self.y + offset.dy,
        }
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Clamp so an element of `element` size stays inside `container`.
    ///
    /// Each axis is clamped independently to `[0, container - element]`. When
    /// the element does not fit on an axis it is pinned to 0 on that axis.
    #[must_use]
    pub fn clamp_within(self, container: Size, element: Size) -> Self {
        let max = container.max_position(element);
        Self {
            x: clamp_axis(self.x, max.x),
            y: clamp_axis(self.y, max.y),
        }
    }

    /// Whether this position already satisfies [`Position::clamp_within`].
    #[must_use]
    pub fn is_within(self, container: Size, element: Size) -> bool {
        self.clamp_within(container, element) == self
    }
}

/// Cumulative pointer translation since a gesture began.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    /// Horizontal translation.
    pub dx: f32,
    /// Vertical translation.
    pub dy: f32,
}

impl Offset {
    /// No translation.
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    /// Create an offset.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Whether both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }
}

/// Width and height of a canvas, container or element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative or non-finite.
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Shrink by `inset` on every side. Never goes below zero.
    #[must_use]
    pub fn inset(self, inset: f32) -> Self {
        let inset = if inset.is_finite() { inset.max(0.0) } else { 0.0 };
        Self {
            width: (self.width - 2.0 * inset).max(0.0),
            height: (self.height - 2.0 * inset).max(0.0),
        }
    }

    /// Largest top-left position an `element` can take inside this container.
    ///
    /// Axes without room collapse to 0.
    #[must_use]
    pub fn max_position(self, element: Size) -> Position {
        Position {
            x: room(self.width, element.width),
            y: room(self.height, element.height),
        }
    }

    /// Multiply both dimensions by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

fn room(container: f32, element: f32) -> f32 {
    let available = container - element;
    if available.is_finite() {
        available.max(0.0)
    } else {
        0.0
    }
}

/// Clamp a single coordinate into `[0, max]`.
///
/// NaN collapses to 0 and a non-finite or negative `max` is treated as 0.
#[must_use]
pub fn clamp_axis(value: f32, max: f32) -> f32 {
    let upper = if max.is_finite() { max.max(0.0) } else { 0.0 };
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, upper)
}
