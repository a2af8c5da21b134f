//! Filter profiles and frame assets.
//!
//! Both catalogs are plain data injected into a composition. The built-in
//! tables match the shipped app; tests and hosts can load their own from
//! JSON.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BrewError, BrewResult};

/// Identifier of a cosmetic filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterName {
    /// No overlay.
    #[default]
    None,
    /// Warm coral wash.
    CoralHaze,
    /// Desaturated tape look with scan lines.
    VhsCafe,
    /// Soft film stock with grain.
    FilmGrain,
}

impl FilterName {
    /// All filters in display order.
    pub const ALL: [Self; 4] = [Self::None, Self::CoralHaze, Self::VhsCafe, Self::FilmGrain];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::CoralHaze => "coral-haze",
            Self::VhsCafe => "vhs-cafe",
            Self::FilmGrain => "film-grain",
        }
    }
}

impl fmt::Display for FilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterName {
    type Err = BrewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| BrewError::UnknownFilter(s.to_string()))
    }
}

/// Overlay tint as RGBA (alpha 0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Opacity.
    pub a: f32,
}

impl Tint {
    /// Create a tint.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba(...)` form.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Static visual-adjustment profile of a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterProfile {
    /// Filter this profile belongs to.
    pub name: FilterName,
    /// Human label.
    pub label: String,
    /// Saturation multiplier.
    pub saturation: f32,
    /// Brightness multiplier.
    pub brightness: f32,
    /// Contrast multiplier.
    pub contrast: f32,
    /// Warmth additive.
    pub warmth: f32,
    /// Grain amount.
    pub grain: f32,
    /// Overlay color, if the filter draws one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tint: Option<Tint>,
    /// Whether scan lines are drawn over the photo.
    #[serde(default)]
    pub scan_lines: bool,
}

impl FilterProfile {
    /// Whether applying this profile draws anything.
    #[must_use]
    pub fn has_overlay(&self) -> bool {
        self.name != FilterName::None && (self.tint.is_some() || self.scan_lines)
    }
}

/// Lookup table of filter profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCatalog {
    profiles: Vec<FilterProfile>,
}

impl FilterCatalog {
    /// Build from profiles. Later duplicates of a name are dropped.
    #[must_use]
    pub fn new(profiles: Vec<FilterProfile>) -> Self {
        let mut unique: Vec<FilterProfile> = Vec::with_capacity(profiles.len());
        for profile in profiles {
            if unique.iter().any(|p| p.name == profile.name) {
                tracing::warn!("Duplicate filter profile: {}", profile.name);
                continue;
            }
            unique.push(profile);
        }
        Self { profiles: unique }
    }

    /// The shipped filter table.
    #[must_use]
    pub fn builtin() -> Self {
        let profile = |name, label: &str, sat, bright, contrast, warmth, grain, tint, scan_lines| {
            FilterProfile {
                name,
                label: label.to_string(),
                saturation: sat,
                brightness: bright,
                contrast,
                warmth,
                grain,
                tint,
                scan_lines,
            }
        };
        Self::new(vec![
            profile(FilterName::None, "Original", 1.0, 1.0, 1.0, 0.0, 0.0, None, false),
            profile(
                FilterName::CoralHaze,
                "Coral Haze",
                1.1,
                1.05,
                0.95,
                0.15,
                0.05,
                Some(Tint::new(242, 148, 150, 0.2)),
                false,
            ),
            profile(
                FilterName::VhsCafe,
                "VHS Café",
                0.8,
                0.95,
                1.1,
                0.1,
                0.3,
                Some(Tint::new(80, 60, 40, 0.25)),
                true,
            ),
            profile(
                FilterName::FilmGrain,
                "Film Grain",
                1.05,
                1.02,
                0.92,
                0.12,
                0.2,
                Some(Tint::new(255, 230, 200, 0.12)),
                false,
            ),
        ])
    }

    /// Parse a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a catalog.
    pub fn from_json(json: &str) -> BrewResult<Self> {
        let raw: Self = serde_json::from_str(json)?;
        Ok(Self::new(raw.profiles))
    }

    /// Look up a profile.
    #[must_use]
    pub fn get(&self, name: FilterName) -> Option<&FilterProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Whether the catalog has `name`.
    #[must_use]
    pub fn contains(&self, name: FilterName) -> bool {
        self.get(name).is_some()
    }

    /// All profiles in display order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterProfile> {
        self.profiles.iter()
    }
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A decorative frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameAsset {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Asset path or URI.
    pub asset: String,
}

impl FrameAsset {
    /// Create a frame asset.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            asset: asset.into(),
        }
    }
}

const BUILTIN_FRAMES: &[(&str, &str, &str)] = &[
    ("coffee-mug", "Coffee Mug", "frames/coffee-mug.png"),
    ("left-hand", "Left Hand", "frames/left-hand.png"),
    ("right-hand", "Right Hand", "frames/right-hand.png"),
    ("up-hand", "Up Hand", "frames/up-hand.png"),
    ("up-hand-wiggle", "Up Wiggle", "frames/up-hand-wiggle.png"),
    ("down-hand-wiggle", "Down Wiggle", "frames/down-hand-wiggle.png"),
    ("down-hand-wiggle-right", "Down Wiggle R", "frames/down-hand-wiggle-right.png"),
    ("two-hands-down", "Two Hands", "frames/two-hands-down.png"),
    ("squiggle", "Squiggle", "frames/squiggle.png"),
    ("pipe-wiggle-eye", "Pipe Eye", "frames/pipe-wiggle-eye.png"),
    ("pipe-with-hand", "Pipe Hand", "frames/pipe-with-hand.png"),
    ("asset-13", "Frame 1", "frames/Asset 13.png"),
    ("asset-14", "Frame 2", "frames/Asset 14.png"),
    ("asset-16", "Frame 3", "frames/Asset 16.png"),
    ("asset-17", "Frame 4", "frames/Asset 17.png"),
    ("asset-18", "Frame 5", "frames/Asset 18_1.png"),
    ("asset-19", "Frame 6", "frames/Asset 19.png"),
    ("asset-22", "Frame 7", "frames/Asset 22.png"),
    ("asset-24", "Frame 8", "frames/Asset 24.png"),
    ("asset-25", "Frame 9", "frames/Asset 25.png"),
    ("asset-26", "Frame 10", "frames/Asset 26.png"),
    ("asset-27", "Frame 11", "frames/Asset 27.png"),
    ("asset-28", "Frame 12", "frames/Asset 28.png"),
    ("asset-30", "Frame 13", "frames/Asset 30.png"),
    ("asset-31", "Frame 14", "frames/Asset 31.png"),
    ("asset-32", "Frame 15", "frames/Asset 32.png"),
    ("asset-33", "Frame 16", "frames/Asset 33_1.png"),
    ("asset-34", "Frame 17", "frames/Asset 34.png"),
    ("asset-35", "Frame 18", "frames/Asset 35.png"),
    ("asset-36", "Frame 19", "frames/Asset36.png"),
    ("asset-37", "Frame 20", "frames/Asset 37.png"),
    ("asset-38", "Frame 21", "frames/Asset 38.png"),
    ("asset-39", "Frame 22", "frames/Asset 39.png"),
    ("asset-40", "Frame 23", "frames/Asset 40.png"),
    ("asset-41", "Frame 24", "frames/Asset 41.png"),
    ("asset-42", "Frame 25", "frames/Asset 42.png"),
    ("asset-43", "Frame 26", "frames/Asset 43.png"),
    ("asset-44", "Frame 27", "frames/Asset 44.png"),
    ("asset-45", "Frame 28", "frames/Asset 45.png"),
    ("asset-46", "Frame 29", "frames/Asset 46.png"),
    ("asset-47", "Frame 30", "frames/Asset 47.png"),
    ("asset-48", "Frame 31", "frames/Asset 48.png"),
    ("asset-49", "Frame 32", "frames/Asset 49.png"),
    ("asset-50", "Frame 33", "frames/Asset 50.png"),
    ("asset-51", "Frame 34", "frames/Asset 51.png"),
    ("asset-52", "Frame 35", "frames/Asset 52.png"),
    ("asset-53", "Frame 36", "frames/Asset 53.png"),
    ("asset-54", "Frame 37", "frames/Asset 54.png"),
    ("asset-55", "Frame 38", "frames/Asset 55.png"),
    ("asset-56", "Frame 39", "frames/Asset 56.png"),
];

/// Ordered catalog of frame assets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCatalog {
    frames: Vec<FrameAsset>,
}

impl FrameCatalog {
    /// Build from assets. Later duplicates of an id are dropped.
    #[must_use]
    pub fn new(frames: Vec<FrameAsset>) -> Self {
        let mut unique: Vec<FrameAsset> = Vec::with_capacity(frames.len());
        for frame in frames {
            if unique.iter().any(|f| f.id == frame.id) {
                tracing::warn!("Duplicate frame id: {}", frame.id);
                continue;
            }
            unique.push(frame);
        }
        Self { frames: unique }
    }

    /// The shipped frame catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_FRAMES
                .iter()
                .map(|(id, name, asset)| FrameAsset::new(*id, *name, *asset))
                .collect(),
        )
    }

    /// Parse a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a catalog.
    pub fn from_json(json: &str) -> BrewResult<Self> {
        let raw: Self = serde_json::from_str(json)?;
        Ok(Self::new(raw.frames))
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> BrewResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Look up a frame by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FrameAsset> {
        self.frames.iter().find(|f| f.id == id)
    }

    /// All frames in display order.
    pub fn iter(&self) -> impl Iterator<Item = &FrameAsset> {
        self.frames.iter()
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Filter and frame catalogs handed to a composition together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogs {
    /// Filter profiles.
    pub filters: FilterCatalog,
    /// Frame assets.
    pub frames: FrameCatalog,
}

impl Catalogs {
    /// The shipped catalogs.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            filters: FilterCatalog::builtin(),
            frames: FrameCatalog::builtin(),
        }
    }
}
