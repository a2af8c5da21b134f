//! Platform collaborators the export pipeline talks to.
//!
//! Real implementations wrap a view snapshotter, a share sheet and a photo
//! library. The crate ships [`crate::SvgLayoutCapture`],
//! [`crate::DirectoryLibrary`] and [`crate::NoShareTarget`] for desktop and
//! test use.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use brewcard_core::ExportBundle;
use serde::{Deserialize, Serialize};

use crate::ExportResult;

/// Encoding of a captured image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// SVG document.
    Svg,
    /// PNG raster.
    Png,
}

impl ImageFormat {
    /// MIME type.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
        }
    }

    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// A flattened composite written to a temporary file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedImage {
    /// Where the image was written.
    pub path: PathBuf,
    /// Encoding.
    pub format: ImageFormat,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

impl CapturedImage {
    /// Create a captured image record.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, format: ImageFormat, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            format,
            width,
            height,
        }
    }

    /// `file://` URI of the image.
    #[must_use]
    pub fn uri(&self) -> String {
        file_uri(&self.path)
    }
}

/// `file://` URI for a local path.
#[must_use]
pub fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Options passed to the share sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareOptions {
    /// MIME type announced to the receiving app.
    pub mime_type: String,
    /// Share sheet title.
    pub dialog_title: String,
}

impl Default for ShareOptions {
    fn default() -> Self {
        Self {
            mime_type: ImageFormat::Png.mime_type().to_string(),
            dialog_title: "Share your brew".to_string(),
        }
    }
}

/// Media library permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// Access granted.
    Granted,
    /// Access refused.
    Denied,
    /// The user has not been asked yet.
    Undetermined,
}

impl PermissionStatus {
    /// Only an explicit grant allows saving.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Flattens a finalized layout into an image.
#[async_trait]
pub trait ViewCapture: Send + Sync {
    /// Render `bundle` and return the written image.
    async fn capture(&self, bundle: &ExportBundle) -> ExportResult<CapturedImage>;
}

/// System share sheet.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// Whether sharing works on this device.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform check itself failed.
    async fn is_available(&self) -> ExportResult<bool>;

    /// Present the share sheet for `image`.
    async fn share(&self, image: &CapturedImage, options: &ShareOptions) -> ExportResult<()>;
}

/// Photo library.
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Ask for write access.
    ///
    /// # Errors
    ///
    /// Returns an error if the permission prompt could not be shown.
    async fn request_permission(&self) -> ExportResult<PermissionStatus>;

    /// Store `image`, returning the library's URI for it.
    async fn save(&self, image: &CapturedImage) -> ExportResult<String>;
}
