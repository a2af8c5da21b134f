//! Export error types and the notices shown for them.

use brewcard_core::BrewError;
use serde::Serialize;
use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while capturing, sharing or saving.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The composition could not be finalized.
    #[error("Composition error: {0}")]
    Composition(#[from] BrewError),

    /// The capture collaborator failed to produce an image.
    #[error("Capture failed: {0}")]
    CaptureFailure(String),

    /// Media library access was refused.
    #[error("Media library permission denied")]
    PermissionDenied,

    /// No share sheet on this platform.
    #[error("Sharing is not available")]
    ShareUnavailable,

    /// The share sheet reported an error.
    #[error("Share failed: {0}")]
    ShareFailed(String),

    /// The media library refused the image.
    #[error("Save failed: {0}")]
    SaveFailed(String),

    /// Another export is still running.
    #[error("An export is already in progress")]
    ExportBusy,

    /// The screen went away before the export finished.
    #[error("Export result discarded: view unmounted")]
    Discarded,

    /// Rasterizing the layout failed.
    #[error("Render error: {0}")]
    Render(String),

    /// Filesystem error while writing or copying images.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which user action an export belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportAction {
    /// Share sheet.
    Share,
    /// Save to the media library.
    Save,
}

impl std::fmt::Display for ExportAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Share => f.write_str("share"),
            Self::Save => f.write_str("save"),
        }
    }
}

/// A short title/message pair for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Alert title.
    pub title: &'static str,
    /// Alert body.
    pub message: &'static str,
}

impl Notice {
    /// Shown after a successful save.
    pub const SAVED: Self = Self {
        title: "Saved!",
        message: "Image saved to your camera roll",
    };

    /// Shown when media library access was refused.
    pub const PERMISSION_NEEDED: Self = Self {
        title: "Permission needed",
        message: "Please allow access to save photos",
    };

    /// Shown when sharing failed.
    pub const SHARE_FAILED: Self = Self {
        title: "Error",
        message: "Failed to share image",
    };

    /// Shown when saving failed.
    pub const SAVE_FAILED: Self = Self {
        title: "Error",
        message: "Failed to save image",
    };
}

impl ExportError {
    /// Notice to show for this error, or `None` when the failure is silent.
    ///
    /// A busy rejection and a discarded result never reach the user.
    #[must_use]
    pub const fn notice(&self, action: ExportAction) -> Option<Notice> {
        match self {
            Self::ExportBusy | Self::Discarded => None,
            Self::PermissionDenied => Some(Notice::PERMISSION_NEEDED),
            _ => match action {
                ExportAction::Share => Some(Notice::SHARE_FAILED),
                ExportAction::Save => Some(Notice::SAVE_FAILED),
            },
        }
    }

    /// Whether re-triggering the same export may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CaptureFailure(_)
                | Self::ShareFailed(_)
                | Self::SaveFailed(_)
                | Self::ExportBusy
                | Self::Io(_)
        )
    }
}
