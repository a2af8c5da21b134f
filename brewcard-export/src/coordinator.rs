//! Export coordination: one job at a time, results dropped after unmount.
//!
//! ```text
//! share:  capture ──► is_available? ──► share sheet
//! save:   permission? ──► capture ──► library.save
//! ```
//!
//! Every await point re-checks the [`ViewMount`]. Once the caller unmounts,
//! the job stops at the next check and reports [`ExportError::Discarded`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use brewcard_core::ExportBundle;
use serde::Serialize;
use uuid::Uuid;

use crate::collaborator::{CapturedImage, MediaLibrary, ShareOptions, ShareTarget, ViewCapture};
use crate::error::{ExportAction, Notice};
use crate::{ExportError, ExportResult};

/// Liveness token for the screen that started an export.
///
/// Clones share state: unmounting any clone unmounts them all.
#[derive(Debug, Clone)]
pub struct ViewMount {
    mounted: Arc<AtomicBool>,
}

impl ViewMount {
    /// Create a mounted token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// The screen went away.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// Whether the screen is still there.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    fn ensure_mounted(&self) -> ExportResult<()> {
        if self.is_mounted() {
            Ok(())
        } else {
            Err(ExportError::Discarded)
        }
    }
}

impl Default for ViewMount {
    fn default() -> Self {
        Self::new()
    }
}

/// A finished export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ExportOutcome {
    /// The share sheet accepted the image.
    Shared {
        /// Image that was shared.
        image: CapturedImage,
    },
    /// The library stored the image.
    Saved {
        /// Image that was saved.
        image: CapturedImage,
        /// Library URI of the stored copy.
        asset_uri: String,
    },
}

impl ExportOutcome {
    /// Notice to show on success, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<Notice> {
        match self {
            Self::Shared { .. } => None,
            Self::Saved { .. } => Some(Notice::SAVED),
        }
    }

    /// The captured image.
    #[must_use]
    pub const fn image(&self) -> &CapturedImage {
        match self {
            Self::Shared { image } | Self::Saved { image, .. } => image,
        }
    }
}

/// Clears the busy flag when a job ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Runs share and save jobs against injected collaborators.
pub struct ExportCoordinator {
    capture: Arc<dyn ViewCapture>,
    share_target: Arc<dyn ShareTarget>,
    library: Arc<dyn MediaLibrary>,
    share_options: ShareOptions,
    busy: AtomicBool,
}

impl ExportCoordinator {
    /// Create a coordinator.
    #[must_use]
    pub fn new(
        capture: Arc<dyn ViewCapture>,
        share_target: Arc<dyn ShareTarget>,
        library: Arc<dyn MediaLibrary>,
    ) -> Self {
        Self {
            capture,
            share_target,
            library,
            share_options: ShareOptions::default(),
            busy: AtomicBool::new(false),
        }
    }

    /// Override the share sheet options.
    #[must_use]
    pub fn with_share_options(mut self, options: ShareOptions) -> Self {
        self.share_options = options;
        self
    }

    /// Whether a job is running. Hosts disable their buttons while true.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Whether the share button should be offered.
    ///
    /// # Errors
    ///
    /// Returns the share target's error if the availability check failed.
    pub async fn can_share(&self) -> ExportResult<bool> {
        self.share_target.is_available().await
    }

    /// Capture `bundle` and present the share sheet.
    ///
    /// # Errors
    ///
    /// [`ExportError::ExportBusy`] while another job runs,
    /// [`ExportError::Discarded`] after unmount, [`ExportError::ShareUnavailable`]
    /// without a share sheet, and any collaborator failure.
    pub async fn share(
        &self,
        bundle: &ExportBundle,
        mount: &ViewMount,
    ) -> ExportResult<ExportOutcome> {
        let _guard = self.begin()?;
        let job = Uuid::new_v4();
        tracing::debug!("Share job {} started for {}", job, bundle.composition_id);

        let result = self.run_share(bundle, mount).await;
        log_result(job, ExportAction::Share, &result);
        result
    }

    /// Ask for library access, capture `bundle` and save it.
    ///
    /// # Errors
    ///
    /// [`ExportError::PermissionDenied`] without library access, plus the
    /// errors listed on [`ExportCoordinator::share`].
    pub async fn save(
        &self,
        bundle: &ExportBundle,
        mount: &ViewMount,
    ) -> ExportResult<ExportOutcome> {
        let _guard = self.begin()?;
        let job = Uuid::new_v4();
        tracing::debug!("Save job {} started for {}", job, bundle.composition_id);

        let result = self.run_save(bundle, mount).await;
        log_result(job, ExportAction::Save, &result);
        result
    }

    fn begin(&self) -> ExportResult<InFlight<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| {
                tracing::warn!("Export rejected: another export is in progress");
                ExportError::ExportBusy
            })?;
        Ok(InFlight(&self.busy))
    }

    async fn run_share(
        &self,
        bundle: &ExportBundle,
        mount: &ViewMount,
    ) -> ExportResult<ExportOutcome> {
        let image = self.capture_checked(bundle, mount).await?;

        if !self.share_target.is_available().await? {
            return Err(ExportError::ShareUnavailable);
        }
        mount.ensure_mounted()?;

        self.share_target.share(&image, &self.share_options).await?;
        mount.ensure_mounted()?;
        Ok(ExportOutcome::Shared { image })
    }

    async fn run_save(
        &self,
        bundle: &ExportBundle,
        mount: &ViewMount,
    ) -> ExportResult<ExportOutcome> {
        let status = self.library.request_permission().await?;
        mount.ensure_mounted()?;
        if !status.is_granted() {
            return Err(ExportError::PermissionDenied);
        }

        let image = self.capture_checked(bundle, mount).await?;
        let asset_uri = self.library.save(&image).await?;
        mount.ensure_mounted()?;
        Ok(ExportOutcome::Saved { image, asset_uri })
    }

    async fn capture_checked(
        &self,
        bundle: &ExportBundle,
        mount: &ViewMount,
    ) -> ExportResult<CapturedImage> {
        mount.ensure_mounted()?;
        let image = self.capture.capture(bundle).await.map_err(|e| match e {
            ExportError::CaptureFailure(_) => e,
            other => ExportError::CaptureFailure(other.to_string()),
        })?;
        mount.ensure_mounted()?;
        Ok(image)
    }
}

fn log_result(job: Uuid, action: ExportAction, result: &ExportResult<ExportOutcome>) {
    match result {
        Ok(outcome) => tracing::info!(
            "Export job {} ({}) finished: {}",
            job,
            action,
            outcome.image().uri()
        ),
        Err(ExportError::Discarded) => {
            tracing::debug!("Export job {} ({}) discarded after unmount", job, action);
        }
        Err(e) => tracing::warn!("Export job {} ({}) failed: {}", job, action, e),
    }
}
