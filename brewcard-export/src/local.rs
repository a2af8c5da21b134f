//! Desktop stand-ins for the share sheet and photo library.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::collaborator::{
    file_uri, CapturedImage, MediaLibrary, PermissionStatus, ShareOptions, ShareTarget,
};
use crate::{ExportError, ExportResult};

/// A "library" that copies saved images into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    dir: PathBuf,
    permission: PermissionStatus,
}

impl DirectoryLibrary {
    /// Library rooted at `dir`, with access granted.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            permission: PermissionStatus::Granted,
        }
    }

    /// Override the permission answer.
    #[must_use]
    pub fn with_permission(mut self, permission: PermissionStatus) -> Self {
        self.permission = permission;
        self
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

#[async_trait]
impl MediaLibrary for DirectoryLibrary {
    async fn request_permission(&self) -> ExportResult<PermissionStatus> {
        Ok(self.permission)
    }

    async fn save(&self, image: &CapturedImage) -> ExportResult<String> {
        let Some(name) = image.path.file_name() else {
            return Err(ExportError::SaveFailed(format!(
                "no file name in {}",
                image.path.display()
            )));
        };
        tokio::fs::create_dir_all(&self.dir).await?;
        let target = self.dir.join(name);
        tokio::fs::copy(&image.path, &target).await?;
        tracing::info!("Saved {} to {}", image.path.display(), target.display());
        Ok(file_uri(&target))
    }
}

/// Share target for platforms without a share sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShareTarget;

#[async_trait]
impl ShareTarget for NoShareTarget {
    async fn is_available(&self) -> ExportResult<bool> {
        Ok(false)
    }

    async fn share(&self, _image: &CapturedImage, _options: &ShareOptions) -> ExportResult<()> {
        Err(ExportError::ShareUnavailable)
    }
}
