//! # Brewcard Export
//!
//! Turns a finalized [`brewcard_core::ExportBundle`] into a shared or saved
//! image through platform collaborators.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              ExportCoordinator              │
//! │  - One job at a time (ExportBusy)           │
//! │  - ViewMount unmount → Discarded            │
//! ├──────────────┬───────────────┬──────────────┤
//! │ ViewCapture  │  ShareTarget  │ MediaLibrary │
//! │ (SVG / PNG)  │ (share sheet) │ (permission) │
//! └──────────────┴───────────────┴──────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod collaborator;
pub mod coordinator;
pub mod error;
pub mod local;
pub mod svg;

pub use collaborator::{
    CapturedImage, ImageFormat, MediaLibrary, PermissionStatus, ShareOptions, ShareTarget,
    ViewCapture,
};
pub use coordinator::{ExportCoordinator, ExportOutcome, ViewMount};
pub use error::{ExportAction, ExportError, ExportResult, Notice};
pub use local::{DirectoryLibrary, NoShareTarget};
pub use svg::{SvgCaptureConfig, SvgLayoutCapture};
