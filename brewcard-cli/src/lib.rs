//! # Brewcard CLI
//!
//! Command-line host for brew card compositions.
//!
//! ## Commands
//!
//! - `card` - print the card lines for a recipe payload
//! - `layout` - finalize a session file into an export bundle (JSON)
//! - `render` - capture a session as SVG or PNG, optionally saving a copy
//! - `frames` - list the frame catalog
//!
//! ## Configuration
//!
//! - `CliArgs` - command-line arguments parsed with clap
//! - `BrewcardConfig` - station tunables and catalogs resolved from the args

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod commands;
mod session;

pub use commands::{run, CliError, CliResult};
pub use session::SessionFile;

use std::path::PathBuf;
use std::sync::Arc;

use brewcard_core::{CardPresentation, Catalogs, FrameCatalog, StationConfig};
use brewcard_export::ImageFormat;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for brewcard.
#[derive(Debug, Clone, Parser)]
#[command(name = "brewcard")]
#[command(about = "Brew card composition and export")]
#[command(version)]
pub struct CliArgs {
    /// Station config JSON (card size, frame inset, timings)
    #[arg(long, env = "BREWCARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Frame catalog JSON replacing the built-in frames
    #[arg(long, env = "BREWCARD_FRAMES", global = true)]
    pub frames: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the card lines for a recipe payload
    Card {
        /// Recipe payload JSON file
        recipe: PathBuf,

        /// Flavor separator variant
        #[arg(long, value_enum)]
        presentation: Option<PresentationArg>,

        /// Print the card as JSON
        #[arg(long)]
        json: bool,
    },

    /// Finalize a session into an export bundle
    Layout {
        /// Session JSON file
        session: PathBuf,

        /// Export canvas width in pixels
        #[arg(long, default_value = "1080")]
        width: f32,

        /// Export canvas height in pixels
        #[arg(long, default_value = "1350")]
        height: f32,
    },

    /// Render a session to an image file
    Render {
        /// Session JSON file
        session: PathBuf,

        /// Export canvas width in pixels
        #[arg(long, default_value = "1080")]
        width: f32,

        /// Export canvas height in pixels
        #[arg(long, default_value = "1350")]
        height: f32,

        /// Output directory
        #[arg(long, short = 'o', default_value = ".")]
        out_dir: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "svg")]
        format: FormatArg,

        /// Directory frame asset paths are relative to
        #[arg(long, env = "BREWCARD_ASSETS")]
        assets: Option<PathBuf>,

        /// Also save a copy into this directory, as the app's save button does
        #[arg(long)]
        save_to: Option<PathBuf>,
    },

    /// List available frames
    Frames,
}

/// Card presentation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresentationArg {
    /// Comma-separated flavors
    Classic,
    /// Dot-separated flavors
    Station,
}

impl From<PresentationArg> for CardPresentation {
    fn from(arg: PresentationArg) -> Self {
        match arg {
            PresentationArg::Classic => Self::Classic,
            PresentationArg::Station => Self::Station,
        }
    }
}

/// Output format flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// SVG document
    Svg,
    /// PNG raster
    Png,
}

impl From<FormatArg> for ImageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Svg => Self::Svg,
            FormatArg::Png => Self::Png,
        }
    }
}

/// Resolved configuration for a run.
#[derive(Debug, Clone)]
pub struct BrewcardConfig {
    /// Station tunables.
    pub station: StationConfig,
    /// Filter and frame catalogs.
    pub catalogs: Arc<Catalogs>,
}

impl Default for BrewcardConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BrewcardConfig {
    /// Built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            station: StationConfig::default(),
            catalogs: Arc::new(Catalogs::builtin()),
        }
    }

    /// Load the config and catalog files named by `args`.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file cannot be loaded.
    pub fn from_args(args: &CliArgs) -> CliResult<Self> {
        let station = match &args.config {
            Some(path) => StationConfig::from_json_file(path)?,
            None => StationConfig::default(),
        };
        let mut catalogs = Catalogs::builtin();
        if let Some(path) = &args.frames {
            catalogs.frames = FrameCatalog::from_json_file(path)?;
            tracing::info!("Loaded {} frames from {}", catalogs.frames.len(), path.display());
        }
        Ok(Self {
            station,
            catalogs: Arc::new(catalogs),
        })
    }
}
