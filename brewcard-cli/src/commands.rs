//! Subcommand implementations. Each returns the text to print.

use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

use brewcard_core::{
    BrewError, CardContentFormatter, CardPresentation, ExportBundle, RecipeFields, Size,
};
use brewcard_export::{
    DirectoryLibrary, ExportCoordinator, ExportError, ImageFormat, NoShareTarget,
    SvgCaptureConfig, SvgLayoutCapture, ViewCapture, ViewMount,
};
use thiserror::Error;

use crate::{BrewcardConfig, CliArgs, Command, SessionFile};

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Composition, config or payload error.
    #[error(transparent)]
    Brew(#[from] BrewError),

    /// Capture or save error.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The recipe has nothing worth a card.
    #[error("Recipe has no coffee name, dose or brew method; no card to show")]
    EmptyCard,
}

/// Run a parsed command line.
///
/// # Errors
///
/// Returns an error if loading inputs or executing the command fails.
pub async fn run(args: CliArgs) -> CliResult<String> {
    let config = BrewcardConfig::from_args(&args)?;
    match args.command {
        Command::Card {
            recipe,
            presentation,
            json,
        } => card(
            &recipe,
            presentation.map_or(config.station.presentation, CardPresentation::from),
            json,
        ),
        Command::Layout {
            session,
            width,
            height,
        } => layout(&config, &session, Size::new(width, height))
            .and_then(|bundle| bundle.to_json().map_err(CliError::from)),
        Command::Render {
            session,
            width,
            height,
            out_dir,
            format,
            assets,
            save_to,
        } => {
            let bundle = layout(&config, &session, Size::new(width, height))?;
            let mut capture_config = SvgCaptureConfig::new(out_dir);
            capture_config.format = ImageFormat::from(format);
            capture_config.asset_root = assets;
            render(
                SvgLayoutCapture::new(capture_config),
                &bundle,
                save_to.as_deref(),
            )
            .await
        }
        Command::Frames => Ok(frames(&config)),
    }
}

fn card(recipe: &Path, presentation: CardPresentation, json: bool) -> CliResult<String> {
    let recipe = RecipeFields::from_payload(&std::fs::read_to_string(recipe)?)?;
    let content = CardContentFormatter::new(presentation)
        .format(&recipe)
        .ok_or(CliError::EmptyCard)?;

    if json {
        return Ok(serde_json::to_string_pretty(&content).map_err(BrewError::from)?);
    }
    let mut out = content.texts().join("\n");
    if let Some(ratio) = recipe.computed_ratio() {
        let _ = write!(out, "\n\n(computed ratio {ratio})");
    }
    Ok(out)
}

fn layout(config: &BrewcardConfig, session: &Path, export_canvas: Size) -> CliResult<ExportBundle> {
    let session = SessionFile::load(session)?;
    let model = session.to_composition(config.station.clone(), Arc::clone(&config.catalogs))?;
    let bundle = model.finalize(&session.recipe, export_canvas)?;
    tracing::debug!(
        "Card at ({:.1}, {:.1}) in {}x{} container",
        bundle.position.x,
        bundle.position.y,
        bundle.container_size.width,
        bundle.container_size.height
    );
    Ok(bundle)
}

async fn render(
    capture: SvgLayoutCapture,
    bundle: &ExportBundle,
    save_to: Option<&Path>,
) -> CliResult<String> {
    let Some(library_dir) = save_to else {
        let image = capture.capture(bundle).await?;
        return Ok(image.path.display().to_string());
    };

    let coordinator = ExportCoordinator::new(
        Arc::new(capture),
        Arc::new(NoShareTarget),
        Arc::new(DirectoryLibrary::new(library_dir)),
    );
    let outcome = coordinator.save(bundle, &ViewMount::new()).await?;
    let mut out = outcome.image().path.display().to_string();
    if let Some(notice) = outcome.notice() {
        let _ = write!(out, "\n{}: {}", notice.title, notice.message);
    }
    Ok(out)
}

fn frames(config: &BrewcardConfig) -> String {
    let mut out = String::new();
    for frame in config.catalogs.frames.iter() {
        let _ = writeln!(out, "{:<24} {:<16} {}", frame.id, frame.name, frame.asset);
    }
    out
}
