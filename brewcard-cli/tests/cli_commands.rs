//! CLI Command Integration Tests
//!
//! Runs parsed command lines end to end against temporary files.

use std::path::Path;

use brewcard_cli::{run, CliArgs, CliError};
use brewcard_core::ExportBundle;
use clap::Parser;

const RECIPE: &str = r#"{
    "coffeeName": "El Salvador Pacamara",
    "roaster": "Superthing",
    "dose": "18",
    "water": "270",
    "brewMethod": "V60",
    "temperature": "92",
    "flavorNotes": ["plum", "cacao"],
    "rating": 3
}"#;

const SESSION: &str = r#"{
    "photoUri": "file:///tmp/pacamara.jpg",
    "recipe": {"coffeeName": "Pacamara", "dose": "18", "water": "270"},
    "filter": "coral-haze",
    "frameId": "squiggle",
    "cardPosition": {"x": 100, "y": 150},
    "preview": {"width": 300, "height": 300}
}"#;

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path.display().to_string()
}

async fn run_args(args: &[&str]) -> Result<String, CliError> {
    let mut argv = vec!["brewcard"];
    argv.extend_from_slice(args);
    run(CliArgs::try_parse_from(argv).expect("parse args")).await
}

#[tokio::test]
async fn test_card_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let recipe = write(dir.path(), "recipe.json", RECIPE);

    let out = run_args(&["card", &recipe, "--presentation", "classic"])
        .await
        .expect("card");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "EL SALVADOR PACAMARA");
    assert_eq!(lines[2], "18g → 270g");
    assert_eq!(lines[3], "V60  92°C");
    assert_eq!(lines[4], "plum, cacao");
    assert_eq!(lines[5], "★★★☆☆");
    assert_eq!(lines[6], "SUPERTHING");
    assert!(out.ends_with("(computed ratio 1:15.0)"));
}

#[tokio::test]
async fn test_card_station_default_separator() {
    let dir = tempfile::tempdir().expect("tempdir");
    let recipe = write(dir.path(), "recipe.json", RECIPE);
    let out = run_args(&["card", &recipe]).await.expect("card");
    assert!(out.contains("plum · cacao"));
}

#[tokio::test]
async fn test_empty_recipe_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let recipe = write(dir.path(), "recipe.json", r#"{"roaster": "Nobody"}"#);
    let err = run_args(&["card", &recipe]).await;
    assert!(matches!(err, Err(CliError::EmptyCard)));
}

#[tokio::test]
async fn test_layout_reclamps_into_frame() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = write(dir.path(), "session.json", SESSION);

    let out = run_args(&["layout", &session, "--width", "300", "--height", "300"])
        .await
        .expect("layout");
    let bundle = ExportBundle::from_json(&out).expect("bundle json");
    assert_eq!(bundle.position.x, 68.0);
    assert_eq!(bundle.position.y, 118.0);
    assert_eq!(bundle.frame_id.as_deref(), Some("squiggle"));
}

#[tokio::test]
async fn test_config_file_changes_inset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = write(dir.path(), "session.json", SESSION);
    let config = write(dir.path(), "station.json", r#"{"frame_border_inset": 0}"#);

    let out = run_args(&[
        "layout", &session, "--width", "300", "--height", "300", "--config", &config,
    ])
    .await
    .expect("layout");
    let bundle = ExportBundle::from_json(&out).expect("bundle json");
    assert_eq!(bundle.position.x, 100.0);
    assert_eq!(bundle.position.y, 150.0);
}

#[tokio::test]
async fn test_render_and_save() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = write(dir.path(), "session.json", SESSION);
    let out_dir = dir.path().join("out");
    let roll = dir.path().join("roll");

    let out = run_args(&[
        "render",
        &session,
        "--out-dir",
        &out_dir.display().to_string(),
        "--save-to",
        &roll.display().to_string(),
    ])
    .await
    .expect("render");

    let mut lines = out.lines();
    let image = lines.next().expect("path");
    assert!(image.ends_with(".svg"));
    assert!(Path::new(image).exists());
    assert_eq!(lines.next(), Some("Saved!: Image saved to your camera roll"));
    assert_eq!(std::fs::read_dir(&roll).expect("roll").count(), 1);
}

#[tokio::test]
async fn test_frames_lists_catalog() {
    let out = run_args(&["frames"]).await.expect("frames");
    assert_eq!(out.lines().count(), 39);
    assert!(out.lines().next().expect("first").starts_with("coffee-mug"));
}

#[tokio::test]
async fn test_custom_frame_catalog() {
    let dir = tempfile::tempdir().expect("tempdir");
    let frames = write(
        dir.path(),
        "frames.json",
        r#"{"frames": [{"id": "polaroid", "name": "Polaroid", "asset": "frames/polaroid.png"}]}"#,
    );
    let out = run_args(&["frames", "--frames", &frames]).await.expect("frames");
    assert_eq!(out.lines().count(), 1);
    assert!(out.starts_with("polaroid"));
}
