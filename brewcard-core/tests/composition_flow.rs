//! Composition Flow Integration Tests
//!
//! Walks a composition from an empty canvas to a finalized export bundle:
//! - Photo gating
//! - Filter and frame selection
//! - Card dragging through raw touch events
//! - Rescaling onto the export canvas
//! - Card content and suppression

use std::sync::Arc;

use brewcard_core::{
    BrewError, CardLine, CardPresentation, CardTheme, Catalogs, CompositionModel,
    CompositionStage, DragOutcome, FilterName, FrameAsset, FrameCatalog, Layer, Offset, Position,
    RecipeFields, Size, StationConfig, TouchEvent, TouchPhase, TouchPoint,
};

fn recipe() -> RecipeFields {
    RecipeFields {
        coffee_name: "Kenya Nyeri".to_string(),
        roaster: "Superthing".to_string(),
        dose: "15".to_string(),
        water: "250".to_string(),
        ratio: "1:16.7".to_string(),
        brew_method: "Kalita".to_string(),
        temperature: "94".to_string(),
        brew_time: "3:00".to_string(),
        flavor_notes: vec!["blackcurrant".to_string(), "tomato".to_string()],
        rating: 5,
        ..RecipeFields::default()
    }
}

fn touch(phase: TouchPhase, id: u32, x: f32, y: f32, ts: u64) -> TouchEvent {
    TouchEvent::new(phase, vec![TouchPoint::new(id, x, y)], ts)
}

#[test]
fn test_full_station_session() {
    let mut model = CompositionModel::with_defaults(Size::new(343.0, 429.0));
    assert_eq!(model.stage(), CompositionStage::Empty);

    model.load_photo("file:///tmp/latte.jpg").expect("photo");
    assert_eq!(model.stage(), CompositionStage::PhotoLoaded);
    assert_eq!(model.filter(), FilterName::CoralHaze);

    model.set_filter(FilterName::FilmGrain).expect("filter");
    model.set_frame(Some("two-hands-down")).expect("frame");
    model.set_card_theme(CardTheme::Dark).expect("theme");

    // Drag the card far past the bottom-right corner.
    let start = model.card_position();
    assert_eq!(
        model
            .handle_card_touch(&touch(TouchPhase::Start, 1, 50.0, 120.0, 0))
            .expect("start"),
        DragOutcome::Started
    );
    assert!(model.is_card_dragging());
    let moved = model
        .handle_card_touch(&touch(TouchPhase::Move, 1, 900.0, 900.0, 16))
        .expect("move");
    let container = model.card_container();
    let max = Position::new(
        container.width - model.card_size().width,
        container.height - model.card_size().height,
    );
    assert_eq!(moved, DragOutcome::Moved(max));
    // The committed position only changes on release.
    assert_eq!(model.card_position(), start);

    let ended = model
        .handle_card_touch(&touch(TouchPhase::End, 1, 900.0, 900.0, 32))
        .expect("end");
    assert_eq!(ended, DragOutcome::Committed(max));
    assert!(model.is_card_positioned());

    let bundle = model
        .finalize(&recipe(), Size::new(1080.0, 1350.0))
        .expect("finalize");
    assert_eq!(bundle.filter, FilterName::FilmGrain);
    assert_eq!(bundle.frame_id.as_deref(), Some("two-hands-down"));
    assert_eq!(bundle.card_theme, CardTheme::Dark);

    // The card hugs the bottom-right of the export container too.
    let right = bundle.position.x + bundle.card_size.width;
    let bottom = bundle.position.y + bundle.card_size.height;
    assert!(right <= bundle.container_size.width + 1e-3);
    assert!(bottom <= bundle.container_size.height + 1e-3);
    assert!((right - bundle.container_size.width).abs() < 1.0);

    let card = bundle.card.expect("card");
    assert_eq!(card.lines.first(), Some(&CardLine::Title("KENYA NYERI".to_string())));
    assert_eq!(
        card.lines.last(),
        Some(&CardLine::Watermark("SUPERTHING".to_string()))
    );
}

#[test]
fn test_second_finger_does_not_steal_drag() {
    let mut model = CompositionModel::with_defaults(Size::new(300.0, 400.0));
    model.load_photo("file:///tmp/a.jpg").expect("photo");
    model
        .commit_card_position(Position::new(10.0, 10.0))
        .expect("commit");

    model
        .handle_card_touch(&touch(TouchPhase::Start, 1, 0.0, 0.0, 0))
        .expect("start");
    assert_eq!(
        model
            .handle_card_touch(&touch(TouchPhase::Start, 2, 5.0, 5.0, 5))
            .expect("second start"),
        DragOutcome::Ignored
    );
    assert_eq!(
        model
            .handle_card_touch(&touch(TouchPhase::Move, 2, 50.0, 50.0, 10))
            .expect("foreign move"),
        DragOutcome::Ignored
    );
    let outcome = model
        .handle_card_touch(&touch(TouchPhase::Move, 1, 20.0, 30.0, 16))
        .expect("move");
    assert_eq!(outcome, DragOutcome::Moved(Position::new(30.0, 40.0)));
}

#[test]
fn test_cancel_commits_last_position() {
    let mut model = CompositionModel::with_defaults(Size::new(300.0, 400.0));
    model.load_photo("file:///tmp/a.jpg").expect("photo");
    model
        .commit_card_position(Position::new(0.0, 0.0))
        .expect("commit");

    model.begin_card_drag().expect("begin");
    model.drag_card(Offset::new(40.0, 60.0)).expect("drag");
    let outcome = model
        .handle_card_touch(&touch(TouchPhase::Cancel, 0, 0.0, 0.0, 20))
        .expect("cancel");
    assert_eq!(outcome, DragOutcome::Committed(Position::new(40.0, 60.0)));
    assert_eq!(model.card_position(), Position::new(40.0, 60.0));
}

#[test]
fn test_commit_rejected_mid_drag() {
    let mut model = CompositionModel::with_defaults(Size::new(300.0, 400.0));
    model.load_photo("file:///tmp/a.jpg").expect("photo");
    model.begin_card_drag().expect("begin");
    assert!(matches!(
        model.commit_card_position(Position::new(1.0, 1.0)),
        Err(BrewError::DragInProgress)
    ));
    assert!(matches!(model.begin_card_drag(), Err(BrewError::DragInProgress)));
    model.end_card_drag().expect("end");
    assert!(matches!(model.end_card_drag(), Err(BrewError::NoActiveDrag)));
}

#[test]
fn test_card_lifts_while_held() {
    let mut model = CompositionModel::with_defaults(Size::new(300.0, 400.0));
    model.load_photo("file:///tmp/a.jpg").expect("photo");
    let recipe = recipe();

    model.begin_card_drag().expect("begin");
    let lifted = model
        .layers(&recipe)
        .into_iter()
        .find_map(|l| match l {
            Layer::Card { scale, .. } => Some(scale),
            _ => None,
        })
        .expect("card layer");
    assert!((lifted - 1.02).abs() < f32::EPSILON);

    model.end_card_drag().expect("end");
    let resting = model
        .layers(&recipe)
        .into_iter()
        .find_map(|l| match l {
            Layer::Card { scale, .. } => Some(scale),
            _ => None,
        })
        .expect("card layer");
    assert!((resting - 1.0).abs() < f32::EPSILON);
}

#[test]
fn test_empty_recipe_has_no_card_layer_or_content() {
    let mut model = CompositionModel::with_defaults(Size::new(300.0, 400.0));
    model.load_photo("file:///tmp/a.jpg").expect("photo");
    let recipe = RecipeFields {
        roaster: "Only a roaster".to_string(),
        rating: 3,
        ..RecipeFields::default()
    };
    assert!(model.card_content(&recipe).is_none());
    assert!(!model
        .layers(&recipe)
        .iter()
        .any(|l| matches!(l, Layer::Card { .. })));

    let bundle = model
        .finalize(&recipe, Size::new(600.0, 800.0))
        .expect("finalize");
    assert!(bundle.card.is_none());
}

#[test]
fn test_custom_catalog_and_config() {
    let config = StationConfig {
        card_size: Size::new(100.0, 50.0),
        frame_border_inset: 10.0,
        default_filter: FilterName::None,
        presentation: CardPresentation::Classic,
        ..StationConfig::default()
    };
    let catalogs = Catalogs {
        frames: FrameCatalog::new(vec![FrameAsset::new(
            "polaroid",
            "Polaroid",
            "frames/polaroid.png",
        )]),
        ..Catalogs::builtin()
    };
    let mut model = CompositionModel::new(Size::new(200.0, 200.0), config, Arc::new(catalogs));
    model.load_photo("file:///tmp/a.jpg").expect("photo");

    assert!(matches!(
        model.set_frame(Some("squiggle")),
        Err(BrewError::UnknownFrame(_))
    ));
    model.set_frame(Some("polaroid")).expect("frame");
    assert_eq!(model.card_container(), Size::new(180.0, 180.0));
    assert_eq!(model.card_container_origin(), Position::new(10.0, 10.0));

    let card = model.card_content(&recipe()).expect("card");
    assert!(card
        .lines
        .contains(&CardLine::Flavors("blackcurrant, tomato".to_string())));
}

#[test]
fn test_bundle_json_round_trip() {
    let mut model = CompositionModel::with_defaults(Size::new(300.0, 375.0));
    model.load_photo("file:///tmp/a.jpg").expect("photo");
    model.set_frame(Some("squiggle")).expect("frame");
    let bundle = model
        .finalize(&recipe(), Size::new(1200.0, 1500.0))
        .expect("finalize");

    let json = bundle.to_json().expect("json");
    assert!(json.contains("\"frame_asset\": \"frames/squiggle.png\""));
    let parsed = brewcard_core::ExportBundle::from_json(&json).expect("parse");
    assert_eq!(parsed, bundle);
}
