//! Property tests for clamping, rescaling, quantization and card suppression.

use brewcard_core::{
    BoundedDragController, CardContentFormatter, CardLine, CoordinateScaler, Offset, Position,
    QuantizedRange, RecipeFields, Size, StepDirection, Travel,
};
use proptest::prelude::*;

fn arb_size(lo: f32, hi: f32) -> impl Strategy<Value = Size> {
    (lo..hi, lo..hi).prop_map(|(w, h)| Size::new(w, h))
}

fn arb_range() -> impl Strategy<Value = QuantizedRange> {
    (-500.0f32..500.0, 1u32..400, prop_oneof![Just(0.1f32), Just(0.5), Just(1.0), Just(5.0)])
        .prop_map(|(min, steps, step)| {
            #[allow(clippy::cast_precision_loss)]
            let max = min + steps as f32 * step;
            QuantizedRange::new(min, max, step).expect("valid range")
        })
}

fn on_grid(range: &QuantizedRange, value: f32) -> bool {
    let k = (value - range.min()) / range.step_size();
    (k - k.round()).abs() < 1e-2
}

proptest! {
    #[test]
    fn prop_drag_never_leaves_container(
        container in arb_size(50.0, 2000.0),
        element in arb_size(1.0, 600.0),
        start in (-1000.0f32..3000.0, -1000.0f32..3000.0),
        moves in prop::collection::vec((-5000.0f32..5000.0, -5000.0f32..5000.0), 1..20),
    ) {
        let mut controller = BoundedDragController::default();
        controller.set_committed(Position::new(start.0, start.1), container, element);
        prop_assert!(controller.committed().is_within(container, element));

        controller.start().expect("start");
        for (dx, dy) in moves {
            let live = controller
                .update(Offset::new(dx, dy), container, element)
                .expect("update");
            prop_assert!(live.is_within(container, element));
            prop_assert!(live.x >= 0.0 && live.y >= 0.0);
        }
        let committed = controller.end().expect("end");
        prop_assert!(committed.is_within(container, element));
    }

    #[test]
    fn prop_shrinking_container_reclamps(
        container in arb_size(200.0, 1000.0),
        element in arb_size(10.0, 150.0),
        inset in 0.0f32..80.0,
        pos in (0.0f32..1000.0, 0.0f32..1000.0),
    ) {
        let mut controller = BoundedDragController::default();
        controller.set_committed(Position::new(pos.0, pos.1), container, element);
        let shrunk = container.inset(inset);
        controller.reclamp(shrunk, element);
        prop_assert!(controller.committed().is_within(shrunk, element));
    }

    #[test]
    fn prop_rescale_round_trip(
        source in 100.0f32..2000.0,
        target in 100.0f32..4000.0,
        x in 0.0f32..2000.0,
        y in 0.0f32..2000.0,
    ) {
        let scaler = CoordinateScaler::new(source, target).expect("scaler");
        let p = Position::new(x, y);
        let back = scaler.inverse().apply(scaler.apply(p));
        prop_assert!((back.x - x).abs() <= x.abs() * 1e-4 + 1e-3);
        prop_assert!((back.y - y).abs() <= y.abs() * 1e-4 + 1e-3);
    }

    #[test]
    fn prop_continuous_values_are_on_grid(range in arb_range(), signal in -400.0f32..400.0) {
        let value = range.continuous_to_value(signal, Travel::ROTARY);
        prop_assert!(value >= range.min() && value <= range.max());
        prop_assert!(on_grid(&range, value));
    }

    #[test]
    fn prop_steps_stay_in_bounds(range in arb_range(), taps in 0usize..600, up in any::<bool>()) {
        let direction = if up { StepDirection::Increment } else { StepDirection::Decrement };
        let mut value = range.min();
        for _ in 0..taps {
            value = range.step(direction, value);
            prop_assert!(value >= range.min() && value <= range.max());
            prop_assert!(on_grid(&range, value));
        }
    }

    #[test]
    fn prop_typed_values_snap(range in arb_range(), typed in -2000.0f32..2000.0) {
        let value = range.parse_typed_value(&typed.to_string()).expect("numeric");
        prop_assert!(value >= range.min() && value <= range.max());
        prop_assert!(on_grid(&range, value));
    }

    #[test]
    fn prop_card_needs_name_dose_or_method(
        roaster in "[a-zA-Z ]{0,12}",
        water in "[0-9]{0,3}",
        grind in "[a-z]{0,8}",
        rating in 0u8..8,
        notes in prop::collection::vec("[a-z]{1,8}", 0..4),
    ) {
        let recipe = RecipeFields {
            roaster,
            water,
            grind_size: grind,
            rating,
            flavor_notes: notes,
            ..RecipeFields::default()
        };
        prop_assert!(CardContentFormatter::default().format(&recipe).is_none());
    }

    #[test]
    fn prop_card_ends_with_watermark(name in "[a-zA-Z]{1,20}", rating in 0u8..8) {
        let recipe = RecipeFields {
            coffee_name: name.clone(),
            rating,
            ..RecipeFields::default()
        };
        let card = CardContentFormatter::default().format(&recipe).expect("card");
        prop_assert_eq!(card.lines.first(), Some(&CardLine::Title(name.to_uppercase())));
        prop_assert_eq!(
            card.lines.last(),
            Some(&CardLine::Watermark("SUPERTHING".to_string()))
        );
    }
}

#[test]
fn test_step_boundary_scenario() {
    let range = QuantizedRange::new(0.0, 10.0, 0.5).expect("range");
    assert!((range.step(StepDirection::Increment, 9.5) - 10.0).abs() < f32::EPSILON);
    assert!((range.step(StepDirection::Increment, 10.0) - 10.0).abs() < f32::EPSILON);
    assert!((range.step(StepDirection::Decrement, 0.0)).abs() < f32::EPSILON);
}
