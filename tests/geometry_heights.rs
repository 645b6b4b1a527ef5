// tests/geometry_heights.rs
use glam::Vec2;
use pnp_gcode::emitter::dwell_ms;
use pnp_gcode::{
    AngleScale, Board, BoardFrame, Calibration, HeightSequencer, Pad, Part, PnpConfig, Tape,
    normalize_degrees, preamble_height,
};
use proptest::prelude::*;

const EPS: f32 = 1e-4;
const UNIT_EPS: f64 = 1e-9;

fn setup() -> (PnpConfig, Calibration) {
    let config = PnpConfig {
        board: Board {
            origin: Vec2::new(10.0, 20.0),
            top: 5.0,
            extent: Vec2::ZERO,
        },
        bed_level: 0.0,
        ..Default::default()
    };
    (config, Calibration::default())
}

fn part_at(pos: Vec2, angle: f32) -> Part {
    Part {
        component_name: "U1".to_string(),
        footprint: "SOIC8".to_string(),
        value: "NE555".to_string(),
        pos,
        angle,
        pads: Vec::new(),
    }
}

fn pad_at(pos: Vec2) -> Pad {
    Pad {
        name: "1".to_string(),
        pos,
        size: Vec2::new(1.0, 1.0),
    }
}

#[test]
fn test_normalize_boundaries() {
    assert_eq!(normalize_degrees(0.0), 0.0);
    assert_eq!(normalize_degrees(360.0), 0.0);
    assert_eq!(normalize_degrees(-10.0), 350.0);
    assert_eq!(normalize_degrees(370.0), 10.0);
    assert_eq!(normalize_degrees(-720.0), 0.0);
    assert!(normalize_degrees(-1e-7) < 360.0);
    assert!(normalize_degrees(f64::NAN).is_nan());
}

#[test]
fn test_place_angle_delta_wraps() {
    let scale = AngleScale::new(Calibration::default().angle_factor());
    let expected = scale.factor * 330.0;
    assert!((scale.place(350.0, 20.0) - expected).abs() < UNIT_EPS);
    assert!((scale.place(20.0, 50.0) - scale.factor * 330.0).abs() < UNIT_EPS);
    assert_eq!(scale.place(90.0, 90.0), 0.0);
}

#[test]
fn test_full_turn_maps_to_motor_units() {
    let calibration = Calibration::default();
    let scale = AngleScale::new(calibration.angle_factor());
    assert!((scale.factor * 360.0 - calibration.rotation_units_per_turn).abs() < UNIT_EPS);
    assert_eq!(scale.pick(360.0), 0.0);
}

#[test]
fn test_rotation_field_rounding() {
    // The third decimal sits close to a rounding boundary at these angles.
    let scale = AngleScale::new(Calibration::default().angle_factor());
    assert_eq!(format!("{:.3}", scale.place(90.0, 0.0)), "12.587");
    assert_eq!(format!("{:.3}", scale.place(196.6, 0.0)), "27.496");
    assert_eq!(format!("{:.3}", scale.place(268.1, 0.0)), "37.496");
    assert_eq!(format!("{:.3}", scale.place(339.6, 0.0)), "47.496");
    assert_eq!(format!("{:.3}", scale.place(350.0, 0.0)), "48.951");
}

#[test]
fn test_place_position_ignores_part_rotation() {
    let frame = BoardFrame::new(Vec2::new(10.0, 20.0));
    let part = part_at(Vec2::new(3.0, 4.0), 45.0);
    assert_eq!(frame.place(&part), Vec2::new(13.0, 24.0));
}

#[test]
fn test_pad_offset_unrotated_at_zero() {
    let frame = BoardFrame::new(Vec2::new(10.0, 20.0));
    let part = part_at(Vec2::new(3.0, 4.0), 0.0);
    let pos = frame.pad(&part, &pad_at(Vec2::new(2.0, -1.5)));
    assert!(pos.abs_diff_eq(Vec2::new(15.0, 22.5), EPS));
}

#[test]
fn test_pad_offset_rotated_quarter_turn() {
    let frame = BoardFrame::new(Vec2::new(10.0, 20.0));
    let part = part_at(Vec2::new(3.0, 4.0), 90.0);

    let pos = frame.pad(&part, &pad_at(Vec2::new(2.0, 0.0)));
    assert!(pos.abs_diff_eq(Vec2::new(13.0, 26.0), EPS), "got {pos}");

    // x' = -pad_y, y' = pad_x
    let pos = frame.pad(&part, &pad_at(Vec2::new(1.5, 0.5)));
    assert!(pos.abs_diff_eq(Vec2::new(12.5, 25.5), EPS), "got {pos}");
}

#[test]
fn test_height_example() {
    let (config, calibration) = setup();
    let heights = HeightSequencer::new(&config, &calibration);

    assert_eq!(heights.board_thickness(), 5.0);
    let pick = heights.pick(2.0);
    assert_eq!(pick.contact, 2.0);
    assert_eq!(pick.approach, 12.0);
    assert_eq!(pick.travel, 17.0);

    let place = heights.place(2.0);
    assert_eq!(place.travel, 17.0);
    assert_eq!(place.contact, 7.0);
    assert_eq!(place.ascend, 17.0);
}

#[test]
fn test_spring_compensation_lowers_place_contact() {
    let (config, mut calibration) = setup();
    calibration.spring_compensation = 0.5;
    let heights = HeightSequencer::new(&config, &calibration);
    assert_eq!(heights.place(2.0).contact, 6.5);
    assert_eq!(heights.place(2.0).travel, 17.0);
}

#[test]
fn test_dispense_heights_are_board_relative() {
    let (mut config, calibration) = setup();
    config.bed_level = 1.0;
    config.board.top = 2.6;
    let heights = HeightSequencer::new(&config, &calibration).dispense();

    assert!((heights.hover - 4.6).abs() < EPS);
    assert!((heights.dispense - 2.9).abs() < EPS);
    assert!((heights.separate - 7.6).abs() < EPS);
    assert!(heights.separate > heights.hover && heights.hover > heights.dispense);
}

#[test]
fn test_preamble_height_uses_board_when_tapes_are_lower() {
    let (mut config, _) = setup();
    assert_eq!(preamble_height(&config, 10.0), 15.0);

    config.tapes.insert(
        "TALL@1".to_string(),
        Tape::new(Vec2::ZERO, Vec2::X, 1, 8.0, 0.0),
    );
    config.tapes.insert(
        "LOW@1".to_string(),
        Tape::new(Vec2::ZERO, Vec2::X, 1, 1.0, 0.0),
    );
    assert_eq!(preamble_height(&config, 10.0), 18.0);
}

proptest! {
    #[test]
    fn normalized_angle_in_range(angle in -10_000.0f64..10_000.0) {
        let normalized = normalize_degrees(angle);
        prop_assert!((0.0..360.0).contains(&normalized));
    }

    #[test]
    fn scaled_angle_in_unit_range(angle in -10_000.0f32..10_000.0) {
        let calibration = Calibration::default();
        let units = AngleScale::new(calibration.angle_factor()).units(angle);
        prop_assert!(units >= 0.0);
        prop_assert!(units <= calibration.rotation_units_per_turn);
    }

    #[test]
    fn pick_ascend_matches_place_travel(
        tape_height in -5.0f32..50.0,
        top in 0.0f32..20.0,
        bed in -5.0f32..5.0,
    ) {
        let (mut config, calibration) = setup();
        config.board.top = top;
        config.bed_level = bed;
        let heights = HeightSequencer::new(&config, &calibration);
        prop_assert_eq!(heights.pick(tape_height).travel, heights.place(tape_height).travel);
        prop_assert_eq!(heights.place(tape_height).ascend, heights.place(tape_height).travel);
    }

    #[test]
    fn dwell_never_decreases_with_area(
        init in 0.0f32..200.0,
        per_area in 0.0f32..50.0,
        a in 0.0f32..100.0,
        b in 0.0f32..100.0,
    ) {
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(dwell_ms(init, per_area, small) <= dwell_ms(init, per_area, large));
    }
}
