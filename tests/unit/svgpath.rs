use super::*;

#[test]
fn absolute_commands_mirror_y_against_height() {
    assert_eq!(flip_path_y("M10 20 L30 40", 100.0), "M 10 80 L 30 60");
}

#[test]
fn relative_commands_negate_y_deltas() {
    assert_eq!(flip_path_y("v 15", 100.0), "v -15");
    assert_eq!(flip_path_y("l 3 -4", 100.0), "l 3 4");
}

#[test]
fn horizontal_commands_pass_through() {
    assert_eq!(flip_path_y("H5 h-3", 100.0), "H 5 h -3");
}

#[test]
fn vertical_param_is_the_y_value() {
    assert_eq!(flip_path_y("V 30", 100.0), "V 70");
}

#[test]
fn arc_transforms_only_the_endpoint_y() {
    assert_eq!(
        flip_path_y("A 25 25 -30 0 1 50 -25", 100.0),
        "A 25 25 -30 0 1 50 125"
    );
    assert_eq!(
        flip_path_y("a 25 25 -30 0 1 50 -25", 100.0),
        "a 25 25 -30 0 1 50 25"
    );
}

#[test]
fn implicit_repeated_groups_use_the_command_case() {
    assert_eq!(flip_path_y("L10 20 30 40", 100.0), "L 10 80 30 60");
    assert_eq!(flip_path_y("l1 2 3 4", 100.0), "l 1 -2 3 -4");
}

#[test]
fn cubic_flips_every_y_slot() {
    assert_eq!(
        flip_path_y("C1 2 3 4 5 6", 100.0),
        "C 1 98 3 96 5 94"
    );
}

#[test]
fn commas_and_whitespace_are_interchangeable_separators() {
    assert_eq!(flip_path_y("M10,20L30,40", 100.0), "M 10 80 L 30 60");
}

#[test]
fn flip_is_an_involution() {
    let d = "M10 20 C1 2 3 4 5 6 v 9 A 1 2 3 0 1 4 5 Z";
    let once = flip_path_y(d, 100.0);
    let twice = flip_path_y(&once, 100.0);
    // The numeric content returns to the original after two flips.
    assert_eq!(twice, "M 10 20 C 1 2 3 4 5 6 v 9 A 1 2 3 0 1 4 5 Z");
    assert_eq!(flip_path_y(&twice, 100.0), once);
}

#[test]
fn exponent_notation_is_accepted() {
    assert_eq!(flip_path_y("L1e2 2e1", 100.0), "L 100 80");
}

#[test]
fn zero_height_falls_back_to_default_view_box() {
    assert_eq!(flip_path_y("V 0", 0.0), format!("V {DEFAULT_VIEW_BOX_H}"));
}

#[test]
fn unknown_bytes_are_dropped_not_fatal() {
    assert_eq!(flip_path_y("M10 # 20", 100.0), "M 10 80");
}

#[test]
fn numbers_before_any_command_are_dropped() {
    assert_eq!(flip_path_y("1 2 M3 4", 100.0), "M 3 96");
}

#[test]
fn z_takes_no_parameters() {
    assert_eq!(flip_path_y("M1 2 Z", 100.0), "M 1 98 Z");
}

#[test]
fn output_uses_shortest_round_trip_formatting() {
    // 99.9 - 0.4 style results must not grow unbounded digits on repeated
    // passes; Display already yields the shortest round-trip form.
    assert_eq!(flip_path_y("M1.5 0.25", 100.0), "M 1.5 99.75");
    assert_eq!(flip_path_y("M2.0 10.50", 100.0), "M 2 89.5");
}
