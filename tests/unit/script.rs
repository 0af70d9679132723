use super::*;

fn params() -> ScriptParams {
    ScriptParams {
        canvas: Canvas {
            width: 960,
            height: 720,
        },
        framerate: 10.0,
        start_time_ms: 0.0,
    }
}

fn frame(index: usize, layers: Vec<(&str, &str)>) -> FramePaths {
    FramePaths {
        frame_index: index,
        layers: layers
            .into_iter()
            .map(|(color, d)| crate::foundation::core::LayerPaths {
                color: color.to_string(),
                path_data: d.to_string(),
            })
            .collect(),
    }
}

#[test]
fn background_black_layers_are_skipped() {
    let f = frame(0, vec![("000000", "M0 0 Z"), ("FF0000", "M0 0 Z")]);
    let out = frame_script(&f, &params());
    assert!(!out.contains("000000"));
    assert!(out.contains("p0_FF0000"));
}

#[test]
fn timing_follows_frame_index_and_framerate() {
    let f = frame(3, vec![("FF0000", "M0 0 Z")]);
    let out = frame_script(&f, &params());
    // show-at = 3 / 10 * 1000 = 300ms, hold = 1000 / 10 = 100ms
    assert!(out.contains("set p3_FF0000 {} 300ms"));
    assert!(out.contains("then set p3_FF0000 {alpha = 1} 0ms"));
    assert!(out.contains("then set p3_FF0000 {} 100ms"));
    assert!(out.contains("then set p3_FF0000 {alpha = 0} 0ms"));
}

#[test]
fn start_time_shifts_the_offset() {
    let mut p = params();
    p.start_time_ms = 500.0;
    let f = frame(3, vec![("FF0000", "M0 0 Z")]);
    assert!(frame_script(&f, &p).contains("set p3_FF0000 {} -200ms"));
}

#[test]
fn declaration_carries_canvas_and_colors() {
    let f = frame(0, vec![("00FF00", "M0 0 Z")]);
    let out = frame_script(&f, &params());
    assert!(out.contains("viewBox=\"0 0 960 720\""));
    assert!(out.contains("fillColor = 0x00FF00"));
    assert!(out.contains("borderColor = 0x00FF00"));
    assert!(out.contains("width = 100%"));
    assert!(out.contains("borderWidth = 15"));
}

#[test]
fn path_data_is_flipped_against_canvas_height() {
    let f = frame(0, vec![("0000FF", "M0 0 L1 1 Z")]);
    let out = frame_script(&f, &params());
    assert!(out.contains("d = \"M 0 720 L 1 719 Z\""));
}

#[test]
fn names_are_unique_per_frame_and_color() {
    let f0 = frame(0, vec![("FF0000", "M0 0 Z"), ("00FF00", "M0 0 Z")]);
    let f1 = frame(1, vec![("FF0000", "M0 0 Z")]);
    let out0 = frame_script(&f0, &params());
    let out1 = frame_script(&f1, &params());
    assert!(out0.contains("let p0_FF0000"));
    assert!(out0.contains("let p0_00FF00"));
    assert!(out1.contains("let p1_FF0000"));
}
