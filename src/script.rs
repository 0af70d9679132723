//! BAS script text generation for one traced frame.

use crate::foundation::core::{Canvas, FramePaths};
use crate::svgpath::flip_path_y;

/// Pure-black layers are the backdrop and are never emitted.
pub const BACKGROUND_COLOR: &str = "000000";

/// Timing and coordinate-space parameters shared by every frame block.
#[derive(Clone, Copy, Debug)]
pub struct ScriptParams {
    /// Script coordinate space (traced viewBox scaled x10).
    pub canvas: Canvas,
    /// Playback frame rate of the generated animation.
    pub framerate: f64,
    /// Offset subtracted from every frame's show-at time, in milliseconds.
    pub start_time_ms: f64,
}

/// Render one frame's layers into its BAS text block.
///
/// Each non-background layer becomes a named `path` declaration (unique as
/// `p{frame}_{color}`) followed by the four timed stages: appear at the
/// frame's offset, switch visible, hold for one frame duration, switch
/// invisible. Path data is flipped vertically against the canvas height on
/// the way through.
pub fn frame_script(frame: &FramePaths, params: &ScriptParams) -> String {
    let mut out = String::new();
    let Canvas { width, height } = params.canvas;

    for layer in &frame.layers {
        if layer.color == BACKGROUND_COLOR {
            continue;
        }
        let d = flip_path_y(&layer.path_data, f64::from(height));
        let name = format!("{}_{}", frame.frame_index, layer.color);
        let hold_ms = (1000.0 / params.framerate).floor() as i64;
        let show_at_ms = ((frame.frame_index as f64) / params.framerate * 1000.0
            - params.start_time_ms)
            .floor() as i64;
        let color = &layer.color;

        out.push_str(&format!(
            "\nlet p{name} = path{{d = \"{d}\" viewBox=\"0 0 {width} {height}\" width = 100% fillColor = 0x{color} alpha = 0\nborderWidth = 15\n    borderColor = 0x{color}\n}}\nset p{name} {{}} {show_at_ms}ms\nthen set p{name} {{alpha = 1}} 0ms\nthen set p{name} {{}} {hold_ms}ms\nthen set p{name} {{alpha = 0}} 0ms\n"
        ));
    }

    out
}

#[cfg(test)]
#[path = "../tests/unit/script.rs"]
mod tests;
