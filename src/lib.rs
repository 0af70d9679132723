//! Basvid compiles a video into a BAS vector-animation script.
//!
//! Every decoded frame is reduced to a small palette, split into per-color
//! binary layers, traced into vector outlines, vertically re-oriented into
//! script coordinates and finally rendered as BAS text, packed into
//! size-capped output segments.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: system `ffmpeg` turns the video into scaled RGB frames
//!    ([`extract_frames`]).
//! 2. **Classify**: median-cut quantization ([`quantize`]) plus
//!    nearest-color masks ([`split_frame`]), one mask per palette entry.
//! 3. **Trace**: each mask becomes vector outline path data ([`Tracer`],
//!    [`BorderTracer`]).
//! 4. **Generate**: per-frame BAS text with flipped Y coordinates
//!    ([`flip_path_y`], [`frame_script`]).
//! 5. **Write**: text blocks packed into numbered, size-capped segments
//!    ([`SegmentWriter`]).
//!
//! Stages 2-4 run over frames with bounded concurrency via [`run_batch`];
//! result order always follows frame order. [`run`] wires the whole thing
//! together.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod batch;
mod foundation;
mod layers;
mod media;
mod pipeline;
mod quantize;
mod script;
mod segment;
mod svgpath;
mod trace;

pub use batch::{ProgressFn, run_batch, run_batch_partial};
pub use foundation::core::{
    Canvas, ColorLayer, Frame, FrameLayers, FramePaths, LayerPaths, MASK_BLANK, MASK_INK, Rgb8,
    Rgba8,
};
pub use foundation::error::{BasvidError, BasvidResult};
pub use layers::{split_frame, split_frame_auto};
pub use media::{
    FrameStream, VideoInfo, extract_frames, extract_frames_stream, frames_from_raw,
    is_ffmpeg_on_path, probe, scaled_dimensions,
};
pub use pipeline::{RunConfig, RunSummary, frames_to_paths, run, scripts_from_paths};
pub use quantize::quantize;
pub use script::{BACKGROUND_COLOR, ScriptParams, frame_script};
pub use segment::{SegmentWriter, write_segments};
pub use svgpath::{DEFAULT_VIEW_BOX_H, flip_path_y};
pub use trace::{BorderTracer, Tracer, extract_path_data, parse_view_box};
