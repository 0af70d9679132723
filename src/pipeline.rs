//! End-to-end orchestration: decode, classify, trace, generate, write.
//!
//! Stages are embarrassingly parallel across frames and are driven by the
//! batch runner; the only cross-frame value is the script canvas, derived
//! once from the first traced layer and read-only afterwards.

use std::path::PathBuf;

use tracing::info;

use crate::batch::run_batch;
use crate::foundation::{
    core::{Canvas, Frame, FramePaths, LayerPaths, Rgba8},
    error::{BasvidError, BasvidResult},
};
use crate::layers::{split_frame, split_frame_auto};
use crate::media;
use crate::script::{ScriptParams, frame_script};
use crate::segment::SegmentWriter;
use crate::trace::{Tracer, extract_path_data, parse_view_box};

/// Everything a pipeline run needs to know.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Source video path.
    pub video_path: PathBuf,
    /// Target extraction frame rate; values <= 0 fall back to 1.
    pub fps: i32,
    /// Maximum output width in source pixels; height follows the aspect.
    pub max_width: u32,
    /// Target palette size per frame.
    pub colors: usize,
    /// Output path prefix; segments are written as `{prefix}_{n}.{ext}`.
    pub out_prefix: String,
    /// Output file extension.
    pub out_ext: String,
    /// Maximum segment size in bytes.
    pub max_segment_bytes: usize,
    /// Concurrency level for the per-frame stages.
    pub jobs: usize,
    /// Serial mode: one frame in flight, intermediates dropped eagerly.
    pub low_memory: bool,
    /// Fixed palette to classify against instead of quantizing per frame.
    pub palette: Option<Vec<Rgba8>>,
}

impl RunConfig {
    /// Config with the standard defaults (fps 10, width 96, 4 colors,
    /// 2 MiB segments, 4 jobs).
    pub fn new(video_path: impl Into<PathBuf>, out_prefix: impl Into<String>) -> Self {
        Self {
            video_path: video_path.into(),
            fps: 10,
            max_width: 96,
            colors: 4,
            out_prefix: out_prefix.into(),
            out_ext: "bas".to_string(),
            max_segment_bytes: 2 * 1024 * 1024,
            jobs: 4,
            low_memory: false,
            palette: None,
        }
    }

    /// Reject configurations no stage can work with.
    pub fn validate(&self) -> BasvidResult<()> {
        if self.colors == 0 {
            return Err(BasvidError::invalid_input("colors must be >= 1"));
        }
        if self.max_segment_bytes == 0 {
            return Err(BasvidError::invalid_input("max segment size must be >= 1"));
        }
        if self.out_prefix.is_empty() {
            return Err(BasvidError::invalid_input("output prefix must be set"));
        }
        if let Some(p) = &self.palette {
            if p.is_empty() {
                return Err(BasvidError::invalid_input("supplied palette is empty"));
            }
        }
        Ok(())
    }

    fn effective_jobs(&self) -> usize {
        if self.low_memory { 1 } else { self.jobs.max(1) }
    }

    fn framerate(&self) -> f64 {
        f64::from(if self.fps <= 0 { 1 } else { self.fps })
    }
}

/// What a completed run produced.
#[derive(Clone, Copy, Debug)]
pub struct RunSummary {
    /// Frames processed.
    pub frames: usize,
    /// Output segments written.
    pub segments: usize,
    /// Script coordinate space used.
    pub canvas: Canvas,
}

fn stage_context(stage: &'static str, frame: usize) -> impl Fn(BasvidError) -> BasvidError {
    move |e| match e {
        BasvidError::InvalidInput(m) => {
            BasvidError::InvalidInput(format!("{stage}, frame {frame}: {m}"))
        }
        BasvidError::Decode(m) => BasvidError::Decode(format!("{stage}, frame {frame}: {m}")),
        BasvidError::Trace(m) => BasvidError::Trace(format!("{stage}, frame {frame}: {m}")),
        BasvidError::Parse(m) => BasvidError::Parse(format!("{stage}, frame {frame}: {m}")),
        BasvidError::Io(m) => BasvidError::Io(format!("{stage}, frame {frame}: {m}")),
        BasvidError::Other(e) => BasvidError::Other(e.context(format!("{stage}, frame {frame}"))),
    }
}

/// Classify and trace one frame, returning its normalized layer paths and
/// the viewBox of its first traced layer.
fn compile_frame(
    frame: &Frame,
    cfg: &RunConfig,
    tracer: &dyn Tracer,
) -> BasvidResult<(FramePaths, (f64, f64, f64, f64))> {
    let idx = frame.index;
    let layers = match &cfg.palette {
        Some(p) => split_frame(frame, p),
        None => split_frame_auto(frame, cfg.colors),
    }
    .map_err(stage_context("classify", idx))?;

    let mut traced = Vec::with_capacity(layers.layers.len());
    let mut view_box = None;
    for layer in &layers.layers {
        let doc = tracer
            .trace(&layer.mask)
            .map_err(stage_context("trace", idx))?;
        if view_box.is_none() {
            view_box = Some(parse_view_box(&doc).map_err(stage_context("parse", idx))?);
        }
        traced.push(LayerPaths {
            color: layer.color.hex(),
            path_data: extract_path_data(&doc).join(" "),
        });
    }

    let view_box =
        view_box.ok_or_else(|| BasvidError::trace(format!("frame {idx} produced no layers")))?;
    Ok((
        FramePaths {
            frame_index: idx,
            layers: traced,
        },
        view_box,
    ))
}

fn canvas_from_view_box(vb: (f64, f64, f64, f64)) -> Canvas {
    // The script coordinate space is the traced viewBox scaled x10.
    Canvas {
        width: (vb.2 * 10.0) as u32,
        height: (vb.3 * 10.0) as u32,
    }
}

/// Classify and trace a batch of frames, deriving the script canvas from the
/// first frame's first traced layer.
pub fn frames_to_paths(
    frames: Vec<Frame>,
    cfg: &RunConfig,
    tracer: &dyn Tracer,
) -> BasvidResult<(Vec<FramePaths>, Canvas)> {
    if frames.is_empty() {
        return Err(BasvidError::invalid_input("no frames to process"));
    }
    let total = frames.len();
    let step = (total / 10).max(1);
    let progress = move |done: usize| {
        if done.is_multiple_of(step) || done == total {
            info!(done, total, "frames classified and traced");
        }
    };

    let compiled = run_batch(frames, cfg.effective_jobs(), Some(&progress), |_, frame| {
        compile_frame(&frame, cfg, tracer)
    })?;

    let canvas = canvas_from_view_box(compiled[0].1);
    Ok((compiled.into_iter().map(|(p, _)| p).collect(), canvas))
}

/// Generate the script text block for every frame, in frame order.
pub fn scripts_from_paths(
    paths: Vec<FramePaths>,
    canvas: Canvas,
    cfg: &RunConfig,
) -> BasvidResult<Vec<String>> {
    let params = ScriptParams {
        canvas,
        framerate: cfg.framerate(),
        start_time_ms: 0.0,
    };
    run_batch(paths, cfg.effective_jobs(), None, move |_, frame| {
        Ok(frame_script(&frame, &params))
    })
}

/// Run the whole pipeline: decode, classify, trace, generate, write.
#[tracing::instrument(skip(cfg, tracer), fields(video = %cfg.video_path.display()))]
pub fn run(cfg: &RunConfig, tracer: &dyn Tracer) -> BasvidResult<RunSummary> {
    cfg.validate()?;
    let info = media::probe(&cfg.video_path)?;
    info!(
        width = info.width,
        height = info.height,
        frames = info.nb_frames,
        duration_sec = info.duration_sec,
        "probed source video"
    );
    if cfg.low_memory {
        return run_serial(cfg, &info, tracer);
    }

    info!("extracting frames");
    let frames = media::extract_frames(&info, cfg.fps, cfg.max_width)?;
    info!(frames = frames.len(), "extracted frames");

    let (paths, canvas) = frames_to_paths(frames, cfg, tracer)?;
    info!(
        canvas_w = canvas.width,
        canvas_h = canvas.height,
        "generating script text"
    );
    let scripts = scripts_from_paths(paths, canvas, cfg)?;

    let frames = scripts.len();
    let mut writer = SegmentWriter::new(&cfg.out_prefix, &cfg.out_ext, cfg.max_segment_bytes)?;
    for block in &scripts {
        writer.push(block)?;
    }
    let segments = writer.finish()?;
    info!(segments, "run complete");

    Ok(RunSummary {
        frames,
        segments,
        canvas,
    })
}

/// Serial low-memory run: frames are streamed one at a time and every
/// intermediate (mask, traced document, script block) is dropped as soon as
/// its successor exists.
fn run_serial(
    cfg: &RunConfig,
    info: &media::VideoInfo,
    tracer: &dyn Tracer,
) -> BasvidResult<RunSummary> {
    info!("extracting frames (serial low-memory mode)");
    let stream = media::extract_frames_stream(info, cfg.fps, cfg.max_width)?;
    let mut writer = SegmentWriter::new(&cfg.out_prefix, &cfg.out_ext, cfg.max_segment_bytes)?;

    let mut canvas: Option<Canvas> = None;
    let mut frames = 0usize;
    for frame in stream {
        let frame = frame?;
        let (paths, vb) = compile_frame(&frame, cfg, tracer)?;
        drop(frame);
        let canvas = *canvas.get_or_insert_with(|| canvas_from_view_box(vb));
        let params = ScriptParams {
            canvas,
            framerate: cfg.framerate(),
            start_time_ms: 0.0,
        };
        writer.push(&frame_script(&paths, &params))?;
        frames += 1;
        if frames.is_multiple_of(10) {
            info!(frames, "frames processed");
        }
    }

    let canvas = canvas.ok_or_else(|| {
        BasvidError::decode(format!(
            "no frames extracted from '{}'",
            cfg.video_path.display()
        ))
    })?;
    let segments = writer.finish()?;
    info!(frames, segments, "run complete");

    Ok(RunSummary {
        frames,
        segments,
        canvas,
    })
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
