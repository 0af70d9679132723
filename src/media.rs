//! Source video probing and frame extraction via the system `ffmpeg` binary.
//!
//! We intentionally shell out to `ffmpeg`/`ffprobe` rather than linking the
//! native FFmpeg libraries, so no dev headers are required. Frames are read
//! back as raw `rgb24` chunks, which makes the stream trivially splittable.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use image::RgbImage;
use tracing::{debug, warn};

use crate::foundation::{
    core::Frame,
    error::{BasvidError, BasvidResult},
};

/// Probed facts about a video's primary stream.
#[derive(Clone, Debug)]
pub struct VideoInfo {
    /// Path the probe ran against.
    pub source_path: PathBuf,
    /// Source width in pixels.
    pub width: u32,
    /// Source height in pixels.
    pub height: u32,
    /// Frame-rate ratio numerator.
    pub fps_num: u32,
    /// Frame-rate ratio denominator.
    pub fps_den: u32,
    /// Container duration in seconds, 0 when unknown.
    pub duration_sec: f64,
    /// Stream frame count when the container reports one.
    pub nb_frames: Option<u64>,
}

impl VideoInfo {
    /// Source frame rate as a float, 0 when the ratio is degenerate.
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }
}

/// Whether `ffmpeg` is runnable from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Probe `source_path` with `ffprobe` and return its video-stream facts.
pub fn probe(source_path: &Path) -> BasvidResult<VideoInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        nb_frames: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| BasvidError::decode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(BasvidError::decode(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| BasvidError::decode(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| BasvidError::decode("no video stream found"))?;
    let width = video
        .width
        .ok_or_else(|| BasvidError::decode("missing video width from ffprobe"))?;
    let height = video
        .height
        .ok_or_else(|| BasvidError::decode("missing video height from ffprobe"))?;
    let (fps_num, fps_den) = parse_ff_ratio(video.r_frame_rate.as_deref().unwrap_or("0/1"))
        .ok_or_else(|| BasvidError::decode("invalid video r_frame_rate"))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    let nb_frames = video
        .nb_frames
        .as_ref()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|&n| n > 0);

    Ok(VideoInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
        nb_frames,
    })
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let (num, den) = s.split_once('/')?;
    let num: u32 = num.trim().parse().ok()?;
    let den: u32 = den.trim().parse().ok()?;
    Some((num, den))
}

/// Compute the scaled output dimensions for a decode run.
///
/// Width is capped at `max_width` (never upscaled past the source); height
/// preserves the aspect ratio, rounded to nearest, minimum 1.
pub fn scaled_dimensions(info_w: u32, info_h: u32, max_width: u32) -> (u32, u32) {
    let out_w = max_width.max(1).min(info_w.max(1));
    let out_h = ((u64::from(info_h) * u64::from(out_w) + u64::from(info_w) / 2)
        / u64::from(info_w.max(1))) as u32;
    (out_w, out_h.max(1))
}

/// Split a raw `rgb24` byte stream into frames of `w` x `h`.
///
/// A trailing partial chunk is dropped with a warning.
pub fn frames_from_raw(raw: &[u8], w: u32, h: u32) -> Vec<Frame> {
    if w == 0 || h == 0 {
        return Vec::new();
    }
    let frame_len = w as usize * h as usize * 3;
    let complete = raw.len() / frame_len;
    if !raw.len().is_multiple_of(frame_len) {
        warn!(
            extra = raw.len() % frame_len,
            "dropping trailing partial frame from decode stream"
        );
    }
    let mut frames = Vec::with_capacity(complete);
    for idx in 0..complete {
        let off = idx * frame_len;
        let image = RgbImage::from_raw(w, h, raw[off..off + frame_len].to_vec())
            .expect("raw chunk length matches dimensions");
        frames.push(Frame { index: idx, image });
    }
    frames
}

/// The `-vf` filter string and scaled dimensions for a decode run.
///
/// fps <= 0 falls back to 1 rather than erroring, matching the historical
/// call-site default.
fn decode_filter(info: &VideoInfo, fps: i32, max_width: u32) -> (String, u32, u32) {
    let fps = if fps <= 0 { 1 } else { fps };
    let (w, h) = scaled_dimensions(info.width, info.height, max_width);
    (format!("fps={fps},scale={w}:{h}"), w, h)
}

fn spawn_decode(info: &VideoInfo, fps: i32, max_width: u32) -> BasvidResult<(Child, u32, u32)> {
    let (filter, w, h) = decode_filter(info, fps, max_width);
    debug!(
        src_w = info.width,
        src_h = info.height,
        out_w = w,
        out_h = h,
        filter = %filter,
        "starting ffmpeg frame extraction"
    );

    let child = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(&info.source_path)
        .args(["-vf", &filter, "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| BasvidError::decode(format!("failed to run ffmpeg: {e}")))?;
    Ok((child, w, h))
}

/// Decode the probed video into scaled RGB frames, whole batch at once.
///
/// Zero extracted frames is an error: the downstream pipeline has nothing to
/// work with and the video was almost certainly unreadable.
pub fn extract_frames(info: &VideoInfo, fps: i32, max_width: u32) -> BasvidResult<Vec<Frame>> {
    let (child, w, h) = spawn_decode(info, fps, max_width)?;
    let out = child
        .wait_with_output()
        .map_err(|e| BasvidError::decode(format!("failed to read ffmpeg output: {e}")))?;
    if !out.status.success() {
        return Err(BasvidError::decode(format!(
            "ffmpeg frame extraction failed for '{}': {}",
            info.source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    let frames = frames_from_raw(&out.stdout, w, h);
    if frames.is_empty() {
        return Err(BasvidError::decode(format!(
            "no frames extracted from '{}'",
            info.source_path.display()
        )));
    }
    Ok(frames)
}

/// Streaming variant of [`extract_frames`] for the low-memory mode: frames
/// are decoded one at a time as the iterator is advanced.
pub fn extract_frames_stream(
    info: &VideoInfo,
    fps: i32,
    max_width: u32,
) -> BasvidResult<FrameStream> {
    let (child, w, h) = spawn_decode(info, fps, max_width)?;
    FrameStream::from_child(child, w, h)
}

/// Iterator over decoded frames backed by a live ffmpeg child process.
pub struct FrameStream {
    child: Child,
    stdout: ChildStdout,
    // Drains the child's stderr pipe so a noisy decode error can never block
    // the child before it produces stdout; joined at end of stream.
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    width: u32,
    height: u32,
    next_index: usize,
    finished: bool,
}

impl FrameStream {
    fn from_child(mut child: Child, w: u32, h: u32) -> BasvidResult<Self> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BasvidError::decode("ffmpeg stdout pipe missing"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| BasvidError::decode("ffmpeg stderr pipe missing"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });
        Ok(Self {
            child,
            stdout,
            stderr_drain: Some(stderr_drain),
            width: w,
            height: h,
            next_index: 0,
            finished: false,
        })
    }

    /// Scaled output dimensions of the decoded frames.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn drain_stderr(&mut self) -> String {
        let Some(handle) = self.stderr_drain.take() else {
            return String::new();
        };
        match handle.join() {
            Ok(Ok(bytes)) => String::from_utf8_lossy(&bytes).trim().to_string(),
            _ => String::new(),
        }
    }

    fn read_frame(&mut self) -> BasvidResult<Option<Frame>> {
        let frame_len = self.width as usize * self.height as usize * 3;
        let mut buf = vec![0u8; frame_len];
        let mut filled = 0usize;
        while filled < frame_len {
            let n = self
                .stdout
                .read(&mut buf[filled..])
                .map_err(|e| BasvidError::decode(format!("ffmpeg stream read failed: {e}")))?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled == 0 {
            self.finished = true;
            let status = self
                .child
                .wait()
                .map_err(|e| BasvidError::decode(format!("ffmpeg wait failed: {e}")))?;
            let stderr = self.drain_stderr();
            if !status.success() {
                return Err(BasvidError::decode(format!(
                    "ffmpeg frame extraction failed: {stderr}"
                )));
            }
            return Ok(None);
        }
        if filled < frame_len {
            warn!("dropping trailing partial frame from decode stream");
            self.finished = true;
            let _ = self.child.wait();
            let _ = self.drain_stderr();
            return Ok(None);
        }
        let image = RgbImage::from_raw(self.width, self.height, buf)
            .expect("raw chunk length matches dimensions");
        let frame = Frame {
            index: self.next_index,
            image,
        };
        self.next_index += 1;
        Ok(Some(frame))
    }
}

impl Iterator for FrameStream {
    type Item = BasvidResult<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl Drop for FrameStream {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/media.rs"]
mod tests;
