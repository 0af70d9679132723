//! Tracing seam: binary mask in, vector outline document out.
//!
//! The pipeline only depends on the [`Tracer`] trait; [`BorderTracer`] is the
//! built-in implementation, an axis-aligned border follower that turns each
//! connected run of ink boundary into a closed loop. The helpers at the
//! bottom do the minimal parsing of the produced documents the downstream
//! stages need (path data, viewBox).

use std::collections::BTreeMap;

use image::GrayImage;

use crate::foundation::error::{BasvidError, BasvidResult};

/// Converts a binary mask into the text of a vector outline document.
pub trait Tracer: Sync {
    /// Trace `mask` into an SVG document string.
    ///
    /// Ink pixels are values below 128 (see
    /// [`MASK_INK`](crate::foundation::core::MASK_INK)).
    fn trace(&self, mask: &GrayImage) -> BasvidResult<String>;
}

/// Built-in tracer following the borders between ink and blank pixels.
///
/// Every boundary edge is walked with ink on its right-hand side, producing
/// closed axis-aligned loops; holes come out as separate loops. Collinear
/// runs are merged before emission.
#[derive(Clone, Copy, Debug, Default)]
pub struct BorderTracer;

type GridPoint = (u32, u32);

impl Tracer for BorderTracer {
    fn trace(&self, mask: &GrayImage) -> BasvidResult<String> {
        let (w, h) = mask.dimensions();
        if w == 0 || h == 0 {
            return Err(BasvidError::trace("cannot trace an empty mask"));
        }

        let loops = boundary_loops(mask);
        let mut d = String::new();
        for points in &loops {
            if !d.is_empty() {
                d.push(' ');
            }
            d.push_str(&loop_to_path(points));
        }

        let mut doc = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n"
        );
        if !d.is_empty() {
            doc.push_str(&format!(
                "<path d=\"{d}\" fill=\"#000000\" stroke=\"none\"/>\n"
            ));
        }
        doc.push_str("</svg>\n");
        Ok(doc)
    }
}

fn is_ink(mask: &GrayImage, x: i64, y: i64) -> bool {
    if x < 0 || y < 0 || x >= i64::from(mask.width()) || y >= i64::from(mask.height()) {
        return false;
    }
    mask.get_pixel(x as u32, y as u32).0[0] < 128
}

/// Collect all boundary loops of the ink region, in scan order.
fn boundary_loops(mask: &GrayImage) -> Vec<Vec<GridPoint>> {
    // Directed boundary edges on the pixel-corner grid, oriented so that ink
    // is always on the right of the walking direction. Every corner then has
    // equal in- and out-degree, so greedy following always closes a loop.
    let mut outgoing: BTreeMap<GridPoint, Vec<GridPoint>> = BTreeMap::new();
    let mut push = |from: GridPoint, to: GridPoint| {
        outgoing.entry(from).or_default().push(to);
    };

    let (w, h) = mask.dimensions();
    for y in 0..h {
        for x in 0..w {
            if !is_ink(mask, i64::from(x), i64::from(y)) {
                continue;
            }
            let (xi, yi) = (i64::from(x), i64::from(y));
            if !is_ink(mask, xi, yi - 1) {
                push((x, y), (x + 1, y));
            }
            if !is_ink(mask, xi, yi + 1) {
                push((x + 1, y + 1), (x, y + 1));
            }
            if !is_ink(mask, xi - 1, yi) {
                push((x, y + 1), (x, y));
            }
            if !is_ink(mask, xi + 1, yi) {
                push((x + 1, y), (x + 1, y + 1));
            }
        }
    }

    let mut loops = Vec::new();
    loop {
        let Some((&start, _)) = outgoing.iter().find(|(_, v)| !v.is_empty()) else {
            break;
        };
        let mut points = vec![start];
        let mut cur = start;
        loop {
            let next = {
                let targets = outgoing
                    .get_mut(&cur)
                    .expect("boundary walk reached a corner with no outgoing edge");
                targets.remove(0)
            };
            if next == start {
                break;
            }
            points.push(next);
            cur = next;
        }
        loops.push(simplify_loop(points));
    }
    loops
}

/// Drop intermediate points of straight axis-aligned runs, wrapping around
/// the loop seam.
fn simplify_loop(points: Vec<GridPoint>) -> Vec<GridPoint> {
    let n = points.len();
    if n < 3 {
        return points;
    }
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let p = points[i];
        let next = points[(i + 1) % n];
        let straight =
            (prev.0 == p.0 && p.0 == next.0) || (prev.1 == p.1 && p.1 == next.1);
        if !straight {
            out.push(p);
        }
    }
    out
}

fn loop_to_path(points: &[GridPoint]) -> String {
    let mut d = String::new();
    for (i, &(x, y)) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        if i > 0 {
            d.push(' ');
        }
        d.push_str(&format!("{cmd}{x} {y}"));
    }
    d.push_str(" Z");
    d
}

/// Extract every `<path>` element's `d` attribute from a document.
///
/// This is deliberately minimal string scanning over the tracer's own
/// output, not a general XML parser.
pub fn extract_path_data(svg: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = svg;
    while let Some(pos) = rest.find("<path") {
        let after = &rest[pos..];
        let end = after.find('>').map(|e| e + 1).unwrap_or(after.len());
        let tag = &after[..end];
        if let Some(dpos) = tag.find(" d=\"") {
            let val = &tag[dpos + 4..];
            if let Some(q) = val.find('"') {
                out.push(val[..q].to_string());
            }
        }
        rest = &after[end..];
    }
    out
}

/// Parse the four numeric viewBox components of a document.
pub fn parse_view_box(svg: &str) -> BasvidResult<(f64, f64, f64, f64)> {
    let needle = "viewBox=\"";
    let start = svg
        .find(needle)
        .ok_or_else(|| BasvidError::parse("document has no viewBox attribute"))?;
    let val = &svg[start + needle.len()..];
    let end = val
        .find('"')
        .ok_or_else(|| BasvidError::parse("unterminated viewBox attribute"))?;
    let parts: Vec<&str> = val[..end].split_whitespace().collect();
    if parts.len() != 4 {
        return Err(BasvidError::parse(format!(
            "viewBox must have 4 components, got {}",
            parts.len()
        )));
    }
    let mut nums = [0f64; 4];
    for (i, p) in parts.iter().enumerate() {
        nums[i] = p
            .parse()
            .map_err(|_| BasvidError::parse(format!("bad viewBox component '{p}'")))?;
    }
    Ok((nums[0], nums[1], nums[2], nums[3]))
}

#[cfg(test)]
#[path = "../tests/unit/trace.rs"]
mod tests;
