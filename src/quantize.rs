//! Median-cut palette quantization.
//!
//! Reduces a frame's color distribution to at most `k` representative colors.
//! Boxes live in a plain `Vec` arena and are manipulated by index; nothing in
//! here is shared across threads.

use image::RgbImage;

use crate::foundation::{
    core::{Rgb8, Rgba8},
    error::{BasvidError, BasvidResult},
};

/// A working set of pixels plus its per-channel bounds.
#[derive(Clone, Debug)]
struct ColorBox {
    pixels: Vec<Rgb8>,
    min: [u8; 3],
    max: [u8; 3],
}

impl ColorBox {
    fn new(pixels: Vec<Rgb8>) -> Self {
        let mut min = [255u8; 3];
        let mut max = [0u8; 3];
        for p in &pixels {
            for c in 0..3 {
                let v = p.channel(c);
                min[c] = min[c].min(v);
                max[c] = max[c].max(v);
            }
        }
        Self { pixels, min, max }
    }

    fn channel_range(&self, c: usize) -> u8 {
        self.max[c].saturating_sub(self.min[c])
    }

    /// Channel with the widest range. Ties prefer R, then G.
    fn widest_channel(&self) -> usize {
        let r = self.channel_range(0);
        let g = self.channel_range(1);
        let b = self.channel_range(2);
        if r >= g && r >= b {
            0
        } else if g >= r && g >= b {
            1
        } else {
            2
        }
    }

    fn widest_range(&self) -> u8 {
        self.channel_range(self.widest_channel())
    }

    /// A box can be split if it holds at least two pixels that differ.
    fn splittable(&self) -> bool {
        self.pixels.len() > 1 && self.widest_range() > 0
    }

    /// Integer mean of the box's pixels, opaque alpha.
    fn mean_color(&self) -> Rgba8 {
        let n = self.pixels.len() as u64;
        let mut sum = [0u64; 3];
        for p in &self.pixels {
            sum[0] += u64::from(p.r);
            sum[1] += u64::from(p.g);
            sum[2] += u64::from(p.b);
        }
        Rgba8::opaque(
            (sum[0] / n) as u8,
            (sum[1] / n) as u8,
            (sum[2] / n) as u8,
        )
    }
}

/// Reduce `img` to at most `k` representative colors via median cut.
///
/// The palette may come out shorter than `k` when the image has fewer
/// distinct colors than requested. A zero-pixel image or `k == 0` is
/// rejected with [`BasvidError::InvalidInput`].
pub fn quantize(img: &RgbImage, k: usize) -> BasvidResult<Vec<Rgba8>> {
    if k == 0 {
        return Err(BasvidError::invalid_input("palette size must be >= 1"));
    }
    let mut pixels = Vec::with_capacity((img.width() * img.height()) as usize);
    for p in img.pixels() {
        pixels.push(Rgb8 {
            r: p.0[0],
            g: p.0[1],
            b: p.0[2],
        });
    }
    if pixels.is_empty() {
        return Err(BasvidError::invalid_input(
            "cannot quantize an image with no pixels",
        ));
    }

    let mut boxes = vec![ColorBox::new(pixels)];
    while boxes.len() < k {
        // Earliest box wins ties so palette order stays deterministic.
        let mut target: Option<(usize, u8)> = None;
        for (i, b) in boxes.iter().enumerate() {
            if !b.splittable() {
                continue;
            }
            let range = b.widest_range();
            if target.is_none_or(|(_, best)| range > best) {
                target = Some((i, range));
            }
        }
        let Some((i, _)) = target else {
            break;
        };

        let channel = boxes[i].widest_channel();
        let mut left = std::mem::take(&mut boxes[i].pixels);
        left.sort_by_key(|p| p.channel(channel));
        let right = left.split_off(left.len() / 2);

        // Replace the split box in place so palette order stays stable.
        boxes[i] = ColorBox::new(left);
        boxes.insert(i + 1, ColorBox::new(right));
    }

    Ok(boxes
        .iter()
        .filter(|b| !b.pixels.is_empty())
        .map(ColorBox::mean_color)
        .collect())
}

#[cfg(test)]
#[path = "../tests/unit/quantize.rs"]
mod tests;
