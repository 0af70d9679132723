//! Per-pixel classification of a frame into one binary mask per palette color.

use image::{GrayImage, Luma};

use crate::foundation::{
    core::{ColorLayer, Frame, FrameLayers, MASK_BLANK, MASK_INK, Rgba8},
    error::{BasvidError, BasvidResult},
};
use crate::quantize::quantize;

/// Squared Euclidean RGB distance.
fn dist_sq(r: u8, g: u8, b: u8, c: Rgba8) -> u32 {
    let dr = i32::from(r) - i32::from(c.r);
    let dg = i32::from(g) - i32::from(c.g);
    let db = i32::from(b) - i32::from(c.b);
    (dr * dr + dg * dg + db * db) as u32
}

/// Split `frame` into one mask per palette entry.
///
/// Every pixel is assigned to the nearest palette color (first entry wins on
/// exact ties) and marked [`MASK_INK`] in that entry's mask; all other masks
/// stay [`MASK_BLANK`] at that position. Masks always have the frame's
/// dimensions and the layer count always equals the palette length.
pub fn split_frame(frame: &Frame, palette: &[Rgba8]) -> BasvidResult<FrameLayers> {
    let (w, h) = frame.image.dimensions();
    if w == 0 || h == 0 {
        return Err(BasvidError::invalid_input(format!(
            "frame {} has no image data",
            frame.index
        )));
    }
    if palette.is_empty() {
        return Err(BasvidError::invalid_input("empty palette"));
    }

    let mut layers: Vec<ColorLayer> = palette
        .iter()
        .map(|&color| ColorLayer {
            color,
            mask: GrayImage::from_pixel(w, h, Luma([MASK_BLANK])),
        })
        .collect();

    for (x, y, p) in frame.image.enumerate_pixels() {
        let mut best = 0usize;
        let mut best_d = u32::MAX;
        for (i, &c) in palette.iter().enumerate() {
            let d = dist_sq(p.0[0], p.0[1], p.0[2], c);
            if d < best_d {
                best_d = d;
                best = i;
            }
        }
        layers[best].mask.put_pixel(x, y, Luma([MASK_INK]));
    }

    Ok(FrameLayers {
        index: frame.index,
        layers,
    })
}

/// Split `frame` using a palette quantized from the frame itself.
pub fn split_frame_auto(frame: &Frame, colors: usize) -> BasvidResult<FrameLayers> {
    let palette = quantize(&frame.image, colors)?;
    split_frame(frame, &palette)
}

#[cfg(test)]
#[path = "../tests/unit/layers.rs"]
mod tests;
