use image::{GrayImage, RgbImage};

/// Mask value marking "this pixel belongs to the layer's color".
pub const MASK_INK: u8 = 0;
/// Mask value marking "this pixel belongs to some other layer".
pub const MASK_BLANK: u8 = 255;

/// An RGB sample as used by the quantizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Channel value by index: 0 = R, 1 = G, 2 = B.
    pub fn channel(self, idx: usize) -> u8 {
        match idx {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }
}

/// An opaque palette color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (palette colors are always 255).
    pub a: u8,
}

impl Rgba8 {
    /// Build a fully opaque color.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Uppercase `RRGGBB` hex form, the color identifier used in scripts.
    pub fn hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// One decoded video frame.
#[derive(Clone, Debug)]
pub struct Frame {
    /// 0-based frame index in decode order.
    pub index: usize,
    /// Decoded RGB pixels at the scaled output size.
    pub image: RgbImage,
}

/// Output coordinate space of the generated script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Script-space width.
    pub width: u32,
    /// Script-space height.
    pub height: u32,
}

/// One palette color's binary mask within a frame.
///
/// The mask has the frame's dimensions; [`MASK_INK`] marks pixels assigned to
/// `color`, [`MASK_BLANK`] everything else.
#[derive(Clone, Debug)]
pub struct ColorLayer {
    /// The palette entry this layer represents.
    pub color: Rgba8,
    /// Binary membership mask.
    pub mask: GrayImage,
}

/// A frame split into one layer per palette entry.
#[derive(Clone, Debug)]
pub struct FrameLayers {
    /// Source frame index.
    pub index: usize,
    /// One layer per palette entry, in palette order.
    pub layers: Vec<ColorLayer>,
}

/// Traced path data for one color layer.
#[derive(Clone, Debug, serde::Serialize)]
pub struct LayerPaths {
    /// Uppercase `RRGGBB` color identifier.
    pub color: String,
    /// Concatenated path-data strings from the traced outline document.
    #[serde(rename = "pathdata")]
    pub path_data: String,
}

/// Normalized per-frame intermediate consumed by the script generator.
#[derive(Clone, Debug, serde::Serialize)]
pub struct FramePaths {
    /// Source frame index.
    #[serde(rename = "frameIndex")]
    pub frame_index: usize,
    /// Traced layers in palette order.
    pub layers: Vec<LayerPaths>,
}
