use crate::render::style::{Color, FillStyle, Font, StrokeStyle};
use anyhow::Result;
use std::io::Write;

/// Size of a raster buffer in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const EMPTY: SurfaceSize = SurfaceSize { width: 0, height: 0 };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// Straight (non-premultiplied) RGBA, 8 bits per channel.
    Rgba8,
}

/// RGBA read-back of a layer.
#[derive(Clone)]
pub struct RgbaImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub format: PixelFormat,
}

impl RgbaImage {
    pub fn from_raw(pixels: Vec<u8>, width: u32, height: u32, stride: u32, format: PixelFormat) -> Result<Self> {
        anyhow::ensure!(
            pixels.len() >= (height as usize) * (stride as usize),
            "pixel buffer too small for image dimensions"
        );

        Ok(Self {
            pixels,
            width,
            height,
            stride,
            format,
        })
    }

    /// Fully transparent image.
    pub fn blank(size: SurfaceSize) -> Self {
        let stride = size.width * 4;
        Self {
            pixels: vec![0u8; (size.height as usize) * (stride as usize)],
            width: size.width,
            height: size.height,
            stride,
            format: PixelFormat::Rgba8,
        }
    }

    /// The color at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize) * (self.stride as usize) + (x as usize) * 4;
        let p = self.pixels.get(i..i + 4)?;
        Some(Color::from_u8(p[0], p[1], p[2], p[3]))
    }

    /// Encodes the image as PNG.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<()> {
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;

        let row = (self.width as usize) * 4;
        let mut data = Vec::with_capacity(row * self.height as usize);
        for y in 0..self.height as usize {
            let start = y * self.stride as usize;
            data.extend_from_slice(&self.pixels[start..start + row]);
        }
        writer.write_image_data(&data)?;
        Ok(())
    }
}

impl std::fmt::Debug for RgbaImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbaImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.pixels.len())
            .finish()
    }
}

/// A 2D immediate-mode drawing context bound to one raster buffer.
///
/// The path model follows the usual raster context: `begin_path` starts a new
/// path, `stroke` and `fill` paint the current path without consuming it, so a
/// path can be stroked and then filled.
pub trait RasterContext {
    fn size(&self) -> SurfaceSize;

    /// Reallocates the raster buffer. Contents are discarded.
    fn resize(&mut self, size: SurfaceSize) -> Result<()>;

    /// Resets the rectangle to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()>;

    /// Fills a rectangle. Negative spans extend left/up from `(x, y)`.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &FillStyle) -> Result<()>;

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);

    /// Clockwise circular arc. Angles are in radians, 0 pointing right.
    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64);

    /// Clockwise elliptical arc rotated by `rotation` radians.
    #[allow(clippy::too_many_arguments)]
    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, rotation: f64, start: f64, end: f64);

    fn close_path(&mut self);

    /// Strokes the current path. An empty dash list strokes a solid line.
    fn stroke(&mut self, style: &StrokeStyle) -> Result<()>;

    /// Fills the current path with the non-zero rule.
    fn fill(&mut self, style: &FillStyle) -> Result<()>;

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &Font, color: Color) -> Result<()>;

    /// Reads the current buffer back as straight RGBA.
    fn snapshot(&self) -> Result<RgbaImage>;
}

/// Creates raster contexts, one per layer.
pub trait RasterBackend {
    fn name(&self) -> &str;

    /// Creates a context with the given initial size.
    fn create_context(&self, size: SurfaceSize) -> Result<Box<dyn RasterContext>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_short_buffers() {
        assert!(RgbaImage::from_raw(vec![0; 15], 2, 2, 8, PixelFormat::Rgba8).is_err());
        assert!(RgbaImage::from_raw(vec![0; 16], 2, 2, 8, PixelFormat::Rgba8).is_ok());
    }

    #[test]
    fn pixel_lookup_respects_stride() {
        // 2x2 image with a padded stride of 12 bytes
        let mut pixels = vec![0u8; 24];
        pixels[12 + 4..12 + 8].copy_from_slice(&[255, 0, 0, 255]);
        let img = RgbaImage::from_raw(pixels, 2, 2, 12, PixelFormat::Rgba8).unwrap();

        assert_eq!(img.pixel(1, 1), Some(Color::from_u8(255, 0, 0, 255)));
        assert_eq!(img.pixel(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(img.pixel(2, 0), None);
    }

    #[test]
    fn write_png_emits_signature() {
        let img = RgbaImage::blank(SurfaceSize::new(3, 2));
        let mut out = Vec::new();
        img.write_png(&mut out).unwrap();
        assert_eq!(&out[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn empty_sizes() {
        assert!(SurfaceSize::EMPTY.is_empty());
        assert!(SurfaceSize::new(10, 0).is_empty());
        assert!(!SurfaceSize::new(1, 1).is_empty());
    }
}
