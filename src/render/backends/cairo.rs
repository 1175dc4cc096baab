use crate::render::backend::{PixelFormat, RasterBackend, RasterContext, RgbaImage, SurfaceSize};
use crate::render::style::{Color, FillStyle, Font, StrokeStyle, TextAlign, TextBaseline};
use anyhow::Result;

/// Cairo backend rasterizing each layer into its own ARGB32 image surface.
pub struct CairoBackend;

impl CairoBackend {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for CairoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterBackend for CairoBackend {
    fn name(&self) -> &str {
        "CairoBackend"
    }

    fn create_context(&self, size: SurfaceSize) -> Result<Box<dyn RasterContext>> {
        Ok(Box::new(CairoContext::new(size)?))
    }
}

pub struct CairoContext {
    surface: cairo::ImageSurface,
    cr: cairo::Context,
    size: SurfaceSize,
}

impl CairoContext {
    pub fn new(size: SurfaceSize) -> Result<Self> {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, size.width as i32, size.height as i32)?;
        let cr = cairo::Context::new(&surface)?;
        Ok(Self { surface, cr, size })
    }

    #[inline]
    pub fn surface(&self) -> &cairo::ImageSurface {
        &self.surface
    }

    fn set_color(&self, color: Color) {
        self.cr
            .set_source_rgba(color.r as f64, color.g as f64, color.b as f64, color.a as f64);
    }

    fn set_fill_style(&self, style: &FillStyle) -> Result<()> {
        match style {
            FillStyle::Solid(color) => self.set_color(*color),
            FillStyle::LinearGradient(g) => {
                let gradient = cairo::LinearGradient::new(g.from.x, g.from.y, g.to.x, g.to.y);
                for stop in &g.color_stops {
                    let c = stop.color;
                    gradient.add_color_stop_rgba(stop.offset, c.r as f64, c.g as f64, c.b as f64, c.a as f64);
                }
                self.cr.set_source(&gradient)?;
            }
        }
        Ok(())
    }
}

/// Dash list usable by cairo, or empty for a solid line.
fn dash_pattern(segments: &[f64]) -> &[f64] {
    let valid = segments.iter().all(|s| s.is_finite() && *s >= 0.0) && segments.iter().any(|s| *s > 0.0);
    if valid {
        segments
    } else {
        &[]
    }
}

fn font_face(family: &str) -> &str {
    match family {
        "sans-serif" => "Sans",
        "serif" => "Serif",
        "monospace" => "Monospace",
        other => other,
    }
}

impl RasterContext for CairoContext {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<()> {
        // Replace the context before the surface so the old surface is released.
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, size.width as i32, size.height as i32)?;
        self.cr = cairo::Context::new(&surface)?;
        self.surface = surface;
        self.size = size;
        Ok(())
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.cr.save()?;
        self.cr.set_operator(cairo::Operator::Clear);
        self.cr.new_path();
        self.cr.rectangle(x, y, w, h);
        self.cr.fill()?;
        self.cr.restore()?;
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &FillStyle) -> Result<()> {
        self.set_fill_style(style)?;
        self.cr.new_path();
        self.cr.rectangle(x, y, w, h);
        self.cr.fill()?;
        Ok(())
    }

    fn begin_path(&mut self) {
        self.cr.new_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.cr.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.cr.line_to(x, y);
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        if radius <= 0.0 {
            self.cr.line_to(cx, cy);
            return;
        }
        self.cr.arc(cx, cy, radius, start, end);
    }

    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, rotation: f64, start: f64, end: f64) {
        if rx <= 0.0 || ry <= 0.0 {
            self.cr.line_to(cx, cy);
            return;
        }
        // the path is stored in device space, so restoring the matrix keeps the shape
        let matrix = self.cr.matrix();
        self.cr.translate(cx, cy);
        self.cr.rotate(rotation);
        self.cr.scale(rx, ry);
        self.cr.arc(0.0, 0.0, 1.0, start, end);
        self.cr.set_matrix(matrix);
    }

    fn close_path(&mut self) {
        self.cr.close_path();
    }

    fn stroke(&mut self, style: &StrokeStyle) -> Result<()> {
        if !style.is_visible() {
            return Ok(());
        }
        self.cr.set_line_width(style.width);
        self.set_color(style.color);
        self.cr.set_dash(dash_pattern(&style.segments), 0.0);
        self.cr.stroke_preserve()?;
        Ok(())
    }

    fn fill(&mut self, style: &FillStyle) -> Result<()> {
        self.set_fill_style(style)?;
        self.cr.set_fill_rule(cairo::FillRule::Winding);
        self.cr.fill_preserve()?;
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &Font, color: Color) -> Result<()> {
        self.cr.select_font_face(
            font_face(&font.family),
            cairo::FontSlant::Normal,
            cairo::FontWeight::Normal,
        );
        self.cr.set_font_size(font.size);

        let extents = self.cr.text_extents(text)?;
        let x = match font.align {
            TextAlign::Left | TextAlign::Start => x,
            TextAlign::Center => x - extents.x_advance() / 2.0,
            TextAlign::Right | TextAlign::End => x - extents.x_advance(),
        };

        let metrics = self.cr.font_extents()?;
        let y = match font.baseline {
            TextBaseline::Top => y + metrics.ascent(),
            TextBaseline::Middle => y + (metrics.ascent() - metrics.descent()) / 2.0,
            TextBaseline::Alphabetic => y,
            TextBaseline::Bottom => y - metrics.descent(),
        };

        self.set_color(color);
        self.cr.move_to(x, y);
        self.cr.show_text(text)?;
        self.cr.new_path();
        Ok(())
    }

    fn snapshot(&self) -> Result<RgbaImage> {
        let width = self.size.width;
        let height = self.size.height;
        let stride = self.surface.stride() as usize;
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 4);

        self.surface.with_data(|data| {
            for row in 0..height as usize {
                let line = &data[row * stride..row * stride + (width as usize) * 4];
                for px in line.chunks_exact(4) {
                    let argb = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
                    pixels.extend_from_slice(&unpremultiply(argb));
                }
            }
        })?;

        RgbaImage::from_raw(pixels, width, height, width * 4, PixelFormat::Rgba8)
    }
}

/// Premultiplied ARGB32 to straight RGBA.
fn unpremultiply(argb: u32) -> [u8; 4] {
    let a = argb >> 24;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let channel = |shift: u32| {
        let c = (argb >> shift) & 0xff;
        ((c * 255 + a / 2) / a).min(255) as u8
    };
    [channel(16), channel(8), channel(0), a as u8]
}
