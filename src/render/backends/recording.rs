use crate::render::backend::{RasterBackend, RasterContext, RgbaImage, SurfaceSize};
use crate::render::render_list::{CommandList, DrawCommand};
use crate::render::style::{Color, FillStyle, Font, StrokeStyle};
use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to the commands recorded by one context.
pub type CommandLog = Rc<RefCell<CommandList>>;

/// Headless backend whose contexts record every call instead of rasterizing.
///
/// The backend keeps a handle to each context's [`CommandList`], in creation
/// order, so the host can inspect what was drawn on each layer.
pub struct RecordingBackend {
    limit: Option<usize>,
    max_size: Option<SurfaceSize>,
    logs: RefCell<Vec<CommandLog>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self { limit: None, max_size: None, logs: RefCell::new(Vec::new()) }
    }

    /// Backend that hands out at most `limit` contexts.
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit), max_size: None, logs: RefCell::new(Vec::new()) }
    }

    /// Contexts created from now on refuse to grow beyond `max` in either dimension.
    pub fn with_max_size(mut self, max: SurfaceSize) -> Self {
        self.max_size = Some(max);
        self
    }

    /// Backend that cannot provide any context.
    pub fn unavailable() -> Self {
        Self::with_limit(0)
    }

    /// Command log of the `index`-th created context.
    pub fn log(&self, index: usize) -> Option<CommandLog> {
        self.logs.borrow().get(index).cloned()
    }

    pub fn context_count(&self) -> usize {
        self.logs.borrow().len()
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterBackend for RecordingBackend {
    fn name(&self) -> &str {
        "RecordingBackend"
    }

    fn create_context(&self, size: SurfaceSize) -> Result<Box<dyn RasterContext>> {
        let mut logs = self.logs.borrow_mut();
        if let Some(limit) = self.limit {
            if logs.len() >= limit {
                return Err(anyhow!("recording backend is limited to {limit} contexts"));
            }
        }

        let log: CommandLog = Rc::new(RefCell::new(CommandList::new()));
        logs.push(log.clone());
        let mut context = RecordingContext::new(size, log);
        context.max_size = self.max_size;
        Ok(Box::new(context))
    }
}

/// Context that appends a [`DrawCommand`] for every call.
pub struct RecordingContext {
    size: SurfaceSize,
    max_size: Option<SurfaceSize>,
    log: CommandLog,
}

impl RecordingContext {
    pub fn new(size: SurfaceSize, log: CommandLog) -> Self {
        Self { size, max_size: None, log }
    }

    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }

    fn record(&self, command: DrawCommand) {
        self.log.borrow_mut().add_command(command);
    }
}

impl RasterContext for RecordingContext {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<()> {
        if let Some(max) = self.max_size {
            if size.width > max.width || size.height > max.height {
                return Err(anyhow!(
                    "{}x{} exceeds the {}x{} limit",
                    size.width,
                    size.height,
                    max.width,
                    max.height
                ));
            }
        }
        self.size = size;
        self.record(DrawCommand::Resize { width: size.width, height: size.height });
        Ok(())
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.record(DrawCommand::ClearRect { x, y, w, h });
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &FillStyle) -> Result<()> {
        self.record(DrawCommand::FillRect { x, y, w, h, style: style.clone() });
        Ok(())
    }

    fn begin_path(&mut self) {
        self.record(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.record(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.record(DrawCommand::LineTo { x, y });
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        self.record(DrawCommand::Arc { cx, cy, radius, start, end });
    }

    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, rotation: f64, start: f64, end: f64) {
        self.record(DrawCommand::Ellipse { cx, cy, rx, ry, rotation, start, end });
    }

    fn close_path(&mut self) {
        self.record(DrawCommand::ClosePath);
    }

    fn stroke(&mut self, style: &StrokeStyle) -> Result<()> {
        self.record(DrawCommand::Stroke { style: style.clone() });
        Ok(())
    }

    fn fill(&mut self, style: &FillStyle) -> Result<()> {
        self.record(DrawCommand::Fill { style: style.clone() });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &Font, color: Color) -> Result<()> {
        self.record(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            font: font.clone(),
            color,
        });
        Ok(())
    }

    fn snapshot(&self) -> Result<RgbaImage> {
        Ok(RgbaImage::blank(self.size))
    }
}
