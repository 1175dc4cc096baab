//! Recorded raster-context calls.
//!
//! A [`CommandList`] is the flattened form of everything a renderer asked a
//! [`RasterContext`](crate::render::RasterContext) to do. The headless
//! recording backend writes one [`DrawCommand`] per context call, which makes
//! it possible to inspect drawing without a real bitmap.
//!
//! # Example
//!
//! ```rust
//! use canvas2d::render::{Color, CommandList, DrawCommand, FillStyle};
//!
//! let mut list = CommandList::new();
//! list.add_command(DrawCommand::BeginPath);
//! list.add_command(DrawCommand::MoveTo { x: 0.0, y: 0.0 });
//! list.add_command(DrawCommand::Fill { style: FillStyle::Solid(Color::BLACK) });
//!
//! assert_eq!(list.fills().count(), 1);
//! ```

use crate::render::style::{Color, FillStyle, Font, StrokeStyle};

/// A single recorded call on a raster context.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// The raster buffer was reallocated.
    Resize { width: u32, height: u32 },

    ClearRect { x: f64, y: f64, w: f64, h: f64 },

    FillRect { x: f64, y: f64, w: f64, h: f64, style: FillStyle },

    BeginPath,

    MoveTo { x: f64, y: f64 },

    LineTo { x: f64, y: f64 },

    Arc { cx: f64, cy: f64, radius: f64, start: f64, end: f64 },

    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        start: f64,
        end: f64,
    },

    ClosePath,

    Stroke { style: StrokeStyle },

    Fill { style: FillStyle },

    FillText { text: String, x: f64, y: f64, font: Font, color: Color },
}

impl DrawCommand {
    /// True for commands that leave paint on the buffer.
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            DrawCommand::FillRect { .. }
                | DrawCommand::Stroke { .. }
                | DrawCommand::Fill { .. }
                | DrawCommand::FillText { .. }
        )
    }
}

/// Ordered list of recorded commands.
#[derive(Clone, Debug, Default)]
pub struct CommandList {
    pub items: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new() -> Self {
        CommandList { items: Vec::new() }
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.items.push(command);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last(&self) -> Option<&DrawCommand> {
        self.items.last()
    }

    /// Styles of every `Fill` command, in order.
    pub fn fills(&self) -> impl Iterator<Item = &FillStyle> {
        self.items.iter().filter_map(|c| match c {
            DrawCommand::Fill { style } => Some(style),
            _ => None,
        })
    }

    /// Styles of every `Stroke` command, in order.
    pub fn strokes(&self) -> impl Iterator<Item = &StrokeStyle> {
        self.items.iter().filter_map(|c| match c {
            DrawCommand::Stroke { style } => Some(style),
            _ => None,
        })
    }

    /// Number of `ClearRect` commands.
    pub fn clears(&self) -> usize {
        self.items
            .iter()
            .filter(|c| matches!(c, DrawCommand::ClearRect { .. }))
            .count()
    }

    /// Commands that leave paint on the buffer.
    pub fn paints(&self) -> impl Iterator<Item = &DrawCommand> {
        self.items.iter().filter(|c| c.is_paint())
    }
}
