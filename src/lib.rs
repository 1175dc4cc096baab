//! Minimal 2D drawing on stacked raster layers.
//!
//! A [`Canvas2D`] owns a [`SurfaceManager`](surface::SurfaceManager) whose
//! layers come from a pluggable [`RasterBackend`](render::RasterBackend) and
//! hands out [`Renderer`]s that draw primitives in device pixels. [`Vector`]
//! and [`Scale`] cover the bit of math needed to map data onto the surface.

pub mod config;
pub mod errors;
pub mod math;
pub mod render;
pub mod resize;
pub mod surface;

mod canvas;

pub use canvas::Canvas2D;
pub use config::{CanvasConfig, CanvasConfigError};
pub use errors::DrawError;
pub use math::{Range, Scale, Vector};
pub use render::{Color, FillStyle, LinearGradient, Renderer, StrokeStyle, TextAlign};
pub use surface::{Display, FixedDensity, HostBox};
