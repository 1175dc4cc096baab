pub mod backend;

/// Raster backends.
pub mod backends {
    /// Cairo raster backend
    #[cfg(feature = "backend_cairo")]
    pub mod cairo;
    pub mod recording;
}

mod render_list;
pub use render_list::*;

mod renderer;
pub use renderer::{LayerContext, Renderer};

mod style;
pub use style::*;

pub use backend::{PixelFormat, RasterBackend, RasterContext, RgbaImage, SurfaceSize};
