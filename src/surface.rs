mod display;
mod host;
mod manager;

pub use display::{Decoration, Display, Overlay};
pub use host::{BoxSize, FixedDensity, HostBox, HostContainer, PixelDensity, SharedDensity};
pub use manager::SurfaceManager;
