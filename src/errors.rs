use crate::config::CanvasConfigError;

#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    #[error("No 2D raster context could be acquired")]
    NoRasterContext,

    #[error("Zero vector has no unit vector")]
    ZeroVector,

    #[error("Source range must not be empty")]
    DegenerateSourceRange,

    #[error("Target range must not be empty")]
    DegenerateTargetRange,

    #[error("Layer {layer} out of range (surface has {layers} layers)")]
    LayerOutOfRange { layer: usize, layers: usize },

    #[error("Invalid scale (k = {k}, b = {b}): k must be finite and non-zero")]
    InvalidScale { k: f64, b: f64 },

    #[error("Path needs at least one vertex")]
    EmptyPath,

    #[error("Got {radians} arc angles but {colors} colors")]
    ArcColorMismatch { radians: usize, colors: usize },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] CanvasConfigError),

    #[error("Surface has been disposed")]
    Disposed,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}
