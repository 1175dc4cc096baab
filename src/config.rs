//! Canvas configuration.
//!
//! `CanvasConfig` controls how a [`Canvas2D`](crate::Canvas2D) sets up its
//! surface: how many raster layers to stack, which font family text is drawn
//! with and how far pie slices stay away from the layer edge.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use canvas2d::CanvasConfig;
//! let cfg = CanvasConfig::default();
//! assert_eq!(cfg.layers, 2);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use canvas2d::CanvasConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = CanvasConfig::builder()
//!     .layers(3)
//!     .font_family("monospace")
//!     .arc_inset(2.0)
//!     .build()?; // returns Result<CanvasConfig, CanvasConfigError>
//! # Ok(()) }
//! ```
//!
//! # Errors
//!
//! Builder validation returns [`CanvasConfigError`] when `layers == 0`, the
//! font family is empty, or `arc_inset` is negative or not finite.

use serde::{Deserialize, Serialize};
use std::fmt;

const DEFAULT_FONT_FAMILY: &str = "sans-serif";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Number of stacked raster layers
    pub layers: usize,
    /// Font family used for all text
    pub font_family: String,
    /// Gap in raster pixels between a pie slice and the layer edge
    pub arc_inset: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            layers: 2,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            arc_inset: 4.0,
        }
    }
}

impl CanvasConfig {
    pub fn builder() -> CanvasConfigBuilder {
        CanvasConfigBuilder::default()
    }

    /// Default config with the given number of layers.
    pub fn with_layers(layers: usize) -> Self {
        Self { layers, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), CanvasConfigError> {
        validate(self)
    }
}

/// Builder for [`CanvasConfig`].
#[derive(Debug, Clone, Default)]
pub struct CanvasConfigBuilder {
    inner: CanvasConfig,
}

impl CanvasConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut CanvasConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn layers(self, n: usize) -> Self { self.map(|c| c.layers = n) }
    pub fn font_family<S: Into<String>>(self, family: S) -> Self { self.map(|c| c.font_family = family.into()) }
    pub fn arc_inset(self, px: f64) -> Self { self.map(|c| c.arc_inset = px) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut CanvasConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<CanvasConfig, CanvasConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq)]
pub enum CanvasConfigError {
    ZeroLayers,
    EmptyFontFamily,
    InvalidArcInset(f64),
}

impl fmt::Display for CanvasConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasConfigError::ZeroLayers =>
                write!(f, "layers must be at least 1"),
            CanvasConfigError::EmptyFontFamily =>
                write!(f, "font_family must not be empty"),
            CanvasConfigError::InvalidArcInset(px) =>
                write!(f, "arc_inset {px} must be a finite, non-negative number"),
        }
    }
}
impl std::error::Error for CanvasConfigError {}

fn validate(c: &CanvasConfig) -> Result<(), CanvasConfigError> {
    if c.layers == 0 {
        return Err(CanvasConfigError::ZeroLayers);
    }
    if c.font_family.trim().is_empty() {
        return Err(CanvasConfigError::EmptyFontFamily);
    }
    if !c.arc_inset.is_finite() || c.arc_inset < 0.0 {
        return Err(CanvasConfigError::InvalidArcInset(c.arc_inset));
    }
    Ok(())
}
