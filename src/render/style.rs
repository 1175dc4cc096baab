//! Paint styles accepted by the renderer.
//!
//! A fill is either a solid [`Color`] or a [`LinearGradient`] descriptor,
//! modelled by [`FillStyle`]. Colors can be built from channels or parsed from
//! the usual CSS-like strings:
//!
//! ```
//! use canvas2d::render::{Color, FillStyle};
//!
//! let red: Color = "red".parse().unwrap();
//! assert_eq!(red, Color::from_u8(255, 0, 0, 255));
//! assert_eq!("#ff000080".parse::<Color>().unwrap().a_u8(), 0x80);
//!
//! let fill = FillStyle::parse("rgb(0, 128, 0)").unwrap();
//! assert!(matches!(fill, FillStyle::Solid(_)));
//! ```

use crate::errors::DrawError;
use crate::math::Vector;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// RGBA color used for drawing commands.
///
/// Channels are represented as `f32` in the range `0.0 ..= 1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new color from `f32` channel values in the range `0.0 ..= 1.0`.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    /// Creates a new color from `u8` channel values in the range `0 ..= 255`.
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    pub fn r_u8(&self) -> u8 {
        to_u8(self.r)
    }
    pub fn g_u8(&self) -> u8 {
        to_u8(self.g)
    }
    pub fn b_u8(&self) -> u8 {
        to_u8(self.b)
    }
    pub fn a_u8(&self) -> u8 {
        to_u8(self.a)
    }

    /// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)` or a
    /// CSS color name.
    pub fn parse(s: &str) -> Result<Color, DrawError> {
        let s = s.trim();
        let invalid = || DrawError::InvalidColor(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower.strip_prefix("rgba(").or_else(|| lower.strip_prefix("rgb(")) {
            let args = args.strip_suffix(')').ok_or_else(invalid)?;
            return parse_rgb_args(args).ok_or_else(invalid);
        }

        named(&lower).ok_or_else(invalid)
    }

    fn to_css(self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r_u8(), self.g_u8(), self.b_u8())
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r_u8(),
                self.g_u8(),
                self.b_u8(),
                self.a_u8()
            )
        }
    }
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::from_u8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
        4 => Some(Color::from_u8(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color::from_u8(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Color::from_u8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let mut channels = [0u8; 3];
    for (slot, part) in channels.iter_mut().zip(&parts) {
        let v: f32 = part.parse().ok()?;
        *slot = v.clamp(0.0, 255.0).round() as u8;
    }
    let alpha = match parts.get(3) {
        Some(a) => a.parse::<f32>().ok()?.clamp(0.0, 1.0),
        None => 1.0,
    };

    let [r, g, b] = channels;
    let mut color = Color::from_u8(r, g, b, 255);
    color.a = alpha;
    Some(color)
}

fn named(name: &str) -> Option<Color> {
    let (r, g, b) = match name {
        "transparent" => return Some(Color::TRANSPARENT),
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        "pink" => (255, 192, 203),
        "brown" => (165, 42, 42),
        _ => return None,
    };
    Some(Color::from_u8(r, g, b, 255))
}

impl FromStr for Color {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = DrawError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::parse(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_css()
    }
}

/// One stop of a gradient. `offset` lies in `0.0 ..= 1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Color,
}

impl ColorStop {
    pub fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Linear gradient running from `from` to `to` in raster pixels.
///
/// Stops are applied in the order given; they are neither sorted nor
/// deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub from: Vector,
    pub to: Vector,
    #[serde(rename = "colorStop", alias = "color_stops", default)]
    pub color_stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(from: Vector, to: Vector) -> Self {
        Self { from, to, color_stops: Vec::new() }
    }

    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        self.color_stops.push(ColorStop::new(offset, color));
        self
    }
}

/// Paint used for fills: a plain color or a linear gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillStyle {
    Solid(Color),
    LinearGradient(LinearGradient),
}

impl FillStyle {
    /// Solid fill parsed from a color string.
    pub fn parse(s: &str) -> Result<FillStyle, DrawError> {
        Ok(FillStyle::Solid(Color::parse(s)?))
    }
}

impl From<Color> for FillStyle {
    fn from(c: Color) -> Self {
        FillStyle::Solid(c)
    }
}

impl From<LinearGradient> for FillStyle {
    fn from(g: LinearGradient) -> Self {
        FillStyle::LinearGradient(g)
    }
}

/// Line width, color and dash pattern of a stroke.
///
/// An empty `segments` list strokes a solid line; otherwise it holds the
/// alternating on/off lengths of a dash pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub width: f64,
    pub color: Color,
    #[serde(default)]
    pub segments: Vec<f64>,
}

impl StrokeStyle {
    pub fn new(width: f64, color: Color) -> Self {
        Self { width, color, segments: Vec::new() }
    }

    pub fn dashed(mut self, segments: impl Into<Vec<f64>>) -> Self {
        self.segments = segments.into();
        self
    }

    /// Whether the stroke leaves any paint.
    pub fn is_visible(&self) -> bool {
        self.width > 0.0
    }

    pub fn is_dashed(&self) -> bool {
        !self.segments.is_empty()
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Right,
    #[default]
    Center,
    Start,
    End,
}

/// Vertical text anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    #[default]
    Top,
    Middle,
    Alphabetic,
    Bottom,
}

/// Font settings for a single text draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Size in raster pixels.
    pub size: f64,
    pub family: String,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl Font {
    /// CSS font shorthand, e.g. `12px sans-serif`.
    pub fn css(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }
}
