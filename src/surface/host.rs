//! Host-environment collaborators.
//!
//! The surface does not look anything up from global state: the container it is
//! placed in and the display's pixel density are injected through
//! [`HostContainer`] and [`PixelDensity`].
//!
//! # Examples
//!
//! ```
//! use canvas2d::surface::{BoxSize, HostBox, HostContainer};
//!
//! let host = HostBox::new(800.0, 600.0);
//! let handle = host.clone();
//! handle.set_size(1024.0, 768.0);
//! assert_eq!(host.client_size(), BoxSize::new(1024.0, 768.0));
//! ```

use std::cell::Cell;
use std::rc::Rc;

/// On-screen size of a box in logical pixels. May be fractional.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

impl BoxSize {
    pub const ZERO: BoxSize = BoxSize { width: 0.0, height: 0.0 };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whole content pixels, rounded down. Negative or NaN sizes count as 0.
    pub fn floor(&self) -> (u32, u32) {
        (floor_px(self.width), floor_px(self.height))
    }
}

fn floor_px(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.floor().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// The container the display is placed in.
pub trait HostContainer {
    /// Size of the area available to the display.
    fn client_size(&self) -> BoxSize;

    /// Called when the display is attached to this container.
    fn on_attach(&mut self) {}

    /// Called when the display is removed from this container.
    fn on_detach(&mut self) {}
}

/// Ratio between physical and logical pixels of the host display.
pub trait PixelDensity {
    fn device_pixel_ratio(&self) -> f64;
}

/// Constant pixel density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedDensity(pub f64);

impl Default for FixedDensity {
    fn default() -> Self {
        FixedDensity(1.0)
    }
}

impl PixelDensity for FixedDensity {
    fn device_pixel_ratio(&self) -> f64 {
        self.0
    }
}

/// Pixel density that can be changed after it was handed to a surface.
#[derive(Clone, Debug)]
pub struct SharedDensity(Rc<Cell<f64>>);

impl SharedDensity {
    pub fn new(ratio: f64) -> Self {
        SharedDensity(Rc::new(Cell::new(ratio)))
    }

    pub fn set(&self, ratio: f64) {
        self.0.set(ratio);
    }
}

impl PixelDensity for SharedDensity {
    fn device_pixel_ratio(&self) -> f64 {
        self.0.get()
    }
}

/// Simple host container with a settable size.
///
/// Clones share their state, so the host application can keep a handle to
/// resize the box after giving it to the display.
#[derive(Clone, Debug, Default)]
pub struct HostBox {
    size: Rc<Cell<BoxSize>>,
    attached: Rc<Cell<bool>>,
}

impl HostBox {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Rc::new(Cell::new(BoxSize::new(width, height))),
            attached: Rc::new(Cell::new(false)),
        }
    }

    pub fn set_size(&self, width: f64, height: f64) {
        self.size.set(BoxSize::new(width, height));
    }

    /// Whether a display is currently attached.
    pub fn has_child(&self) -> bool {
        self.attached.get()
    }
}

impl HostContainer for HostBox {
    fn client_size(&self) -> BoxSize {
        self.size.get()
    }

    fn on_attach(&mut self) {
        self.attached.set(true);
    }

    fn on_detach(&mut self) {
        self.attached.set(false);
    }
}
