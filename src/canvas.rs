//! Public entry point.
//!
//! [`Canvas2D`] puts a [`SurfaceManager`] behind one object and keeps it sized
//! to its host: at construction it subscribes to the given
//! [`ResizeObserver`] for its display and resizes the surface on every
//! notification. [`dispose`](Canvas2D::dispose) tears the surface down and
//! ends the subscription.
//!
//! # Example
//!
//! ```
//! use canvas2d::render::backends::recording::RecordingBackend;
//! use canvas2d::render::FillStyle;
//! use canvas2d::resize::ResizeNotifier;
//! use canvas2d::surface::HostBox;
//! use canvas2d::{Canvas2D, CanvasConfig, FixedDensity, Vector};
//!
//! # fn main() -> Result<(), canvas2d::DrawError> {
//! let backend = RecordingBackend::new();
//! let mut notifier = ResizeNotifier::new();
//! let canvas = Canvas2D::new(CanvasConfig::with_layers(1), &backend, Box::new(FixedDensity(1.0)), &mut notifier)?;
//!
//! canvas.display().attach(HostBox::new(500.0, 500.0));
//! notifier.poll();
//!
//! let renderer = canvas.renderer()?;
//! renderer.clear(Some(&FillStyle::parse("black")?))?;
//! renderer.draw_circle(Vector::new(100.0, 100.0), 30.0, Some(&FillStyle::parse("red")?), None)?;
//! # Ok(()) }
//! ```

use crate::config::CanvasConfig;
use crate::errors::DrawError;
use crate::render::{RasterBackend, Renderer, RgbaImage};
use crate::resize::{ResizeCallback, ResizeObserver, ResizeSubscription};
use crate::surface::{Display, PixelDensity, SurfaceManager};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub struct Canvas2D {
    surface: Rc<RefCell<SurfaceManager>>,
    subscription: Option<Box<dyn ResizeSubscription>>,
}

impl Canvas2D {
    /// Creates the surface and starts observing its display through `observer`.
    pub fn new(
        config: CanvasConfig,
        backend: &dyn RasterBackend,
        density: Box<dyn PixelDensity>,
        observer: &mut dyn ResizeObserver,
    ) -> Result<Self, DrawError> {
        config.validate()?;

        let surface = Rc::new(RefCell::new(SurfaceManager::new(&config, backend, density)?));
        let display = surface.borrow().display();
        let subscription = observer.observe(&display, resize_callback(Rc::downgrade(&surface)));

        Ok(Self {
            surface,
            subscription: Some(subscription),
        })
    }

    /// Root container to place into the host.
    pub fn display(&self) -> Display {
        self.surface.borrow().display()
    }

    /// Raster width in device pixels.
    pub fn display_width(&self) -> u32 {
        self.surface.borrow().width()
    }

    /// Raster height in device pixels.
    pub fn display_height(&self) -> u32 {
        self.surface.borrow().height()
    }

    pub fn layers(&self) -> usize {
        self.surface.borrow().layers()
    }

    /// Renderer for the bottom layer.
    pub fn renderer(&self) -> Result<Renderer, DrawError> {
        self.layer_renderer(0)
    }

    /// Renderer for `layer`. Acquire a new one after every resize.
    pub fn layer_renderer(&self, layer: usize) -> Result<Renderer, DrawError> {
        self.surface.borrow().generate_renderer(layer)
    }

    pub fn resize(&self) -> Result<(), DrawError> {
        self.surface.borrow_mut().resize()
    }

    /// Clears `layer`, or all layers for `None`.
    pub fn clear(&self, layer: Option<usize>) -> Result<(), DrawError> {
        self.surface.borrow_mut().clear(layer)
    }

    pub fn clear_all(&self) -> Result<(), DrawError> {
        self.clear(None)
    }

    pub fn snapshot(&self, layer: usize) -> Result<RgbaImage, DrawError> {
        self.surface.borrow().snapshot(layer)
    }

    /// Stops resize notifications, detaches the display and releases all layers.
    pub fn dispose(&mut self) {
        self.disconnect();
        self.surface.borrow_mut().dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.surface.borrow().is_disposed()
    }

    fn disconnect(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.disconnect();
        }
    }
}

impl Drop for Canvas2D {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for Canvas2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let surface = self.surface.borrow();
        f.debug_struct("Canvas2D")
            .field("width", &surface.width())
            .field("height", &surface.height())
            .field("layers", &surface.layers())
            .field("observing", &self.subscription.is_some())
            .finish()
    }
}

fn resize_callback(surface: Weak<RefCell<SurfaceManager>>) -> ResizeCallback {
    Box::new(move || {
        let Some(surface) = surface.upgrade() else {
            return;
        };
        let Ok(mut manager) = surface.try_borrow_mut() else {
            log::warn!("surface is busy, skipping resize notification");
            return;
        };
        if let Err(e) = manager.resize() {
            log::error!("resize after host change failed: {}", e);
        }
    })
}
