use crate::config::CanvasConfig;
use crate::errors::DrawError;
use crate::render::{LayerContext, RasterBackend, Renderer, RgbaImage, SurfaceSize};
use crate::surface::display::Display;
use crate::surface::host::PixelDensity;
use std::cell::RefCell;
use std::rc::Rc;

/// Owns the stacked raster layers of one drawing surface.
///
/// Layers are sized to the host container the [`Display`] is attached to. The
/// size is only read in [`resize`](Self::resize), so width and height stay 0
/// until the first resize.
pub struct SurfaceManager {
    display: Display,
    contexts: Vec<LayerContext>,
    density: Box<dyn PixelDensity>,
    width: u32,
    height: u32,
    font_family: String,
    arc_inset: f64,
    disposed: bool,
}

impl SurfaceManager {
    /// Creates `config.layers` raster layers through `backend`.
    ///
    /// Layers the backend cannot provide a context for are skipped; fails with
    /// [`DrawError::NoRasterContext`] when no layer could be created at all.
    pub fn new(
        config: &CanvasConfig,
        backend: &dyn RasterBackend,
        density: Box<dyn PixelDensity>,
    ) -> Result<Self, DrawError> {
        let mut contexts: Vec<LayerContext> = Vec::with_capacity(config.layers);
        for layer in 0..config.layers {
            match backend.create_context(SurfaceSize::EMPTY) {
                Ok(ctx) => contexts.push(Rc::new(RefCell::new(ctx))),
                Err(e) => log::warn!("{}: no raster context for layer {}: {}", backend.name(), layer, e),
            }
        }

        if contexts.is_empty() {
            return Err(DrawError::NoRasterContext);
        }

        log::debug!(
            "surface created with {}/{} layers on {}",
            contexts.len(),
            config.layers,
            backend.name()
        );

        Ok(Self {
            display: Display::new(),
            contexts,
            density,
            width: 0,
            height: 0,
            font_family: config.font_family.clone(),
            arc_inset: config.arc_inset,
            disposed: false,
        })
    }

    /// Root container handle to attach into the host.
    pub fn display(&self) -> Display {
        self.display.clone()
    }

    /// Raster width in device pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in device pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of usable layers.
    #[inline]
    pub fn layers(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Renderer for `layer`, sized to the surface as it is now.
    pub fn generate_renderer(&self, layer: usize) -> Result<Renderer, DrawError> {
        let context = self.layer(layer)?;
        log::trace!("renderer for layer {} at {}x{}", layer, self.width, self.height);
        Ok(Renderer::new(
            context.clone(),
            self.width as f64,
            self.height as f64,
            &self.font_family,
            self.arc_inset,
        ))
    }

    /// Resizes every layer to the host box size times the device pixel ratio.
    pub fn resize(&mut self) -> Result<(), DrawError> {
        self.ensure_alive()?;

        let (content_width, content_height) = self.display.host_size().floor();
        let ratio = self.density.device_pixel_ratio();
        let size = SurfaceSize::new(scale_px(content_width, ratio), scale_px(content_height, ratio));

        for context in &self.contexts {
            let mut ctx = context.borrow_mut();
            if ctx.size() != size {
                ctx.resize(size)?;
            }
        }

        // committed only once every layer accepted the new size
        self.display.set_content_size(content_width, content_height);

        if (self.width, self.height) != (size.width, size.height) {
            log::debug!(
                "surface resized from {}x{} to {}x{} (ratio {})",
                self.width,
                self.height,
                size.width,
                size.height,
                ratio
            );
        }
        self.width = size.width;
        self.height = size.height;
        Ok(())
    }

    /// Clears `layer`, or every layer for `None` or an index out of range.
    /// The overlay is always emptied.
    pub fn clear(&mut self, layer: Option<usize>) -> Result<(), DrawError> {
        self.ensure_alive()?;

        let (w, h) = (self.width as f64, self.height as f64);
        match layer.and_then(|i| self.contexts.get(i)) {
            Some(context) => context.borrow_mut().clear_rect(0.0, 0.0, w, h)?,
            None => {
                for context in &self.contexts {
                    context.borrow_mut().clear_rect(0.0, 0.0, w, h)?;
                }
            }
        }
        self.display.clear_overlay();
        Ok(())
    }

    /// Pixels of `layer` as straight RGBA.
    pub fn snapshot(&self, layer: usize) -> Result<RgbaImage, DrawError> {
        let image = self.layer(layer)?.borrow().snapshot()?;
        Ok(image)
    }

    /// Detaches the display and releases all layers. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.display.detach();
        self.contexts.clear();
        self.disposed = true;
        log::debug!("surface disposed");
    }

    fn ensure_alive(&self) -> Result<(), DrawError> {
        if self.disposed {
            return Err(DrawError::Disposed);
        }
        Ok(())
    }

    fn layer(&self, layer: usize) -> Result<&LayerContext, DrawError> {
        self.ensure_alive()?;
        self.contexts.get(layer).ok_or(DrawError::LayerOutOfRange {
            layer,
            layers: self.contexts.len(),
        })
    }
}

/// Raster pixels for `px` logical pixels, dropping any fractional pixel.
fn scale_px(px: u32, ratio: f64) -> u32 {
    let scaled = px as f64 * ratio;
    if scaled.is_finite() && scaled > 0.0 {
        scaled.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::recording::RecordingBackend;
    use crate::render::DrawCommand;
    use crate::surface::host::{FixedDensity, HostBox, SharedDensity};

    fn manager(layers: usize, backend: &RecordingBackend, ratio: f64) -> SurfaceManager {
        SurfaceManager::new(&CanvasConfig::with_layers(layers), backend, Box::new(FixedDensity(ratio))).unwrap()
    }

    #[test]
    fn fails_without_any_context() {
        let backend = RecordingBackend::unavailable();
        let res = SurfaceManager::new(&CanvasConfig::default(), &backend, Box::new(FixedDensity(1.0)));
        assert!(matches!(res, Err(DrawError::NoRasterContext)));
    }

    #[test]
    fn skips_layers_without_context() {
        let backend = RecordingBackend::with_limit(2);
        let surface = manager(3, &backend, 1.0);
        assert_eq!(surface.layers(), 2);
    }

    #[test]
    fn size_is_zero_until_first_resize() {
        let backend = RecordingBackend::new();
        let surface = manager(1, &backend, 2.0);
        surface.display().attach(HostBox::new(500.0, 500.0));
        assert_eq!((surface.width(), surface.height()), (0, 0));
    }

    #[test]
    fn resize_floors_and_applies_pixel_ratio_to_every_layer() {
        let backend = RecordingBackend::new();
        let mut surface = manager(2, &backend, 2.0);
        surface.display().attach(HostBox::new(320.7, 200.2));
        surface.resize().unwrap();

        assert_eq!((surface.width(), surface.height()), (640, 400));
        assert_eq!(surface.display().content_size(), (320, 200));
        for i in 0..2 {
            let log = backend.log(i).unwrap();
            assert_eq!(log.borrow().last(), Some(&DrawCommand::Resize { width: 640, height: 400 }));
            assert_eq!(surface.snapshot(i).unwrap().width, 640);
        }
    }

    #[test]
    fn resize_is_idempotent() {
        let backend = RecordingBackend::new();
        let mut surface = manager(1, &backend, 1.0);
        surface.display().attach(HostBox::new(100.0, 50.0));
        surface.resize().unwrap();
        surface.resize().unwrap();
        surface.resize().unwrap();

        assert_eq!((surface.width(), surface.height()), (100, 50));
        // the buffer is only reallocated when the size actually changes
        assert_eq!(backend.log(0).unwrap().borrow().len(), 1);
    }

    #[test]
    fn resize_follows_host_and_density_changes() {
        let backend = RecordingBackend::new();
        let density = SharedDensity::new(1.0);
        let mut surface =
            SurfaceManager::new(&CanvasConfig::with_layers(1), &backend, Box::new(density.clone())).unwrap();
        let host = HostBox::new(100.0, 100.0);
        surface.display().attach(host.clone());
        surface.resize().unwrap();

        host.set_size(60.0, 30.0);
        density.set(1.5);
        surface.resize().unwrap();
        assert_eq!((surface.width(), surface.height()), (90, 45));

        surface.display().detach();
        surface.resize().unwrap();
        assert_eq!((surface.width(), surface.height()), (0, 0));
    }

    #[test]
    fn failed_resize_keeps_previous_size() {
        let backend = RecordingBackend::new().with_max_size(SurfaceSize::new(200, 200));
        let mut surface = manager(2, &backend, 1.0);
        let host = HostBox::new(150.0, 100.0);
        surface.display().attach(host.clone());
        surface.resize().unwrap();

        host.set_size(300.0, 100.0);
        assert!(matches!(surface.resize(), Err(DrawError::Backend(_))));
        assert_eq!((surface.width(), surface.height()), (150, 100));
        assert_eq!(surface.display().content_size(), (150, 100));
        for i in 0..2 {
            assert_eq!(
                backend.log(i).unwrap().borrow().last(),
                Some(&DrawCommand::Resize { width: 150, height: 100 })
            );
        }

        host.set_size(180.0, 120.0);
        surface.resize().unwrap();
        assert_eq!((surface.width(), surface.height()), (180, 120));
        assert_eq!(surface.display().content_size(), (180, 120));
    }

    #[test]
    fn renderer_snapshots_size_at_creation() {
        let backend = RecordingBackend::new();
        let mut surface = manager(1, &backend, 1.0);
        let host = HostBox::new(100.0, 80.0);
        surface.display().attach(host.clone());
        surface.resize().unwrap();

        let before = surface.generate_renderer(0).unwrap();
        host.set_size(200.0, 160.0);
        surface.resize().unwrap();
        let after = surface.generate_renderer(0).unwrap();

        assert_eq!((before.rendering_width(), before.rendering_height()), (100.0, 80.0));
        assert_eq!((after.rendering_width(), after.rendering_height()), (200.0, 160.0));
    }

    #[test]
    fn renderer_layer_out_of_range() {
        let backend = RecordingBackend::new();
        let surface = manager(2, &backend, 1.0);
        match surface.generate_renderer(2) {
            Err(DrawError::LayerOutOfRange { layer: 2, layers: 2 }) => {}
            other => panic!("expected LayerOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn clear_targets_one_layer_or_all() {
        let backend = RecordingBackend::new();
        let mut surface = manager(3, &backend, 1.0);
        surface.display().attach(HostBox::new(10.0, 10.0));
        surface.resize().unwrap();
        let clears = |i: usize| backend.log(i).unwrap().borrow().clears();

        surface.clear(Some(1)).unwrap();
        assert_eq!((clears(0), clears(1), clears(2)), (0, 1, 0));

        surface.clear(None).unwrap();
        assert_eq!((clears(0), clears(1), clears(2)), (1, 2, 1));

        surface.clear(Some(7)).unwrap();
        assert_eq!((clears(0), clears(1), clears(2)), (2, 3, 2));

        assert_eq!(
            backend.log(0).unwrap().borrow().last(),
            Some(&DrawCommand::ClearRect { x: 0.0, y: 0.0, w: 10.0, h: 10.0 })
        );
    }

    #[test]
    fn clear_always_empties_overlay() {
        use crate::math::Vector;
        use crate::surface::display::Decoration;

        let backend = RecordingBackend::new();
        let mut surface = manager(2, &backend, 1.0);
        let display = surface.display();

        display.add_decoration(Decoration { position: Vector::ZERO, label: "a".into() });
        surface.clear(Some(0)).unwrap();
        assert!(display.decorations().is_empty());

        display.add_decoration(Decoration { position: Vector::ZERO, label: "b".into() });
        surface.clear(None).unwrap();
        assert!(display.decorations().is_empty());
    }

    #[test]
    fn dispose_detaches_and_releases() {
        let backend = RecordingBackend::new();
        let mut surface = manager(2, &backend, 1.0);
        let host = HostBox::new(10.0, 10.0);
        surface.display().attach(host.clone());

        surface.dispose();
        assert!(!host.has_child());
        assert!(surface.is_disposed());
        assert_eq!(surface.layers(), 0);
        assert!(matches!(surface.generate_renderer(0), Err(DrawError::Disposed)));
        assert!(matches!(surface.resize(), Err(DrawError::Disposed)));
        assert!(matches!(surface.clear(None), Err(DrawError::Disposed)));

        // second dispose is a no-op
        surface.dispose();
    }

    #[test]
    fn dispose_without_host_is_fine() {
        let backend = RecordingBackend::new();
        let mut surface = manager(1, &backend, 1.0);
        surface.dispose();
        assert!(!surface.display().is_attached());
    }
}
