use crate::math::Vector;
use crate::surface::host::{BoxSize, HostContainer};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Transient annotation shown above the raster layers.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoration {
    pub position: Vector,
    pub label: String,
}

/// Region stacked above all layers holding non-raster decorations.
///
/// It is emptied whenever any layer of the surface is cleared.
#[derive(Clone, Debug, Default)]
pub struct Overlay {
    decorations: Vec<Decoration>,
}

impl Overlay {
    pub fn push(&mut self, decoration: Decoration) {
        self.decorations.push(decoration);
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn clear(&mut self) {
        self.decorations.clear();
    }
}

struct DisplayState {
    host: Option<Box<dyn HostContainer>>,
    content_size: (u32, u32),
    overlay: Overlay,
}

/// Root container of a surface.
///
/// This is the handle the host application places into its own visual tree.
/// Cloning yields another handle to the same container.
#[derive(Clone)]
pub struct Display {
    inner: Rc<RefCell<DisplayState>>,
}

impl Display {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DisplayState {
                host: None,
                content_size: (0, 0),
                overlay: Overlay::default(),
            })),
        }
    }

    /// Places the display into `host`, removing it from any previous host first.
    pub fn attach(&self, host: impl HostContainer + 'static) {
        self.detach();
        let mut host: Box<dyn HostContainer> = Box::new(host);
        host.on_attach();
        self.inner.borrow_mut().host = Some(host);
    }

    /// Removes the display from its host. Returns false when it was not attached.
    pub fn detach(&self) -> bool {
        let host = self.inner.borrow_mut().host.take();
        match host {
            Some(mut host) => {
                host.on_detach();
                true
            }
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.inner.borrow().host.is_some()
    }

    /// Box size offered by the host, zero while detached.
    pub fn host_size(&self) -> BoxSize {
        self.inner
            .borrow()
            .host
            .as_ref()
            .map(|h| h.client_size())
            .unwrap_or(BoxSize::ZERO)
    }

    /// Whole logical pixels occupied by the layers since the last resize.
    pub fn content_size(&self) -> (u32, u32) {
        self.inner.borrow().content_size
    }

    pub(crate) fn set_content_size(&self, width: u32, height: u32) {
        self.inner.borrow_mut().content_size = (width, height);
    }

    pub fn add_decoration(&self, decoration: Decoration) {
        self.inner.borrow_mut().overlay.push(decoration);
    }

    pub fn decorations(&self) -> Vec<Decoration> {
        self.inner.borrow().overlay.decorations().to_vec()
    }

    pub(crate) fn clear_overlay(&self) {
        self.inner.borrow_mut().overlay.clear();
    }

    /// True when both handles refer to the same container.
    pub fn same_as(&self, other: &Display) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("Display")
            .field("attached", &state.host.is_some())
            .field("content_size", &state.content_size)
            .field("decorations", &state.overlay.decorations.len())
            .finish()
    }
}
