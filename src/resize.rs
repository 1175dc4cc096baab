//! Resize notifications.
//!
//! The surface has to be resized whenever the box of its host container
//! changes. Noticing that is up to the host, which exposes it as a
//! [`ResizeObserver`]: callers register a callback for a [`Display`] and get a
//! [`ResizeSubscription`] back that stops the callbacks once disconnected or
//! dropped.
//!
//! [`ResizeNotifier`] is a single-threaded observer the host drives by hand,
//! either with [`notify`](ResizeNotifier::notify) (fire everything) or
//! [`poll`](ResizeNotifier::poll) (fire only for displays whose host box
//! changed since the last delivery).
//!
//! ```
//! use canvas2d::resize::{ResizeNotifier, ResizeObserver};
//! use canvas2d::surface::HostBox;
//! # use canvas2d::{CanvasConfig, Canvas2D, FixedDensity};
//! # use canvas2d::render::backends::recording::RecordingBackend;
//! # let backend = RecordingBackend::new();
//! let mut notifier = ResizeNotifier::new();
//! let canvas = Canvas2D::new(CanvasConfig::default(), &backend, Box::new(FixedDensity(1.0)), &mut notifier)?;
//! let host = HostBox::new(640.0, 480.0);
//! canvas.display().attach(host.clone());
//!
//! assert_eq!(notifier.poll(), 1);
//! assert_eq!(canvas.display_width(), 640);
//! assert_eq!(notifier.poll(), 0);
//!
//! host.set_size(320.0, 240.0);
//! assert_eq!(notifier.poll(), 1);
//! assert_eq!(canvas.display_width(), 320);
//! # Ok::<(), canvas2d::DrawError>(())
//! ```

use crate::surface::{BoxSize, Display};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Invoked, without arguments, whenever the observed box may have changed.
pub type ResizeCallback = Box<dyn FnMut()>;

/// Source of "container box size changed" notifications.
pub trait ResizeObserver {
    /// Starts observing `target`. Callbacks stop once the returned subscription
    /// is disconnected or dropped.
    fn observe(&mut self, target: &Display, callback: ResizeCallback) -> Box<dyn ResizeSubscription>;
}

pub trait ResizeSubscription {
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
}

struct Listener {
    id: u64,
    target: Display,
    last_size: Option<BoxSize>,
    /// `None` while the callback is running.
    callback: Option<ResizeCallback>,
}

#[derive(Default)]
struct ListenerBus {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<Listener>>,
}

impl ListenerBus {
    fn add(&self, target: &Display, callback: ResizeCallback) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            target: target.clone(),
            last_size: None,
            callback: Some(callback),
        });
        id
    }

    fn remove(&self, id: u64) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    fn contains(&self, id: u64) -> bool {
        self.listeners.borrow().iter().any(|l| l.id == id)
    }

    /// Runs the callbacks of the selected listeners. Callbacks may subscribe or
    /// disconnect while running since no borrow is held across the call.
    fn deliver(&self, changed_only: bool) -> usize {
        let due: Vec<u64> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners
                .iter_mut()
                .filter_map(|l| {
                    let size = l.target.host_size();
                    let changed = l.last_size != Some(size);
                    l.last_size = Some(size);
                    (changed || !changed_only).then_some(l.id)
                })
                .collect()
        };

        let mut fired = 0;
        for id in due {
            let callback = self
                .listeners
                .borrow_mut()
                .iter_mut()
                .find(|l| l.id == id)
                .and_then(|l| l.callback.take());
            let Some(mut callback) = callback else {
                continue;
            };

            callback();
            fired += 1;

            if let Some(l) = self.listeners.borrow_mut().iter_mut().find(|l| l.id == id) {
                l.callback = Some(callback);
            }
        }
        fired
    }
}

/// Hand-driven [`ResizeObserver`]. Clones share their listeners.
#[derive(Clone, Default)]
pub struct ResizeNotifier {
    bus: Rc<ListenerBus>,
}

impl ResizeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invokes every live callback. Returns how many ran.
    pub fn notify(&self) -> usize {
        self.bus.deliver(false)
    }

    /// Invokes the callbacks whose display's host box changed since their last
    /// delivery. A fresh subscription always counts as changed.
    pub fn poll(&self) -> usize {
        self.bus.deliver(true)
    }

    pub fn listener_count(&self) -> usize {
        self.bus.listeners.borrow().len()
    }
}

impl ResizeObserver for ResizeNotifier {
    fn observe(&mut self, target: &Display, callback: ResizeCallback) -> Box<dyn ResizeSubscription> {
        let id = self.bus.add(target, callback);
        log::trace!("resize listener {} registered", id);
        Box::new(NotifierSubscription {
            bus: Rc::downgrade(&self.bus),
            id,
        })
    }
}

struct NotifierSubscription {
    bus: Weak<ListenerBus>,
    id: u64,
}

impl ResizeSubscription for NotifierSubscription {
    fn disconnect(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            if bus.remove(self.id) {
                log::trace!("resize listener {} removed", self.id);
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.bus.upgrade().is_some_and(|bus| bus.contains(self.id))
    }
}

impl Drop for NotifierSubscription {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HostBox;

    fn counter() -> (Rc<Cell<u32>>, ResizeCallback) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, Box::new(move || c.set(c.get() + 1)))
    }

    #[test]
    fn notify_fires_every_listener() {
        let mut notifier = ResizeNotifier::new();
        let (a, cb_a) = counter();
        let (b, cb_b) = counter();
        let _sa = notifier.observe(&Display::new(), cb_a);
        let _sb = notifier.observe(&Display::new(), cb_b);

        assert_eq!(notifier.notify(), 2);
        assert_eq!(notifier.notify(), 2);
        assert_eq!((a.get(), b.get()), (2, 2));
    }

    #[test]
    fn poll_fires_on_first_delivery_and_on_change() {
        let mut notifier = ResizeNotifier::new();
        let display = Display::new();
        let host = HostBox::new(10.0, 10.0);
        display.attach(host.clone());
        let (count, cb) = counter();
        let _sub = notifier.observe(&display, cb);

        assert_eq!(notifier.poll(), 1);
        assert_eq!(notifier.poll(), 0);
        host.set_size(11.0, 10.0);
        assert_eq!(notifier.poll(), 1);
        display.detach();
        assert_eq!(notifier.poll(), 1);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn disconnect_and_drop_stop_callbacks() {
        let mut notifier = ResizeNotifier::new();
        let (count, cb) = counter();
        let mut sub = notifier.observe(&Display::new(), cb);
        assert!(sub.is_connected());

        sub.disconnect();
        assert!(!sub.is_connected());
        assert_eq!(notifier.notify(), 0);
        assert_eq!(count.get(), 0);

        let (_count, cb) = counter();
        let sub = notifier.observe(&Display::new(), cb);
        assert_eq!(notifier.listener_count(), 1);
        drop(sub);
        assert_eq!(notifier.listener_count(), 0);
    }

    #[test]
    fn callback_may_disconnect_itself() {
        let mut notifier = ResizeNotifier::new();
        let slot: Rc<RefCell<Option<Box<dyn ResizeSubscription>>>> = Rc::new(RefCell::new(None));
        let inner = slot.clone();
        let sub = notifier.observe(
            &Display::new(),
            Box::new(move || {
                if let Some(mut s) = inner.borrow_mut().take() {
                    s.disconnect();
                }
            }),
        );
        *slot.borrow_mut() = Some(sub);

        assert_eq!(notifier.notify(), 1);
        assert_eq!(notifier.listener_count(), 0);
        assert_eq!(notifier.notify(), 0);
    }
}
