//! Viewport size tracking and resize subscriptions.
//!
//! Renderers do not listen on any global resize source. Each mounted
//! renderer holds a `ResizeSubscription`; dropping it unregisters the
//! listener, so teardown releases it on every exit path.

use crate::surface::Size;
use log::*;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Default)]
struct Listeners {
    next_id: u64,
    senders: BTreeMap<u64, Sender<Size>>,
}

/// Current viewport size plus the set of live resize listeners.
///
pub struct Viewport {
    size: Cell<Size>,
    listeners: Rc<RefCell<Listeners>>,
}

impl Viewport {
    pub fn new(size: Size) -> Self {
        Viewport {
            size: Cell::new(size),
            listeners: Rc::new(RefCell::new(Listeners::default())),
        }
    }

    pub fn size(&self) -> Size {
        self.size.get()
    }

    /// Record a new viewport size and notify every live subscription.
    ///
    pub fn resize(&self, size: Size) {
        self.size.set(size);
        let mut listeners = self.listeners.borrow_mut();
        debug!(
            "Viewport resized to {}, notifying {} listener(s)...",
            size,
            listeners.senders.len()
        );
        listeners
            .senders
            .retain(|_, sender| sender.send(size).is_ok());
    }

    /// Register a new resize listener.
    ///
    pub fn subscribe(&self) -> ResizeSubscription {
        let (tx, rx) = mpsc::channel();
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.senders.insert(id, tx);
        trace!("Registered resize listener {}", id);
        ResizeSubscription {
            id,
            receiver: rx,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().senders.len()
    }
}

/// Live registration with a `Viewport`. Unregisters on drop.
///
pub struct ResizeSubscription {
    id: u64,
    receiver: Receiver<Size>,
    listeners: Weak<RefCell<Listeners>>,
}

impl ResizeSubscription {
    /// Return the most recent size reported since the last call, if any.
    /// Intermediate sizes are skipped.
    ///
    pub fn take_latest(&self) -> Option<Size> {
        self.receiver.try_iter().last()
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().senders.remove(&self.id);
            trace!("Removed resize listener {}", self.id);
        }
    }
}
