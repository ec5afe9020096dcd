//! Cart change listeners.

use std::fmt;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::cart::Cart;

new_key_type! {
    /// Listener registration key
    pub struct ListenerKey;
}

/// Receives the cart after every change.
///
/// Any `FnMut(&Cart)` closure is a listener, so a UI surface can register a
/// closure that re-renders its badge or panel.
pub trait CartListener {
    /// Called with the new cart after a store operation.
    fn on_change(&mut self, cart: &Cart);
}

impl<F> CartListener for F
where
    F: FnMut(&Cart),
{
    fn on_change(&mut self, cart: &Cart) {
        self(cart);
    }
}

/// Registered listeners, notified in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    entries: SlotMap<ListenerKey, Box<dyn CartListener>>,
    order: SmallVec<[ListenerKey; 4]>,
}

impl Listeners {
    pub(crate) fn insert(&mut self, listener: Box<dyn CartListener>) -> ListenerKey {
        let key = self.entries.insert(listener);
        self.order.push(key);

        key
    }

    pub(crate) fn remove(&mut self, key: ListenerKey) -> bool {
        if self.entries.remove(key).is_none() {
            return false;
        }

        self.order.retain(|registered| *registered != key);

        true
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn notify_one(&mut self, key: ListenerKey, cart: &Cart) {
        if let Some(listener) = self.entries.get_mut(key) {
            listener.on_change(cart);
        }
    }

    pub(crate) fn notify_all(&mut self, cart: &Cart) {
        for key in &self.order {
            if let Some(listener) = self.entries.get_mut(*key) {
                listener.on_change(cart);
            }
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}
