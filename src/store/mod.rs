//! Cart Store
//!
//! The single owner of the cart. Every UI surface reads the store and calls its
//! operations; none of them keeps cart state of its own.
//!
//! Each operation runs the same transition: change the cart (recomputing its
//! total), write it to storage, then call every listener in registration
//! order. The in-memory cart is authoritative: a failed write is logged and
//! neither rolls the change back nor suppresses notification.

use tracing::{debug, info, instrument, warn};

use crate::{
    cart::{Cart, CartItem, NewCartItem, codec},
    catalog::MangaId,
    prices::Price,
    receipt::Receipt,
    storage::Storage,
};

mod listeners;

pub use listeners::{CartListener, ListenerKey};

use listeners::Listeners;

/// Observable, persisted cart.
#[derive(Debug)]
pub struct CartStore<S: Storage> {
    storage: S,
    key: String,
    cart: Cart,
    listeners: Listeners,
}

impl<S: Storage> CartStore<S> {
    /// Open the store, loading the cart persisted under `key`.
    ///
    /// A missing, unreadable or undecodable value yields the empty cart; the
    /// problem is logged and never surfaced to the caller.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();

        let cart = match storage.get(&key) {
            Ok(Some(raw)) => codec::decode(&raw).unwrap_or_else(|error| {
                warn!(%key, %error, "persisted cart could not be decoded; starting empty");
                Cart::new()
            }),
            Ok(None) => {
                debug!(%key, "no persisted cart; starting empty");
                Cart::new()
            }
            Err(error) => {
                warn!(%key, %error, "persisted cart could not be read; starting empty");
                Cart::new()
            }
        };

        info!(%key, lines = cart.len(), total = %cart.total(), "cart store opened");

        CartStore {
            storage,
            key,
            cart,
            listeners: Listeners::default(),
        }
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Cart lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    /// Sum of `price * quantity` over every line.
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Total number of units in the cart, as shown on the cart badge.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.cart.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Find the line for a manga.
    pub fn get(&self, id: MangaId) -> Option<&CartItem> {
        self.cart.get(id)
    }

    /// Check if a manga is in the cart.
    pub fn contains(&self, id: MangaId) -> bool {
        self.cart.contains(id)
    }

    /// The storage key the cart is persisted under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Close the store, handing back its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Register a listener and call it straight away with the current cart.
    pub fn subscribe(&mut self, listener: impl CartListener + 'static) -> ListenerKey {
        let key = self.listeners.insert(Box::new(listener));
        self.listeners.notify_one(key, &self.cart);

        key
    }

    /// Register a listener for future changes only.
    pub fn listen(&mut self, listener: impl CartListener + 'static) -> ListenerKey {
        self.listeners.insert(Box::new(listener))
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, key: ListenerKey) -> bool {
        self.listeners.remove(key)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Add `quantity` units of `item`.
    ///
    /// Quantities beyond the item's stock limit are silently clamped. Returns
    /// the number of units actually added, which is zero when `quantity` is
    /// zero or nothing is in stock.
    #[instrument(skip(self, item), fields(manga_id = item.id, stock_limit = item.stock_limit))]
    pub fn add_item(&mut self, item: NewCartItem, quantity: u32) -> u32 {
        let added = self.cart.add(item, quantity);

        if added < quantity {
            debug!(requested = quantity, added, "add clamped to stock");
        }

        self.commit();

        added
    }

    /// Set a line's quantity, clamped to its stock ceiling. Zero removes the line.
    ///
    /// Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, id: MangaId, quantity: u32) {
        if !self.cart.set_quantity(id, quantity) {
            debug!("manga not in cart");
        }

        self.commit();
    }

    /// Add one unit to a line, up to its stock ceiling.
    pub fn increment(&mut self, id: MangaId) {
        let quantity = self.get(id).map(|item| item.quantity().saturating_add(1));

        self.step(id, quantity);
    }

    /// Take one unit off a line, removing it when the last unit goes.
    pub fn decrement(&mut self, id: MangaId) {
        let quantity = self.get(id).map(|item| item.quantity().saturating_sub(1));

        self.step(id, quantity);
    }

    /// Remove a line. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: MangaId) {
        if !self.cart.remove(id) {
            debug!("manga not in cart");
        }

        self.commit();
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.cart.clear();
        self.commit();
    }

    /// Simulated checkout: summarise the cart and empty it.
    ///
    /// Returns `None`, without touching the cart, when there is nothing to buy.
    /// No payment is taken.
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> Option<Receipt> {
        let receipt = Receipt::from_cart(&self.cart)?;

        info!(
            items = receipt.item_count(),
            total = %receipt.total(),
            "checkout completed; no payment processed"
        );

        self.cart.clear();
        self.commit();

        Some(receipt)
    }

    fn step(&mut self, id: MangaId, quantity: Option<u32>) {
        match quantity {
            Some(quantity) => self.update_quantity(id, quantity),
            None => {
                debug!(manga_id = id, "manga not in cart");
                self.commit();
            }
        }
    }

    fn commit(&mut self) {
        self.persist();
        self.listeners.notify_all(&self.cart);
    }

    fn persist(&mut self) {
        let raw = match codec::encode(&self.cart) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(key = %self.key, %error, "cart could not be encoded; not persisted");
                return;
            }
        };

        if let Err(error) = self.storage.set(&self.key, &raw) {
            warn!(key = %self.key, %error, "cart could not be persisted; keeping in-memory state");
        }
    }
}
