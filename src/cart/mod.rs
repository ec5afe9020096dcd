//! Cart

use serde::Serialize;

use crate::{catalog::MangaId, prices::Price};

pub mod codec;
mod items;

pub use items::{CartItem, NewCartItem};

/// The selected items and their total.
///
/// A `Cart` is only ever changed through [`crate::store::CartStore`]; the
/// transitions here keep `total` in step with `items` on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    items: Vec<CartItem>,
    total: Price,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Cart::default()
    }

    /// Build a cart from already validated lines, computing the total.
    pub(crate) fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Cart {
            items,
            total: Price::ZERO,
        };

        cart.recompute_total();

        cart
    }

    /// The cart lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over the cart lines.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Sum of `price * quantity` over every line.
    pub fn total(&self) -> Price {
        self.total
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line for a manga.
    pub fn get(&self, id: MangaId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.manga_id() == id)
    }

    /// Check if a manga is in the cart.
    pub fn contains(&self, id: MangaId) -> bool {
        self.get(id).is_some()
    }

    /// Add `quantity` units of `item`, merging with an existing line.
    ///
    /// The resulting quantity never exceeds `item.stock_limit`, which also
    /// becomes the line's new stock ceiling. Returns how many units were
    /// actually added.
    pub(crate) fn add(&mut self, item: NewCartItem, quantity: u32) -> u32 {
        if quantity == 0 || item.stock_limit == 0 {
            return 0;
        }

        let added = if let Some(existing) = self
            .items
            .iter_mut()
            .find(|existing| existing.manga_id() == item.id)
        {
            let before = existing.quantity();
            let after = before.saturating_add(quantity).min(item.stock_limit);

            existing.set_max_stock(item.stock_limit);
            existing.set_quantity(after);

            after.saturating_sub(before)
        } else {
            match CartItem::new(item, quantity) {
                Some(line) => {
                    let added = line.quantity();
                    self.items.push(line);
                    added
                }
                None => 0,
            }
        };

        self.recompute_total();

        added
    }

    /// Set a line's quantity, clamped to its stock ceiling. Zero removes the line.
    ///
    /// Returns `false` if the manga is not in the cart.
    pub(crate) fn set_quantity(&mut self, id: MangaId, quantity: u32) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };

        let mut emptied = false;

        if let Some(line) = self.items.get_mut(position) {
            let clamped = quantity.min(line.max_stock());

            line.set_quantity(clamped);
            emptied = clamped == 0;
        }

        if emptied {
            self.items.remove(position);
        }

        self.recompute_total();

        true
    }

    /// Remove a line. Returns `false` if the manga is not in the cart.
    pub(crate) fn remove(&mut self, id: MangaId) -> bool {
        let before = self.items.len();

        self.items.retain(|item| item.manga_id() != id);
        self.recompute_total();

        self.items.len() != before
    }

    /// Reset to the empty cart.
    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.total = Price::ZERO;
    }

    fn position(&self, id: MangaId) -> Option<usize> {
        self.items.iter().position(|item| item.manga_id() == id)
    }

    fn recompute_total(&mut self) {
        self.total = self.items.iter().map(CartItem::subtotal).sum();
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(id: MangaId, cents: u64, stock_limit: u32) -> NewCartItem {
        NewCartItem {
            id,
            title: format!("Manga {id}"),
            price: Price::from_cents(cents),
            cover_image: format!("https://img.example/{id}.jpg"),
            stock_limit,
        }
    }

    fn quantity_of(cart: &Cart, id: MangaId) -> Option<u32> {
        cart.get(id).map(CartItem::quantity)
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn add_appends_in_insertion_order() {
        let mut cart = Cart::new();

        cart.add(offer(3, 100, 5), 1);
        cart.add(offer(1, 200, 5), 1);
        cart.add(offer(2, 300, 5), 1);

        let ids: Vec<MangaId> = cart.iter().map(CartItem::manga_id).collect();

        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn add_merges_same_id_and_clamps_to_stock() {
        let mut cart = Cart::new();

        assert_eq!(cart.add(offer(1, 1000, 5), 3), 3);
        assert_eq!(cart.add(offer(1, 1000, 5), 4), 2);

        assert_eq!(cart.len(), 1);
        assert_eq!(quantity_of(&cart, 1), Some(5));
        assert_eq!(cart.total(), Price::from_cents(5000));
    }

    #[test]
    fn add_refreshes_stock_ceiling_from_latest_offer() {
        let mut cart = Cart::new();

        cart.add(offer(1, 1000, 5), 5);
        let added = cart.add(offer(1, 1000, 3), 1);

        assert_eq!(added, 0);
        assert_eq!(quantity_of(&cart, 1), Some(3));
        assert_eq!(cart.get(1).map(CartItem::max_stock), Some(3));
        assert_eq!(cart.total(), Price::from_cents(3000));
    }

    #[test]
    fn add_keeps_first_snapshot_of_title_and_price() {
        let mut cart = Cart::new();

        cart.add(offer(1, 1000, 5), 1);
        cart.add(
            NewCartItem {
                title: "Renamed".to_string(),
                price: Price::from_cents(1),
                ..offer(1, 0, 5)
            },
            1,
        );

        assert_eq!(cart.get(1).map(CartItem::title), Some("Manga 1"));
        assert_eq!(cart.total(), Price::from_cents(2000));
    }

    #[test]
    fn add_ignores_zero_quantity_and_zero_stock() {
        let mut cart = Cart::new();

        assert_eq!(cart.add(offer(1, 1000, 5), 0), 0);
        assert_eq!(cart.add(offer(2, 1000, 0), 3), 0);

        assert!(cart.is_empty());
    }

    #[test]
    fn total_tracks_distinct_adds() {
        let mut cart = Cart::new();

        cart.add(offer(1, 999, 10), 3);
        cart.add(offer(2, 1450, 10), 2);
        cart.add(offer(3, 701, 10), 1);

        let expected: u64 = 999 * 3 + 1450 * 2 + 701;

        assert_eq!(cart.total(), Price::from_cents(expected));
        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn set_quantity_clamps_to_max_stock() {
        let mut cart = Cart::new();
        cart.add(offer(1, 1000, 5), 1);

        assert!(cart.set_quantity(1, 50));

        assert_eq!(quantity_of(&cart, 1), Some(5));
        assert_eq!(cart.total(), Price::from_cents(5000));
    }

    #[test]
    fn set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(offer(1, 1000, 5), 2);
        cart.add(offer(2, 500, 5), 1);

        assert!(cart.set_quantity(1, 0));

        assert!(!cart.contains(1));
        assert_eq!(cart.total(), Price::from_cents(500));
    }

    #[test]
    fn set_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(offer(1, 1000, 5), 2);

        assert!(!cart.set_quantity(9, 3));

        assert_eq!(quantity_of(&cart, 1), Some(2));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(offer(1, 1000, 5), 2);
        cart.add(offer(2, 500, 5), 1);

        assert!(cart.remove(1));
        let once = cart.clone();
        assert!(!cart.remove(1));

        assert_eq!(cart, once);
        assert_eq!(cart.total(), Price::from_cents(500));
    }

    #[test]
    fn clear_resets_everything() {
        let mut cart = Cart::new();
        cart.add(offer(1, 1000, 5), 2);

        cart.clear();

        assert_eq!(cart, Cart::new());
    }
}
