//! Cart Items

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Manga, MangaId},
    prices::Price,
};

/// A product as offered to the cart at add-time.
///
/// Everything here is a snapshot: the cart never goes back to the catalog to
/// refresh titles, prices or stock once a line exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    /// Catalog identifier
    pub id: MangaId,

    /// Display title
    pub title: String,

    /// Unit price
    pub price: Price,

    /// Cover image URL
    pub cover_image: String,

    /// Units available for sale when the item was offered
    pub stock_limit: u32,
}

impl From<&Manga> for NewCartItem {
    fn from(manga: &Manga) -> Self {
        NewCartItem {
            id: manga.id,
            title: manga.title.display().to_string(),
            price: manga.price,
            cover_image: manga.cover_image.large.clone(),
            stock_limit: manga.stock,
        }
    }
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    manga_id: MangaId,
    title: String,
    price: Price,
    quantity: u32,
    cover_image: String,
    max_stock: u32,
}

impl CartItem {
    /// Creates a line for `item` holding `quantity` units, clamped to the stock limit.
    ///
    /// Returns `None` when nothing could be held.
    pub(crate) fn new(item: NewCartItem, quantity: u32) -> Option<Self> {
        let quantity = quantity.min(item.stock_limit);

        (quantity > 0).then(|| CartItem {
            manga_id: item.id,
            title: item.title,
            price: item.price,
            quantity,
            cover_image: item.cover_image,
            max_stock: item.stock_limit,
        })
    }

    /// Catalog identifier of the manga on this line.
    pub fn manga_id(&self) -> MangaId {
        self.manga_id
    }

    /// Title captured at add-time.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Unit price captured at add-time.
    pub fn price(&self) -> Price {
        self.price
    }

    /// Units on this line, always within `1..=max_stock`.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Cover image URL captured at add-time.
    pub fn cover_image(&self) -> &str {
        &self.cover_image
    }

    /// Stock ceiling for this line.
    pub fn max_stock(&self) -> u32 {
        self.max_stock
    }

    /// Unit price multiplied by quantity.
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }

    /// Whether another unit can be added without exceeding the stock ceiling.
    pub fn can_increment(&self) -> bool {
        self.quantity < self.max_stock
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn set_max_stock(&mut self, max_stock: u32) {
        self.max_stock = max_stock;
    }

    /// Clamps a decoded line back into `1..=max_stock`, dropping it if empty.
    pub(crate) fn repaired(mut self) -> Option<Self> {
        self.quantity = self.quantity.min(self.max_stock);

        (self.quantity > 0).then_some(self)
    }
}
