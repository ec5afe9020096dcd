//! Akihabara prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        Cart, CartItem, NewCartItem,
        codec::{CodecError, DEFAULT_CART_KEY},
    },
    catalog::{
        Catalog, CatalogError, CatalogPage, CatalogQuery, Manga, MangaId, MangaTitle, PageInfo,
        YamlCatalog,
    },
    prices::{Price, PriceError},
    receipt::{Receipt, ReceiptError, ReceiptLine},
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    store::{CartListener, CartStore, ListenerKey},
};
