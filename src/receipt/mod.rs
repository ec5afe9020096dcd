//! Receipt

use std::io;

use smallvec::SmallVec;
use tabled::settings::{
    Alignment, Style,
    object::{Columns, Rows},
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartItem},
    catalog::MangaId,
    prices::Price,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Catalog identifier
    pub manga_id: MangaId,

    /// Title at add-time
    pub title: String,

    /// Unit price at add-time
    pub unit_price: Price,

    /// Units purchased
    pub quantity: u32,

    /// `unit_price * quantity`
    pub subtotal: Price,
}

impl From<&CartItem> for ReceiptLine {
    fn from(item: &CartItem) -> Self {
        ReceiptLine {
            manga_id: item.manga_id(),
            title: item.title().to_string(),
            unit_price: item.price(),
            quantity: item.quantity(),
            subtotal: item.subtotal(),
        }
    }
}

/// Summary of a simulated checkout. No payment is taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    lines: SmallVec<[ReceiptLine; 8]>,
    item_count: u64,
    total: Price,
}

impl Receipt {
    /// Build a receipt for the cart's current contents.
    ///
    /// Returns `None` for an empty cart: there is nothing to check out.
    pub fn from_cart(cart: &Cart) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }

        Some(Receipt {
            lines: cart.iter().map(ReceiptLine::from).collect(),
            item_count: cart.item_count(),
            total: cart.total(),
        })
    }

    /// Purchased lines in cart order.
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Total units purchased.
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Amount due.
    pub fn total(&self) -> Price {
        self.total
    }

    /// Writes the receipt as a table followed by the total.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = tabled::builder::Builder::default();

        builder.push_record(["ID", "Title", "Unit Price", "Qty", "Subtotal"]);

        for line in &self.lines {
            builder.push_record([
                line.manga_id.to_string(),
                line.title.clone(),
                line.unit_price.to_string(),
                line.quantity.to_string(),
                line.subtotal.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..5), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "\n{table}")?;
        writeln!(out, " Items: {}", self.item_count)?;
        writeln!(out, " Total: {}", self.total)?;
        writeln!(out, " Shipping: free")?;

        Ok(())
    }
}
