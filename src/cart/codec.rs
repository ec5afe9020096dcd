//! Persisted cart layout.
//!
//! The cart is stored as a single JSON document:
//!
//! ```json
//! { "items": [{ "mangaId": 1, "title": "…", "price": 9.95, "quantity": 2,
//!               "coverImage": "…", "maxStock": 12 }],
//!   "total": 19.9 }
//! ```
//!
//! Decoding repairs what it can rather than rejecting the whole document:
//! a missing or wrong-shaped `items` becomes `[]`, malformed or duplicate
//! lines are dropped, quantities are clamped into stock and `total` is always
//! recomputed from the surviving lines.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartItem},
    prices::Price,
};

/// Storage key used for the cart when none is configured.
pub const DEFAULT_CART_KEY: &str = "manga-cart";

/// Errors that make a persisted cart unreadable.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value is not valid JSON.
    #[error("malformed cart JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON root is not an object.
    #[error("persisted cart is not a JSON object")]
    NotAnObject,
}

/// Serialize a cart into its persisted form.
///
/// # Errors
///
/// Returns a [`CodecError::Json`] if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, CodecError> {
    Ok(serde_json::to_string(cart)?)
}

/// Decode a persisted cart, repairing wrong-shaped fields.
///
/// # Errors
///
/// Returns a [`CodecError`] only when the value is not a JSON object at all.
pub fn decode(raw: &str) -> Result<Cart, CodecError> {
    let Value::Object(mut root) = serde_json::from_str::<Value>(raw)? else {
        return Err(CodecError::NotAnObject);
    };

    let entries = match root.remove("items") {
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            warn!(found = %kind(&other), "persisted cart items are not an array; using none");
            Vec::new()
        }
        None => {
            debug!("persisted cart has no items field");
            Vec::new()
        }
    };

    let mut items: Vec<CartItem> = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let item = match serde_json::from_value::<CartItem>(entry) {
            Ok(item) => item,
            Err(error) => {
                warn!(index, %error, "dropping malformed cart line");
                continue;
            }
        };

        if items.iter().any(|kept| kept.manga_id() == item.manga_id()) {
            warn!(index, manga_id = item.manga_id(), "dropping duplicate cart line");
            continue;
        }

        match item.repaired() {
            Some(item) => items.push(item),
            None => warn!(index, "dropping cart line without stock"),
        }
    }

    let cart = Cart::from_items(items);

    let persisted_total = root
        .get("total")
        .and_then(Value::as_f64)
        .and_then(|total| Price::try_from(total).ok());

    if persisted_total != Some(cart.total()) {
        debug!(
            persisted = ?persisted_total,
            recomputed = %cart.total(),
            "persisted cart total replaced by recomputed total"
        );
    }

    Ok(cart)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::cart::NewCartItem;

    use super::*;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();

        cart.add(
            NewCartItem {
                id: 30013,
                title: "One Piece".to_string(),
                price: Price::from_cents(995),
                cover_image: "https://img.example/30013.jpg".to_string(),
                stock_limit: 12,
            },
            2,
        );
        cart.add(
            NewCartItem {
                id: 30002,
                title: "Berserk".to_string(),
                price: Price::from_cents(1450),
                cover_image: "https://img.example/30002.jpg".to_string(),
                stock_limit: 4,
            },
            1,
        );

        cart
    }

    #[test]
    fn encode_writes_items_and_total() -> TestResult {
        let encoded = encode(&sample_cart())?;
        let value: Value = serde_json::from_str(&encoded)?;

        assert_eq!(value["total"], 34.4);
        assert_eq!(value["items"][0]["mangaId"], 30013);
        assert_eq!(value["items"][1]["maxStock"], 4);

        Ok(())
    }

    #[test]
    fn round_trip_preserves_cart() -> TestResult {
        let cart = sample_cart();

        assert_eq!(decode(&encode(&cart)?)?, cart);

        Ok(())
    }

    #[test]
    fn empty_cart_round_trips() -> TestResult {
        assert_eq!(decode(&encode(&Cart::new())?)?, Cart::new());

        Ok(())
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(decode("{not json"), Err(CodecError::Json(_))));
    }

    #[test]
    fn non_object_root_is_an_error() {
        assert!(matches!(decode("[1, 2, 3]"), Err(CodecError::NotAnObject)));
    }

    #[test]
    fn missing_fields_default_to_empty() -> TestResult {
        assert_eq!(decode("{}")?, Cart::new());

        Ok(())
    }

    #[test]
    fn wrong_shaped_items_become_empty() -> TestResult {
        let cart = decode(r#"{"items": "nope", "total": 12.5}"#)?;

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);

        Ok(())
    }

    #[test]
    fn wrong_shaped_total_is_recomputed() -> TestResult {
        let raw = json!({
            "items": [{
                "mangaId": 1, "title": "A", "price": 10.0, "quantity": 3,
                "coverImage": "a.jpg", "maxStock": 5
            }],
            "total": "lots"
        });

        let cart = decode(&raw.to_string())?;

        assert_eq!(cart.total(), Price::from_cents(3000));

        Ok(())
    }

    #[test]
    fn stale_total_is_recomputed() -> TestResult {
        let raw = json!({
            "items": [{
                "mangaId": 1, "title": "A", "price": 2.5, "quantity": 2,
                "coverImage": "a.jpg", "maxStock": 5
            }],
            "total": 99.0
        });

        assert_eq!(decode(&raw.to_string())?.total(), Price::from_cents(500));

        Ok(())
    }

    #[test]
    fn malformed_and_duplicate_lines_are_dropped() -> TestResult {
        let raw = json!({
            "items": [
                { "mangaId": 1, "title": "A", "price": 1.0, "quantity": 1,
                  "coverImage": "a.jpg", "maxStock": 5 },
                { "mangaId": "two", "title": "B" },
                { "mangaId": 1, "title": "A again", "price": 1.0, "quantity": 4,
                  "coverImage": "a.jpg", "maxStock": 5 },
                { "mangaId": 3, "title": "C", "price": -4.0, "quantity": 1,
                  "coverImage": "c.jpg", "maxStock": 5 }
            ],
            "total": 0
        });

        let cart = decode(&raw.to_string())?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(1).map(CartItem::title), Some("A"));
        assert_eq!(cart.get(1).map(CartItem::quantity), Some(1));

        Ok(())
    }

    #[test]
    fn quantities_are_clamped_and_empty_lines_dropped() -> TestResult {
        let raw = json!({
            "items": [
                { "mangaId": 1, "title": "A", "price": 1.0, "quantity": 9,
                  "coverImage": "a.jpg", "maxStock": 3 },
                { "mangaId": 2, "title": "B", "price": 1.0, "quantity": 0,
                  "coverImage": "b.jpg", "maxStock": 3 }
            ]
        });

        let cart = decode(&raw.to_string())?;

        assert_eq!(cart.get(1).map(CartItem::quantity), Some(3));
        assert!(!cart.contains(2));
        assert_eq!(cart.total(), Price::from_cents(300));

        Ok(())
    }
}
