//! Prices

use std::{
    fmt,
    iter::Sum,
    ops::{Add, Deref},
    str::FromStr,
};

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
use thiserror::Error;

/// Errors that can occur while parsing or converting a price.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// The amount could not be parsed as a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),

    /// Prices cannot be negative.
    #[error("price cannot be negative: {0}")]
    Negative(String),

    /// The amount does not fit in the supported range.
    #[error("price out of range: {0}")]
    OutOfRange(String),

    /// Only euro prices are supported.
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),
}

/// Represents a non-negative euro amount in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price {
    cents: u64,
}

impl Price {
    /// Zero euros.
    pub const ZERO: Price = Price { cents: 0 };

    /// Creates a price from a number of cents.
    pub const fn from_cents(cents: u64) -> Self {
        Price { cents }
    }

    /// Returns the price in cents.
    pub const fn cents(self) -> u64 {
        self.cents
    }

    /// Creates a price from a decimal euro amount, rounding half away from zero to the cent.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for negative amounts and
    /// [`PriceError::OutOfRange`] when the amount does not fit in cents.
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount.to_string()));
        }

        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|value| value.to_u64())
            .ok_or_else(|| PriceError::OutOfRange(amount.to_string()))?;

        Ok(Price { cents })
    }

    /// Returns the price as a decimal euro amount with two decimal places.
    pub fn to_decimal(self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.cents), 2)
    }

    /// Parse a fixture price string such as `"12.99 EUR"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not in the format `AMOUNT CURRENCY`, the
    /// amount is not a valid price or the currency is anything other than EUR.
    pub fn parse_with_currency(s: &str) -> Result<Self, PriceError> {
        let mut parts = s.split_whitespace();

        let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(PriceError::Invalid(format!(
                "expected format 'AMOUNT CURRENCY', got: {s}"
            )));
        };

        if !code.eq_ignore_ascii_case(iso::EUR.iso_alpha_code) {
            return Err(PriceError::UnsupportedCurrency(code.to_string()));
        }

        amount.parse()
    }

    /// Multiplies the unit price by a quantity, saturating at the maximum amount.
    #[must_use]
    pub fn times(self, quantity: u32) -> Price {
        Price {
            cents: self.cents.saturating_mul(u64::from(quantity)),
        }
    }

    /// Returns the price as euro [`Money`].
    pub fn money(self) -> Money<'static, Currency> {
        Money::from_minor(i64::try_from(self.cents).unwrap_or(i64::MAX), iso::EUR)
    }
}

impl Deref for Price {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.cents
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = s
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| PriceError::Invalid(s.to_string()))?;

        Price::from_decimal(amount)
    }
}

impl TryFrom<f64> for Price {
    type Error = PriceError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(PriceError::Invalid(value.to_string()));
        }

        let amount =
            Decimal::from_f64(value).ok_or_else(|| PriceError::OutOfRange(value.to_string()))?;

        Price::from_decimal(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.money())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self
            .to_decimal()
            .to_f64()
            .ok_or_else(|| ser::Error::custom(format!("price {} is not representable", self.cents)))?;

        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;

        Price::try_from(value).map_err(de::Error::custom)
    }
}
