//! Fixed-point price types
//!
//! A `Price` is an integer scaled by the instrument's decimal places, e.g.
//! 1234 represents 12.34 when the instrument trades with 2 decimal places.
//! Conversions to and from `rust_decimal::Decimal` are exact or refused;
//! nothing here rounds.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest number of decimal places a price may be scaled by
pub const MAX_DECIMAL_PLACES: u32 = 18;

/// Normalised integer price
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Human-readable decimal value for the given instrument precision
    pub fn to_decimal(&self, decimal_places: u32) -> Decimal {
        Decimal::new(self.0, decimal_places.min(MAX_DECIMAL_PLACES))
    }

    /// Normalise a decimal price
    ///
    /// Returns None if the value carries more precision than
    /// `decimal_places` allows or does not fit in an i64.
    pub fn from_decimal(value: Decimal, decimal_places: u32) -> Option<Self> {
        if decimal_places > MAX_DECIMAL_PLACES {
            return None;
        }
        let scale = Decimal::from(10i64.pow(decimal_places));
        let scaled = value.checked_mul(scale)?;
        if !scaled.fract().is_zero() {
            return None;
        }
        scaled.to_i64().map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The price attached to an order or quote entry
///
/// `Market` means "no limit". It is never compared numerically: ordering and
/// trade-price rules match on the variant explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryPrice {
    Market,
    Limit(Price),
}

impl EntryPrice {
    pub fn limit(value: i64) -> Self {
        EntryPrice::Limit(Price::new(value))
    }

    /// The limit price, if any
    pub fn as_limit(&self) -> Option<Price> {
        match self {
            EntryPrice::Market => None,
            EntryPrice::Limit(price) => Some(*price),
        }
    }

    pub fn is_market(&self) -> bool {
        matches!(self, EntryPrice::Market)
    }
}

impl fmt::Display for EntryPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryPrice::Market => write!(f, "MARKET"),
            EntryPrice::Limit(price) => write!(f, "{}", price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_price_ordering() {
        assert!(Price::new(10) < Price::new(11));
        assert!(Price::new(-1) < Price::new(0));
        assert_eq!(Price::new(5), Price::new(5));
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Price::new(1234).to_decimal(2), Decimal::from_str("12.34").unwrap());
        assert_eq!(Price::new(1234).to_decimal(0), Decimal::from(1234));
    }

    #[test]
    fn test_from_decimal_exact() {
        let d = Decimal::from_str("12.34").unwrap();
        assert_eq!(Price::from_decimal(d, 2), Some(Price::new(1234)));
        assert_eq!(Price::from_decimal(d, 3), Some(Price::new(12340)));
    }

    #[test]
    fn test_from_decimal_refuses_extra_precision() {
        let d = Decimal::from_str("12.345").unwrap();
        assert_eq!(Price::from_decimal(d, 2), None);
        assert_eq!(Price::from_decimal(d, MAX_DECIMAL_PLACES + 1), None);
    }

    #[test]
    fn test_entry_price_limit() {
        assert_eq!(EntryPrice::limit(9).as_limit(), Some(Price::new(9)));
        assert_eq!(EntryPrice::Market.as_limit(), None);
        assert!(EntryPrice::Market.is_market());
        assert!(!EntryPrice::limit(9).is_market());
    }

    #[test]
    fn test_entry_price_serialization() {
        let json = serde_json::to_string(&EntryPrice::limit(12)).unwrap();
        assert_eq!(json, r#"{"Limit":12}"#);
        let market: EntryPrice = serde_json::from_str(r#""Market""#).unwrap();
        assert_eq!(market, EntryPrice::Market);
    }
}
