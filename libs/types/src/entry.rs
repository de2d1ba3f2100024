//! Entry lifecycle enums
//!
//! Side, entry type, time-in-force and status of a book entry, plus the
//! table of valid entry type / time-in-force combinations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entry side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy entry (bid)
    BUY,
    /// Sell entry (offer)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::BUY => write!(f, "BUY"),
            Side::SELL => write!(f, "SELL"),
        }
    }
}

/// Whether the entry carries a limit price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    LIMIT,
    MARKET,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::LIMIT => write!(f, "LIMIT"),
            EntryType::MARKET => write!(f, "MARKET"),
        }
    }
}

/// Time-in-force policy for entries
///
/// Decides what happens to the residual of an entry after matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good-Till-Cancel: residual rests on the book
    GTC,
    /// Immediate-Or-Cancel: trades stand, residual is cancelled
    IOC,
    /// Fill-Or-Kill: fully filled at once or nothing happens
    FOK,
}

impl TimeInForce {
    /// Short wire code
    pub fn code(&self) -> &'static str {
        match self {
            TimeInForce::GTC => "GTC",
            TimeInForce::IOC => "IOC",
            TimeInForce::FOK => "FOK",
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A market entry can never rest, so it cannot be good-till-cancel.
pub fn is_valid_combo(entry_type: EntryType, time_in_force: TimeInForce) -> bool {
    !matches!((entry_type, time_in_force), (EntryType::MARKET, TimeInForce::GTC))
}

/// Entry status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    New,
    PartialFill,
    Filled,
    Cancelled,
}
