//! Book entries
//!
//! A `BookEntry` is one order or quote side as the book sees it. Entries are
//! values: every operation returns an updated copy and the owner of the book
//! decides where that copy goes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::client::Client;
use types::entry::{EntryStatus, EntryType, Side, TimeInForce};
use types::ids::{ClientRequestId, EventId};
use types::numeric::EntryPrice;

/// Priority key of an entry within its limit book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey {
    pub price: EntryPrice,
    pub when_submitted: DateTime<Utc>,
    /// Id of the event that last placed or touched the entry
    pub event_id: EventId,
}

/// Size accounting of an entry
///
/// `available + traded + cancelled` always equals the original size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntrySizes {
    pub available: u64,
    pub traded: u64,
    pub cancelled: u64,
}

impl EntrySizes {
    pub fn new(size: u64) -> Self {
        Self {
            available: size,
            traded: 0,
            cancelled: 0,
        }
    }

    /// Original size of the entry
    pub fn total(&self) -> u64 {
        self.available + self.traded + self.cancelled
    }

    /// Move `size` from available to traded
    ///
    /// # Panics
    /// Panics if `size` exceeds the available size
    pub fn traded(&self, size: u64) -> Self {
        assert!(
            size <= self.available,
            "Trade size {} exceeds available size {}",
            size,
            self.available
        );
        Self {
            available: self.available - size,
            traded: self.traded + size,
            cancelled: self.cancelled,
        }
    }

    /// Move everything still available to cancelled
    pub fn cancelled(&self) -> Self {
        Self {
            available: 0,
            traded: self.traded,
            cancelled: self.cancelled + self.available,
        }
    }
}

/// An order or quote entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    pub key: EntryKey,
    pub request_id: ClientRequestId,
    pub who_requested: Client,
    pub is_quote: bool,
    pub entry_type: EntryType,
    pub side: Side,
    pub time_in_force: TimeInForce,
    pub sizes: EntrySizes,
    pub status: EntryStatus,
}

impl BookEntry {
    pub fn price(&self) -> EntryPrice {
        self.key.price
    }

    pub fn available(&self) -> u64 {
        self.sizes.available
    }

    /// Copy of the entry after trading `size`
    ///
    /// # Panics
    /// Panics if `size` exceeds the available size
    pub fn traded(&self, size: u64) -> Self {
        let sizes = self.sizes.traded(size);
        let status = if sizes.available == 0 {
            EntryStatus::Filled
        } else {
            EntryStatus::PartialFill
        };
        Self {
            sizes,
            status,
            ..self.clone()
        }
    }

    /// Copy of the entry with its available size cancelled
    pub fn cancelled(&self) -> Self {
        Self {
            sizes: self.sizes.cancelled(),
            status: EntryStatus::Cancelled,
            ..self.clone()
        }
    }

    /// Copy of the entry keyed by a different event
    pub fn with_event_id(&self, event_id: EventId) -> Self {
        let mut entry = self.clone();
        entry.key.event_id = event_id;
        entry
    }

    pub fn to_trade_side_entry(&self) -> TradeSideEntry {
        TradeSideEntry {
            request_id: self.request_id.clone(),
            who_requested: self.who_requested.clone(),
            is_quote: self.is_quote,
            entry_type: self.entry_type,
            side: self.side,
            price: self.key.price,
            time_in_force: self.time_in_force,
            when_submitted: self.key.when_submitted,
            event_id: self.key.event_id,
            sizes: self.sizes,
            status: self.status,
        }
    }
}

/// One side of a trade, as recorded in the trade event
///
/// Carries everything needed to rebuild the book entry when the event is
/// replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSideEntry {
    pub request_id: ClientRequestId,
    pub who_requested: Client,
    pub is_quote: bool,
    pub entry_type: EntryType,
    pub side: Side,
    pub price: EntryPrice,
    pub time_in_force: TimeInForce,
    pub when_submitted: DateTime<Utc>,
    pub event_id: EventId,
    pub sizes: EntrySizes,
    pub status: EntryStatus,
}

impl TradeSideEntry {
    pub fn key(&self) -> EntryKey {
        EntryKey {
            price: self.price,
            when_submitted: self.when_submitted,
            event_id: self.event_id,
        }
    }

    pub fn to_book_entry(&self) -> BookEntry {
        BookEntry {
            key: self.key(),
            request_id: self.request_id.clone(),
            who_requested: self.who_requested.clone(),
            is_quote: self.is_quote,
            entry_type: self.entry_type,
            side: self.side,
            time_in_force: self.time_in_force,
            sizes: self.sizes,
            status: self.status,
        }
    }
}
