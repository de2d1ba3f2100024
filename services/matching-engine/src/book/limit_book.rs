//! One side of an instrument's book
//!
//! Entries are kept in a BTreeMap under a side-aware key, so iteration is
//! always exact price-time priority:
//! 1. MARKET entries first
//! 2. better price (BUY: higher first, SELL: lower first)
//! 3. earlier submission time
//! 4. smaller event id

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use types::entry::Side;
use types::numeric::EntryPrice;

use super::entry::{BookEntry, EntryKey, TradeSideEntry};

/// Entry key ordered by priority for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookKey {
    side: Side,
    key: EntryKey,
}

impl BookKey {
    pub fn new(side: Side, key: EntryKey) -> Self {
        Self { side, key }
    }

    pub fn entry_key(&self) -> &EntryKey {
        &self.key
    }
}

/// Price priority for one side; better prices compare as Less
fn compare_prices(side: Side, a: &EntryPrice, b: &EntryPrice) -> Ordering {
    match (a, b) {
        (EntryPrice::Market, EntryPrice::Market) => Ordering::Equal,
        (EntryPrice::Market, EntryPrice::Limit(_)) => Ordering::Less,
        (EntryPrice::Limit(_), EntryPrice::Market) => Ordering::Greater,
        (EntryPrice::Limit(a), EntryPrice::Limit(b)) => match side {
            Side::BUY => b.cmp(a),
            Side::SELL => a.cmp(b),
        },
    }
}

impl Ord for BookKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_prices(self.side, &self.key.price, &other.key.price)
            .then_with(|| self.key.when_submitted.cmp(&other.key.when_submitted))
            .then_with(|| self.key.event_id.cmp(&other.key.event_id))
    }
}

impl PartialOrd for BookKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Entries of one side, in priority order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitBook {
    side: Side,
    entries: BTreeMap<BookKey, BookEntry>,
}

impl LimitBook {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            entries: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    fn book_key(&self, key: &EntryKey) -> BookKey {
        BookKey::new(self.side, *key)
    }

    /// Insert an entry; an entry with an identical key is replaced
    pub fn add(&mut self, entry: BookEntry) {
        debug_assert_eq!(entry.side, self.side, "entry added to the wrong side");
        self.entries.insert(self.book_key(&entry.key), entry);
    }

    /// Apply the post-trade state of a resting entry
    ///
    /// The entry leaves the book once nothing is available.
    pub fn update(&mut self, traded: &TradeSideEntry) {
        let key = self.book_key(&traded.key());
        if traded.sizes.available == 0 {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, traded.to_book_entry());
        }
    }

    pub fn remove(&mut self, key: &EntryKey) -> Option<BookEntry> {
        self.entries.remove(&self.book_key(key))
    }

    pub fn get(&self, key: &EntryKey) -> Option<&BookEntry> {
        self.entries.get(&self.book_key(key))
    }

    /// Entries in priority order
    pub fn entries(&self) -> impl Iterator<Item = &BookEntry> + '_ {
        self.entries.values()
    }

    /// Highest priority entry
    pub fn best(&self) -> Option<&BookEntry> {
        self.entries.values().next()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
