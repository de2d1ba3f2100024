//! Builders shared by the unit tests

use chrono::{DateTime, TimeZone, Utc};
use types::client::Client;
use types::entry::{EntryStatus, EntryType, Side, TimeInForce};
use types::ids::{BookId, ClientRequestId, EventId};
use types::numeric::EntryPrice;

use crate::book::{BookEntry, Books, EntryKey, EntrySizes};

pub fn book_id() -> BookId {
    BookId::new("BOOK-1")
}

pub fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

/// A GTC entry from its own firm, submitted `event_id` seconds in
pub fn entry(side: Side, price: EntryPrice, size: u64, event_id: u64) -> BookEntry {
    BookEntry {
        key: EntryKey {
            price,
            when_submitted: at(event_id as i64),
            event_id: EventId::new(event_id),
        },
        request_id: ClientRequestId::from(format!("REQ-{}", event_id)),
        who_requested: Client::firm(format!("FIRM-{}", event_id)),
        is_quote: false,
        entry_type: if price.is_market() {
            EntryType::MARKET
        } else {
            EntryType::LIMIT
        },
        side,
        time_in_force: if price.is_market() {
            TimeInForce::IOC
        } else {
            TimeInForce::GTC
        },
        sizes: EntrySizes::new(size),
        status: EntryStatus::New,
    }
}

pub fn limit_entry(side: Side, price: i64, size: u64, event_id: u64) -> BookEntry {
    entry(side, EntryPrice::limit(price), size, event_id)
}

pub fn market_entry(side: Side, size: u64, event_id: u64) -> BookEntry {
    entry(side, EntryPrice::Market, size, event_id)
}

/// Books holding the given resting entries, sequenced past the newest one
pub fn books_with(entries: &[BookEntry]) -> Books {
    let mut books = Books::new(book_id());
    for entry in entries {
        books.book_mut(entry.side).add(entry.clone());
        if entry.key.event_id > books.last_event_id {
            books.last_event_id = entry.key.event_id;
        }
    }
    books
}
