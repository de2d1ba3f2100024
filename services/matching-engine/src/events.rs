//! Book events
//!
//! Every change to a `Books` is the result of playing one of these events.
//! Each event except `BooksCreated` carries the next event id of the books it
//! is played against; playing it out of sequence is a bug and panics.

use chrono::{DateTime, Utc};
use persistence::Journaled;
use serde::{Deserialize, Serialize};
use types::client::Client;
use types::entry::{EntryType, Side, TimeInForce};
use types::errors::RejectReason;
use types::ids::{BookId, ClientRequestId, EventId};
use types::numeric::Price;

use crate::book::{BookEntry, Books, TradeSideEntry};
use crate::commands::mass_quote::QuoteEntry;

/// Books opened for trading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooksCreatedEvent {
    pub book_id: BookId,
    pub event_id: EventId,
    pub when_happened: DateTime<Utc>,
}

/// Order accepted, before matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacedEvent {
    pub book_id: BookId,
    pub event_id: EventId,
    pub when_happened: DateTime<Utc>,
    pub entry: BookEntry,
}

/// Order refused by validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRejectedEvent {
    pub book_id: BookId,
    pub event_id: EventId,
    pub when_happened: DateTime<Utc>,
    pub request_id: ClientRequestId,
    pub who_requested: Client,
    pub entry_type: EntryType,
    pub side: Side,
    pub size: u64,
    pub price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub reason: RejectReason,
}

/// Residual of an entry now resting on the book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAddedToBookEvent {
    pub book_id: BookId,
    pub event_id: EventId,
    pub entry: BookEntry,
}

/// Aggressor traded against a resting entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub book_id: BookId,
    pub event_id: EventId,
    pub size: u64,
    pub price: Price,
    pub when_happened: DateTime<Utc>,
    pub aggressor: TradeSideEntry,
    pub passive: TradeSideEntry,
}

/// Entry cancelled by time-in-force rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelledByExchangeEvent {
    pub book_id: BookId,
    pub event_id: EventId,
    pub when_happened: DateTime<Utc>,
    pub entry: BookEntry,
}

/// Resting order cancelled on the client's request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelledByClientEvent {
    pub book_id: BookId,
    pub event_id: EventId,
    pub when_happened: DateTime<Utc>,
    pub request_id: ClientRequestId,
    pub entry: BookEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MassQuotePlacedEvent {
    pub book_id: BookId,
    pub event_id: EventId,
    pub when_happened: DateTime<Utc>,
    pub quote_id: String,
    pub who_requested: Client,
    pub entries: Vec<QuoteEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MassQuoteRejectedEvent {
    pub book_id: BookId,
    pub event_id: EventId,
    pub when_happened: DateTime<Utc>,
    pub quote_id: String,
    pub who_requested: Client,
    pub entries: Vec<QuoteEntry>,
    pub reason: RejectReason,
}

/// All resting quotes of a firm cancelled
///
/// `primary` is true when the firm asked for the cancellation, false when a
/// new mass quote replaced the old quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MassQuoteCancelledEvent {
    pub book_id: BookId,
    pub event_id: EventId,
    pub when_happened: DateTime<Utc>,
    pub who_requested: Client,
    pub entries: Vec<BookEntry>,
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookEvent {
    BooksCreated(BooksCreatedEvent),
    OrderPlaced(OrderPlacedEvent),
    OrderRejected(OrderRejectedEvent),
    EntryAddedToBook(EntryAddedToBookEvent),
    Trade(TradeEvent),
    OrderCancelledByExchange(OrderCancelledByExchangeEvent),
    OrderCancelledByClient(OrderCancelledByClientEvent),
    MassQuotePlaced(MassQuotePlacedEvent),
    MassQuoteRejected(MassQuoteRejectedEvent),
    MassQuoteCancelled(MassQuoteCancelledEvent),
}

impl BookEvent {
    pub fn event_id(&self) -> EventId {
        match self {
            BookEvent::BooksCreated(e) => e.event_id,
            BookEvent::OrderPlaced(e) => e.event_id,
            BookEvent::OrderRejected(e) => e.event_id,
            BookEvent::EntryAddedToBook(e) => e.event_id,
            BookEvent::Trade(e) => e.event_id,
            BookEvent::OrderCancelledByExchange(e) => e.event_id,
            BookEvent::OrderCancelledByClient(e) => e.event_id,
            BookEvent::MassQuotePlaced(e) => e.event_id,
            BookEvent::MassQuoteRejected(e) => e.event_id,
            BookEvent::MassQuoteCancelled(e) => e.event_id,
        }
    }

    pub fn book_id(&self) -> &BookId {
        match self {
            BookEvent::BooksCreated(e) => &e.book_id,
            BookEvent::OrderPlaced(e) => &e.book_id,
            BookEvent::OrderRejected(e) => &e.book_id,
            BookEvent::EntryAddedToBook(e) => &e.book_id,
            BookEvent::Trade(e) => &e.book_id,
            BookEvent::OrderCancelledByExchange(e) => &e.book_id,
            BookEvent::OrderCancelledByClient(e) => &e.book_id,
            BookEvent::MassQuotePlaced(e) => &e.book_id,
            BookEvent::MassQuoteRejected(e) => &e.book_id,
            BookEvent::MassQuoteCancelled(e) => &e.book_id,
        }
    }

    pub fn when_happened(&self) -> DateTime<Utc> {
        match self {
            BookEvent::BooksCreated(e) => e.when_happened,
            BookEvent::OrderPlaced(e) => e.when_happened,
            BookEvent::OrderRejected(e) => e.when_happened,
            BookEvent::EntryAddedToBook(e) => e.entry.key.when_submitted,
            BookEvent::Trade(e) => e.when_happened,
            BookEvent::OrderCancelledByExchange(e) => e.when_happened,
            BookEvent::OrderCancelledByClient(e) => e.when_happened,
            BookEvent::MassQuotePlaced(e) => e.when_happened,
            BookEvent::MassQuoteRejected(e) => e.when_happened,
            BookEvent::MassQuoteCancelled(e) => e.when_happened,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            BookEvent::BooksCreated(_) => "BooksCreated",
            BookEvent::OrderPlaced(_) => "OrderPlaced",
            BookEvent::OrderRejected(_) => "OrderRejected",
            BookEvent::EntryAddedToBook(_) => "EntryAddedToBook",
            BookEvent::Trade(_) => "Trade",
            BookEvent::OrderCancelledByExchange(_) => "OrderCancelledByExchange",
            BookEvent::OrderCancelledByClient(_) => "OrderCancelledByClient",
            BookEvent::MassQuotePlaced(_) => "MassQuotePlaced",
            BookEvent::MassQuoteRejected(_) => "MassQuoteRejected",
            BookEvent::MassQuoteCancelled(_) => "MassQuoteCancelled",
        }
    }

    /// Apply the event to `books`
    ///
    /// # Panics
    /// Panics if the event id does not follow `books.last_event_id`
    pub fn play(&self, mut books: Books) -> Books {
        if let BookEvent::BooksCreated(e) = self {
            return Books::new(e.book_id.clone());
        }
        books.advance(self.event_id());

        match self {
            BookEvent::EntryAddedToBook(e) => {
                books.book_mut(e.entry.side).add(e.entry.clone());
            }
            BookEvent::Trade(e) => {
                books.book_mut(e.passive.side).update(&e.passive);
            }
            BookEvent::OrderCancelledByExchange(e) => {
                books.book_mut(e.entry.side).remove(&e.entry.key);
            }
            BookEvent::OrderCancelledByClient(e) => {
                books.book_mut(e.entry.side).remove(&e.entry.key);
            }
            BookEvent::MassQuoteCancelled(e) => {
                for entry in &e.entries {
                    books.book_mut(entry.side).remove(&entry.key);
                }
            }
            BookEvent::BooksCreated(_)
            | BookEvent::OrderPlaced(_)
            | BookEvent::OrderRejected(_)
            | BookEvent::MassQuotePlaced(_)
            | BookEvent::MassQuoteRejected(_) => {}
        }
        books
    }

    /// Trade details, if this is a trade
    pub fn as_trade(&self) -> Option<&TradeEvent> {
        match self {
            BookEvent::Trade(e) => Some(e),
            _ => None,
        }
    }
}

impl Journaled for BookEvent {
    fn sequence(&self) -> u64 {
        self.event_id().value()
    }

    fn timestamp(&self) -> Option<i64> {
        self.when_happened().timestamp_nanos_opt()
    }

    fn event_type(&self) -> &'static str {
        BookEvent::event_type(self)
    }
}
