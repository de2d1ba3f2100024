//! Place order command

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::client::Client;
use types::entry::{is_valid_combo, EntryStatus, EntryType, Side, TimeInForce};
use types::errors::RejectReason;
use types::ids::{BookId, ClientRequestId, EventId};
use types::numeric::{EntryPrice, Price};

use crate::book::{BookEntry, Books, EntryKey, EntrySizes};
use crate::events::{BookEvent, OrderPlacedEvent, OrderRejectedEvent};
use crate::matching::continue_and_finalise;
use crate::transaction::Transaction;

use super::{check_book_id, CommandError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderCommand {
    pub request_id: ClientRequestId,
    pub who_requested: Client,
    pub book_id: BookId,
    pub entry_type: EntryType,
    pub side: Side,
    pub size: u64,
    /// Required for LIMIT orders, absent for MARKET orders
    pub price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub when_requested: DateTime<Utc>,
}

impl PlaceOrderCommand {
    /// Business validation
    pub fn validate(&self) -> Result<(), RejectReason> {
        if self.size == 0 {
            return Err(RejectReason::ZeroSize);
        }
        match (self.entry_type, self.price) {
            (EntryType::LIMIT, None) => return Err(RejectReason::MissingLimitPrice),
            (EntryType::MARKET, Some(_)) => return Err(RejectReason::UnexpectedLimitPrice),
            _ => {}
        }
        if !is_valid_combo(self.entry_type, self.time_in_force) {
            return Err(RejectReason::InvalidTimeInForce {
                entry_type: self.entry_type,
                time_in_force: self.time_in_force,
            });
        }
        Ok(())
    }

    fn entry_price(&self) -> EntryPrice {
        self.price.map_or(EntryPrice::Market, EntryPrice::Limit)
    }

    /// Book entry for this order, keyed by the event that placed it
    pub fn to_entry(&self, event_id: EventId) -> BookEntry {
        BookEntry {
            key: EntryKey {
                price: self.entry_price(),
                when_submitted: self.when_requested,
                event_id,
            },
            request_id: self.request_id.clone(),
            who_requested: self.who_requested.clone(),
            is_quote: false,
            entry_type: self.entry_type,
            side: self.side,
            time_in_force: self.time_in_force,
            sizes: EntrySizes::new(self.size),
            status: EntryStatus::New,
        }
    }

    /// Reject, or place and match the order
    pub fn execute(&self, books: &Books) -> Result<Transaction, CommandError> {
        check_book_id(books, &self.book_id)?;
        let transaction = Transaction::new(books.clone());
        let event_id = books.next_event_id();

        if let Err(reason) = self.validate() {
            let rejected = OrderRejectedEvent {
                book_id: self.book_id.clone(),
                event_id,
                when_happened: self.when_requested,
                request_id: self.request_id.clone(),
                who_requested: self.who_requested.clone(),
                entry_type: self.entry_type,
                side: self.side,
                size: self.size,
                price: self.price,
                time_in_force: self.time_in_force,
                reason,
            };
            return Ok(transaction.append(BookEvent::OrderRejected(rejected)));
        }

        let entry = self.to_entry(event_id);
        let placed = OrderPlacedEvent {
            book_id: self.book_id.clone(),
            event_id,
            when_happened: self.when_requested,
            entry: entry.clone(),
        };
        let transaction = transaction.append(BookEvent::OrderPlaced(placed));
        Ok(continue_and_finalise(&entry, transaction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, book_id, books_with, limit_entry};

    fn command(entry_type: EntryType, price: Option<i64>, time_in_force: TimeInForce) -> PlaceOrderCommand {
        PlaceOrderCommand {
            request_id: ClientRequestId::from("ORD-1"),
            who_requested: Client::firm_client("FIRM-T", "C1"),
            book_id: book_id(),
            entry_type,
            side: Side::BUY,
            size: 10,
            price: price.map(Price::new),
            time_in_force,
            when_requested: at(100),
        }
    }

    #[test]
    fn test_validate() {
        assert_eq!(command(EntryType::LIMIT, Some(9), TimeInForce::GTC).validate(), Ok(()));
        assert_eq!(command(EntryType::MARKET, None, TimeInForce::IOC).validate(), Ok(()));
        assert_eq!(
            command(EntryType::LIMIT, None, TimeInForce::GTC).validate(),
            Err(RejectReason::MissingLimitPrice)
        );
        assert_eq!(
            command(EntryType::MARKET, Some(9), TimeInForce::IOC).validate(),
            Err(RejectReason::UnexpectedLimitPrice)
        );
        assert_eq!(
            command(EntryType::MARKET, None, TimeInForce::GTC).validate(),
            Err(RejectReason::InvalidTimeInForce {
                entry_type: EntryType::MARKET,
                time_in_force: TimeInForce::GTC,
            })
        );

        let mut zero = command(EntryType::LIMIT, Some(9), TimeInForce::GTC);
        zero.size = 0;
        assert_eq!(zero.validate(), Err(RejectReason::ZeroSize));
    }

    #[test]
    fn test_rejected_order_only_emits_rejection() {
        let books = books_with(&[limit_entry(Side::SELL, 9, 5, 1)]);
        let transaction = command(EntryType::MARKET, None, TimeInForce::GTC)
            .execute(&books)
            .unwrap();

        assert_eq!(transaction.events.len(), 1);
        let BookEvent::OrderRejected(rejected) = &transaction.events[0] else {
            panic!("expected rejection");
        };
        assert_eq!(rejected.event_id, EventId::new(2));
        assert_eq!(transaction.aggregate.sell_limit_book, books.sell_limit_book);
    }

    #[test]
    fn test_placed_order_rests() {
        let books = books_with(&[]);
        let transaction = command(EntryType::LIMIT, Some(9), TimeInForce::GTC)
            .execute(&books)
            .unwrap();

        let kinds: Vec<&str> = transaction.events.iter().map(BookEvent::event_type).collect();
        assert_eq!(kinds, vec!["OrderPlaced", "EntryAddedToBook"]);
        let resting = transaction.aggregate.buy_limit_book.best().unwrap();
        assert_eq!(resting.key.event_id, EventId::new(2));
        assert_eq!(resting.key.when_submitted, at(100));
        assert_eq!(resting.request_id, ClientRequestId::from("ORD-1"));
    }

    #[test]
    fn test_placed_entry_keyed_by_placed_event() {
        let books = books_with(&[]);
        let transaction = command(EntryType::MARKET, None, TimeInForce::IOC)
            .execute(&books)
            .unwrap();

        let BookEvent::OrderPlaced(placed) = &transaction.events[0] else {
            panic!("expected placement");
        };
        assert_eq!(placed.entry.key.event_id, EventId::new(1));
        assert_eq!(placed.entry.key.price, EntryPrice::Market);
        assert_eq!(transaction.events[1].event_type(), "OrderCancelledByExchange");
    }

    #[test]
    fn test_wrong_book_is_an_error() {
        let books = Books::new(BookId::new("OTHER"));
        let result = command(EntryType::LIMIT, Some(9), TimeInForce::GTC).execute(&books);
        assert!(matches!(result, Err(CommandError::BookMismatch { .. })));
    }
}
