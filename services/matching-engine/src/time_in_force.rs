//! Time-in-force finalisation
//!
//! Decides the fate of an aggressor's residual once matching is done:
//! - GTC: the residual rests on the book
//! - IOC: trades stand, the residual is cancelled
//! - FOK: the entry is matched only when it can be filled completely,
//!   otherwise it is killed before any trade happens

use types::entry::{EntryType, TimeInForce};

use crate::book::BookEntry;
use crate::events::{BookEvent, EntryAddedToBookEvent, OrderCancelledByExchangeEvent};
use crate::matching::MatchingResult;
use crate::transaction::Transaction;

/// Apply the aggressor's time-in-force to a matching result
///
/// # Panics
/// Panics if a fill-or-kill aggressor is left with a residual; such an
/// aggressor must be killed with [`kill`] instead of being matched.
pub fn finalise(result: MatchingResult) -> Transaction {
    let MatchingResult {
        aggressor,
        transaction,
    } = result;

    if aggressor.available() == 0 {
        return transaction;
    }

    match (aggressor.time_in_force, aggressor.entry_type) {
        (TimeInForce::GTC, EntryType::LIMIT) => add_to_book(aggressor, transaction),
        (TimeInForce::IOC, _) | (TimeInForce::GTC, EntryType::MARKET) => {
            cancel(&aggressor, transaction)
        }
        (TimeInForce::FOK, _) => panic!(
            "fill-or-kill entry {} matched with {} left",
            aggressor.request_id,
            aggressor.available()
        ),
    }
}

/// Cancel a fill-or-kill aggressor that cannot be filled, leaving the books
/// as they are
pub fn kill(aggressor: &BookEntry, transaction: Transaction) -> Transaction {
    cancel(aggressor, transaction)
}

fn add_to_book(aggressor: BookEntry, transaction: Transaction) -> Transaction {
    let event_id = transaction.aggregate.next_event_id();
    let event = EntryAddedToBookEvent {
        book_id: transaction.aggregate.book_id.clone(),
        event_id,
        entry: aggressor.with_event_id(event_id),
    };
    transaction.append(BookEvent::EntryAddedToBook(event))
}

fn cancel(entry: &BookEntry, transaction: Transaction) -> Transaction {
    let event = OrderCancelledByExchangeEvent {
        book_id: transaction.aggregate.book_id.clone(),
        event_id: transaction.aggregate.next_event_id(),
        when_happened: entry.key.when_submitted,
        entry: entry.cancelled(),
    };
    transaction.append(BookEvent::OrderCancelledByExchange(event))
}
