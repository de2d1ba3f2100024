//! Commands against a book
//!
//! A command is validated and executed against the current `Books`, yielding
//! a `Transaction` of events for the repository to commit. Business
//! rejections are events, not errors; errors mean the command could not be
//! applied to these books at all.

pub mod place_order;
pub mod cancel_order;
pub mod mass_quote;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use types::entry::Side;
use types::ids::{BookId, ClientRequestId, EventId};

use crate::book::Books;
use crate::events::{BookEvent, BooksCreatedEvent};
use crate::transaction::Transaction;

pub use cancel_order::CancelOrderCommand;
pub use mass_quote::{CancelMassQuoteCommand, PlaceMassQuoteCommand, PriceWithSize, QuoteEntry};
pub use place_order::PlaceOrderCommand;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command for book {got} executed against book {expected}")]
    BookMismatch { expected: BookId, got: BookId },

    #[error("No resting {side} order {request_id} of this client")]
    EntryNotFound {
        side: Side,
        request_id: ClientRequestId,
    },
}

/// Refuse a command addressed to different books
pub(crate) fn check_book_id(books: &Books, book_id: &BookId) -> Result<(), CommandError> {
    if &books.book_id == book_id {
        Ok(())
    } else {
        Err(CommandError::BookMismatch {
            expected: books.book_id.clone(),
            got: book_id.clone(),
        })
    }
}

/// Open a new pair of books
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBooksCommand {
    pub book_id: BookId,
    pub when_requested: DateTime<Utc>,
}

impl CreateBooksCommand {
    pub fn execute(&self) -> Transaction {
        let event = BooksCreatedEvent {
            book_id: self.book_id.clone(),
            event_id: EventId::new(0),
            when_happened: self.when_requested,
        };
        Transaction::new(Books::new(self.book_id.clone())).append(BookEvent::BooksCreated(event))
    }
}

/// Any command the engine accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    CreateBooks(CreateBooksCommand),
    PlaceOrder(PlaceOrderCommand),
    CancelOrder(CancelOrderCommand),
    PlaceMassQuote(PlaceMassQuoteCommand),
    CancelMassQuote(CancelMassQuoteCommand),
}

impl Command {
    pub fn book_id(&self) -> &BookId {
        match self {
            Command::CreateBooks(c) => &c.book_id,
            Command::PlaceOrder(c) => &c.book_id,
            Command::CancelOrder(c) => &c.book_id,
            Command::PlaceMassQuote(c) => &c.book_id,
            Command::CancelMassQuote(c) => &c.book_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateBooks(_) => "CreateBooks",
            Command::PlaceOrder(_) => "PlaceOrder",
            Command::CancelOrder(_) => "CancelOrder",
            Command::PlaceMassQuote(_) => "PlaceMassQuote",
            Command::CancelMassQuote(_) => "CancelMassQuote",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, book_id};

    #[test]
    fn test_create_books() {
        let command = CreateBooksCommand {
            book_id: book_id(),
            when_requested: at(0),
        };
        let transaction = command.execute();

        assert_eq!(transaction.aggregate, Books::new(book_id()));
        assert_eq!(transaction.events.len(), 1);
        assert_eq!(transaction.events[0].event_id(), EventId::new(0));
        assert_eq!(transaction.events[0].event_type(), "BooksCreated");
    }

    #[test]
    fn test_check_book_id() {
        let books = Books::new(book_id());
        assert!(check_book_id(&books, &book_id()).is_ok());
        assert_eq!(
            check_book_id(&books, &BookId::new("OTHER")),
            Err(CommandError::BookMismatch {
                expected: book_id(),
                got: BookId::new("OTHER"),
            })
        );
    }
}
