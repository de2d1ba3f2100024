//! Books repository
//!
//! Holds the current `Books` of every book id together with its event
//! journal. A transaction is committed by journaling its events first; the
//! books are only swapped in once the journal has accepted the whole batch.

use persistence::{EventJournal, JournalConfig, JournalError};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;
use types::ids::{BookId, EventId};

use crate::book::Books;
use crate::events::BookEvent;
use crate::transaction::Transaction;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("Books {0} not found")]
    BooksNotFound(BookId),

    #[error("Books {0} already exist")]
    BooksAlreadyExist(BookId),

    #[error("Books {book_id} are at event {live_last_event_id}, transaction was built on {stale_last_event_id}")]
    StaleBooks {
        book_id: BookId,
        live_last_event_id: EventId,
        stale_last_event_id: EventId,
    },

    #[error("Journal of books {book_id} does not start with its creation")]
    MissingCreation { book_id: BookId },

    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),
}

#[derive(Debug, Default)]
pub struct BooksRepository {
    books: BTreeMap<BookId, Books>,
    journals: BTreeMap<BookId, EventJournal>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, book_id: &BookId) -> Result<&Books, RepositoryError> {
        self.books
            .get(book_id)
            .ok_or_else(|| RepositoryError::BooksNotFound(book_id.clone()))
    }

    pub fn contains(&self, book_id: &BookId) -> bool {
        self.books.contains_key(book_id)
    }

    /// Number of journaled events for a book
    pub fn journal_len(&self, book_id: &BookId) -> usize {
        self.journals.get(book_id).map_or(0, EventJournal::len)
    }

    /// Journal the transaction's events and store its aggregate
    ///
    /// A transaction starting with `BooksCreated` opens new books; any other
    /// transaction must continue existing ones. A transaction without events
    /// leaves the books untouched but must still be built on the live books.
    pub fn commit(&mut self, transaction: Transaction) -> Result<(), RepositoryError> {
        let book_id = transaction.aggregate.book_id.clone();
        let creates = matches!(transaction.events.first(), Some(BookEvent::BooksCreated(_)));

        if creates {
            if self.journals.contains_key(&book_id) {
                return Err(RepositoryError::BooksAlreadyExist(book_id));
            }
            let mut journal = EventJournal::new(JournalConfig::default());
            journal.append_events(&transaction.events)?;
            self.journals.insert(book_id.clone(), journal);
        } else {
            let journal = self
                .journals
                .get_mut(&book_id)
                .ok_or_else(|| RepositoryError::BooksNotFound(book_id.clone()))?;
            if transaction.events.is_empty() {
                let live_last_event_id = EventId::new(journal.next_sequence().saturating_sub(1));
                if transaction.aggregate.last_event_id != live_last_event_id {
                    return Err(RepositoryError::StaleBooks {
                        book_id,
                        live_last_event_id,
                        stale_last_event_id: transaction.aggregate.last_event_id,
                    });
                }
                return Ok(());
            }
            journal.append_events(&transaction.events)?;
        }

        debug!(
            book_id = %book_id,
            events = transaction.events.len(),
            last_event_id = %transaction.aggregate.last_event_id,
            "Transaction committed"
        );
        self.books.insert(book_id, transaction.aggregate);
        Ok(())
    }

    /// Rebuild a book from its journal alone
    pub fn replay(&self, book_id: &BookId) -> Result<Books, RepositoryError> {
        let journal = self
            .journals
            .get(book_id)
            .ok_or_else(|| RepositoryError::BooksNotFound(book_id.clone()))?;
        let events: Vec<BookEvent> = journal.replay()?;

        match events.first() {
            Some(BookEvent::BooksCreated(_)) => {}
            _ => {
                return Err(RepositoryError::MissingCreation {
                    book_id: book_id.clone(),
                })
            }
        }
        Ok(events
            .iter()
            .fold(Books::new(book_id.clone()), |books, event| event.play(books)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CancelMassQuoteCommand, CreateBooksCommand, PlaceOrderCommand};
    use chrono::{TimeZone, Utc};
    use crate::test_support::{at, book_id};
    use types::client::Client;
    use types::entry::{EntryType, Side, TimeInForce};
    use types::ids::ClientRequestId;
    use types::numeric::Price;

    fn created() -> Transaction {
        CreateBooksCommand {
            book_id: book_id(),
            when_requested: at(0),
        }
        .execute()
    }

    fn place(books: &Books, side: Side, size: u64, price: i64) -> Transaction {
        PlaceOrderCommand {
            request_id: ClientRequestId::new(),
            who_requested: Client::firm(format!("FIRM-{}", books.last_event_id)),
            book_id: book_id(),
            entry_type: EntryType::LIMIT,
            side,
            size,
            price: Some(Price::new(price)),
            time_in_force: TimeInForce::GTC,
            when_requested: at(books.last_event_id.value() as i64 + 1),
        }
        .execute(books)
        .unwrap()
    }

    #[test]
    fn test_commit_and_read() {
        let mut repo = BooksRepository::new();
        repo.commit(created()).unwrap();

        let transaction = place(repo.read(&book_id()).unwrap(), Side::BUY, 5, 9);
        repo.commit(transaction).unwrap();

        let books = repo.read(&book_id()).unwrap();
        assert_eq!(books.last_event_id, EventId::new(2));
        assert_eq!(books.buy_limit_book.len(), 1);
        assert_eq!(repo.journal_len(&book_id()), 3);
        assert!(repo.contains(&book_id()));
    }

    #[test]
    fn test_unknown_books() {
        let repo = BooksRepository::new();
        assert_eq!(
            repo.read(&book_id()),
            Err(RepositoryError::BooksNotFound(book_id()))
        );
        assert!(repo.replay(&book_id()).is_err());
    }

    #[test]
    fn test_commit_without_creation_refused() {
        let mut repo = BooksRepository::new();
        let transaction = place(&Books::new(book_id()), Side::BUY, 5, 9);
        assert_eq!(
            repo.commit(transaction),
            Err(RepositoryError::BooksNotFound(book_id()))
        );
    }

    #[test]
    fn test_create_twice_refused() {
        let mut repo = BooksRepository::new();
        repo.commit(created()).unwrap();
        assert_eq!(
            repo.commit(created()),
            Err(RepositoryError::BooksAlreadyExist(book_id()))
        );
    }

    #[test]
    fn test_stale_transaction_refused() {
        let mut repo = BooksRepository::new();
        repo.commit(created()).unwrap();
        let books = repo.read(&book_id()).unwrap().clone();

        repo.commit(place(&books, Side::BUY, 5, 9)).unwrap();
        let stale = place(&books, Side::SELL, 5, 12);

        assert_eq!(
            repo.commit(stale),
            Err(RepositoryError::Journal(JournalError::SequenceError {
                expected: 3,
                got: 1,
            }))
        );
        assert_eq!(repo.read(&book_id()).unwrap().sell_limit_book.len(), 0);
    }

    fn cancel_quotes(books: &Books) -> Transaction {
        CancelMassQuoteCommand {
            request_id: ClientRequestId::from("CXL-MQ"),
            who_requested: Client::firm("NO-QUOTES"),
            book_id: book_id(),
            when_requested: at(9),
        }
        .execute(books)
        .unwrap()
    }

    #[test]
    fn test_empty_transaction_keeps_live_books() {
        let mut repo = BooksRepository::new();
        repo.commit(created()).unwrap();
        let transaction = place(repo.read(&book_id()).unwrap(), Side::BUY, 5, 9);
        repo.commit(transaction).unwrap();
        let live = repo.read(&book_id()).unwrap().clone();

        let nothing = cancel_quotes(&live);
        assert!(nothing.events.is_empty());
        repo.commit(nothing).unwrap();

        assert_eq!(repo.read(&book_id()).unwrap(), &live);
        assert_eq!(repo.journal_len(&book_id()), 3);
    }

    #[test]
    fn test_stale_empty_transaction_refused() {
        let mut repo = BooksRepository::new();
        repo.commit(created()).unwrap();
        let books = repo.read(&book_id()).unwrap().clone();

        repo.commit(place(&books, Side::BUY, 5, 9)).unwrap();
        let stale = cancel_quotes(&books);

        assert_eq!(
            repo.commit(stale),
            Err(RepositoryError::StaleBooks {
                book_id: book_id(),
                live_last_event_id: EventId::new(2),
                stale_last_event_id: EventId::new(0),
            })
        );
        let live = repo.read(&book_id()).unwrap();
        assert_eq!(live.last_event_id, EventId::new(2));
        assert_eq!(live.buy_limit_book.len(), 1);
        assert_eq!(&repo.replay(&book_id()).unwrap(), live);
    }

    #[test]
    fn test_unjournalable_timestamp_refused() {
        let mut repo = BooksRepository::new();
        let created = CreateBooksCommand {
            book_id: book_id(),
            when_requested: Utc.with_ymd_and_hms(2300, 1, 1, 0, 0, 0).unwrap(),
        }
        .execute();

        assert_eq!(
            repo.commit(created),
            Err(RepositoryError::Journal(JournalError::TimestampOutOfRange {
                sequence: 0
            }))
        );
        assert!(!repo.contains(&book_id()));
    }

    #[test]
    fn test_replay_rebuilds_books() {
        let mut repo = BooksRepository::new();
        repo.commit(created()).unwrap();
        for (side, size, price) in [(Side::BUY, 5, 9), (Side::SELL, 3, 9), (Side::SELL, 4, 11)] {
            let transaction = place(repo.read(&book_id()).unwrap(), side, size, price);
            repo.commit(transaction).unwrap();
        }

        let replayed = repo.replay(&book_id()).unwrap();
        let live = repo.read(&book_id()).unwrap();
        assert_eq!(&replayed, live);
        assert_eq!(replayed.state_hash(), live.state_hash());
    }
}
