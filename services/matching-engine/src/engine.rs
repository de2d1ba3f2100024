//! Matching engine core
//!
//! Main coordinator: executes commands against the current books, commits
//! the resulting transactions and hands the events back to the caller.
//! Every call takes `&mut self`, so one engine processes one command at a
//! time and the event order is total per book.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};
use types::ids::BookId;
use types::numeric::Price;

use crate::book::Books;
use crate::commands::{Command, CommandError};
use crate::config::EngineConfig;
use crate::events::BookEvent;
use crate::repository::{BooksRepository, RepositoryError};
use crate::transaction::Transaction;

/// Engine errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Price {value} cannot be expressed with {decimal_places} decimal places")]
    InvalidPrice { value: Decimal, decimal_places: u32 },

    #[error("Replay of books {book_id} diverged: live {live}, replayed {replayed}")]
    ReplayMismatch {
        book_id: BookId,
        live: String,
        replayed: String,
    },
}

/// Main matching engine
pub struct MatchingEngine {
    config: EngineConfig,
    repository: BooksRepository,
}

impl MatchingEngine {
    pub fn new(config: EngineConfig) -> Self {
        info!(
            price_decimal_places = config.price_decimal_places,
            max_mass_quote_entries = config.max_mass_quote_entries,
            "MatchingEngine initialized"
        );
        Self {
            config,
            repository: BooksRepository::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Execute a command and commit its events
    ///
    /// Returns the events in the order they were played. Nothing is
    /// committed when an error is returned.
    pub fn handle(&mut self, command: Command) -> Result<Vec<BookEvent>, EngineError> {
        let result = self
            .execute(&command)
            .and_then(|transaction| self.commit(transaction));

        match &result {
            Ok(events) => {
                for event in events {
                    log_rejection(event);
                }
                info!(
                    command = command.name(),
                    book_id = %command.book_id(),
                    events = events.len(),
                    last_event_id = events.last().map(|e| e.event_id().value()),
                    "Command handled"
                );
            }
            Err(e) => {
                warn!(
                    command = command.name(),
                    book_id = %command.book_id(),
                    error = %e,
                    "Command failed"
                );
            }
        }
        result
    }

    fn execute(&self, command: &Command) -> Result<Transaction, EngineError> {
        let transaction = match command {
            Command::CreateBooks(c) => c.execute(),
            Command::PlaceOrder(c) => c.execute(self.repository.read(&c.book_id)?)?,
            Command::CancelOrder(c) => c.execute(self.repository.read(&c.book_id)?)?,
            Command::PlaceMassQuote(c) => c.execute(
                self.repository.read(&c.book_id)?,
                self.config.max_mass_quote_entries,
            )?,
            Command::CancelMassQuote(c) => c.execute(self.repository.read(&c.book_id)?)?,
        };
        Ok(transaction)
    }

    fn commit(&mut self, transaction: Transaction) -> Result<Vec<BookEvent>, EngineError> {
        let events = transaction.events.clone();
        self.repository.commit(transaction)?;
        Ok(events)
    }

    /// Current state of a book
    pub fn books(&self, book_id: &BookId) -> Option<&Books> {
        self.repository.read(book_id).ok()
    }

    pub fn journal_len(&self, book_id: &BookId) -> usize {
        self.repository.journal_len(book_id)
    }

    /// Rebuild a book from its journal and compare it with the live state
    ///
    /// Returns the state hash both agree on.
    pub fn verify_replay(&self, book_id: &BookId) -> Result<String, EngineError> {
        let live = self.repository.read(book_id)?.state_hash();
        let replayed = self.repository.replay(book_id)?.state_hash();
        if live != replayed {
            warn!(book_id = %book_id, %live, %replayed, "Replay diverged from live state");
            return Err(EngineError::ReplayMismatch {
                book_id: book_id.clone(),
                live,
                replayed,
            });
        }
        Ok(live)
    }

    /// Normalise a decimal price to the configured precision
    pub fn normalise_price(&self, value: Decimal) -> Result<Price, EngineError> {
        let decimal_places = self.config.price_decimal_places;
        Price::from_decimal(value, decimal_places).ok_or(EngineError::InvalidPrice {
            value,
            decimal_places,
        })
    }

    /// Decimal form of a normalised price
    pub fn display_price(&self, price: Price) -> Decimal {
        price.to_decimal(self.config.price_decimal_places)
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn log_rejection(event: &BookEvent) {
    match event {
        BookEvent::OrderRejected(e) => warn!(
            book_id = %e.book_id,
            event_id = %e.event_id,
            request_id = %e.request_id,
            reason = %e.reason,
            "Order rejected"
        ),
        BookEvent::MassQuoteRejected(e) => warn!(
            book_id = %e.book_id,
            event_id = %e.event_id,
            quote_id = %e.quote_id,
            reason = %e.reason,
            "Mass quote rejected"
        ),
        _ => {}
    }
}
