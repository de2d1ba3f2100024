//! Cancel order command

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::client::Client;
use types::entry::Side;
use types::ids::{BookId, ClientRequestId};

use crate::book::Books;
use crate::events::{BookEvent, OrderCancelledByClientEvent};
use crate::transaction::Transaction;

use super::{check_book_id, CommandError};

/// Cancel a resting order placed by the same client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrderCommand {
    pub request_id: ClientRequestId,
    /// Request id the order was placed under
    pub original_request_id: ClientRequestId,
    pub who_requested: Client,
    pub book_id: BookId,
    pub side: Side,
    pub when_requested: DateTime<Utc>,
}

impl CancelOrderCommand {
    pub fn execute(&self, books: &Books) -> Result<Transaction, CommandError> {
        check_book_id(books, &self.book_id)?;

        let entry = books
            .find_order(self.side, &self.original_request_id, &self.who_requested)
            .ok_or_else(|| CommandError::EntryNotFound {
                side: self.side,
                request_id: self.original_request_id.clone(),
            })?;

        let event = OrderCancelledByClientEvent {
            book_id: self.book_id.clone(),
            event_id: books.next_event_id(),
            when_happened: self.when_requested,
            request_id: self.request_id.clone(),
            entry: entry.cancelled(),
        };
        Ok(Transaction::new(books.clone()).append(BookEvent::OrderCancelledByClient(event)))
    }
}
