//! Both sides of one instrument's book
//!
//! `Books` is the aggregate every book event is played against. Its
//! `last_event_id` advances by exactly one per event, which is what makes
//! the event stream replayable.

use serde::Serialize;
use sha2::{Digest, Sha256};
use types::client::Client;
use types::entry::Side;
use types::ids::{BookId, ClientRequestId, EventId};

use super::entry::BookEntry;
use super::limit_book::LimitBook;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Books {
    pub book_id: BookId,
    pub buy_limit_book: LimitBook,
    pub sell_limit_book: LimitBook,
    pub last_event_id: EventId,
}

impl Books {
    /// Empty books, as created by the books-created event (id 0)
    pub fn new(book_id: BookId) -> Self {
        Self {
            book_id,
            buy_limit_book: LimitBook::new(Side::BUY),
            sell_limit_book: LimitBook::new(Side::SELL),
            last_event_id: EventId::new(0),
        }
    }

    pub fn book(&self, side: Side) -> &LimitBook {
        match side {
            Side::BUY => &self.buy_limit_book,
            Side::SELL => &self.sell_limit_book,
        }
    }

    pub fn book_mut(&mut self, side: Side) -> &mut LimitBook {
        match side {
            Side::BUY => &mut self.buy_limit_book,
            Side::SELL => &mut self.sell_limit_book,
        }
    }

    pub fn same_side_book(&self, side: Side) -> &LimitBook {
        self.book(side)
    }

    pub fn opposite_side_book(&self, side: Side) -> &LimitBook {
        self.book(side.opposite())
    }

    /// Id the next event played against these books must carry
    pub fn next_event_id(&self) -> EventId {
        self.last_event_id.next()
    }

    /// Record that `event_id` has been played
    ///
    /// # Panics
    /// Panics if `event_id` does not directly follow the last event id
    pub fn advance(&mut self, event_id: EventId) {
        assert_eq!(
            event_id,
            self.next_event_id(),
            "Event {} played out of sequence on book {} (last event {})",
            event_id,
            self.book_id,
            self.last_event_id
        );
        self.last_event_id = event_id;
    }

    /// Resting quote entries of a firm, buy side then sell side, each in
    /// priority order
    pub fn quote_entries_of_firm(&self, firm_id: &str) -> Vec<BookEntry> {
        [Side::BUY, Side::SELL]
            .into_iter()
            .flat_map(|side| self.book(side).entries())
            .filter(|entry| entry.is_quote && entry.who_requested.firm_id == firm_id)
            .cloned()
            .collect()
    }

    /// Resting order (not quote) placed by `client` under `request_id`
    pub fn find_order(
        &self,
        side: Side,
        request_id: &ClientRequestId,
        client: &Client,
    ) -> Option<&BookEntry> {
        self.book(side).entries().find(|entry| {
            !entry.is_quote && &entry.request_id == request_id && &entry.who_requested == client
        })
    }

    /// SHA-256 over the bincode encoding of the books, hex encoded
    pub fn state_hash(&self) -> String {
        let bytes = bincode::serialize(self).expect("Books serialization should never fail");
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        format!("{:x}", hasher.finalize())
    }
}
