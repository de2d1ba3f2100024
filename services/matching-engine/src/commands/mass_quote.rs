//! Mass quote commands
//!
//! A firm keeps at most one set of quotes per book: placing a mass quote
//! first cancels whatever quotes the firm has resting, then places the new
//! bids and offers as GTC limit entries that never trade against other
//! quotes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::client::Client;
use types::entry::{EntryStatus, EntryType, Side, TimeInForce};
use types::errors::RejectReason;
use types::ids::{BookId, ClientRequestId, EventId};
use types::numeric::{EntryPrice, Price};

use crate::book::{BookEntry, Books, EntryKey, EntrySizes};
use crate::events::{BookEvent, MassQuoteCancelledEvent, MassQuotePlacedEvent, MassQuoteRejectedEvent};
use crate::matching::continue_and_finalise;
use crate::transaction::Transaction;

use super::{check_book_id, CommandError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceWithSize {
    pub price: Price,
    pub size: u64,
}

impl PriceWithSize {
    pub fn new(price: i64, size: u64) -> Self {
        Self {
            price: Price::new(price),
            size,
        }
    }
}

/// One bid/offer pair of a mass quote; either side may be absent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteEntry {
    pub quote_entry_id: String,
    pub bid: Option<PriceWithSize>,
    pub offer: Option<PriceWithSize>,
}

impl QuoteEntry {
    pub fn side(&self, side: Side) -> Option<PriceWithSize> {
        match side {
            Side::BUY => self.bid,
            Side::SELL => self.offer,
        }
    }

    fn validate(&self) -> Result<(), RejectReason> {
        if self.bid.is_none() && self.offer.is_none() {
            return Err(RejectReason::EmptyQuoteEntry {
                quote_entry_id: self.quote_entry_id.clone(),
            });
        }
        if self.bid.iter().chain(self.offer.iter()).any(|p| p.size == 0) {
            return Err(RejectReason::ZeroSize);
        }
        if let (Some(bid), Some(offer)) = (self.bid, self.offer) {
            if bid.price >= offer.price {
                return Err(RejectReason::CrossedQuoteEntry {
                    quote_entry_id: self.quote_entry_id.clone(),
                    bid: bid.price.value(),
                    offer: offer.price.value(),
                });
            }
        }
        Ok(())
    }
}

/// Replace all of a firm's quotes with a new set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceMassQuoteCommand {
    pub quote_id: String,
    pub who_requested: Client,
    pub book_id: BookId,
    pub entries: Vec<QuoteEntry>,
    pub when_requested: DateTime<Utc>,
}

impl PlaceMassQuoteCommand {
    /// Business validation against the configured entry limit
    pub fn validate(&self, max_entries: usize) -> Result<(), RejectReason> {
        if self.entries.is_empty() {
            return Err(RejectReason::EmptyMassQuote);
        }
        if self.entries.len() > max_entries {
            return Err(RejectReason::TooManyQuoteEntries {
                count: self.entries.len(),
                limit: max_entries,
            });
        }
        self.entries.iter().try_for_each(QuoteEntry::validate)
    }

    /// Book entry for one side of a quote entry
    pub fn to_entry(
        &self,
        quote_entry: &QuoteEntry,
        side: Side,
        price_with_size: PriceWithSize,
        event_id: EventId,
    ) -> BookEntry {
        BookEntry {
            key: EntryKey {
                price: EntryPrice::Limit(price_with_size.price),
                when_submitted: self.when_requested,
                event_id,
            },
            request_id: ClientRequestId::from(format!(
                "{}:{}",
                self.quote_id, quote_entry.quote_entry_id
            )),
            who_requested: self.who_requested.clone(),
            is_quote: true,
            entry_type: EntryType::LIMIT,
            side,
            time_in_force: TimeInForce::GTC,
            sizes: EntrySizes::new(price_with_size.size),
            status: EntryStatus::New,
        }
    }

    pub fn execute(&self, books: &Books, max_entries: usize) -> Result<Transaction, CommandError> {
        check_book_id(books, &self.book_id)?;
        let transaction = Transaction::new(books.clone());

        if let Err(reason) = self.validate(max_entries) {
            let rejected = MassQuoteRejectedEvent {
                book_id: self.book_id.clone(),
                event_id: books.next_event_id(),
                when_happened: self.when_requested,
                quote_id: self.quote_id.clone(),
                who_requested: self.who_requested.clone(),
                entries: self.entries.clone(),
                reason,
            };
            return Ok(transaction.append(BookEvent::MassQuoteRejected(rejected)));
        }

        let mut transaction =
            cancel_existing_quotes(transaction, &self.who_requested, self.when_requested, false);

        let placed = MassQuotePlacedEvent {
            book_id: self.book_id.clone(),
            event_id: transaction.aggregate.next_event_id(),
            when_happened: self.when_requested,
            quote_id: self.quote_id.clone(),
            who_requested: self.who_requested.clone(),
            entries: self.entries.clone(),
        };
        transaction = transaction.append(BookEvent::MassQuotePlaced(placed));

        for quote_entry in &self.entries {
            for side in [Side::BUY, Side::SELL] {
                let Some(price_with_size) = quote_entry.side(side) else {
                    continue;
                };
                let entry = self.to_entry(
                    quote_entry,
                    side,
                    price_with_size,
                    transaction.aggregate.next_event_id(),
                );
                transaction = continue_and_finalise(&entry, transaction);
            }
        }
        Ok(transaction)
    }
}

/// Cancel all of a firm's resting quotes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelMassQuoteCommand {
    pub request_id: ClientRequestId,
    pub who_requested: Client,
    pub book_id: BookId,
    pub when_requested: DateTime<Utc>,
}

impl CancelMassQuoteCommand {
    /// Emits nothing when the firm has no resting quotes
    pub fn execute(&self, books: &Books) -> Result<Transaction, CommandError> {
        check_book_id(books, &self.book_id)?;
        Ok(cancel_existing_quotes(
            Transaction::new(books.clone()),
            &self.who_requested,
            self.when_requested,
            true,
        ))
    }
}

fn cancel_existing_quotes(
    transaction: Transaction,
    who_requested: &Client,
    when_happened: DateTime<Utc>,
    primary: bool,
) -> Transaction {
    let existing = transaction
        .aggregate
        .quote_entries_of_firm(&who_requested.firm_id);
    if existing.is_empty() {
        return transaction;
    }

    let event = MassQuoteCancelledEvent {
        book_id: transaction.aggregate.book_id.clone(),
        event_id: transaction.aggregate.next_event_id(),
        when_happened,
        who_requested: who_requested.clone(),
        entries: existing.iter().map(BookEntry::cancelled).collect(),
        primary,
    };
    transaction.append(BookEvent::MassQuoteCancelled(event))
}
