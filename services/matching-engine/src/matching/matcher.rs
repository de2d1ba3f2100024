//! Matching loop
//!
//! Trades an aggressor against the opposite limit book in priority order.
//! Each pass emits at most one trade event; the loop ends when the aggressor
//! has nothing available, the opposite book is empty, or no resting entry is
//! eligible.

use tracing::debug;
use types::entry::TimeInForce;
use types::numeric::Price;

use crate::book::{BookEntry, Books};
use crate::events::{BookEvent, TradeEvent};
use crate::time_in_force;
use crate::transaction::Transaction;

use super::eligibility::{find_trade_price, is_ineligible};

/// Resting entry chosen for the next trade
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub passive: BookEntry,
    pub trade_price: Price,
}

/// Aggressor after matching, plus the trades played so far
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingResult {
    pub aggressor: BookEntry,
    pub transaction: Transaction,
}

/// Match an aggressor against `books`, then apply its time-in-force
pub fn match_and_finalise(aggressor: &BookEntry, books: Books) -> Transaction {
    continue_and_finalise(aggressor, Transaction::new(books))
}

/// Match an aggressor on top of `transaction`, then apply its time-in-force
///
/// A fill-or-kill aggressor is killed up front when the book cannot fill it
/// completely, so its transaction never holds trades to roll back.
pub fn continue_and_finalise(aggressor: &BookEntry, transaction: Transaction) -> Transaction {
    if aggressor.time_in_force == TimeInForce::FOK
        && fillable_size(aggressor, &transaction.aggregate) < aggressor.available()
    {
        return time_in_force::kill(aggressor, transaction);
    }
    let result = continue_matching(aggressor.clone(), transaction);
    time_in_force::finalise(result)
}

/// Size the matching loop would trade for `aggressor` on `books`
///
/// Walks the same candidates as the loop without trading: eligibility only
/// depends on price, client and quote flag, none of which trading changes.
pub fn fillable_size(aggressor: &BookEntry, books: &Books) -> u64 {
    let mut remaining = aggressor.available();
    let mut passives = books.opposite_side_book(aggressor.side).entries();
    while remaining > 0 {
        let Some(next) = find_next_match(aggressor, &mut passives) else {
            break;
        };
        remaining -= remaining.min(next.passive.available());
    }
    aggressor.available() - remaining
}

/// Match an aggressor against a fresh transaction on `books`
pub fn match_entry(aggressor: BookEntry, books: Books) -> MatchingResult {
    continue_matching(aggressor, Transaction::new(books))
}

/// Match an aggressor, appending trades to an existing transaction
pub fn continue_matching(mut aggressor: BookEntry, mut transaction: Transaction) -> MatchingResult {
    while aggressor.available() > 0 {
        let next = find_next_match(
            &aggressor,
            transaction.aggregate.opposite_side_book(aggressor.side).entries(),
        );
        let Some(next) = next else {
            break;
        };

        let event_id = transaction.aggregate.next_event_id();
        let trade_size = aggressor.available().min(next.passive.available());
        // The aggressor is identified by the latest event that touched it
        let traded_aggressor = aggressor.traded(trade_size).with_event_id(event_id);
        let traded_passive = next.passive.traded(trade_size);

        debug!(
            book_id = %transaction.aggregate.book_id,
            event_id = %event_id,
            size = trade_size,
            price = %next.trade_price,
            aggressor_side = %aggressor.side,
            "Trade matched"
        );

        let trade = TradeEvent {
            book_id: transaction.aggregate.book_id.clone(),
            event_id,
            size: trade_size,
            price: next.trade_price,
            when_happened: aggressor.key.when_submitted,
            aggressor: traded_aggressor.to_trade_side_entry(),
            passive: traded_passive.to_trade_side_entry(),
        };
        transaction = transaction.append(BookEvent::Trade(trade));
        aggressor = traded_aggressor;
    }

    MatchingResult {
        aggressor,
        transaction,
    }
}

/// First eligible resting entry and its trade price
///
/// Only the first eligible entry is priced: the entries are in priority
/// order, so when it does not cross nothing after it can.
pub fn find_next_match<'a>(
    aggressor: &BookEntry,
    passives: impl IntoIterator<Item = &'a BookEntry>,
) -> Option<Match> {
    let passive = passives
        .into_iter()
        .find(|passive| !is_ineligible(aggressor, passive))?;
    let trade_price = find_trade_price(aggressor.side, &aggressor.key.price, &passive.key.price)?;
    Some(Match {
        passive: passive.clone(),
        trade_price,
    })
}
