//! Crossing and eligibility rules
//!
//! Decides whether an aggressor may trade with a resting entry and at which
//! price.

use types::client::cannot_match_these_two_clients;
use types::entry::Side;
use types::numeric::{EntryPrice, Price};

use crate::book::BookEntry;

/// Two MARKET entries have no price to trade at
pub fn cannot_match_these_two_prices(aggressor: &EntryPrice, passive: &EntryPrice) -> bool {
    aggressor.is_market() && passive.is_market()
}

/// Quotes never trade against quotes
pub fn cannot_match_these_two_entries(aggressor_is_quote: bool, passive_is_quote: bool) -> bool {
    aggressor_is_quote && passive_is_quote
}

/// Whether a resting entry is skipped for this aggressor
pub fn is_ineligible(aggressor: &BookEntry, passive: &BookEntry) -> bool {
    cannot_match_these_two_prices(&aggressor.key.price, &passive.key.price)
        || cannot_match_these_two_clients(&aggressor.who_requested, &passive.who_requested)
        || cannot_match_these_two_entries(aggressor.is_quote, passive.is_quote)
}

/// Check if an incoming limit price crosses a resting limit price
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::BUY => incoming_price >= resting_price,
        Side::SELL => incoming_price <= resting_price,
    }
}

/// Trade price for an aggressor against a resting entry
///
/// A MARKET side takes the other side's limit; two limits trade at the
/// resting price when they cross. None when there is no trade.
pub fn find_trade_price(
    aggressor_side: Side,
    aggressor: &EntryPrice,
    passive: &EntryPrice,
) -> Option<Price> {
    match (aggressor, passive) {
        (EntryPrice::Market, EntryPrice::Market) => None,
        (EntryPrice::Market, EntryPrice::Limit(passive)) => Some(*passive),
        (EntryPrice::Limit(aggressor), EntryPrice::Market) => Some(*aggressor),
        (EntryPrice::Limit(aggressor), EntryPrice::Limit(passive)) => {
            incoming_can_match(aggressor_side, *aggressor, *passive).then_some(*passive)
        }
    }
}
