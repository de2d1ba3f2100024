//! Reject reasons for business validation
//!
//! These are not failures of the engine: a rejected command still produces a
//! rejection event carrying one of these reasons.

use crate::entry::{EntryType, TimeInForce};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an order or mass quote was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    #[error("Size must be greater than zero")]
    ZeroSize,

    #[error("LIMIT entries require a limit price")]
    MissingLimitPrice,

    #[error("MARKET entries must not carry a limit price")]
    UnexpectedLimitPrice,

    #[error("{entry_type} with {time_in_force} is not a valid combination")]
    InvalidTimeInForce {
        entry_type: EntryType,
        time_in_force: TimeInForce,
    },

    #[error("Mass quote has no entries")]
    EmptyMassQuote,

    #[error("Mass quote has {count} entries, limit is {limit}")]
    TooManyQuoteEntries { count: usize, limit: usize },

    #[error("Quote entry {quote_entry_id} has no bid and no offer")]
    EmptyQuoteEntry { quote_entry_id: String },

    #[error("Quote entry {quote_entry_id} bid {bid} is not below offer {offer}")]
    CrossedQuoteEntry {
        quote_entry_id: String,
        bid: i64,
        offer: i64,
    },
}
