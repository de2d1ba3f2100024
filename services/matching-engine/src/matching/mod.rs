//! Matching logic module
//!
//! Implements price-time priority matching of an aggressor against the
//! opposite limit book.

pub mod eligibility;
pub mod matcher;

pub use eligibility::find_trade_price;
pub use matcher::{
    continue_and_finalise, continue_matching, fillable_size, find_next_match, match_and_finalise,
    match_entry, Match, MatchingResult,
};
