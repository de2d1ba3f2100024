//! Matching Engine Service
//!
//! Limit-order-book matching engine with price-time priority. Commands are
//! executed against per-instrument books and produce a deterministic, fully
//! ordered stream of book events that can be journaled and replayed.
//!
//! **Key Invariants:**
//! - Price-time priority strictly enforced
//! - Deterministic matching (same inputs → same outputs)
//! - No trades between entries of the same firm and firm client
//! - Conservation of size: available + traded + cancelled never changes
//! - Event ids are gapless per book

pub mod book;
pub mod matching;
pub mod events;
pub mod transaction;
pub mod time_in_force;
pub mod commands;
pub mod repository;
pub mod config;
pub mod engine;

#[cfg(test)]
mod test_support;

pub use book::{BookEntry, Books, LimitBook};
pub use commands::Command;
pub use config::EngineConfig;
pub use engine::{EngineError, MatchingEngine};
pub use events::BookEvent;
pub use matching::{continue_and_finalise, match_and_finalise, match_entry};
pub use transaction::Transaction;
