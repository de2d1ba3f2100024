//! Event persistence for the order books
//!
//! Provides an append-only, checksummed journal of book events. Entries are
//! sequenced by event id, batches are written atomically and the journal can
//! be replayed in order to rebuild book state deterministically.

pub mod journal;

pub use journal::{EventJournal, JournalConfig, JournalEntry, JournalError, Journaled};
