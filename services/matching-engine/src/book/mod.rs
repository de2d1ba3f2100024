//! Order book infrastructure module
//!
//! Contains book entries, the per-side limit book and the two-sided books.

pub mod entry;
pub mod limit_book;
pub mod books;

pub use entry::{BookEntry, EntryKey, EntrySizes, TradeSideEntry};
pub use limit_book::{BookKey, LimitBook};
pub use books::Books;
