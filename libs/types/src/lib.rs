//! Types library for the limit-order-book matching engine
//!
//! This library provides the value types shared by the matching core, the
//! command layer and the event journal.
//!
//! # Modules
//! - `ids`: Identifiers (BookId, EventId, ClientRequestId)
//! - `numeric`: Fixed-point prices (Price, EntryPrice)
//! - `client`: Client identity and self-match predicates
//! - `entry`: Entry side, type, time-in-force and status enums
//! - `errors`: Reject reasons for business validation

// Public modules
pub mod ids;
pub mod numeric;
pub mod client;
pub mod entry;
pub mod errors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::client::*;
    pub use crate::entry::*;
    pub use crate::errors::*;
}
