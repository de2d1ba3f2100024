//! Transaction: books plus the events that produced them
//!
//! A transaction is the unit a command produces and the repository commits.
//! Its aggregate is always the result of playing its events, in order, on
//! the books the transaction started from.

use types::ids::EventId;

use crate::book::Books;
use crate::events::BookEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub aggregate: Books,
    pub events: Vec<BookEvent>,
}

impl Transaction {
    /// A transaction with no events yet
    pub fn new(aggregate: Books) -> Self {
        Self {
            aggregate,
            events: Vec::new(),
        }
    }

    /// Play `event` on the aggregate and record it
    ///
    /// # Panics
    /// Panics if the event is out of sequence for the aggregate
    pub fn append(mut self, event: BookEvent) -> Self {
        self.aggregate = event.play(self.aggregate);
        self.events.push(event);
        self
    }

    pub fn last_event_id(&self) -> EventId {
        self.aggregate.last_event_id
    }
}
