//! Last-issued-wins state for collections refreshed by overlapping requests.
//!
//! Every reload or confirmed local change takes a ticket before it starts. A result is only
//! applied if its ticket is newer than the one that produced the current state, so a slow
//! response can never overwrite the result of a request issued after it.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Position of a request in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug)]
struct Applied<T> {
    ticket: u64,
    value: T,
}

#[derive(Debug)]
pub struct SequencedState<T> {
    issued: AtomicU64,
    applied: RwLock<Applied<T>>,
}

impl<T: Clone> SequencedState<T> {
    pub fn new(value: T) -> Self {
        Self {
            issued: AtomicU64::new(0),
            applied: RwLock::new(Applied { ticket: 0, value }),
        }
    }

    /// Take the next ticket. Call this before the request goes out.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replace the state wholesale if `ticket` is newer than the current state's.
    ///
    /// Returns false (and leaves the state alone) for a stale ticket.
    pub fn replace(&self, ticket: Ticket, value: T) -> bool {
        self.modify(ticket, move |current| *current = value)
    }

    /// Apply `change` to the state if `ticket` is newer than the current state's.
    pub fn modify(&self, ticket: Ticket, change: impl FnOnce(&mut T)) -> bool {
        let mut applied = self.applied.write();
        if ticket.0 <= applied.ticket {
            tracing::debug!(
                "Discarding stale result (ticket {} <= {})",
                ticket.0,
                applied.ticket
            );
            return false;
        }
        applied.ticket = ticket.0;
        change(&mut applied.value);
        true
    }

    pub fn snapshot(&self) -> T {
        self.applied.read().value.clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.applied.read().value)
    }
}

impl<T: Clone + Default> Default for SequencedState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
