//! In-memory event queue.
//!
//! # Responsibilities
//! - Accept items from any number of concurrent producers
//! - Hand the whole backlog to the dispatcher in one atomic step
//!
//! # Design Decisions
//! - A single short critical section per operation; no await under the lock
//! - Drain swaps the backing vector out, so producers never wait on delivery
//! - Unbounded: sustained overload grows memory rather than dropping events

use std::sync::{Mutex, MutexGuard, PoisonError};

/// FIFO queue of pending items, drained as a whole.
#[derive(Debug)]
pub struct EventQueue<T> {
    items: Mutex<Vec<T>>,
}

impl<T> EventQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Append an item at the tail.
    pub fn enqueue(&self, item: T) {
        self.lock().push(item);
    }

    /// Detach and return everything currently queued, oldest first.
    ///
    /// An enqueue racing with this call lands either in the returned batch or
    /// in the queue for the next drain, never both.
    pub fn drain_all(&self) -> Vec<T> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of items waiting.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the Vec half-updated.
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
