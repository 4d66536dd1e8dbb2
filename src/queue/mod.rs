//! Capacity-one hand-off between a worker and the engine.
//!
//! The queue favours freshness over completeness: publishing while a value is
//! still unread replaces it, so the consumer only ever sees the newest payload.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::QueueClosed;

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    closed: bool,
}

/// Single-producer, single-consumer slot. Clones share the same slot.
#[derive(Debug)]
pub struct FreshnessQueue<T> {
    inner: Arc<Mutex<Slot<T>>>,
}

impl<T> Clone for FreshnessQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for FreshnessQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FreshnessQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Slot {
                value: None,
                closed: false,
            })),
        }
    }

    /// Store `value`, returning the unread value it evicted.
    pub fn publish(&self, value: T) -> Result<Option<T>, QueueClosed> {
        let mut slot = self.lock();
        if slot.closed {
            return Err(QueueClosed);
        }
        Ok(slot.value.replace(value))
    }

    /// Drop an unread value. Returns whether anything was discarded.
    pub fn discard_stale(&self) -> bool {
        self.lock().value.take().is_some()
    }

    /// Non-blocking take; `None` when nothing is pending.
    pub fn try_take(&self) -> Option<T> {
        self.lock().value.take()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().value.is_none()
    }

    /// Refuse further publishes and hand back whatever was still pending.
    pub fn close(&self) -> Option<T> {
        let mut slot = self.lock();
        slot.closed = true;
        slot.value.take()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    // A panic while holding the lock cannot leave the slot half-written.
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
