//! In-memory report and notification stores.
//!
//! Both stores are explicit handles: cloning one shares the same state, and
//! whoever needs a store is handed one. Changes are published on a
//! `tokio::sync::broadcast` channel. Delivery is in order per subscriber and a
//! slow subscriber never blocks writers: once its buffer is full it lags,
//! the oldest events are skipped, and it can always pull a fresh snapshot.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{trace, warn};

mod notifications;
mod reports;

pub use notifications::{
    Notification, NotificationCenter, NotificationEvent, NotificationKind, ReportAction,
    ReportActionDetails, SosDetails, SosStatus,
};
pub use reports::{NewReport, ReportEvent, ReportStore, ReportSubscription, ReportUpdate};

/// Receiving end of a store's change channel.
#[derive(Debug)]
pub struct Subscription<E> {
    rx: broadcast::Receiver<E>,
}

impl<E: Clone> Subscription<E> {
    fn new(rx: broadcast::Receiver<E>) -> Self {
        Self { rx }
    }

    /// Next buffered event without waiting. Skipped events are logged.
    pub fn try_next(&mut self) -> Option<E> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Subscriber lagged, oldest events dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next event; `None` once every store handle is gone.
    pub async fn next(&mut self) -> Option<E> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Subscriber lagged, oldest events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Drain everything currently buffered.
    pub fn drain(&mut self) -> Vec<E> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

fn publish<E>(tx: &broadcast::Sender<E>, event: E) {
    // No subscribers is not an error
    if tx.send(event).is_err() {
        trace!("Store event published with no subscribers");
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
