//! Asynchronous delivery of generated text back to the front end.
//!
//! The worker never calls into caller code. Finished generations are posted
//! as [`Delivery`] messages into a bounded channel; the front end drains the
//! [`DeliveryInbox`] once per frame via
//! [`Broker::poll_deliveries`](crate::Broker::poll_deliveries) and matches
//! messages to earlier requests by [`RequestId`].

use std::sync::Mutex;
use std::sync::PoisonError;

use tokio::sync::mpsc;
use tracing::warn;

use crate::fingerprint::Fingerprint;
use crate::telemetry;
use crate::types::{Category, RequestId};

/// Number of deliveries buffered between the worker and the front end.
///
/// The queue holds at most a handful of pending requests at once, so the
/// buffer only fills if the front end stops draining entirely. Overflowing
/// deliveries are dropped, matching the contract that generated text is a
/// bonus, never a guarantee.
const DELIVERY_BUFFER: usize = 64;

/// Asynchronous result of one queued generation attempt.
///
/// `text` is `None` when generation failed or timed out. Posted at most
/// once per request.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub id: RequestId,
    pub category: Category,
    pub fingerprint: Fingerprint,
    pub text: Option<String>,
}

/// Worker-side handle posting deliveries without blocking.
#[derive(Clone)]
pub(crate) struct DeliverySender {
    tx: mpsc::Sender<Delivery>,
}

impl DeliverySender {
    /// Post a delivery; drops it (with a warning) if the inbox is full.
    pub(crate) fn post(&self, delivery: Delivery) {
        if let Err(e) = self.tx.try_send(delivery) {
            metrics::counter!(telemetry::DELIVERIES_DROPPED_TOTAL).increment(1);
            warn!(error = %e, "delivery inbox full, dropping generated text");
        }
    }
}

/// Thread-safe inbox the front end drains once per frame.
pub struct DeliveryInbox {
    rx: Mutex<mpsc::Receiver<Delivery>>,
}

impl DeliveryInbox {
    /// Remove and return every delivery currently buffered. Never blocks.
    pub fn drain(&self) -> Vec<Delivery> {
        let mut rx = self.rx.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out = Vec::new();
        while let Ok(delivery) = rx.try_recv() {
            out.push(delivery);
        }
        out
    }
}

/// Create a connected sender/inbox pair.
pub(crate) fn delivery_channel() -> (DeliverySender, DeliveryInbox) {
    let (tx, rx) = mpsc::channel(DELIVERY_BUFFER);
    (DeliverySender { tx }, DeliveryInbox { rx: Mutex::new(rx) })
}
