//! Bounded, priority-ordered pending queue.
//!
//! [`PendingQueue`] never blocks the producer: an enqueue against a full
//! queue fails immediately and the caller falls back to pre-written text.
//! Ordering is priority-first (`High` before `Normal` before `Low`), FIFO
//! among equal priorities via a sequence number attached at enqueue.
//!
//! A fingerprint already sitting in the queue is rejected as a duplicate,
//! so a caller issuing the same request twice in quick succession occupies
//! only one of the scarce queue slots.

use std::cmp::Ordering as CmpOrdering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tracing::debug;

use crate::fingerprint::Fingerprint;
use crate::telemetry;
use crate::types::GenerationRequest;

/// Heap entry: priority first, then FIFO by sequence number.
struct QueuedRequest {
    request: GenerationRequest,
    seq: u64,
}

impl PartialEq for QueuedRequest {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for QueuedRequest {}

impl PartialOrd for QueuedRequest {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedRequest {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        // Max-heap: higher priority wins; among equals the lower sequence
        // number (earlier enqueue) wins.
        self.request
            .priority
            .cmp(&other.request.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct QueueInner {
    heap: BinaryHeap<QueuedRequest>,
    pending: HashSet<Fingerprint>,
}

/// Bounded priority queue between callers and the worker.
pub struct PendingQueue {
    inner: Mutex<QueueInner>,
    notify: Notify,
    max_depth: usize,
    seq: AtomicU64,
}

impl PendingQueue {
    pub fn new(max_depth: usize) -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                heap: BinaryHeap::new(),
                pending: HashSet::new(),
            }),
            notify: Notify::new(),
            max_depth,
            seq: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Non-blocking enqueue.
    ///
    /// Returns `false` — leaving the queue untouched — when the queue
    /// already holds `max_depth` requests or when an identical fingerprint
    /// is already pending.
    pub fn try_enqueue(&self, request: GenerationRequest) -> bool {
        let mut inner = self.lock();
        if inner.heap.len() >= self.max_depth {
            metrics::counter!(telemetry::QUEUE_REJECTIONS_TOTAL, "reason" => "full").increment(1);
            debug!(category = %request.category, "pending queue full, rejecting request");
            return false;
        }
        if !inner.pending.insert(request.fingerprint) {
            metrics::counter!(telemetry::QUEUE_REJECTIONS_TOTAL, "reason" => "duplicate")
                .increment(1);
            debug!(fingerprint = ?request.fingerprint, "duplicate request already pending");
            return false;
        }
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        inner.heap.push(QueuedRequest { request, seq });
        drop(inner);
        self.notify.notify_one();
        true
    }

    /// Pop the highest-priority request, if any. Never blocks.
    pub fn try_dequeue(&self) -> Option<GenerationRequest> {
        let mut inner = self.lock();
        let queued = inner.heap.pop()?;
        inner.pending.remove(&queued.request.fingerprint);
        Some(queued.request)
    }

    /// Current number of pending requests.
    pub fn len(&self) -> usize {
        self.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait until new work may be available. Used by the worker; a permit
    /// stored by an enqueue that raced the wait resolves immediately.
    pub(crate) async fn notified(&self) {
        self.notify.notified().await;
    }
}
