//! Generation broker — the public entry point.
//!
//! The broker sits between the simulation's tick loop and a slow, optional
//! text backend. Every request resolves synchronously, in bounded time, to
//! *some* usable text: cached output when available, the supplied fallback
//! otherwise. Actual generation happens on a single background worker;
//! finished text arrives through the delivery inbox on a later frame.
//!
//! Decision order per request:
//!
//! 1. broker disabled or backend unavailable → fallback, nothing else runs
//! 2. per-category gating roll fails → fallback
//! 3. cache hit on the context fingerprint → cached text
//! 4. enqueue for the worker (full queue rejects immediately) → fallback now,
//!    generated text later via [`Broker::poll_deliveries`]

mod builder;
pub mod config;
pub(crate) mod prompt;

use std::sync::{Arc, Mutex, PoisonError};

use rand::Rng;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::backend::TextBackend;
use crate::cache::{CacheConfig, ResponseCache};
use crate::fingerprint::fingerprint;
use crate::scheduler::PendingQueue;
use crate::scheduler::worker::Worker;
use crate::telemetry;
use crate::types::{
    Category, Delivery, DeliveryInbox, DeliverySender, GenerationRequest, RequestContext,
    RequestId, RequestOutcome, TextSource, delivery_channel,
};

pub use builder::BrokerBuilder;
pub use config::{BrokerConfig, GenerationParams};

/// Diagnostics snapshot returned by [`Broker::status`].
#[derive(Debug, Clone, Serialize)]
pub struct BrokerStatus {
    pub queue_depth: usize,
    pub cache_entries: usize,
    pub backend_available: bool,
    pub worker_running: bool,
}

/// Non-blocking commentary broker.
///
/// Owned by the host and passed by reference; there is no hidden global
/// instance. Lifecycle is explicit: [`Broker::start`] spawns exactly one
/// worker task (idempotent), [`Broker::shutdown`] stops it with a bounded
/// wait.
pub struct Broker {
    config: BrokerConfig,
    cache: Arc<ResponseCache>,
    queue: Arc<PendingQueue>,
    backend: Arc<dyn TextBackend>,
    inbox: DeliveryInbox,
    deliveries: DeliverySender,
    shutdown: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Broker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Broker {
    /// Create a new builder for configuring a broker.
    pub fn builder() -> BrokerBuilder {
        BrokerBuilder::new()
    }

    pub(crate) fn new(config: BrokerConfig, backend: Arc<dyn TextBackend>) -> Self {
        let cache_config = CacheConfig::new()
            .max_entries(config.cache_max_entries)
            .ttl(config.cache_ttl);
        let (deliveries, inbox) = delivery_channel();
        let (shutdown, _) = watch::channel(false);
        Self {
            cache: Arc::new(ResponseCache::new(&cache_config)),
            queue: Arc::new(PendingQueue::new(config.queue_max_depth)),
            backend,
            inbox,
            deliveries,
            shutdown,
            worker: Mutex::new(None),
            config,
        }
    }

    /// Spawn the worker task. Idempotent; a second call while the worker is
    /// alive does nothing. Requires a tokio runtime context.
    pub fn start(&self) {
        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if worker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        self.shutdown.send_replace(false);
        let task = Worker {
            queue: Arc::clone(&self.queue),
            cache: Arc::clone(&self.cache),
            backend: Arc::clone(&self.backend),
            deliveries: self.deliveries.clone(),
            config: self.config.clone(),
            shutdown: self.shutdown.subscribe(),
        };
        *worker = Some(tokio::spawn(task.run()));
    }

    /// Signal the worker to stop and wait up to the configured bound.
    ///
    /// Returns regardless of whether the worker exited — queued or in-flight
    /// requests are abandoned, never drained on teardown. Idempotent.
    pub async fn shutdown(&self) {
        self.shutdown.send_replace(true);
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle
            && tokio::time::timeout(self.config.shutdown_timeout, handle)
                .await
                .is_err()
        {
            warn!(
                timeout_ms = self.config.shutdown_timeout.as_millis() as u64,
                "worker did not stop within shutdown timeout"
            );
        }
    }

    /// Queue depth, cache size, and backend availability for telemetry.
    pub fn status(&self) -> BrokerStatus {
        BrokerStatus {
            queue_depth: self.queue.len(),
            cache_entries: self.cache.len(),
            backend_available: self.backend.is_available(),
            worker_running: self
                .worker
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .as_ref()
                .is_some_and(|handle| !handle.is_finished()),
        }
    }

    /// Drain the delivery inbox. Intended to be called once per frame;
    /// never blocks.
    pub fn poll_deliveries(&self) -> Vec<Delivery> {
        self.inbox.drain()
    }

    /// Commentary on an autonomous action ("Maple is about to nap").
    pub fn request_action_commentary(
        &self,
        subject: &str,
        action_key: &str,
        mood: &str,
        fallback: &str,
    ) -> RequestOutcome {
        let mut context = RequestContext::new();
        context.insert("subject".into(), subject.into());
        context.insert("action".into(), action_key.into());
        context.insert("mood".into(), mood.into());
        self.request(Category::ActionCommentary, context, fallback)
    }

    /// A spoken line in the character's voice.
    pub fn request_character_dialogue(
        &self,
        subject: &str,
        mood: &str,
        topic: &str,
        fallback: &str,
    ) -> RequestOutcome {
        let mut context = RequestContext::new();
        context.insert("subject".into(), subject.into());
        context.insert("mood".into(), mood.into());
        context.insert("topic".into(), topic.into());
        self.request(Category::CharacterDialogue, context, fallback)
    }

    /// Reaction to a rare scripted event. Gated at 1.0 by default.
    pub fn request_special_event(
        &self,
        subject: &str,
        event_key: &str,
        fallback: &str,
    ) -> RequestOutcome {
        let mut context = RequestContext::new();
        context.insert("subject".into(), subject.into());
        context.insert("event".into(), event_key.into());
        self.request(Category::SpecialEvent, context, fallback)
    }

    /// Reply in a free-form chat conversation.
    pub fn request_freeform_chat(
        &self,
        subject: &str,
        message: &str,
        history_len: usize,
        phase: &str,
        fallback: &str,
    ) -> RequestOutcome {
        let mut context = RequestContext::new();
        context.insert("subject".into(), subject.into());
        context.insert("message".into(), message.into());
        context.insert("history_len".into(), history_len.into());
        context.insert("phase".into(), phase.into());
        self.request(Category::FreeformChat, context, fallback)
    }

    /// Shared request path. Synchronous and bounded: mutex-guarded lookups
    /// only, no awaits, no backend calls.
    fn request(
        &self,
        category: Category,
        context: RequestContext,
        fallback: &str,
    ) -> RequestOutcome {
        let outcome = self.resolve(category, context, fallback);
        metrics::counter!(
            telemetry::REQUESTS_TOTAL,
            "category" => category.as_str(),
            "source" => outcome.source.as_str(),
        )
        .increment(1);
        outcome
    }

    fn resolve(
        &self,
        category: Category,
        context: RequestContext,
        fallback: &str,
    ) -> RequestOutcome {
        if !self.config.enabled || !self.backend.is_available() {
            return RequestOutcome::immediate(fallback, TextSource::Disabled);
        }

        if !roll(self.config.gate_probability(category)) {
            return RequestOutcome::immediate(fallback, TextSource::Gated);
        }

        let key = fingerprint(category, &context);
        if let Some(text) = self.cache.get(&key) {
            return RequestOutcome::immediate(text, TextSource::Cached);
        }

        let request = GenerationRequest {
            category,
            priority: BrokerConfig::priority(category),
            context,
            fingerprint: key,
            id: RequestId::next(),
            created_at: std::time::Instant::now(),
        };
        let id = request.id;
        if self.queue.try_enqueue(request) {
            debug!(%category, fingerprint = ?key, "request enqueued");
            RequestOutcome {
                text: fallback.to_owned(),
                source: TextSource::Pending,
                pending: Some(id),
            }
        } else {
            RequestOutcome::immediate(fallback, TextSource::Rejected)
        }
    }
}

/// Gating roll. Clamped so 0.0 never generates and 1.0 always does,
/// independent of RNG edge behaviour.
fn roll(probability: f64) -> bool {
    if probability >= 1.0 {
        true
    } else if probability <= 0.0 {
        false
    } else {
        rand::thread_rng().gen_range(0.0..1.0) < probability
    }
}
