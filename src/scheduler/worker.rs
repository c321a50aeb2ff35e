//! Single-flight background worker.
//!
//! Exactly one worker task drains the pending queue, one request at a time.
//! The backend is assumed non-reentrant or GPU-bound, so overlapping calls
//! would only contend; single-flight is the point, not a limitation. Every
//! backend error and timeout is absorbed and logged here — nothing unwinds
//! the loop or reaches a caller thread. On a wakeup with no work the worker
//! sweeps expired cache entries.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::backend::TextBackend;
use crate::broker::config::BrokerConfig;
use crate::broker::prompt;
use crate::cache::ResponseCache;
use crate::scheduler::PendingQueue;
use crate::telemetry;
use crate::types::{Delivery, DeliverySender, GenerationRequest};

pub(crate) struct Worker {
    pub(crate) queue: Arc<PendingQueue>,
    pub(crate) cache: Arc<ResponseCache>,
    pub(crate) backend: Arc<dyn TextBackend>,
    pub(crate) deliveries: DeliverySender,
    pub(crate) config: BrokerConfig,
    pub(crate) shutdown: watch::Receiver<bool>,
}

impl Worker {
    pub(crate) async fn run(mut self) {
        debug!("generation worker started");
        loop {
            if *self.shutdown.borrow() {
                break;
            }
            if let Some(request) = self.queue.try_dequeue() {
                self.process(request).await;
                continue;
            }
            tokio::select! {
                _ = self.queue.notified() => {}
                _ = tokio::time::sleep(self.config.idle_sweep_interval) => {
                    self.cache.sweep_expired();
                }
                _ = self.shutdown.changed() => {}
            }
        }
        debug!("generation worker stopped");
    }

    /// One generation attempt. The request is consumed here and never
    /// retried; failure surfaces only as a `Delivery` without text.
    async fn process(&self, request: GenerationRequest) {
        let prompt = prompt::render(&request);
        let params = self.config.generation(request.category);
        let started = Instant::now();
        let result = timeout(
            self.config.worker_timeout,
            self.backend
                .generate(&prompt, params.max_tokens, params.temperature),
        )
        .await;
        metrics::histogram!(
            telemetry::GENERATION_DURATION_SECONDS,
            "category" => request.category.as_str(),
        )
        .record(started.elapsed().as_secs_f64());

        let text = match result {
            Ok(Ok(text)) => {
                self.cache.put(request.fingerprint, text.clone());
                debug!(
                    category = %request.category,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "generation complete"
                );
                Some(text)
            }
            Ok(Err(e)) => {
                metrics::counter!(
                    telemetry::GENERATION_FAILURES_TOTAL,
                    "category" => request.category.as_str(),
                    "reason" => "error",
                )
                .increment(1);
                warn!(category = %request.category, error = %e, "generation failed");
                None
            }
            Err(_) => {
                metrics::counter!(
                    telemetry::GENERATION_FAILURES_TOTAL,
                    "category" => request.category.as_str(),
                    "reason" => "timeout",
                )
                .increment(1);
                warn!(
                    category = %request.category,
                    timeout_ms = self.config.worker_timeout.as_millis() as u64,
                    "generation timed out"
                );
                None
            }
        };

        self.deliveries.post(Delivery {
            id: request.id,
            category: request.category,
            fingerprint: request.fingerprint,
            text,
        });
    }
}
