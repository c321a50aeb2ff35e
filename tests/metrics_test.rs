//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter. Only caller-path
//! metrics are covered here — worker-side metrics land on the worker task,
//! outside the local recorder's thread.

use std::sync::Arc;

use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use patter::types::{Category, ContextValue, RequestContext};
use patter::{Broker, CacheConfig, ResponseCache, TextSource, fingerprint, telemetry};

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn cache_records_hits_and_misses() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let cache = ResponseCache::new(&CacheConfig::default());
        let mut ctx = RequestContext::new();
        ctx.insert("tag".into(), ContextValue::from("a"));
        let key = fingerprint(Category::FreeformChat, &ctx);

        assert!(cache.get(&key).is_none()); // miss
        cache.put(key, "hello".into());
        assert!(cache.get(&key).is_some()); // hit
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
}

#[test]
fn requests_record_per_source_counters() {
    struct NoBackend;

    #[async_trait::async_trait]
    impl patter::TextBackend for NoBackend {
        async fn generate(
            &self,
            _prompt: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> patter::Result<String> {
            Ok("unused".into())
        }
    }

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        // Worker never started: requests either gate out or stay pending.
        let broker = Broker::builder()
            .backend(Arc::new(NoBackend))
            .gate_probability(Category::ActionCommentary, 0.0)
            .build()
            .unwrap();

        let gated = broker.request_action_commentary("Maple", "eat", "hungry", "fb");
        assert_eq!(gated.source, TextSource::Gated);

        let pending = broker.request_special_event("Maple", "comet", "fb");
        assert_eq!(pending.source, TextSource::Pending);
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 2);
}

#[test]
fn queue_rejections_are_counted() {
    struct NoBackend;

    #[async_trait::async_trait]
    impl patter::TextBackend for NoBackend {
        async fn generate(
            &self,
            _prompt: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> patter::Result<String> {
            Ok("unused".into())
        }
    }

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let broker = Broker::builder()
            .backend(Arc::new(NoBackend))
            .gate_probability(Category::ActionCommentary, 1.0)
            .queue_max_depth(1)
            .build()
            .unwrap();

        broker.request_action_commentary("Maple", "eat", "hungry", "fb"); // pending
        broker.request_action_commentary("Maple", "nap", "drowsy", "fb"); // full
        broker.request_action_commentary("Maple", "eat", "hungry", "fb"); // full (before duplicate check)
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(&snapshot, telemetry::QUEUE_REJECTIONS_TOTAL),
        2
    );
}
