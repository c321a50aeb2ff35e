//! Telemetry metric name constants.
//!
//! Centralised metric names for patter operations. Hosts install their own
//! `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `patter_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `category` — request category (e.g. "action_commentary")
//! - `source` — where the synchronous text came from (e.g. "cached", "gated")
//! - `reason` — failure or rejection cause (e.g. "timeout", "full")

/// Total broker requests, by category and synchronous text source.
///
/// Labels: `category`, `source` ("cached" | "disabled" | "gated" |
/// "pending" | "rejected").
pub const REQUESTS_TOTAL: &str = "patter_requests_total";

/// Total response cache hits.
pub const CACHE_HITS_TOTAL: &str = "patter_cache_hits_total";

/// Total response cache misses (absent or expired).
pub const CACHE_MISSES_TOTAL: &str = "patter_cache_misses_total";

/// Total enqueue attempts rejected by the pending queue.
///
/// Labels: `reason` ("full" | "duplicate").
pub const QUEUE_REJECTIONS_TOTAL: &str = "patter_queue_rejections_total";

/// Backend generation duration in seconds, including timed-out calls.
///
/// Labels: `category`.
pub const GENERATION_DURATION_SECONDS: &str = "patter_generation_duration_seconds";

/// Total failed generation attempts.
///
/// Labels: `category`, `reason` ("error" | "timeout").
pub const GENERATION_FAILURES_TOTAL: &str = "patter_generation_failures_total";

/// Total deliveries dropped because the inbox was not being drained.
pub const DELIVERIES_DROPPED_TOTAL: &str = "patter_deliveries_dropped_total";
