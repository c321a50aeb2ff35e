//! Request types: categories, priorities, contexts, and outcomes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::fingerprint::{Fingerprint, fingerprint};

/// What kind of text a request asks for.
///
/// Each category has its own gating probability, generation parameters,
/// and default scheduling priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// One-line commentary on an autonomous action.
    ActionCommentary,
    /// A spoken line in the character's voice.
    CharacterDialogue,
    /// Reaction to a rare scripted event.
    SpecialEvent,
    /// Reply in a free-form chat conversation.
    FreeformChat,
}

impl Category {
    /// Stable tag mixed into fingerprints and used as a metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ActionCommentary => "action_commentary",
            Category::CharacterDialogue => "character_dialogue",
            Category::SpecialEvent => "special_event",
            Category::FreeformChat => "freeform_chat",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling priority. The worker drains `High` before `Normal` before `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Normal,
    High,
}

/// Primitive value describing one facet of the request situation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ContextValue {
    /// Type-tagged textual form fed into the fingerprint hash.
    ///
    /// Floats hash by bit pattern so that `1.0` and `1.0000000001` never
    /// alias through formatting.
    pub(crate) fn canonical(&self) -> String {
        match self {
            ContextValue::Str(s) => format!("s:{s}"),
            ContextValue::Int(i) => format!("i:{i}"),
            ContextValue::Float(f) => format!("f:{:016x}", f.to_bits()),
            ContextValue::Bool(b) => format!("b:{b}"),
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::Str(s) => f.write_str(s),
            ContextValue::Int(i) => write!(f, "{i}"),
            ContextValue::Float(x) => write!(f, "{x}"),
            ContextValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::Str(s.to_owned())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::Str(s)
    }
}

impl From<i64> for ContextValue {
    fn from(i: i64) -> Self {
        ContextValue::Int(i)
    }
}

impl From<usize> for ContextValue {
    fn from(n: usize) -> Self {
        ContextValue::Int(n as i64)
    }
}

impl From<f64> for ContextValue {
    fn from(f: f64) -> Self {
        ContextValue::Float(f)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        ContextValue::Bool(b)
    }
}

/// Ordered situation description.
///
/// A `BTreeMap` iterates in key order, so fingerprints never depend on
/// insertion order.
pub type RequestContext = BTreeMap<String, ContextValue>;

/// Identifier matching an enqueued request to its later [`Delivery`].
///
/// [`Delivery`]: crate::types::Delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    /// Generate the next request ID (for internal use and testing).
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        RequestId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A single generation attempt handed to the scheduler.
///
/// Immutable once built. Ownership moves caller → queue → worker; the
/// request is discarded after one backend attempt and never retried.
#[derive(Debug)]
pub struct GenerationRequest {
    pub category: Category,
    pub priority: Priority,
    pub context: RequestContext,
    pub fingerprint: Fingerprint,
    pub id: RequestId,
    pub created_at: Instant,
}

impl GenerationRequest {
    /// Build a request, computing the fingerprint from the context.
    pub fn new(category: Category, priority: Priority, context: RequestContext) -> Self {
        let fingerprint = fingerprint(category, &context);
        Self {
            category,
            priority,
            context,
            fingerprint,
            id: RequestId::next(),
            created_at: Instant::now(),
        }
    }
}

/// Where the synchronously returned text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// Previously generated text served from the response cache.
    Cached,
    /// Broker disabled or backend unavailable; fallback returned.
    Disabled,
    /// Gating roll chose not to attempt generation; fallback returned.
    Gated,
    /// Request enqueued; fallback returned while generation runs.
    Pending,
    /// Queue full (or duplicate in flight); fallback returned.
    Rejected,
}

impl TextSource {
    /// Metric label value.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextSource::Cached => "cached",
            TextSource::Disabled => "disabled",
            TextSource::Gated => "gated",
            TextSource::Pending => "pending",
            TextSource::Rejected => "rejected",
        }
    }
}

/// Synchronous result of a broker request. Always carries usable text.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    /// Text to display now — cached or fallback, never empty by contract.
    pub text: String,
    pub source: TextSource,
    /// Set when a request was enqueued; the matching [`Delivery`] carries
    /// the same ID.
    ///
    /// [`Delivery`]: crate::types::Delivery
    pub pending: Option<RequestId>,
}

impl RequestOutcome {
    pub(crate) fn immediate(text: impl Into<String>, source: TextSource) -> Self {
        Self {
            text: text.into(),
            source,
            pending: None,
        }
    }
}
