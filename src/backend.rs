//! Text generation backend trait.

use async_trait::async_trait;

use crate::Result;

/// Opaque text generator driven exclusively by the broker's worker.
///
/// Implementations wrap whatever actually produces text — local model
/// inference, a remote chat API, a canned test double. Calls may be slow
/// (seconds); the broker isolates them on its single worker task and applies
/// its own timeout, so implementations need not race the clock themselves.
/// The worker never issues overlapping calls, so implementations may assume
/// single-flight access.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Produce text for a rendered prompt.
    async fn generate(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String>;

    /// Whether the backend can currently serve requests.
    ///
    /// Queried on the caller's path before each gating cycle; `false`
    /// short-circuits straight to the fallback without touching cache or
    /// queue. Must be cheap and non-blocking.
    fn is_available(&self) -> bool {
        true
    }
}
