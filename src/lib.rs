//! Patter - non-blocking commentary broker for interactive character simulations
//!
//! A character simulation's front end runs on a single-threaded tick and
//! must never stall waiting on slow, optional text generation. Patter sits
//! between that tick loop and a text backend: every request returns usable
//! text synchronously (cached or fallback), while actual generation runs on
//! one bounded background worker and arrives through a delivery inbox the
//! front end drains once per frame.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use patter::{Broker, Result, TextBackend};
//!
//! struct EchoBackend;
//!
//! #[async_trait]
//! impl TextBackend for EchoBackend {
//!     async fn generate(&self, prompt: &str, _max_tokens: u32, _temperature: f32) -> Result<String> {
//!         Ok(format!("({prompt})"))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let broker = Broker::builder().backend(Arc::new(EchoBackend)).build()?;
//!     broker.start();
//!
//!     // Tick loop: always get text now, maybe better text later.
//!     let outcome = broker.request_action_commentary("Maple", "nap", "drowsy", "Zzz...");
//!     println!("{}", outcome.text);
//!
//!     for delivery in broker.poll_deliveries() {
//!         if let Some(text) = delivery.text {
//!             println!("upgraded: {text}");
//!         }
//!     }
//!
//!     broker.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod broker;
pub mod cache;
pub mod error;
pub mod fallback;
pub mod fingerprint;
pub mod scheduler;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use backend::TextBackend;
pub use broker::{Broker, BrokerBuilder, BrokerConfig, BrokerStatus, GenerationParams};
pub use cache::{CacheConfig, ResponseCache};
pub use error::{PatterError, Result};
pub use fallback::{FallbackRegistry, PhraseBank};
pub use fingerprint::{Fingerprint, fingerprint};
pub use scheduler::PendingQueue;

// Re-export all types
pub use types::{
    Category, ContextValue, Delivery, DeliveryInbox, GenerationRequest, Priority, RequestContext,
    RequestId, RequestOutcome, TextSource,
};
