//! Bounded priority scheduling and the background worker.

mod queue;
pub(crate) mod worker;

pub use queue::PendingQueue;
