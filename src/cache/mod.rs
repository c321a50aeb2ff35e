//! Response caching for generated text.

mod response;

pub use response::{CacheConfig, ResponseCache};
