//! Builder for configuring broker instances

use std::sync::Arc;
use std::time::Duration;

use crate::backend::TextBackend;
use crate::error::{PatterError, Result};
use crate::types::Category;

use super::Broker;
use super::config::{BrokerConfig, GenerationParams};

/// Builder for configuring broker instances.
///
/// A backend is mandatory; everything else defaults per [`BrokerConfig`].
pub struct BrokerBuilder {
    config: BrokerConfig,
    backend: Option<Arc<dyn TextBackend>>,
}

impl BrokerBuilder {
    pub fn new() -> Self {
        Self {
            config: BrokerConfig::default(),
            backend: None,
        }
    }

    /// Set the text generation backend.
    pub fn backend(mut self, backend: Arc<dyn TextBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Master switch; a disabled broker serves fallbacks only.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Set the pending queue depth.
    pub fn queue_max_depth(mut self, depth: usize) -> Self {
        self.config.queue_max_depth = depth;
        self
    }

    /// Set the response cache capacity.
    pub fn cache_max_entries(mut self, n: usize) -> Self {
        self.config.cache_max_entries = n;
        self
    }

    /// Set the response cache time-to-live.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    /// Set the per-request backend timeout applied by the worker.
    pub fn worker_timeout(mut self, timeout: Duration) -> Self {
        self.config.worker_timeout = timeout;
        self
    }

    /// Set the worker's idle wait before an opportunistic cache sweep.
    pub fn idle_sweep_interval(mut self, interval: Duration) -> Self {
        self.config.idle_sweep_interval = interval;
        self
    }

    /// Set the bound on how long `shutdown` waits for the worker.
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Set the gating probability for one category (`0.0` never attempts
    /// generation, `1.0` always does).
    pub fn gate_probability(mut self, category: Category, probability: f64) -> Self {
        match category {
            Category::ActionCommentary => self.config.gate_action_commentary = probability,
            Category::CharacterDialogue => self.config.gate_character_dialogue = probability,
            Category::SpecialEvent => self.config.gate_special_event = probability,
            Category::FreeformChat => self.config.gate_freeform_chat = probability,
        }
        self
    }

    /// Set the generation parameters for one category.
    pub fn generation_params(mut self, category: Category, params: GenerationParams) -> Self {
        match category {
            Category::ActionCommentary => self.config.action_commentary_params = params,
            Category::CharacterDialogue => self.config.character_dialogue_params = params,
            Category::SpecialEvent => self.config.special_event_params = params,
            Category::FreeformChat => self.config.freeform_chat_params = params,
        }
        self
    }

    /// Replace the whole configuration at once.
    pub fn config(mut self, config: BrokerConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the broker. Does not start the worker — call
    /// [`Broker::start`] once a runtime is available.
    pub fn build(self) -> Result<Broker> {
        let backend = self.backend.ok_or(PatterError::NoBackend)?;
        self.config.validate()?;
        Ok(Broker::new(self.config, backend))
    }
}

impl Default for BrokerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
