//! Typed broker configuration.
//!
//! All knobs are read once at construction; there is no runtime
//! reconfiguration. The per-category gating probabilities control how often
//! a request attempts generation at all instead of using its fallback
//! outright — routine commentary is gated well below 1.0 so the backend is
//! not hammered every tick, while special events always try.

use std::time::Duration;

use crate::error::{PatterError, Result};
use crate::types::{Category, Priority};

/// Generation parameters applied per category.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Broker configuration, read once at construction.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Master switch; when `false` every request returns its fallback
    /// without touching cache or queue. Default: `true`.
    pub enabled: bool,
    /// Pending queue depth. Default: 3.
    pub queue_max_depth: usize,
    /// Response cache capacity. Default: 100.
    pub cache_max_entries: usize,
    /// Response cache time-to-live. Default: 60 s.
    pub cache_ttl: Duration,
    /// Per-request backend timeout applied by the worker. Default: 10 s.
    pub worker_timeout: Duration,
    /// How long the worker waits for work before an opportunistic cache
    /// sweep. Default: 1 s.
    pub idle_sweep_interval: Duration,
    /// Bound on how long `shutdown` waits for the worker. Default: 2 s.
    pub shutdown_timeout: Duration,
    /// Gating probability per category, in `[0.0, 1.0]`.
    pub gate_action_commentary: f64,
    pub gate_character_dialogue: f64,
    pub gate_special_event: f64,
    pub gate_freeform_chat: f64,
    /// Generation parameters per category.
    pub action_commentary_params: GenerationParams,
    pub character_dialogue_params: GenerationParams,
    pub special_event_params: GenerationParams,
    pub freeform_chat_params: GenerationParams,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            queue_max_depth: 3,
            cache_max_entries: 100,
            cache_ttl: Duration::from_secs(60),
            worker_timeout: Duration::from_secs(10),
            idle_sweep_interval: Duration::from_secs(1),
            shutdown_timeout: Duration::from_secs(2),
            gate_action_commentary: 0.7,
            gate_character_dialogue: 0.9,
            gate_special_event: 1.0,
            gate_freeform_chat: 1.0,
            action_commentary_params: GenerationParams {
                max_tokens: 48,
                temperature: 0.9,
            },
            character_dialogue_params: GenerationParams {
                max_tokens: 96,
                temperature: 0.8,
            },
            special_event_params: GenerationParams {
                max_tokens: 96,
                temperature: 0.9,
            },
            freeform_chat_params: GenerationParams {
                max_tokens: 192,
                temperature: 0.7,
            },
        }
    }
}

impl BrokerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate_probability(&self, category: Category) -> f64 {
        match category {
            Category::ActionCommentary => self.gate_action_commentary,
            Category::CharacterDialogue => self.gate_character_dialogue,
            Category::SpecialEvent => self.gate_special_event,
            Category::FreeformChat => self.gate_freeform_chat,
        }
    }

    pub fn generation(&self, category: Category) -> GenerationParams {
        match category {
            Category::ActionCommentary => self.action_commentary_params,
            Category::CharacterDialogue => self.character_dialogue_params,
            Category::SpecialEvent => self.special_event_params,
            Category::FreeformChat => self.freeform_chat_params,
        }
    }

    /// Default scheduling priority per category. Chat and rare events jump
    /// the line ahead of routine commentary.
    pub fn priority(category: Category) -> Priority {
        match category {
            Category::ActionCommentary => Priority::Low,
            Category::CharacterDialogue => Priority::Normal,
            Category::SpecialEvent => Priority::High,
            Category::FreeformChat => Priority::High,
        }
    }

    /// Validate invariants the rest of the broker relies on.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.queue_max_depth == 0 {
            return Err(PatterError::Configuration(
                "queue_max_depth must be at least 1".into(),
            ));
        }
        if self.cache_max_entries == 0 {
            return Err(PatterError::Configuration(
                "cache_max_entries must be at least 1".into(),
            ));
        }
        for category in [
            Category::ActionCommentary,
            Category::CharacterDialogue,
            Category::SpecialEvent,
            Category::FreeformChat,
        ] {
            let p = self.gate_probability(category);
            if !(0.0..=1.0).contains(&p) {
                return Err(PatterError::Configuration(format!(
                    "gating probability for {category} out of range: {p}"
                )));
            }
        }
        Ok(())
    }
}
