//! Pre-written fallback phrases.
//!
//! Fallback text is what the front end shows when generation is skipped,
//! still pending, or failed. The phrases themselves are game content; the
//! broker only ever receives the already-chosen string per request, so
//! [`FallbackRegistry`] is a seam for hosts rather than part of the broker's
//! hot path. [`PhraseBank`] is the standard in-memory implementation.

use std::collections::HashMap;

use rand::seq::SliceRandom;

use crate::types::Category;

/// Pure lookup of pre-written phrases by category and action key.
pub trait FallbackRegistry: Send + Sync {
    /// Pick a phrase for the given category and action key.
    ///
    /// Returns `None` when no phrase is registered; no side effects.
    fn fallback(&self, category: Category, action_key: &str) -> Option<&str>;
}

/// In-memory phrase bank keyed by category and action key.
///
/// Several phrases may be registered per key; lookups pick one uniformly at
/// random so repeated fallbacks do not read identically.
///
/// ```rust
/// # use patter::{Category, FallbackRegistry, PhraseBank};
/// let bank = PhraseBank::new().with(
///     Category::ActionCommentary,
///     "eat",
///     ["Nom nom.", "Tasty!"],
/// );
/// assert!(bank.fallback(Category::ActionCommentary, "eat").is_some());
/// ```
#[derive(Default)]
pub struct PhraseBank {
    phrases: HashMap<Category, HashMap<String, Vec<String>>>,
}

impl PhraseBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register phrases for a category and action key (builder style).
    pub fn with<I, S>(mut self, category: Category, action_key: &str, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(category, action_key, phrases);
        self
    }

    /// Register phrases for a category and action key.
    pub fn add<I, S>(&mut self, category: Category, action_key: &str, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phrases
            .entry(category)
            .or_default()
            .entry(action_key.to_owned())
            .or_default()
            .extend(phrases.into_iter().map(Into::into));
    }
}

impl FallbackRegistry for PhraseBank {
    fn fallback(&self, category: Category, action_key: &str) -> Option<&str> {
        self.phrases
            .get(&category)?
            .get(action_key)?
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }
}
