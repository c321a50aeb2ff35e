//! Context fingerprinting — stable cache keys for generation requests.
//!
//! A fingerprint reduces a request's semantic context to a SHA-256 digest
//! keyed by category and the sorted key/value pairs of the context.
//! Identical pairs produce identical fingerprints regardless of insertion
//! order; timestamps and delivery bookkeeping never participate, so two
//! requests describing the same situation share a cache entry.
//!
//! SHA-256 keeps collisions in the cryptographic-negligible range — two
//! semantically different contexts never alias in normal operation.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::types::{Category, RequestContext};

/// Stable cache key derived from a request's semantic context.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    /// Abbreviated hex form for logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fingerprint({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Compute the fingerprint for a category and context.
///
/// `RequestContext` is a `BTreeMap`, so iteration is already sorted by key;
/// no explicit sort step is needed. Keys and values are joined with
/// separator bytes so that `("ab", "c")` and `("a", "bc")` hash differently.
pub fn fingerprint(category: Category, context: &RequestContext) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(category.as_str().as_bytes());
    for (key, value) in context {
        hasher.update([0x1e]);
        hasher.update(key.as_bytes());
        hasher.update([0x1f]);
        hasher.update(value.canonical().as_bytes());
    }
    Fingerprint(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContextValue;

    fn ctx(pairs: &[(&str, &str)]) -> RequestContext {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), ContextValue::from(*v)))
            .collect()
    }

    #[test]
    fn fingerprint_deterministic() {
        let c = ctx(&[("subject", "Maple"), ("mood", "content")]);
        let k1 = fingerprint(Category::ActionCommentary, &c);
        let k2 = fingerprint(Category::ActionCommentary, &c);
        assert_eq!(k1, k2);
    }

    #[test]
    fn fingerprint_differs_on_category() {
        let c = ctx(&[("subject", "Maple")]);
        let k1 = fingerprint(Category::ActionCommentary, &c);
        let k2 = fingerprint(Category::CharacterDialogue, &c);
        assert_ne!(k1, k2);
    }

    #[test]
    fn fingerprint_differs_on_value() {
        let k1 = fingerprint(Category::FreeformChat, &ctx(&[("message", "hi")]));
        let k2 = fingerprint(Category::FreeformChat, &ctx(&[("message", "hello")]));
        assert_ne!(k1, k2);
    }

    #[test]
    fn key_value_boundaries_do_not_alias() {
        let k1 = fingerprint(Category::FreeformChat, &ctx(&[("ab", "c")]));
        let k2 = fingerprint(Category::FreeformChat, &ctx(&[("a", "bc")]));
        assert_ne!(k1, k2);
    }

    #[test]
    fn display_is_full_hex() {
        let k = fingerprint(Category::SpecialEvent, &ctx(&[]));
        assert_eq!(k.to_string().len(), 64);
    }
}
