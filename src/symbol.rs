//! Per-graph interning of textual names into dense integer identifiers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A dense, per-graph identifier for an interned name.
///
/// `0` is reserved as the "no symbol" sentinel and is never returned by
/// [`SymbolTable::intern`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(u32);

impl SymbolId {
    /// The sentinel identifier meaning "no symbol".
    pub const INVALID: SymbolId = SymbolId(0);

    /// Returns `true` unless this is [`SymbolId::INVALID`].
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for SymbolId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// A flat, append-only dictionary mapping strings to [`SymbolId`]s and back,
/// scoped to a single graph.
///
/// Interning is idempotent: interning the same text twice returns the same
/// id. Identifiers are assigned densely starting at 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    texts: Vec<String>,
    ids: HashMap<String, SymbolId>,
}

impl SymbolTable {
    /// Creates an empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `text`, returning its (possibly newly-assigned) id.
    pub fn intern(&mut self, text: impl Into<String>) -> SymbolId {
        let text = text.into();
        if let Some(&id) = self.ids.get(&text) {
            return id;
        }
        let id = SymbolId(self.texts.len() as u32 + 1);
        self.texts.push(text.clone());
        self.ids.insert(text, id);
        id
    }

    /// Looks up the id for `text` without interning it.
    pub fn find(&self, text: &str) -> Option<SymbolId> {
        self.ids.get(text).copied()
    }

    /// Returns the text for a previously-interned id.
    ///
    /// # Panics
    /// Panics if `id` was never returned by [`SymbolTable::intern`] on this
    /// table — this is a programmer error, not a recoverable condition.
    pub fn text(&self, id: SymbolId) -> &str {
        assert!(id.is_valid(), "attempted to resolve the invalid symbol id");
        self.texts
            .get(id.0 as usize - 1)
            .unwrap_or_else(|| panic!("symbol id {:?} not known to this table", id))
    }

    /// Number of interned symbols.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Returns `true` if no symbols have been interned yet.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let mut table = SymbolTable::new();
        let a = table.intern("foo");
        let b = table.intern("foo");
        assert_eq!(a, b);
        assert_eq!(table.text(a), "foo");
    }

    #[test]
    fn distinct_text_gets_distinct_ids() {
        let mut table = SymbolTable::new();
        let a = table.intern("a");
        let b = table.intern("b");
        assert_ne!(a, b);
    }

    #[test]
    fn ids_are_dense_starting_at_one() {
        let mut table = SymbolTable::new();
        let a = table.intern("a");
        let b = table.intern("b");
        assert_eq!(a, SymbolId(1));
        assert_eq!(b, SymbolId(2));
    }

    #[test]
    fn invalid_sentinel_is_zero() {
        assert!(!SymbolId::INVALID.is_valid());
    }

    #[test]
    fn find_does_not_intern() {
        let mut table = SymbolTable::new();
        table.intern("a");
        assert_eq!(table.find("missing"), None);
        assert_eq!(table.len(), 1);
    }
}
