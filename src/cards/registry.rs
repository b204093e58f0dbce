//! Card registry for definition lookup.
//!
//! Built once per card set and shared (behind an `Arc`) by every match that
//! uses it.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardKey, CardType};
use crate::error::{EngineError, Result};

/// Registry of card definitions keyed by `CardKey`.
///
/// ```
/// use deckbuilder_reactions::cards::{CardDefinition, CardKey, CardRegistry, Cost};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::new("village", "Village", Cost::treasure(3))).unwrap();
///
/// let found = registry.get(&CardKey::new("village")).unwrap();
/// assert_eq!(found.name, "Village");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardKey, CardDefinition>,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. Keys are unique.
    pub fn register(&mut self, card: CardDefinition) -> Result<()> {
        if self.cards.contains_key(&card.key) {
            return Err(EngineError::DuplicateCardKey(card.key));
        }
        self.cards.insert(card.key.clone(), card);
        Ok(())
    }

    /// Builder-style registration for static card sets.
    pub fn with_card(mut self, card: CardDefinition) -> Result<Self> {
        self.register(card)?;
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, key: &CardKey) -> Option<&CardDefinition> {
        self.cards.get(key)
    }

    /// Like `get`, but an unknown key is an error.
    pub fn require(&self, key: &CardKey) -> Result<&CardDefinition> {
        self.cards
            .get(key)
            .ok_or_else(|| EngineError::UnknownCardKey(key.clone()))
    }

    #[must_use]
    pub fn contains(&self, key: &CardKey) -> bool {
        self.cards.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn find_by_type(&self, card_type: CardType) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values().filter(move |c| c.has_type(card_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Cost;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDefinition::new("moat", "Moat", Cost::treasure(2)))
            .unwrap();

        assert!(registry.contains(&CardKey::new("moat")));
        assert!(registry.get(&CardKey::new("smithy")).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDefinition::new("moat", "Moat", Cost::treasure(2)))
            .unwrap();
        let err = registry
            .register(CardDefinition::new("moat", "Moat again", Cost::treasure(2)))
            .unwrap_err();

        assert!(matches!(err, EngineError::DuplicateCardKey(_)));
    }

    #[test]
    fn test_require_unknown_key() {
        let registry = CardRegistry::new();
        let err = registry.require(&CardKey::new("ghost")).unwrap_err();
        assert!(matches!(err, EngineError::UnknownCardKey(k) if k.as_str() == "ghost"));
    }

    #[test]
    fn test_find_by_type() {
        let registry = CardRegistry::new()
            .with_card(CardDefinition::new("militia", "Militia", Cost::treasure(4)).with_type(CardType::Attack))
            .unwrap()
            .with_card(CardDefinition::new("village", "Village", Cost::treasure(3)).with_type(CardType::Action))
            .unwrap();

        let attacks: Vec<_> = registry.find_by_type(CardType::Attack).collect();
        assert_eq!(attacks.len(), 1);
        assert_eq!(attacks[0].key, CardKey::new("militia"));
    }
}
