//! Card definitions - static card data.
//!
//! A `CardDefinition` describes a kingdom or base card ("village", "moat")
//! independent of any copy of it in a match. Copies are `CardInstance`s.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Stable key of a card definition, e.g. `"beggar"`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardKey(pub String);

impl CardKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl std::fmt::Display for CardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Card types. A card may carry several (e.g. Action-Reaction).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Action,
    Treasure,
    Victory,
    Curse,
    Attack,
    Reaction,
    Duration,
}

/// Printed or effective price.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cost {
    pub treasure: u32,
    pub potion: u32,
}

impl Cost {
    #[must_use]
    pub const fn treasure(treasure: u32) -> Self {
        Self { treasure, potion: 0 }
    }

    /// Apply a signed treasure modifier, never going below zero.
    #[must_use]
    pub fn adjusted(self, delta: i32) -> Self {
        let treasure = (i64::from(self.treasure) + i64::from(delta)).max(0);
        Self {
            treasure: u32::try_from(treasure).unwrap_or(u32::MAX),
            potion: self.potion,
        }
    }
}

/// Static card definition.
///
/// ```
/// use deckbuilder_reactions::cards::{CardDefinition, CardType, Cost};
///
/// let moat = CardDefinition::new("moat", "Moat", Cost::treasure(2))
///     .with_type(CardType::Action)
///     .with_type(CardType::Reaction);
///
/// assert!(moat.has_type(CardType::Reaction));
/// assert!(!moat.has_type(CardType::Attack));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub key: CardKey,

    /// Display name.
    pub name: String,

    pub types: SmallVec<[CardType; 2]>,

    /// Printed cost, before any price rules.
    pub cost: Cost,
}

impl CardDefinition {
    #[must_use]
    pub fn new(key: impl Into<CardKey>, name: impl Into<String>, cost: Cost) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            types: SmallVec::new(),
            cost,
        }
    }

    /// Add a card type (builder pattern).
    #[must_use]
    pub fn with_type(mut self, card_type: CardType) -> Self {
        if !self.types.contains(&card_type) {
            self.types.push(card_type);
        }
        self
    }

    #[must_use]
    pub fn has_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }
}
