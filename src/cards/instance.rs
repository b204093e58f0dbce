//! Card instances - the physical copies in a match.
//!
//! Every copy of a card gets its own `CardInstanceId`, so two Beggars in two
//! hands are distinct and can register distinct reactions.
//!
//! ## Neutral Cards
//!
//! Cards still in the supply have no owner. Gaining a card assigns one.

use serde::{Deserialize, Serialize};

use super::definition::CardKey;
use crate::core::PlayerId;
use crate::zones::Zone;

/// Identifier of one physical card in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardInstanceId(pub u32);

impl CardInstanceId {
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card#{}", self.0)
    }
}

/// A card instance in a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    pub id: CardInstanceId,

    /// Which definition this is a copy of.
    pub card_key: CardKey,

    /// `None` while the card sits in the supply.
    pub owner: Option<PlayerId>,

    /// Mirrors the zone manager; kept here so lookups don't need both.
    pub zone: Zone,
}

impl CardInstance {
    #[must_use]
    pub fn new(id: CardInstanceId, card_key: CardKey, owner: Option<PlayerId>, zone: Zone) -> Self {
        Self {
            id,
            card_key,
            owner,
            zone,
        }
    }

    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.owner.is_none()
    }

    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supply_card_is_neutral() {
        let card = CardInstance::new(CardInstanceId(3), CardKey::new("silver"), None, Zone::Supply);
        assert!(card.is_neutral());
        assert!(!card.is_owned_by(PlayerId::new(0)));
    }

    #[test]
    fn test_display() {
        assert_eq!(CardInstanceId(42).to_string(), "Card#42");
    }
}
