//! Card locations and movement between zones.
//!
//! Every zone keeps its cards in order. For decks, the last element is the
//! top card; for every other zone order is arrival order.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::CardInstanceId;
use crate::core::{GameRng, PlayerId};

/// Where a card can be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Shared piles cards are gained from.
    Supply,
    /// Shared trash.
    Trash,
    Deck(PlayerId),
    Hand(PlayerId),
    Discard(PlayerId),
    /// In play this turn.
    Play(PlayerId),
    /// Set aside by an effect (e.g. revealed while searching the deck).
    SetAside(PlayerId),
}

impl Zone {
    /// The seat owning this zone, `None` for shared zones.
    #[must_use]
    pub const fn owner(self) -> Option<PlayerId> {
        match self {
            Zone::Supply | Zone::Trash => None,
            Zone::Deck(p) | Zone::Hand(p) | Zone::Discard(p) | Zone::Play(p) | Zone::SetAside(p) => {
                Some(p)
            }
        }
    }

    #[must_use]
    pub const fn is_hand(self) -> bool {
        matches!(self, Zone::Hand(_))
    }

    #[must_use]
    pub const fn is_play(self) -> bool {
        matches!(self, Zone::Play(_))
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Supply => write!(f, "supply"),
            Zone::Trash => write!(f, "trash"),
            Zone::Deck(p) => write!(f, "deck of {p}"),
            Zone::Hand(p) => write!(f, "hand of {p}"),
            Zone::Discard(p) => write!(f, "discard of {p}"),
            Zone::Play(p) => write!(f, "play area of {p}"),
            Zone::SetAside(p) => write!(f, "set-aside of {p}"),
        }
    }
}

/// Position for inserting a card into a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// End of the list (top of a deck).
    Top,
    /// Start of the list.
    Bottom,
    /// Specific index, clamped to the zone length.
    Index(usize),
}

/// Tracks which zone every card is in and the order inside each zone.
///
/// ```
/// use deckbuilder_reactions::cards::CardInstanceId;
/// use deckbuilder_reactions::core::PlayerId;
/// use deckbuilder_reactions::zones::{Zone, ZoneManager, ZonePosition};
///
/// let deck = Zone::Deck(PlayerId::new(0));
/// let mut zones = ZoneManager::new();
/// zones.add_to_zone(CardInstanceId(1), deck, None);
/// zones.add_to_zone(CardInstanceId(2), deck, Some(ZonePosition::Bottom));
///
/// assert_eq!(zones.top_card(deck), Some(CardInstanceId(1)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ZoneManager {
    locations: FxHashMap<CardInstanceId, Zone>,
    zone_order: FxHashMap<Zone, Vec<CardInstanceId>>,
}

impl ZoneManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a card that is not tracked yet.
    ///
    /// Panics if the card is already in a zone.
    pub fn add_to_zone(&mut self, card: CardInstanceId, zone: Zone, position: Option<ZonePosition>) {
        if self.locations.contains_key(&card) {
            panic!("{card} already exists in zone manager");
        }
        self.locations.insert(card, zone);
        Self::insert_ordered(self.zone_order.entry(zone).or_default(), card, position);
    }

    /// Move a tracked card. Returns the zone it left, or `None` if unknown.
    ///
    /// Moving a card to the zone it is already in repositions it.
    pub fn move_to_zone(
        &mut self,
        card: CardInstanceId,
        new_zone: Zone,
        position: Option<ZonePosition>,
    ) -> Option<Zone> {
        let old_zone = self.locations.get(&card).copied()?;

        if let Some(order) = self.zone_order.get_mut(&old_zone) {
            order.retain(|&c| c != card);
        }
        self.locations.insert(card, new_zone);
        Self::insert_ordered(self.zone_order.entry(new_zone).or_default(), card, position);

        Some(old_zone)
    }

    fn insert_ordered(order: &mut Vec<CardInstanceId>, card: CardInstanceId, position: Option<ZonePosition>) {
        match position.unwrap_or(ZonePosition::Top) {
            ZonePosition::Top => order.push(card),
            ZonePosition::Bottom => order.insert(0, card),
            ZonePosition::Index(i) => {
                let idx = i.min(order.len());
                order.insert(idx, card);
            }
        }
    }

    #[must_use]
    pub fn get_zone(&self, card: CardInstanceId) -> Option<Zone> {
        self.locations.get(&card).copied()
    }

    #[must_use]
    pub fn is_in_zone(&self, card: CardInstanceId, zone: Zone) -> bool {
        self.locations.get(&card) == Some(&zone)
    }

    /// Cards in a zone, bottom first.
    #[must_use]
    pub fn cards_in_zone(&self, zone: Zone) -> &[CardInstanceId] {
        self.zone_order.get(&zone).map_or(&[], |v| v.as_slice())
    }

    #[must_use]
    pub fn zone_size(&self, zone: Zone) -> usize {
        self.cards_in_zone(zone).len()
    }

    #[must_use]
    pub fn top_card(&self, zone: Zone) -> Option<CardInstanceId> {
        self.zone_order.get(&zone)?.last().copied()
    }

    /// Move every card of `from` onto `to`, keeping their relative order.
    /// Returns how many cards moved.
    pub fn move_all(&mut self, from: Zone, to: Zone) -> usize {
        if from == to {
            return 0;
        }
        let moved = self.zone_order.remove(&from).unwrap_or_default();
        for &card in &moved {
            self.locations.insert(card, to);
        }
        let count = moved.len();
        self.zone_order.entry(to).or_default().extend(moved);
        count
    }

    pub fn shuffle_zone(&mut self, zone: Zone, rng: &mut GameRng) {
        if let Some(order) = self.zone_order.get_mut(&zone) {
            rng.shuffle(order);
        }
    }

    #[must_use]
    pub fn contains(&self, card: CardInstanceId) -> bool {
        self.locations.contains_key(&card)
    }
}
