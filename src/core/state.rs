//! Match state: turn progress, per-seat resources, card locations.
//!
//! `MatchState` is plain data plus bookkeeping that keeps the zone manager
//! and the card library agreeing about where each card is. It never fires
//! events; the action delegate on `Game` does that after mutating it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::config::EngineConfig;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{CardInstanceId, CardKey, CardLibrary, CardRegistry};
use crate::error::{EngineError, Result};
use crate::zones::{Zone, ZoneManager, ZonePosition};

/// Phases of a Dominion turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    #[default]
    Action,
    Buy,
    Cleanup,
}

impl TurnPhase {
    /// The phase after this one; `None` after cleanup (the turn ends).
    #[must_use]
    pub const fn next(self) -> Option<TurnPhase> {
        match self {
            TurnPhase::Action => Some(TurnPhase::Buy),
            TurnPhase::Buy => Some(TurnPhase::Cleanup),
            TurnPhase::Cleanup => None,
        }
    }
}

/// Actions, buys and treasure available to a seat this turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResources {
    pub actions: u32,
    pub buys: u32,
    pub treasure: u32,
}

pub struct MatchState {
    player_count: usize,

    /// Turn number (starts at 1).
    pub turn_number: u32,

    /// Whose turn it is.
    pub active_player: PlayerId,

    pub phase: TurnPhase,

    pub resources: PlayerMap<TurnResources>,

    /// Card locations.
    pub zones: ZoneManager,

    /// Card instances and their definitions.
    pub cards: CardLibrary,

    /// Deck shuffles.
    pub rng: GameRng,
}

impl MatchState {
    #[must_use]
    pub fn new(config: &EngineConfig, registry: Arc<CardRegistry>) -> Self {
        Self {
            player_count: config.player_count,
            turn_number: 1,
            active_player: PlayerId::new(0),
            phase: TurnPhase::default(),
            resources: PlayerMap::with_default(config.player_count),
            zones: ZoneManager::new(),
            cards: CardLibrary::new(registry),
            rng: GameRng::new(config.seed),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.player_count)
    }

    // === Card setup ===

    /// Create a card and place it on top of `zone`. Cards in per-seat zones
    /// are owned by that seat; supply and trash cards are neutral.
    pub fn spawn_card(&mut self, key: &CardKey, zone: Zone) -> Result<CardInstanceId> {
        let id = self.cards.spawn(key, zone.owner(), zone)?;
        self.zones.add_to_zone(id, zone, None);
        Ok(id)
    }

    /// Put `count` copies of a card into the supply.
    pub fn fill_supply(&mut self, key: &CardKey, count: usize) -> Result<Vec<CardInstanceId>> {
        (0..count).map(|_| self.spawn_card(key, Zone::Supply)).collect()
    }

    // === Card sources ===

    pub fn zone_of(&self, card: CardInstanceId) -> Result<Zone> {
        self.zones.get_zone(card).ok_or(EngineError::CardNotFound(card))
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[CardInstanceId] {
        self.zones.cards_in_zone(Zone::Hand(player))
    }

    #[must_use]
    pub fn deck(&self, player: PlayerId) -> &[CardInstanceId] {
        self.zones.cards_in_zone(Zone::Deck(player))
    }

    #[must_use]
    pub fn discard(&self, player: PlayerId) -> &[CardInstanceId] {
        self.zones.cards_in_zone(Zone::Discard(player))
    }

    #[must_use]
    pub fn in_play(&self, player: PlayerId) -> &[CardInstanceId] {
        self.zones.cards_in_zone(Zone::Play(player))
    }

    #[must_use]
    pub fn trash(&self) -> &[CardInstanceId] {
        self.zones.cards_in_zone(Zone::Trash)
    }

    /// Topmost supply card with this key, if the pile isn't empty.
    #[must_use]
    pub fn find_in_supply(&self, key: &CardKey) -> Option<CardInstanceId> {
        self.zones
            .cards_in_zone(Zone::Supply)
            .iter()
            .rev()
            .copied()
            .find(|&id| self.cards.get_card(id).is_ok_and(|c| &c.card_key == key))
    }

    /// Number of supply cards left with this key.
    #[must_use]
    pub fn supply_count(&self, key: &CardKey) -> usize {
        self.zones
            .cards_in_zone(Zone::Supply)
            .iter()
            .filter(|&&id| self.cards.get_card(id).is_ok_and(|c| &c.card_key == key))
            .count()
    }

    // === Movement ===

    /// Move a card, keeping the library in sync. Returns the zone it left.
    pub fn relocate(&mut self, card: CardInstanceId, to: Zone, position: Option<ZonePosition>) -> Result<Zone> {
        let from = self
            .zones
            .move_to_zone(card, to, position)
            .ok_or(EngineError::CardNotFound(card))?;
        self.cards.get_card_mut(card)?.zone = to;
        Ok(from)
    }

    pub fn set_owner(&mut self, card: CardInstanceId, owner: PlayerId) -> Result<()> {
        self.cards.get_card_mut(card)?.owner = Some(owner);
        Ok(())
    }

    /// Put a seat's discard pile under its deck, shuffled. Returns how many
    /// cards were shuffled in.
    pub fn reshuffle_discard(&mut self, player: PlayerId) -> Result<usize> {
        let discard = Zone::Discard(player);
        let deck = Zone::Deck(player);

        let mut incoming = self.zones.cards_in_zone(discard).to_vec();
        if incoming.is_empty() {
            return Ok(0);
        }
        self.rng.shuffle(&mut incoming);
        for (offset, &card) in incoming.iter().enumerate() {
            self.relocate(card, deck, Some(ZonePosition::Index(offset)))?;
        }
        Ok(incoming.len())
    }

    /// Shuffle a seat's discard pile into its deck and shuffle the whole
    /// deck. Returns the deck size.
    pub fn shuffle_deck(&mut self, player: PlayerId) -> Result<usize> {
        let deck = Zone::Deck(player);
        let incoming = self.zones.cards_in_zone(Zone::Discard(player)).to_vec();
        self.zones.move_all(Zone::Discard(player), deck);
        for card in incoming {
            self.cards.get_card_mut(card)?.zone = deck;
        }
        self.zones.shuffle_zone(deck, &mut self.rng);
        Ok(self.zones.zone_size(deck))
    }

    // === Resources ===

    pub fn reset_resources(&mut self, player: PlayerId, config: &EngineConfig) {
        self.resources[player] = TurnResources {
            actions: config.starting_actions,
            buys: config.starting_buys,
            treasure: 0,
        };
    }
}
