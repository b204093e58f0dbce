//! Game events.
//!
//! Events are emitted by the action delegate and by the turn flow after the
//! state change they describe has happened. Reaction templates listen for one
//! `EventKind` each.

use serde::{Deserialize, Serialize};

use crate::cards::CardInstanceId;
use crate::core::{PlayerId, TurnPhase};
use crate::zones::Zone;

/// What happened.
///
/// `name()` gives the camelCase wire name used in reaction ids and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    CardPlayed,
    CardGained,
    CardTrashed,
    CardDrawn,
    CardDiscarded,
    CardRevealed,
    CardMoved,
    DeckShuffled,
    StartTurn,
    EndTurnPhase,
    EndTurn,
}

impl EventKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::CardPlayed => "cardPlayed",
            EventKind::CardGained => "cardGained",
            EventKind::CardTrashed => "cardTrashed",
            EventKind::CardDrawn => "cardDrawn",
            EventKind::CardDiscarded => "cardDiscarded",
            EventKind::CardRevealed => "cardRevealed",
            EventKind::CardMoved => "cardMoved",
            EventKind::DeckShuffled => "deckShuffled",
            EventKind::StartTurn => "startTurn",
            EventKind::EndTurnPhase => "endTurnPhase",
            EventKind::EndTurn => "endTurn",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One event occurrence.
///
/// - `player`: the player who caused it (who played, gained, trashed ...)
/// - `card`: the card involved, if any
/// - `from` / `to`: zone change, if any
/// - `phase`: the phase that ended, for `EndTurnPhase`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,
    pub player: PlayerId,
    pub card: Option<CardInstanceId>,
    pub from: Option<Zone>,
    pub to: Option<Zone>,
    pub phase: Option<TurnPhase>,
}

impl GameEvent {
    pub fn new(kind: EventKind, player: PlayerId) -> Self {
        Self {
            kind,
            player,
            card: None,
            from: None,
            to: None,
            phase: None,
        }
    }

    /// Set the card involved (builder pattern).
    #[must_use]
    pub fn with_card(mut self, card: CardInstanceId) -> Self {
        self.card = Some(card);
        self
    }

    /// Record a zone change (builder pattern).
    #[must_use]
    pub fn with_move(mut self, from: Zone, to: Zone) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    #[must_use]
    pub fn with_phase(mut self, phase: TurnPhase) -> Self {
        self.phase = Some(phase);
        self
    }
}

/// Shorthands for the events the delegate emits.
impl GameEvent {
    pub fn card_played(player: PlayerId, card: CardInstanceId) -> Self {
        Self::new(EventKind::CardPlayed, player).with_card(card)
    }

    pub fn card_gained(player: PlayerId, card: CardInstanceId, to: Zone) -> Self {
        Self::new(EventKind::CardGained, player)
            .with_card(card)
            .with_move(Zone::Supply, to)
    }

    pub fn card_trashed(player: PlayerId, card: CardInstanceId, from: Zone) -> Self {
        Self::new(EventKind::CardTrashed, player)
            .with_card(card)
            .with_move(from, Zone::Trash)
    }

    pub fn end_turn_phase(player: PlayerId, phase: TurnPhase) -> Self {
        Self::new(EventKind::EndTurnPhase, player).with_phase(phase)
    }
}
