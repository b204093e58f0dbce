//! Game actions.
//!
//! Everything a card effect or reaction can ask the engine to do is a
//! `GameAction`, executed by `Game::run_game_action`.

use serde::{Deserialize, Serialize};

use super::decision::{PromptRequest, PromptResponse, SelectCardRequest};
use crate::cards::{CardInstanceId, CardKey};
use crate::core::PlayerId;
use crate::reactions::ReactionReport;
use crate::zones::{Zone, ZonePosition};

/// A request to the action delegate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Draw from the top of the deck, reshuffling the discard if needed.
    DrawCard { player: PlayerId, count: usize },

    /// Gain the top supply copy of a card. Lands in the discard pile unless
    /// `to` says otherwise.
    GainCard {
        player: PlayerId,
        card_key: CardKey,
        to: Option<Zone>,
    },

    TrashCard { card: CardInstanceId },

    /// Move a card to another zone (top by default).
    MoveCard {
        card: CardInstanceId,
        to: Zone,
        position: Option<ZonePosition>,
    },

    /// Move a card to its owner's discard pile.
    DiscardCard { card: CardInstanceId },

    RevealCard { card: CardInstanceId },

    /// Shuffle the discard pile into the deck.
    ShuffleDeck { player: PlayerId },

    /// Put a card from hand into play and run it.
    PlayCard { player: PlayerId, card: CardInstanceId },

    SelectCard(SelectCardRequest),

    UserPrompt(PromptRequest),

    GainAction { player: PlayerId, count: u32 },
    GainBuy { player: PlayerId, count: u32 },
    GainTreasure { player: PlayerId, count: u32 },
}

impl GameAction {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            GameAction::DrawCard { .. } => "drawCard",
            GameAction::GainCard { .. } => "gainCard",
            GameAction::TrashCard { .. } => "trashCard",
            GameAction::MoveCard { .. } => "moveCard",
            GameAction::DiscardCard { .. } => "discardCard",
            GameAction::RevealCard { .. } => "revealCard",
            GameAction::ShuffleDeck { .. } => "shuffleDeck",
            GameAction::PlayCard { .. } => "playCard",
            GameAction::SelectCard(_) => "selectCard",
            GameAction::UserPrompt(_) => "userPrompt",
            GameAction::GainAction { .. } => "gainAction",
            GameAction::GainBuy { .. } => "gainBuy",
            GameAction::GainTreasure { .. } => "gainTreasure",
        }
    }

    /// Seats named by the action, including the owners of target zones.
    #[must_use]
    pub fn players(&self) -> Vec<PlayerId> {
        match self {
            GameAction::DrawCard { player, .. }
            | GameAction::ShuffleDeck { player }
            | GameAction::PlayCard { player, .. }
            | GameAction::GainAction { player, .. }
            | GameAction::GainBuy { player, .. }
            | GameAction::GainTreasure { player, .. } => vec![*player],
            GameAction::GainCard { player, to, .. } => {
                std::iter::once(*player).chain(to.and_then(Zone::owner)).collect()
            }
            GameAction::MoveCard { to, .. } => to.owner().into_iter().collect(),
            GameAction::SelectCard(request) => vec![request.player],
            GameAction::UserPrompt(request) => vec![request.player],
            GameAction::TrashCard { .. } | GameAction::DiscardCard { .. } | GameAction::RevealCard { .. } => {
                Vec::new()
            }
        }
    }
}

/// What an action produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActionResult {
    /// Completed with nothing to report.
    #[default]
    Done,

    /// Cards drawn, in draw order. May be fewer than requested.
    Drawn(Vec<CardInstanceId>),

    Gained(CardInstanceId),

    /// The card moved; `from` is where it was.
    Moved { from: Zone },

    /// Reactions that fired in response to the play.
    Played(ReactionReport),

    Selected(Vec<CardInstanceId>),

    Prompted(PromptResponse),

    /// Number of cards shuffled into the deck.
    Shuffled(usize),

    /// No legal target (empty pile, nothing to select). Not an error.
    Nothing,
}

impl ActionResult {
    /// Cards carried by `Drawn` or `Selected`; empty otherwise.
    #[must_use]
    pub fn cards(&self) -> &[CardInstanceId] {
        match self {
            ActionResult::Drawn(cards) | ActionResult::Selected(cards) => cards,
            _ => &[],
        }
    }

    #[must_use]
    pub fn gained(&self) -> Option<CardInstanceId> {
        match self {
            ActionResult::Gained(card) => Some(*card),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_nothing(&self) -> bool {
        matches!(self, ActionResult::Nothing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_accessors() {
        let drawn = ActionResult::Drawn(vec![CardInstanceId(1), CardInstanceId(2)]);
        assert_eq!(drawn.cards().len(), 2);
        assert_eq!(drawn.gained(), None);

        assert_eq!(ActionResult::Gained(CardInstanceId(3)).gained(), Some(CardInstanceId(3)));
        assert!(ActionResult::Nothing.is_nothing());
        assert!(ActionResult::Done.cards().is_empty());
    }

    #[test]
    fn test_action_serialization() {
        let action = GameAction::GainCard {
            player: PlayerId::new(1),
            card_key: CardKey::new("silver"),
            to: Some(Zone::Hand(PlayerId::new(1))),
        };
        let json = serde_json::to_string(&action).unwrap();
        let back: GameAction = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
        assert_eq!(back.name(), "gainCard");
    }

    #[test]
    fn test_players_include_target_zone_owner() {
        let gain = GameAction::GainCard {
            player: PlayerId::new(0),
            card_key: CardKey::new("silver"),
            to: Some(Zone::Hand(PlayerId::new(1))),
        };
        assert_eq!(gain.players(), vec![PlayerId::new(0), PlayerId::new(1)]);

        let to_trash = GameAction::MoveCard { card: CardInstanceId(1), to: Zone::Trash, position: None };
        assert!(to_trash.players().is_empty());
        assert!(GameAction::RevealCard { card: CardInstanceId(1) }.players().is_empty());
    }
}
