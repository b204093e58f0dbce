//! The game-action delegate.
//!
//! `Game::run_game_action` is the single entry point card effects and
//! reactions use to change the match. Each action mutates `MatchState`, runs
//! the lifecycle hooks of cards that changed zone, then fires the matching
//! event so reactions see the state after the change.

use futures::future::BoxFuture;

use super::action::{ActionResult, GameAction};
use super::decision::{PromptRequest, SelectCardRequest};
use crate::cards::{CardEffectArgs, CardInstanceId, CardKey, LifecycleEvent};
use crate::core::PlayerId;
use crate::error::{EngineError, Result};
use crate::game::Game;
use crate::reactions::{EventKind, GameEvent, ReactionReport, TriggerContext};
use crate::zones::{Zone, ZonePosition};

impl Game {
    /// Execute one action.
    pub fn run_game_action(&mut self, action: GameAction) -> BoxFuture<'_, Result<ActionResult>> {
        Box::pin(async move {
            tracing::trace!(action = action.name(), "game action");
            let player_count = self.state.player_count();
            if let Some(player) = action.players().into_iter().find(|p| p.index() >= player_count) {
                return Err(EngineError::UnknownPlayer(player));
            }
            match action {
                GameAction::DrawCard { player, count } => self.draw_cards(player, count).await,
                GameAction::GainCard { player, card_key, to } => self.gain_card(player, card_key, to).await,
                GameAction::TrashCard { card } => self.trash_card(card).await,
                GameAction::MoveCard { card, to, position } => self.move_card(card, to, position).await,
                GameAction::DiscardCard { card } => self.discard_card(card).await,
                GameAction::RevealCard { card } => self.reveal_card(card).await,
                GameAction::ShuffleDeck { player } => self.shuffle_deck(player).await,
                GameAction::PlayCard { player, card } => self.play_card(player, card).await,
                GameAction::SelectCard(request) => self.select_cards(request).await,
                GameAction::UserPrompt(request) => self.user_prompt(request).await,
                GameAction::GainAction { player, count } => {
                    self.state.resources[player].actions += count;
                    Ok(ActionResult::Done)
                }
                GameAction::GainBuy { player, count } => {
                    self.state.resources[player].buys += count;
                    Ok(ActionResult::Done)
                }
                GameAction::GainTreasure { player, count } => {
                    self.state.resources[player].treasure += count;
                    Ok(ActionResult::Done)
                }
            }
        })
    }

    /// Ask the owner whether to use an optional reaction. Compulsory
    /// reactions are confirmed without asking.
    pub async fn confirm_reaction(&mut self, ctx: &TriggerContext, message: impl Into<String>) -> Result<bool> {
        if ctx.compulsory {
            return Ok(true);
        }
        let request = PromptRequest::yes_no(ctx.owner, message);
        let result = self.run_game_action(GameAction::UserPrompt(request)).await?;
        Ok(matches!(result, ActionResult::Prompted(response) if response.is("yes")))
    }

    async fn draw_cards(&mut self, player: PlayerId, count: usize) -> Result<ActionResult> {
        let mut drawn = Vec::new();
        for _ in 0..count {
            if self.state.deck(player).is_empty() {
                if self.state.reshuffle_discard(player)? == 0 {
                    tracing::debug!(%player, requested = count, drawn = drawn.len(), "no cards left to draw");
                    break;
                }
                self.fire_event(GameEvent::new(EventKind::DeckShuffled, player)).await?;
            }
            let Some(card) = self.state.zones.top_card(Zone::Deck(player)) else {
                break;
            };
            let from = self.relocate_with_hooks(card, Zone::Hand(player), None).await?;
            drawn.push(card);
            self.fire_event(
                GameEvent::new(EventKind::CardDrawn, player)
                    .with_card(card)
                    .with_move(from, Zone::Hand(player)),
            )
            .await?;
        }
        Ok(ActionResult::Drawn(drawn))
    }

    async fn gain_card(&mut self, player: PlayerId, card_key: CardKey, to: Option<Zone>) -> Result<ActionResult> {
        self.state.cards.registry().require(&card_key)?;
        let Some(card) = self.state.find_in_supply(&card_key) else {
            tracing::warn!(%player, card = %card_key, "supply pile empty, nothing gained");
            return Ok(ActionResult::Nothing);
        };

        let to = to.unwrap_or(Zone::Discard(player));
        self.state.set_owner(card, player)?;
        self.relocate_with_hooks(card, to, None).await?;
        self.run_lifecycle(card, LifecycleEvent::Gained, player).await?;
        self.fire_event(GameEvent::card_gained(player, card, to)).await?;
        Ok(ActionResult::Gained(card))
    }

    async fn trash_card(&mut self, card: CardInstanceId) -> Result<ActionResult> {
        let player = self.acting_player(card)?;
        let from = self.relocate_with_hooks(card, Zone::Trash, None).await?;
        self.run_lifecycle(card, LifecycleEvent::Trashed, player).await?;
        self.fire_event(GameEvent::card_trashed(player, card, from)).await?;
        Ok(ActionResult::Moved { from })
    }

    async fn move_card(&mut self, card: CardInstanceId, to: Zone, position: Option<ZonePosition>) -> Result<ActionResult> {
        let player = self.acting_player(card)?;
        let from = self.relocate_with_hooks(card, to, position).await?;
        self.fire_event(
            GameEvent::new(EventKind::CardMoved, player)
                .with_card(card)
                .with_move(from, to),
        )
        .await?;
        Ok(ActionResult::Moved { from })
    }

    async fn discard_card(&mut self, card: CardInstanceId) -> Result<ActionResult> {
        let player = self.acting_player(card)?;
        let to = Zone::Discard(player);
        let from = self.relocate_with_hooks(card, to, None).await?;
        self.fire_event(
            GameEvent::new(EventKind::CardDiscarded, player)
                .with_card(card)
                .with_move(from, to),
        )
        .await?;
        Ok(ActionResult::Moved { from })
    }

    async fn reveal_card(&mut self, card: CardInstanceId) -> Result<ActionResult> {
        let player = self.acting_player(card)?;
        self.fire_event(GameEvent::new(EventKind::CardRevealed, player).with_card(card))
            .await?;
        Ok(ActionResult::Done)
    }

    async fn shuffle_deck(&mut self, player: PlayerId) -> Result<ActionResult> {
        let size = self.state.shuffle_deck(player)?;
        self.fire_event(GameEvent::new(EventKind::DeckShuffled, player)).await?;
        Ok(ActionResult::Shuffled(size))
    }

    async fn play_card(&mut self, player: PlayerId, card: CardInstanceId) -> Result<ActionResult> {
        if self.state.zone_of(card)? != Zone::Play(player) {
            self.relocate_with_hooks(card, Zone::Play(player), None).await?;
        }

        let reactions = self.fire_event(GameEvent::card_played(player, card)).await?;

        let effect = {
            let key = &self.state.cards.get_card(card)?.card_key;
            self.scripts.get(key).and_then(|s| s.play_effect())
        };
        if let Some(effect) = effect {
            let args = CardEffectArgs {
                player_id: player,
                card_id: card,
                reactions: reactions.clone(),
            };
            effect(&mut *self, args).await?;
        }
        Ok(ActionResult::Played(reactions))
    }

    async fn select_cards(&mut self, request: SelectCardRequest) -> Result<ActionResult> {
        if request.candidates.is_empty() {
            tracing::warn!(player = %request.player, message = %request.message, "no cards to select from");
            return Ok(ActionResult::Selected(Vec::new()));
        }
        let selected = self.decisions.select_cards(&request, &self.state).await?;
        request.validate(&selected)?;
        Ok(ActionResult::Selected(selected))
    }

    async fn user_prompt(&mut self, request: PromptRequest) -> Result<ActionResult> {
        if request.choices.is_empty() {
            tracing::warn!(player = %request.player, message = %request.message, "prompt has no choices");
            return Ok(ActionResult::Nothing);
        }
        let response = self.decisions.prompt(&request, &self.state).await?;
        if !request.has_choice(&response.choice) {
            return Err(EngineError::InvalidSelection(format!(
                "'{}' is not a choice of '{}'",
                response.choice, request.message
            )));
        }
        Ok(ActionResult::Prompted(response))
    }

    // === Helpers ===

    /// The card's owner, or the active player for neutral cards.
    fn acting_player(&self, card: CardInstanceId) -> Result<PlayerId> {
        Ok(self
            .state
            .cards
            .get_card(card)?
            .owner
            .unwrap_or(self.state.active_player))
    }

    /// Move a card and run leave/enter hooks for hand and play. Returns the
    /// zone it left. Repositioning within a zone runs no hooks.
    async fn relocate_with_hooks(
        &mut self,
        card: CardInstanceId,
        to: Zone,
        position: Option<ZonePosition>,
    ) -> Result<Zone> {
        let from = self.state.relocate(card, to, position)?;
        if from == to {
            return Ok(from);
        }

        let player = self.acting_player(card)?;
        if from.is_hand() {
            self.run_lifecycle(card, LifecycleEvent::LeaveHand, player).await?;
        }
        if from.is_play() {
            self.run_lifecycle(card, LifecycleEvent::LeavePlay, player).await?;
        }
        if to.is_hand() {
            self.run_lifecycle(card, LifecycleEvent::EnterHand, player).await?;
        }
        if to.is_play() {
            self.run_lifecycle(card, LifecycleEvent::EnterPlay, player).await?;
        }
        Ok(from)
    }

    async fn run_lifecycle(&mut self, card: CardInstanceId, event: LifecycleEvent, player: PlayerId) -> Result<()> {
        let hook = {
            let key = &self.state.cards.get_card(card)?.card_key;
            self.scripts.get(key).and_then(|s| s.hook(event))
        };
        let Some(hook) = hook else {
            return Ok(());
        };

        tracing::trace!(%card, ?event, "lifecycle hook");
        let args = CardEffectArgs {
            player_id: player,
            card_id: card,
            reactions: ReactionReport::new(),
        };
        hook(&mut *self, args).await
    }
}
