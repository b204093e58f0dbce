//! Turn flow: Action, Buy, Cleanup.
//!
//! Each phase end fires `EndTurnPhase`; cleanup discards hand and play,
//! draws a new hand, drops end-of-turn price rules, fires `EndTurn` and
//! starts the next seat's turn.

use crate::actions::{ActionResult, GameAction};
use crate::cards::CardKey;
use crate::core::{PlayerId, TurnPhase};
use crate::error::Result;
use crate::reactions::{EventKind, GameEvent, ReactionReport};
use crate::zones::Zone;

use super::Game;

impl Game {
    /// Put a starting deck into a seat's deck, shuffle it and draw a hand.
    pub async fn deal_starting_deck(&mut self, player: PlayerId, deck: &[(CardKey, usize)]) -> Result<ActionResult> {
        for (key, count) in deck {
            for _ in 0..*count {
                self.state.spawn_card(key, Zone::Deck(player))?;
            }
        }
        self.state.shuffle_deck(player)?;
        let hand_size = self.config.hand_size;
        self.run_game_action(GameAction::DrawCard { player, count: hand_size })
            .await
    }

    /// Begin `player`'s turn in the Action phase.
    pub async fn start_turn(&mut self, player: PlayerId) -> Result<ReactionReport> {
        self.state.active_player = player;
        self.state.phase = TurnPhase::Action;
        self.state.reset_resources(player, &self.config);
        tracing::debug!(%player, turn = self.state.turn_number, "turn started");
        self.fire_event(GameEvent::new(EventKind::StartTurn, player)).await
    }

    /// End the current phase. Returns the phase now in progress (`Action`
    /// of the next seat after cleanup).
    pub async fn end_phase(&mut self) -> Result<TurnPhase> {
        let player = self.state.active_player;
        let phase = self.state.phase;
        self.fire_event(GameEvent::end_turn_phase(player, phase)).await?;

        if let Some(next) = phase.next() {
            self.state.phase = next;
            return Ok(next);
        }

        self.cleanup(player).await?;
        self.state.turn_number += 1;
        let next_player = player.next(self.state.player_count());
        self.start_turn(next_player).await?;
        Ok(TurnPhase::Action)
    }

    async fn cleanup(&mut self, player: PlayerId) -> Result<()> {
        let mut leaving = self.state.in_play(player).to_vec();
        leaving.extend_from_slice(self.state.hand(player));
        for card in leaving {
            self.run_game_action(GameAction::DiscardCard { card }).await?;
        }

        let hand_size = self.config.hand_size;
        self.run_game_action(GameAction::DrawCard { player, count: hand_size })
            .await?;

        self.prices.expire_end_of_turn();
        self.fire_event(GameEvent::new(EventKind::EndTurn, player)).await?;
        Ok(())
    }
}
