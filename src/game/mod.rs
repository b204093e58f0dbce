//! The game: match state plus everything that acts on it.
//!
//! `Game` owns the match state, the reaction scheduler, the price controller,
//! the card scripts and the decision provider. Card effects, lifecycle hooks
//! and reaction effects all receive `&mut Game`, so a cascade of reactions is
//! plain nested calls with no shared locks.

mod turn;

use std::sync::Arc;

use crate::actions::{DecisionProvider, FirstChoiceDecisions};
use crate::cards::{CardInstanceId, CardPriceController, CardRegistry, CardScripts, Cost, PriceContext};
use crate::core::{EngineConfig, MatchState, PlayerId};
use crate::error::Result;
use crate::reactions::{ReactionId, ReactionScheduler, ReactionTemplate};

pub struct Game {
    pub(crate) config: EngineConfig,
    pub(crate) state: MatchState,
    pub(crate) reactions: ReactionScheduler,
    pub(crate) prices: CardPriceController,
    pub(crate) scripts: Arc<CardScripts>,
    pub(crate) decisions: Box<dyn DecisionProvider>,
}

impl Game {
    /// Create a game with no card scripts, answering decisions with
    /// `FirstChoiceDecisions`.
    pub fn new(config: EngineConfig, registry: Arc<CardRegistry>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: MatchState::new(&config, registry),
            reactions: ReactionScheduler::new(config.max_reaction_depth),
            prices: CardPriceController::new(),
            scripts: Arc::new(CardScripts::new()),
            decisions: Box::new(FirstChoiceDecisions),
            config,
        })
    }

    /// Set the card scripts (builder pattern).
    #[must_use]
    pub fn with_scripts(mut self, scripts: impl Into<Arc<CardScripts>>) -> Self {
        self.scripts = scripts.into();
        self
    }

    /// Set the decision provider (builder pattern).
    #[must_use]
    pub fn with_decisions(mut self, decisions: impl DecisionProvider + 'static) -> Self {
        self.decisions = Box::new(decisions);
        self
    }

    pub fn set_decisions(&mut self, decisions: impl DecisionProvider + 'static) {
        self.decisions = Box::new(decisions);
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Direct state access for setup. Changes made here fire no events.
    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    #[must_use]
    pub fn reactions(&self) -> &ReactionScheduler {
        &self.reactions
    }

    pub fn reactions_mut(&mut self) -> &mut ReactionScheduler {
        &mut self.reactions
    }

    #[must_use]
    pub fn prices(&self) -> &CardPriceController {
        &self.prices
    }

    pub fn prices_mut(&mut self) -> &mut CardPriceController {
        &mut self.prices
    }

    #[must_use]
    pub fn scripts(&self) -> &CardScripts {
        &self.scripts
    }

    // === Shorthands used by card scripts ===

    pub fn register_reaction_template(&mut self, template: ReactionTemplate) -> Result<()> {
        self.reactions.register_reaction_template(template)
    }

    /// Unregister by id; unknown ids are ignored.
    pub fn unregister_trigger(&mut self, id: &ReactionId) {
        self.reactions.unregister_trigger(id);
    }

    /// Effective cost of a card for `player` after price rules.
    pub fn effective_cost(&self, card: CardInstanceId, player: PlayerId) -> Result<Cost> {
        let instance = self.state.cards.get_card(card)?;
        let definition = self.state.cards.definition_of(card)?;
        Ok(self.prices.apply_rules(instance, definition, &PriceContext { player }).cost)
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("config", &self.config)
            .field("turn_number", &self.state.turn_number)
            .field("active_player", &self.state.active_player)
            .field("phase", &self.state.phase)
            .field("reactions", &self.reactions.len())
            .field("price_rules", &self.prices.rule_count())
            .finish_non_exhaustive()
    }
}
