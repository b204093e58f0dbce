//! Reaction conditions.
//!
//! A condition decides whether a template's effect runs for one event
//! occurrence. Common checks are declarative variants; anything else goes in
//! a `Predicate` closure that gets the same `ConditionContext`.

use std::sync::Arc;

use crate::cards::{
    CardDefinition, CardInstance, CardInstanceId, CardKey, CardPriceController, CardType, Cost, PriceContext,
};
use crate::core::{MatchState, PlayerId, TurnPhase};

use super::event::GameEvent;

/// Custom condition closure.
pub type ConditionFn = Arc<dyn Fn(&ConditionContext<'_>) -> bool + Send + Sync>;

/// A condition that must hold for a reaction to fire.
#[derive(Clone)]
pub enum ReactionCondition {
    /// Always fires.
    Always,

    /// Never fires (parked template).
    Never,

    // === Who caused the event ===

    /// The event was caused by the template's owner.
    TriggeredByOwner,

    /// The event was caused by someone other than the template's owner.
    TriggeredByOpponent,

    // === The event's card ===

    /// The event's card is the card that registered the template.
    IsSourceCard,

    /// The event's card is a copy of this key.
    CardKeyIs(CardKey),

    /// The event's card has this type.
    CardHasType(CardType),

    /// The event's card belongs to the template's owner.
    CardOwnedByOwner,

    /// Effective treasure cost of the event's card is at most N.
    CostAtMost(u32),

    /// Effective treasure cost of the event's card is at least N.
    CostAtLeast(u32),

    // === Turn ===

    /// For `EndTurnPhase`: the phase that just ended.
    PhaseEnded(TurnPhase),

    /// It is the owner's turn.
    OwnersTurn,

    // === Combinators ===

    All(Vec<ReactionCondition>),
    Any(Vec<ReactionCondition>),
    Not(Box<ReactionCondition>),

    /// Arbitrary check.
    Predicate(ConditionFn),
}

impl ReactionCondition {
    /// Wrap a closure.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&ConditionContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    pub fn all(conditions: impl IntoIterator<Item = ReactionCondition>) -> Self {
        Self::All(conditions.into_iter().collect())
    }

    pub fn any(conditions: impl IntoIterator<Item = ReactionCondition>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }

    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Add another condition with AND.
    #[must_use]
    pub fn and(self, other: ReactionCondition) -> Self {
        match self {
            Self::All(mut conditions) => {
                conditions.push(other);
                Self::All(conditions)
            }
            _ => Self::All(vec![self, other]),
        }
    }

    /// Add another condition with OR.
    #[must_use]
    pub fn or(self, other: ReactionCondition) -> Self {
        match self {
            Self::Any(mut conditions) => {
                conditions.push(other);
                Self::Any(conditions)
            }
            _ => Self::Any(vec![self, other]),
        }
    }
}

impl std::fmt::Debug for ReactionCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Always => write!(f, "Always"),
            Self::Never => write!(f, "Never"),
            Self::TriggeredByOwner => write!(f, "TriggeredByOwner"),
            Self::TriggeredByOpponent => write!(f, "TriggeredByOpponent"),
            Self::IsSourceCard => write!(f, "IsSourceCard"),
            Self::CardKeyIs(key) => f.debug_tuple("CardKeyIs").field(key).finish(),
            Self::CardHasType(t) => f.debug_tuple("CardHasType").field(t).finish(),
            Self::CardOwnedByOwner => write!(f, "CardOwnedByOwner"),
            Self::CostAtMost(n) => f.debug_tuple("CostAtMost").field(n).finish(),
            Self::CostAtLeast(n) => f.debug_tuple("CostAtLeast").field(n).finish(),
            Self::PhaseEnded(p) => f.debug_tuple("PhaseEnded").field(p).finish(),
            Self::OwnersTurn => write!(f, "OwnersTurn"),
            Self::All(c) => f.debug_tuple("All").field(c).finish(),
            Self::Any(c) => f.debug_tuple("Any").field(c).finish(),
            Self::Not(c) => f.debug_tuple("Not").field(c).finish(),
            Self::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

/// What a condition can see: the event, the template's owner and source,
/// and read access to cards and prices.
pub struct ConditionContext<'a> {
    pub event: &'a GameEvent,
    pub owner: PlayerId,
    pub source: Option<CardInstanceId>,
    pub state: &'a MatchState,
    pub prices: &'a CardPriceController,
}

impl<'a> ConditionContext<'a> {
    pub fn new(
        event: &'a GameEvent,
        owner: PlayerId,
        source: Option<CardInstanceId>,
        state: &'a MatchState,
        prices: &'a CardPriceController,
    ) -> Self {
        Self {
            event,
            owner,
            source,
            state,
            prices,
        }
    }

    #[must_use]
    pub fn card(&self, id: CardInstanceId) -> Option<&'a CardInstance> {
        self.state.cards.get_card(id).ok()
    }

    #[must_use]
    pub fn definition(&self, id: CardInstanceId) -> Option<&'a CardDefinition> {
        self.state.cards.definition_of(id).ok()
    }

    /// The event's card, if it has one and it exists.
    #[must_use]
    pub fn event_card(&self) -> Option<&'a CardInstance> {
        self.event.card.and_then(|id| self.card(id))
    }

    /// Effective cost of a card as seen by the template's owner.
    #[must_use]
    pub fn cost_of(&self, id: CardInstanceId) -> Option<Cost> {
        let card = self.card(id)?;
        let definition = self.definition(id)?;
        let ctx = PriceContext { player: self.owner };
        Some(self.prices.apply_rules(card, definition, &ctx).cost)
    }

    fn event_card_cost(&self) -> Option<Cost> {
        self.event.card.and_then(|id| self.cost_of(id))
    }
}

/// Evaluator for reaction conditions.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Check a condition. Card-based checks are `false` when the event has no
    /// card or the card is unknown.
    pub fn evaluate(condition: &ReactionCondition, ctx: &ConditionContext) -> bool {
        match condition {
            ReactionCondition::Always => true,

            ReactionCondition::Never => false,

            ReactionCondition::TriggeredByOwner => ctx.event.player == ctx.owner,

            ReactionCondition::TriggeredByOpponent => ctx.event.player != ctx.owner,

            ReactionCondition::IsSourceCard => ctx.source.is_some() && ctx.event.card == ctx.source,

            ReactionCondition::CardKeyIs(key) => ctx.event_card().is_some_and(|c| &c.card_key == key),

            ReactionCondition::CardHasType(card_type) => ctx
                .event
                .card
                .is_some_and(|id| ctx.state.cards.has_type(id, *card_type)),

            ReactionCondition::CardOwnedByOwner => ctx.event_card().is_some_and(|c| c.is_owned_by(ctx.owner)),

            ReactionCondition::CostAtMost(max) => ctx.event_card_cost().is_some_and(|c| c.treasure <= *max),

            ReactionCondition::CostAtLeast(min) => ctx.event_card_cost().is_some_and(|c| c.treasure >= *min),

            ReactionCondition::PhaseEnded(phase) => ctx.event.phase == Some(*phase),

            ReactionCondition::OwnersTurn => ctx.state.active_player == ctx.owner,

            ReactionCondition::All(conditions) => conditions.iter().all(|c| Self::evaluate(c, ctx)),

            ReactionCondition::Any(conditions) => conditions.iter().any(|c| Self::evaluate(c, ctx)),

            ReactionCondition::Not(inner) => !Self::evaluate(inner, ctx),

            ReactionCondition::Predicate(f) => f(ctx),
        }
    }
}
