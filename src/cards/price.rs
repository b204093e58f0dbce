//! Card price controller.
//!
//! Effects like "cards cost 1 less this turn" register price rules; anything
//! that needs an effective cost (buying, "gain a card costing up to 4",
//! reaction conditions gated on cost) asks `apply_rules`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, Cost};
use super::instance::CardInstance;
use crate::core::PlayerId;

/// Identifier handed back by `register_rule`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRuleId(pub u32);

/// Who is asking for the price.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceContext {
    pub player: PlayerId,
}

/// When a rule stops applying on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleExpiry {
    /// Removed during cleanup.
    EndOfTurn,
    /// Stays until removed by id.
    Permanent,
}

type AppliesFn = Arc<dyn Fn(&CardInstance, &CardDefinition, &PriceContext) -> bool + Send + Sync>;

/// A cost modifier.
#[derive(Clone)]
pub struct PriceRule {
    pub label: String,
    pub treasure_delta: i32,
    pub expiry: RuleExpiry,
    applies: AppliesFn,
}

impl PriceRule {
    /// A rule affecting every card.
    pub fn new(label: impl Into<String>, treasure_delta: i32, expiry: RuleExpiry) -> Self {
        Self {
            label: label.into(),
            treasure_delta,
            expiry,
            applies: Arc::new(|_, _, _| true),
        }
    }

    /// Restrict the rule to cards matching a predicate (builder pattern).
    #[must_use]
    pub fn when<F>(mut self, applies: F) -> Self
    where
        F: Fn(&CardInstance, &CardDefinition, &PriceContext) -> bool + Send + Sync + 'static,
    {
        self.applies = Arc::new(applies);
        self
    }
}

impl std::fmt::Debug for PriceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceRule")
            .field("label", &self.label)
            .field("treasure_delta", &self.treasure_delta)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

/// Printed and effective cost of one card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceResult {
    pub base: Cost,
    pub cost: Cost,
}

#[derive(Clone, Debug, Default)]
pub struct CardPriceController {
    rules: Vec<(PriceRuleId, PriceRule)>,
    next_id: u32,
}

impl CardPriceController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_rule(&mut self, rule: PriceRule) -> PriceRuleId {
        let id = PriceRuleId(self.next_id);
        self.next_id += 1;
        tracing::debug!(rule = %rule.label, delta = rule.treasure_delta, "price rule registered");
        self.rules.push((id, rule));
        id
    }

    /// Remove a rule. Unknown ids are ignored.
    pub fn remove_rule(&mut self, id: PriceRuleId) -> Option<PriceRule> {
        let pos = self.rules.iter().position(|(rid, _)| *rid == id)?;
        Some(self.rules.remove(pos).1)
    }

    /// Drop every `EndOfTurn` rule.
    pub fn expire_end_of_turn(&mut self) {
        self.rules.retain(|(_, r)| r.expiry != RuleExpiry::EndOfTurn);
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Effective cost of `card` for `ctx.player`.
    #[must_use]
    pub fn apply_rules(&self, card: &CardInstance, definition: &CardDefinition, ctx: &PriceContext) -> PriceResult {
        let delta: i32 = self
            .rules
            .iter()
            .filter(|(_, rule)| (rule.applies)(card, definition, ctx))
            .map(|(_, rule)| rule.treasure_delta)
            .sum();

        PriceResult {
            base: definition.cost,
            cost: definition.cost.adjusted(delta),
        }
    }
}
