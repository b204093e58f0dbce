//! Reaction scheduler.
//!
//! Owns the active template set and the dispatch depth counter. The dispatch
//! loop itself lives on `Game` (see `dispatch.rs`) because effects need the
//! whole game.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::CardInstanceId;
use crate::core::PlayerId;
use crate::error::{EngineError, Result};

use super::event::EventKind;
use super::registry::ReactionRegistry;
use super::template::{ReactionId, ReactionOutcome, ReactionTemplate};

/// One reaction that fired during a dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredReaction {
    pub id: ReactionId,
    pub owner: PlayerId,
    pub outcome: ReactionOutcome,
}

/// What fired for one event, in firing order.
///
/// Attacks consult `immune` to skip players whose reaction granted immunity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionReport {
    fired: Vec<FiredReaction>,
}

impl ReactionReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: ReactionId, owner: PlayerId, outcome: ReactionOutcome) {
        self.fired.push(FiredReaction { id, owner, outcome });
    }

    /// Did any of `player`'s reactions grant immunity?
    #[must_use]
    pub fn immune(&self, player: PlayerId) -> bool {
        self.fired
            .iter()
            .any(|f| f.owner == player && f.outcome == ReactionOutcome::Immunity)
    }

    /// Outcome of a specific reaction, if it fired.
    #[must_use]
    pub fn outcome_of(&self, id: &str) -> Option<ReactionOutcome> {
        self.fired.iter().find(|f| f.id.as_str() == id).map(|f| f.outcome)
    }

    #[must_use]
    pub fn fired(&self) -> &[FiredReaction] {
        &self.fired
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fired.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

/// The reaction scheduler.
#[derive(Clone, Debug)]
pub struct ReactionScheduler {
    registry: ReactionRegistry,

    /// Dispatches currently on the stack.
    depth: usize,

    max_depth: usize,
}

impl ReactionScheduler {
    pub fn new(max_depth: usize) -> Self {
        Self {
            registry: ReactionRegistry::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Activate a template.
    ///
    /// Fails with `DuplicateReaction` if a template with the same id is
    /// active; callers unregister first. A template registered while a
    /// dispatch is running does not fire for that dispatch's event.
    pub fn register_reaction_template(&mut self, template: ReactionTemplate) -> Result<()> {
        let template = self.registry.insert(template)?;
        tracing::debug!(
            reaction = %template.id,
            listening_for = %template.listening_for,
            owner = %template.player_id,
            once = template.once,
            "reaction registered"
        );
        Ok(())
    }

    /// Deactivate a template. Unknown ids are a no-op.
    pub fn unregister_trigger<Q>(&mut self, id: &Q) -> Option<Arc<ReactionTemplate>>
    where
        ReactionId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.registry.remove(id)?;
        tracing::debug!(reaction = %removed.id, "reaction unregistered");
        Some(removed)
    }

    /// Unregister every template registered by a card. Returns the ids removed.
    pub fn unregister_for_source(&mut self, card: CardInstanceId) -> Vec<ReactionId> {
        let ids = self.registry.ids_for_source(card);
        for id in &ids {
            self.unregister_trigger(id);
        }
        ids
    }

    #[must_use]
    pub fn is_registered<Q>(&self, id: &Q) -> bool
    where
        ReactionId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.registry.contains(id)
    }

    #[must_use]
    pub fn get<Q>(&self, id: &Q) -> Option<&Arc<ReactionTemplate>>
    where
        ReactionId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.registry.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    #[must_use]
    pub fn listening_count(&self, kind: EventKind) -> usize {
        self.registry.listening_count(kind)
    }

    /// Current dispatch nesting (0 when idle).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // === Dispatch support ===

    pub(crate) fn snapshot(&self, kind: EventKind) -> Vector<Arc<ReactionTemplate>> {
        self.registry.snapshot(kind)
    }

    pub(crate) fn is_live(&self, template: &Arc<ReactionTemplate>) -> bool {
        self.registry.is_live(template)
    }

    /// Retire a once template that is about to fire.
    pub(crate) fn retire(&mut self, template: &Arc<ReactionTemplate>) {
        if self.registry.is_live(template) {
            self.registry.remove(&template.id);
            tracing::debug!(reaction = %template.id, "once reaction retired");
        }
    }

    /// Push a dispatch. Fails once nesting would exceed `max_depth`.
    pub(crate) fn enter_dispatch(&mut self) -> Result<usize> {
        if self.depth >= self.max_depth {
            return Err(EngineError::CascadeTooDeep(self.max_depth));
        }
        self.depth += 1;
        Ok(self.depth)
    }

    pub(crate) fn exit_dispatch(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl Default for ReactionScheduler {
    fn default() -> Self {
        Self::new(crate::core::EngineConfig::default().max_reaction_depth)
    }
}
