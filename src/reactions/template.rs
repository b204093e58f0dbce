//! Reaction templates.
//!
//! A template is a registered, conditional hook: "when `listening_for`
//! happens and `condition` holds, run `effect` on behalf of `player_id`".
//! Cards build them in their lifecycle hooks and keep only the id.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::cards::{CardInstanceId, CardKey};
use crate::core::PlayerId;
use crate::error::Result;
use crate::game::Game;

use super::condition::ReactionCondition;
use super::event::{EventKind, GameEvent};

/// Caller-chosen template id, unique among active templates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReactionId(String);

impl ReactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The conventional `"<cardkey>:<cardInstanceId>:<eventName>"` id.
    pub fn for_card(card_key: &CardKey, card_id: CardInstanceId, kind: EventKind) -> Self {
        Self(format!("{}:{}:{}", card_key, card_id.raw(), kind.name()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReactionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ReactionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::borrow::Borrow<str> for ReactionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a fired reaction resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionOutcome {
    /// The effect ran.
    #[default]
    Resolved,
    /// The owner declined an optional reaction.
    Declined,
    /// The owner is unaffected by the triggering attack.
    Immunity,
}

/// The card a template belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReactionSource {
    pub card: CardInstanceId,
    pub key: CardKey,
}

/// Passed to a firing effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerContext {
    pub reaction_id: ReactionId,
    /// The event occurrence that matched.
    pub event: GameEvent,
    /// The template's owner.
    pub owner: PlayerId,
    pub source: Option<ReactionSource>,
    /// Whether the owner may decline. Dispatch ignores it.
    pub compulsory: bool,
}

/// Async triggered effect with access to the whole game.
pub type ReactionEffectFn =
    Arc<dyn for<'a> Fn(&'a mut Game, TriggerContext) -> BoxFuture<'a, Result<ReactionOutcome>> + Send + Sync>;

/// A reaction template.
#[derive(Clone)]
pub struct ReactionTemplate {
    pub id: ReactionId,

    /// The event kind this template reacts to.
    pub listening_for: EventKind,

    /// Owner context for the condition and the effect.
    pub player_id: PlayerId,

    pub condition: ReactionCondition,

    /// Retire after the first firing.
    pub once: bool,

    /// Cannot be declined by the owner.
    pub compulsory: bool,

    /// When false, at most one template per (source key, owner, event kind)
    /// fires for a single event.
    pub allow_multiple_instances: bool,

    pub source: Option<ReactionSource>,

    effect: ReactionEffectFn,
}

impl ReactionTemplate {
    /// Create a repeatable, optional, single-instance template that always
    /// matches.
    pub fn new<F>(id: impl Into<ReactionId>, listening_for: EventKind, player_id: PlayerId, effect: F) -> Self
    where
        F: for<'a> Fn(&'a mut Game, TriggerContext) -> BoxFuture<'a, Result<ReactionOutcome>> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            listening_for,
            player_id,
            condition: ReactionCondition::Always,
            once: false,
            compulsory: false,
            allow_multiple_instances: false,
            source: None,
            effect: Arc::new(effect),
        }
    }

    /// Set the condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: ReactionCondition) -> Self {
        self.condition = condition;
        self
    }

    #[must_use]
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    #[must_use]
    pub fn compulsory(mut self) -> Self {
        self.compulsory = true;
        self
    }

    #[must_use]
    pub fn allow_multiple_instances(mut self) -> Self {
        self.allow_multiple_instances = true;
        self
    }

    /// Record the card that registered this template (builder pattern).
    #[must_use]
    pub fn with_source(mut self, card: CardInstanceId, key: impl Into<CardKey>) -> Self {
        self.source = Some(ReactionSource { card, key: key.into() });
        self
    }

    #[must_use]
    pub fn source_card(&self) -> Option<CardInstanceId> {
        self.source.as_ref().map(|s| s.card)
    }

    /// Scope used to collapse single-instance templates within one event.
    /// Templates without a source card never collapse.
    #[must_use]
    pub fn collapse_scope(&self) -> Option<(CardKey, PlayerId)> {
        if self.allow_multiple_instances {
            return None;
        }
        self.source.as_ref().map(|s| (s.key.clone(), self.player_id))
    }

    #[must_use]
    pub fn effect(&self) -> ReactionEffectFn {
        Arc::clone(&self.effect)
    }

    /// Build the context handed to the effect for `event`.
    pub fn trigger_context(&self, event: &GameEvent) -> TriggerContext {
        TriggerContext {
            reaction_id: self.id.clone(),
            event: event.clone(),
            owner: self.player_id,
            source: self.source.clone(),
            compulsory: self.compulsory,
        }
    }
}

impl std::fmt::Debug for ReactionTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactionTemplate")
            .field("id", &self.id)
            .field("listening_for", &self.listening_for)
            .field("player_id", &self.player_id)
            .field("condition", &self.condition)
            .field("once", &self.once)
            .field("compulsory", &self.compulsory)
            .field("allow_multiple_instances", &self.allow_multiple_instances)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
