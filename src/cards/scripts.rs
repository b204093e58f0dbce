//! Card scripts: what a card does when played and at lifecycle points.
//!
//! Card content lives outside the engine. A card set registers a
//! `CardScript` per key; the delegate runs the play effect on `PlayCard` and
//! the lifecycle hooks whenever a card changes zone. Lifecycle hooks are where
//! cards register and unregister their reaction templates ("on enter hand,
//! listen for attacks; on leave hand, stop").

use std::sync::Arc;

use futures::future::BoxFuture;
use rustc_hash::FxHashMap;

use super::definition::CardKey;
use super::instance::CardInstanceId;
use crate::core::PlayerId;
use crate::error::Result;
use crate::game::Game;
use crate::reactions::ReactionReport;

/// Arguments handed to play effects and lifecycle hooks.
#[derive(Clone, Debug)]
pub struct CardEffectArgs {
    /// Player on whose behalf the effect runs.
    pub player_id: PlayerId,
    pub card_id: CardInstanceId,
    /// Reactions that fired in response to the play (empty for lifecycle
    /// hooks). Attacks consult it to skip immune players.
    pub reactions: ReactionReport,
}

/// Async card effect with access to the whole game.
pub type CardEffectFn =
    Arc<dyn for<'a> Fn(&'a mut Game, CardEffectArgs) -> BoxFuture<'a, Result<()>> + Send + Sync>;

/// Zone transitions a card can hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    EnterHand,
    LeaveHand,
    EnterPlay,
    LeavePlay,
    Trashed,
    Gained,
}

/// Everything a single card key does.
#[derive(Clone, Default)]
pub struct CardScript {
    on_play: Option<CardEffectFn>,
    lifecycle: FxHashMap<LifecycleEvent, CardEffectFn>,
}

impl CardScript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the play effect (builder pattern).
    #[must_use]
    pub fn on_play<F>(mut self, effect: F) -> Self
    where
        F: for<'a> Fn(&'a mut Game, CardEffectArgs) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
    {
        self.on_play = Some(Arc::new(effect));
        self
    }

    /// Set a lifecycle hook (builder pattern). A second hook for the same
    /// event replaces the first.
    #[must_use]
    pub fn on_lifecycle<F>(mut self, event: LifecycleEvent, hook: F) -> Self
    where
        F: for<'a> Fn(&'a mut Game, CardEffectArgs) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
    {
        self.lifecycle.insert(event, Arc::new(hook));
        self
    }

    #[must_use]
    pub fn play_effect(&self) -> Option<CardEffectFn> {
        self.on_play.clone()
    }

    #[must_use]
    pub fn hook(&self, event: LifecycleEvent) -> Option<CardEffectFn> {
        self.lifecycle.get(&event).cloned()
    }
}

impl std::fmt::Debug for CardScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardScript")
            .field("on_play", &self.on_play.is_some())
            .field("lifecycle", &self.lifecycle.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Script table for a card set.
#[derive(Clone, Debug, Default)]
pub struct CardScripts {
    scripts: FxHashMap<CardKey, CardScript>,
}

impl CardScripts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the script for a key.
    pub fn register(&mut self, key: impl Into<CardKey>, script: CardScript) {
        self.scripts.insert(key.into(), script);
    }

    #[must_use]
    pub fn with_script(mut self, key: impl Into<CardKey>, script: CardScript) -> Self {
        self.register(key, script);
        self
    }

    #[must_use]
    pub fn get(&self, key: &CardKey) -> Option<&CardScript> {
        self.scripts.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}
