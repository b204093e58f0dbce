//! # deckbuilder-reactions
//!
//! Reaction engine for a Dominion-like deck-building game server.
//!
//! ## Design Principles
//!
//! 1. **Reactions are data plus a closure**: cards register `ReactionTemplate`s
//!    (event kind, owner, condition, async effect, `once` / `compulsory` /
//!    `allow_multiple_instances`) and keep only the id.
//!
//! 2. **Snapshot-then-iterate dispatch**: `Game::fire_event` iterates an
//!    O(1) snapshot of the listening templates (`im::Vector`), so effects can
//!    register and unregister freely while a dispatch is running.
//!
//! 3. **Depth-first cascades**: an effect that fires another event awaits
//!    that event's reactions before continuing. Nesting is bounded by
//!    `EngineConfig::max_reaction_depth`.
//!
//! 4. **Explicit context**: conditions see a `ConditionContext`, effects get
//!    `&mut Game` and a `TriggerContext`. There is no ambient state.
//!
//! ## Modules
//!
//! - `core`: players, RNG, configuration, match state
//! - `zones`: card locations
//! - `cards`: definitions, instances, library, price rules, scripts
//! - `reactions`: events, conditions, templates, scheduler, dispatch
//! - `actions`: game actions, the delegate, player decisions
//! - `game`: the `Game` aggregate and turn flow

pub mod actions;
pub mod cards;
pub mod core;
pub mod error;
pub mod game;
pub mod reactions;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{EngineConfig, GameRng, GameRngState, MatchState, PlayerId, PlayerMap, TurnPhase, TurnResources};

pub use crate::zones::{Zone, ZoneManager, ZonePosition};

pub use crate::cards::{
    CardDefinition, CardEffectArgs, CardEffectFn, CardInstance, CardInstanceId, CardKey, CardLibrary,
    CardPriceController, CardRegistry, CardScript, CardScripts, CardType, Cost, LifecycleEvent, PriceContext,
    PriceRule, PriceRuleId, RuleExpiry,
};

pub use crate::reactions::{
    ConditionContext, ConditionEvaluator, EventKind, GameEvent, ReactionCondition, ReactionEffectFn, ReactionId,
    ReactionOutcome, ReactionReport, ReactionScheduler, ReactionTemplate, TriggerContext,
};

pub use crate::actions::{
    ActionResult, DecisionProvider, FirstChoiceDecisions, GameAction, PromptChoice, PromptRequest, PromptResponse,
    ScriptedDecisions, SelectCardRequest,
};

pub use crate::error::{EngineError, Result};
pub use crate::game::Game;
