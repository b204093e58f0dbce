//! Reaction system: events, conditions, templates and the scheduler.
//!
//! Cards register `ReactionTemplate`s with the `ReactionScheduler` when they
//! enter a zone that grants reactive behavior and unregister them by id when
//! they leave. Every event the delegate emits goes through
//! `Game::fire_event`, which runs the matching templates depth-first.

mod dispatch;

pub mod condition;
pub mod event;
pub mod registry;
pub mod scheduler;
pub mod template;

pub use condition::{ConditionContext, ConditionEvaluator, ConditionFn, ReactionCondition};
pub use event::{EventKind, GameEvent};
pub use registry::ReactionRegistry;
pub use scheduler::{FiredReaction, ReactionReport, ReactionScheduler};
pub use template::{
    ReactionEffectFn, ReactionId, ReactionOutcome, ReactionSource, ReactionTemplate, TriggerContext,
};
