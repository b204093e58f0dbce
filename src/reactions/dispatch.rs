//! Event dispatch.
//!
//! `Game::fire_event` runs the reactions listening for one event:
//!
//! 1. Snapshot the templates listening for the event kind (FIFO).
//! 2. Skip entries no longer active (unregistered or retired by an earlier
//!    effect of this dispatch).
//! 3. Evaluate the condition against a read-only context.
//! 4. Collapse single-instance templates sharing a scope.
//! 5. Retire `once` templates, then await the effect.
//!
//! Effects may fire further events; those dispatch to completion before the
//! outer loop moves on.

use futures::future::BoxFuture;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::game::Game;

use super::condition::{ConditionContext, ConditionEvaluator};
use super::event::GameEvent;
use super::scheduler::ReactionReport;

impl Game {
    /// Run every matching reaction for `event` and report what fired.
    ///
    /// Effect errors abort the dispatch and propagate unchanged; reactions
    /// that already ran are not rolled back. A `once` reaction is retired
    /// before its effect runs, so it stays retired even if the effect fails.
    pub fn fire_event(&mut self, event: GameEvent) -> BoxFuture<'_, Result<ReactionReport>> {
        Box::pin(async move {
            let depth = self.reactions.enter_dispatch()?;
            let result = self.dispatch(&event, depth).await;
            self.reactions.exit_dispatch();
            result
        })
    }

    async fn dispatch(&mut self, event: &GameEvent, depth: usize) -> Result<ReactionReport> {
        let snapshot = self.reactions.snapshot(event.kind);
        let mut report = ReactionReport::new();
        let mut fired_scopes = FxHashSet::default();

        tracing::trace!(event = %event.kind, player = %event.player, depth, candidates = snapshot.len(), "dispatch");

        for index in 0..snapshot.len() {
            let template = &snapshot[index];
            if !self.reactions.is_live(template) {
                continue;
            }

            let matched = {
                let ctx = ConditionContext::new(
                    event,
                    template.player_id,
                    template.source_card(),
                    &self.state,
                    &self.prices,
                );
                ConditionEvaluator::evaluate(&template.condition, &ctx)
            };
            if !matched {
                continue;
            }

            if let Some(scope) = template.collapse_scope() {
                if !fired_scopes.insert(scope) {
                    tracing::debug!(reaction = %template.id, "reaction collapsed into an earlier instance");
                    continue;
                }
            }

            if template.once {
                self.reactions.retire(template);
            }

            tracing::debug!(
                reaction = %template.id,
                event = %event.kind,
                owner = %template.player_id,
                depth,
                "reaction fired"
            );

            let effect = template.effect();
            let outcome = effect(&mut *self, template.trigger_context(event)).await?;
            report.record(template.id.clone(), template.player_id, outcome);
        }

        Ok(report)
    }
}
