//! Reaction registry.
//!
//! Stores active templates by id and, per event kind, in registration order.
//! The per-kind lists are persistent vectors so dispatch can take a snapshot
//! in O(1) and keep iterating it while effects register and unregister.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use im::Vector;
use rustc_hash::FxHashMap;

use crate::cards::CardInstanceId;
use crate::error::{EngineError, Result};

use super::event::EventKind;
use super::template::{ReactionId, ReactionTemplate};

/// Active reaction templates.
#[derive(Clone, Debug, Default)]
pub struct ReactionRegistry {
    /// All active templates.
    templates: FxHashMap<ReactionId, Arc<ReactionTemplate>>,

    /// Index by event kind, FIFO.
    by_kind: FxHashMap<EventKind, Vector<Arc<ReactionTemplate>>>,
}

impl ReactionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template. Fails if the id is already active.
    pub fn insert(&mut self, template: ReactionTemplate) -> Result<Arc<ReactionTemplate>> {
        if self.templates.contains_key(&template.id) {
            return Err(EngineError::DuplicateReaction(template.id));
        }

        let template = Arc::new(template);
        self.by_kind
            .entry(template.listening_for)
            .or_default()
            .push_back(Arc::clone(&template));
        self.templates.insert(template.id.clone(), Arc::clone(&template));
        Ok(template)
    }

    /// Remove a template by id. Unknown ids are ignored.
    pub fn remove<Q>(&mut self, id: &Q) -> Option<Arc<ReactionTemplate>>
    where
        ReactionId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let template = self.templates.remove(id)?;

        let mut now_empty = false;
        if let Some(list) = self.by_kind.get_mut(&template.listening_for) {
            if let Some(pos) = list.iter().position(|t| Arc::ptr_eq(t, &template)) {
                list.remove(pos);
            }
            now_empty = list.is_empty();
        }
        if now_empty {
            self.by_kind.remove(&template.listening_for);
        }
        Some(template)
    }

    #[must_use]
    pub fn get<Q>(&self, id: &Q) -> Option<&Arc<ReactionTemplate>>
    where
        ReactionId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.templates.get(id)
    }

    #[must_use]
    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        ReactionId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.templates.contains_key(id)
    }

    /// Is this exact registration still active? A template that was removed
    /// and re-registered under the same id is a different registration.
    #[must_use]
    pub fn is_live(&self, template: &Arc<ReactionTemplate>) -> bool {
        self.templates
            .get(&template.id)
            .is_some_and(|active| Arc::ptr_eq(active, template))
    }

    /// Templates listening for `kind`, in registration order.
    #[must_use]
    pub fn snapshot(&self, kind: EventKind) -> Vector<Arc<ReactionTemplate>> {
        self.by_kind.get(&kind).cloned().unwrap_or_default()
    }

    /// Ids of templates registered by a card.
    pub fn ids_for_source(&self, card: CardInstanceId) -> Vec<ReactionId> {
        let mut ids: Vec<_> = self
            .templates
            .values()
            .filter(|t| t.source_card() == Some(card))
            .map(|t| t.id.clone())
            .collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn listening_count(&self, kind: EventKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vector::len)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ReactionTemplate>> {
        self.templates.values()
    }
}
