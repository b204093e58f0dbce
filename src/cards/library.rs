//! Card library: every card instance in a match plus its definition.
//!
//! This is the read side card effects and reaction conditions use
//! ("what is card #12, who owns it, is it an Attack?"). Zone placement is
//! owned by `MatchState`, which keeps `CardInstance::zone` in sync.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardKey, CardType};
use super::instance::{CardInstance, CardInstanceId};
use super::registry::CardRegistry;
use crate::core::PlayerId;
use crate::error::{EngineError, Result};
use crate::zones::Zone;

#[derive(Clone, Debug)]
pub struct CardLibrary {
    registry: Arc<CardRegistry>,
    instances: FxHashMap<CardInstanceId, CardInstance>,
    next_id: u32,
}

impl CardLibrary {
    #[must_use]
    pub fn new(registry: Arc<CardRegistry>) -> Self {
        Self {
            registry,
            instances: FxHashMap::default(),
            next_id: 1,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    /// Create a new instance of a registered card. The caller places it.
    pub(crate) fn spawn(&mut self, key: &CardKey, owner: Option<PlayerId>, zone: Zone) -> Result<CardInstanceId> {
        self.registry.require(key)?;
        let id = CardInstanceId(self.next_id);
        self.next_id += 1;
        self.instances
            .insert(id, CardInstance::new(id, key.clone(), owner, zone));
        Ok(id)
    }

    pub fn get_card(&self, id: CardInstanceId) -> Result<&CardInstance> {
        self.instances.get(&id).ok_or(EngineError::CardNotFound(id))
    }

    pub(crate) fn get_card_mut(&mut self, id: CardInstanceId) -> Result<&mut CardInstance> {
        self.instances.get_mut(&id).ok_or(EngineError::CardNotFound(id))
    }

    /// Definition of the card an instance is a copy of.
    pub fn definition_of(&self, id: CardInstanceId) -> Result<&CardDefinition> {
        let card = self.get_card(id)?;
        self.registry.require(&card.card_key)
    }

    /// `false` for unknown cards.
    #[must_use]
    pub fn has_type(&self, id: CardInstanceId, card_type: CardType) -> bool {
        self.definition_of(id).is_ok_and(|def| def.has_type(card_type))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
