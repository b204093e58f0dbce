//! Error types for the reaction engine.

use thiserror::Error;

use crate::cards::{CardInstanceId, CardKey};
use crate::core::PlayerId;
use crate::reactions::ReactionId;
use crate::zones::Zone;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Reaction already registered: {0}")]
    DuplicateReaction(ReactionId),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Card not found: {0}")]
    CardNotFound(CardInstanceId),

    #[error("Unknown card key: {0}")]
    UnknownCardKey(CardKey),

    #[error("Card key registered twice: {0}")]
    DuplicateCardKey(CardKey),

    #[error("{card} is not in {expected}")]
    CardNotInZone { card: CardInstanceId, expected: Zone },

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("No decision available for {0}")]
    DecisionUnavailable(String),

    #[error("Reaction cascade exceeded depth {0}")]
    CascadeTooDeep(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
