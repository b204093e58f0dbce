//! Player decisions.
//!
//! `SelectCard` and `UserPrompt` actions suspend on a `DecisionProvider`: a
//! UI bridge in production, a script or an automatic policy in tests and
//! simulations.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cards::CardInstanceId;
use crate::core::{MatchState, PlayerId};
use crate::error::{EngineError, Result};

/// Ask a player to pick between `min` and `max` cards out of `candidates`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectCardRequest {
    pub player: PlayerId,
    pub message: String,
    pub candidates: Vec<CardInstanceId>,
    pub min: usize,
    pub max: usize,
}

impl SelectCardRequest {
    /// Pick exactly `count` cards.
    pub fn exactly(player: PlayerId, message: impl Into<String>, candidates: Vec<CardInstanceId>, count: usize) -> Self {
        Self {
            player,
            message: message.into(),
            candidates,
            min: count,
            max: count,
        }
    }

    /// Pick any number of cards up to `max`.
    pub fn up_to(player: PlayerId, message: impl Into<String>, candidates: Vec<CardInstanceId>, max: usize) -> Self {
        Self {
            player,
            message: message.into(),
            candidates,
            min: 0,
            max,
        }
    }

    /// Check an answer: distinct candidates, count within bounds.
    ///
    /// Bounds are clamped to the number of candidates, so "discard 2" with
    /// one card in hand accepts that one card.
    pub fn validate(&self, selected: &[CardInstanceId]) -> Result<()> {
        let min = self.min.min(self.candidates.len());
        let max = self.max.min(self.candidates.len());
        if selected.len() < min || selected.len() > max {
            return Err(EngineError::InvalidSelection(format!(
                "expected {}..={} cards, got {}",
                min,
                max,
                selected.len()
            )));
        }
        for (i, card) in selected.iter().enumerate() {
            if !self.candidates.contains(card) {
                return Err(EngineError::InvalidSelection(format!("{card} is not a candidate")));
            }
            if selected[..i].contains(card) {
                return Err(EngineError::InvalidSelection(format!("{card} selected twice")));
            }
        }
        Ok(())
    }
}

/// One option of a prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptChoice {
    pub id: String,
    pub label: String,
}

impl PromptChoice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Ask a player to pick one of several options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub player: PlayerId,
    pub message: String,
    pub choices: Vec<PromptChoice>,
}

impl PromptRequest {
    pub fn new(player: PlayerId, message: impl Into<String>, choices: Vec<PromptChoice>) -> Self {
        Self {
            player,
            message: message.into(),
            choices,
        }
    }

    /// A yes/no question; "yes" is the first choice.
    pub fn yes_no(player: PlayerId, message: impl Into<String>) -> Self {
        Self::new(
            player,
            message,
            vec![PromptChoice::new("yes", "Yes"), PromptChoice::new("no", "No")],
        )
    }

    #[must_use]
    pub fn has_choice(&self, id: &str) -> bool {
        self.choices.iter().any(|c| c.id == id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptResponse {
    pub choice: String,
}

impl PromptResponse {
    pub fn new(choice: impl Into<String>) -> Self {
        Self { choice: choice.into() }
    }

    #[must_use]
    pub fn is(&self, id: &str) -> bool {
        self.choice == id
    }
}

/// Source of player decisions.
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    /// Pick cards for `request`. The delegate validates the answer.
    async fn select_cards(&mut self, request: &SelectCardRequest, state: &MatchState) -> Result<Vec<CardInstanceId>>;

    /// Answer a prompt with one of its choice ids.
    async fn prompt(&mut self, request: &PromptRequest, state: &MatchState) -> Result<PromptResponse>;
}

/// Takes the first allowed options: the first `min` candidates, the first
/// prompt choice. Used for simulations and as a default.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstChoiceDecisions;

#[async_trait]
impl DecisionProvider for FirstChoiceDecisions {
    async fn select_cards(&mut self, request: &SelectCardRequest, _state: &MatchState) -> Result<Vec<CardInstanceId>> {
        let count = request.min.min(request.candidates.len());
        Ok(request.candidates.iter().take(count).copied().collect())
    }

    async fn prompt(&mut self, request: &PromptRequest, _state: &MatchState) -> Result<PromptResponse> {
        request
            .choices
            .first()
            .map(|c| PromptResponse::new(c.id.clone()))
            .ok_or_else(|| EngineError::DecisionUnavailable(format!("prompt without choices: {}", request.message)))
    }
}

/// A pre-recorded answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptedAnswer {
    Select(Vec<CardInstanceId>),
    Choose(String),
}

/// Answers decisions from a queue, in order. Running out of answers, or
/// getting a select when a prompt was asked (or vice versa), is an error.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDecisions {
    answers: VecDeque<ScriptedAnswer>,
}

impl ScriptedDecisions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a card selection (builder pattern).
    #[must_use]
    pub fn select(mut self, cards: impl IntoIterator<Item = CardInstanceId>) -> Self {
        self.answers.push_back(ScriptedAnswer::Select(cards.into_iter().collect()));
        self
    }

    /// Queue a prompt answer (builder pattern).
    #[must_use]
    pub fn choose(mut self, choice: impl Into<String>) -> Self {
        self.answers.push_back(ScriptedAnswer::Choose(choice.into()));
        self
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[async_trait]
impl DecisionProvider for ScriptedDecisions {
    async fn select_cards(&mut self, request: &SelectCardRequest, _state: &MatchState) -> Result<Vec<CardInstanceId>> {
        match self.answers.pop_front() {
            Some(ScriptedAnswer::Select(cards)) => Ok(cards),
            other => Err(EngineError::DecisionUnavailable(format!(
                "select for {} ({}), scripted {:?}",
                request.player, request.message, other
            ))),
        }
    }

    async fn prompt(&mut self, request: &PromptRequest, _state: &MatchState) -> Result<PromptResponse> {
        match self.answers.pop_front() {
            Some(ScriptedAnswer::Choose(choice)) => Ok(PromptResponse::new(choice)),
            other => Err(EngineError::DecisionUnavailable(format!(
                "prompt for {} ({}), scripted {:?}",
                request.player, request.message, other
            ))),
        }
    }
}
