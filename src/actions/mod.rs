//! Game actions and player decisions.
//!
//! ## Key Types
//!
//! - `GameAction`: closed set of requests (draw, gain, trash, move, play,
//!   select, prompt ...)
//! - `ActionResult`: what an action produced
//! - `DecisionProvider`: where `SelectCard` / `UserPrompt` get their answers
//!
//! The delegate itself is `Game::run_game_action`.

mod delegate;

pub mod action;
pub mod decision;

pub use action::{ActionResult, GameAction};
pub use decision::{
    DecisionProvider, FirstChoiceDecisions, PromptChoice, PromptRequest, PromptResponse, ScriptedAnswer,
    ScriptedDecisions, SelectCardRequest,
};
