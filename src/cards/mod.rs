//! Card system: definitions, instances, library, prices and scripts.
//!
//! ## Key Types
//!
//! - `CardKey` / `CardDefinition`: static card data (types, printed cost)
//! - `CardInstanceId` / `CardInstance`: one physical copy in a match
//! - `CardRegistry`: definitions by key, shared between matches
//! - `CardLibrary`: instances of one match, `get_card(id)`
//! - `CardPriceController`: effective cost after price rules
//! - `CardScripts`: play effects and lifecycle hooks per key

pub mod definition;
pub mod instance;
pub mod library;
pub mod price;
pub mod registry;
pub mod scripts;

pub use definition::{CardDefinition, CardKey, CardType, Cost};
pub use instance::{CardInstance, CardInstanceId};
pub use library::CardLibrary;
pub use price::{CardPriceController, PriceContext, PriceResult, PriceRule, PriceRuleId, RuleExpiry};
pub use registry::CardRegistry;
pub use scripts::{CardEffectArgs, CardEffectFn, CardScript, CardScripts, LifecycleEvent};
