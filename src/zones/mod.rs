//! Zone system for card locations.
//!
//! A Dominion match has two shared zones (supply, trash) and five per-seat
//! zones (deck, hand, discard, play, set-aside). The `ZoneManager` is also
//! the "card source" lookup card effects use to find candidates.

pub mod manager;

pub use manager::{Zone, ZoneManager, ZonePosition};
