//! Core engine types: ids, flag values, game state, RNG, clocks, configuration.
//!
//! This module contains the data the engine operates on. Nothing here knows
//! about triggers or action chains.

pub mod ids;
pub mod value;
pub mod result;
pub mod state;
pub mod rng;
pub mod clock;
pub mod config;

pub use ids::{ActionId, EventId};
pub use value::FlagValue;
pub use result::ExecutionResult;
pub use state::{GameState, GameStatePatch, HistoryEntry, InventoryItem, Position};
pub use rng::{EventRng, GameRng};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
