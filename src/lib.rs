//! # dungeon-events
//!
//! Event execution engine for a dungeon-map authoring tool.
//!
//! An event fires when its trigger conditions hold and its repeat policy
//! allows it. It then runs a pointer-chained set of actions with per-action
//! gates, branches and short-circuiting failures.
//!
//! ## Design Principles
//!
//! 1. **Data, not scripts**: events and actions are structured (serde) data
//!    authored in the editor. There is no scripting language.
//!
//! 2. **Id-addressed chains**: actions link by id. List order only decides
//!    the entry point.
//!
//! 3. **Injected collaborators**: RNG, clock and host systems (messages,
//!    battles, saves, sound) are traits, so whole runs are deterministic
//!    under test.
//!
//! ## Modules
//!
//! - `core`: ids, flag values, game state, RNG, clocks, configuration
//! - `triggers`: conditions, repeat policies, trigger gate, event definitions
//! - `actions`: action definitions, host ports, chain interpreter, lint
//! - `engine`: the orchestrator and its outcomes
//!
//! ## Example
//!
//! ```
//! use dungeon_events::{
//!     ActionKind, DungeonEvent, EventAction, EventEngine, EventTrigger, EventType,
//!     ExecutionResult, GameState, RepeatPolicy, TriggerType,
//! };
//!
//! let chest = DungeonEvent::new("chest-01", EventType::Treasure)
//!     .with_trigger(EventTrigger::new(TriggerType::Interact).with_repeat_policy(RepeatPolicy::Once))
//!     .with_action(EventAction::new("1", ActionKind::add_item("potion", "Potion", 2)).then("2"))
//!     .with_action(EventAction::new("2", ActionKind::set_flag("chest-01.opened", true)));
//!
//! let mut engine = EventEngine::new(&GameState::new());
//! assert_eq!(engine.execute_event(&chest, None), ExecutionResult::Success);
//! assert_eq!(engine.execute_event(&chest, None), ExecutionResult::Cancelled);
//!
//! let state = engine.game_state();
//! assert_eq!(state.item_count("potion"), 2);
//! assert_eq!(state.event_history.len(), 1);
//! ```

pub mod core;
pub mod error;
pub mod triggers;
pub mod actions;
pub mod engine;

// Re-export commonly used types
pub use crate::core::{
    ActionId, EventId, FlagValue, ExecutionResult,
    GameState, GameStatePatch, HistoryEntry, InventoryItem, Position,
    EventRng, GameRng,
    Clock, ManualClock, SystemClock,
    EngineConfig,
};

pub use crate::error::{EngineError, HostError};

pub use crate::triggers::{
    Condition, ConditionType, Operator, ConditionContext, ConditionEvaluator,
    DungeonEvent, EventTrigger, EventType, TriggerData, TriggerType,
    RepeatPolicy, TriggerGate,
};

pub use crate::actions::{
    ActionKind, BranchAction, EventAction, FlagOperation, ItemOperation,
    EventHost, LoggingHost,
    ActionInterpreter, BranchConditions, ChainContext,
    lint_actions, LintIssue,
};

pub use crate::engine::{EventEngine, EventOutcome, EventPhase};
