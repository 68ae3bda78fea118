//! Trigger system: conditions, repeat policies and the trigger gate.
//!
//! An event fires only when every trigger condition holds and its repeat
//! policy permits another execution.
//!
//! ## Key Components
//!
//! - [`Condition`]: a single predicate over the game state
//! - [`ConditionEvaluator`]: evaluates conditions and AND-combined lists
//! - [`RepeatPolicy`]: once / always / count / daily
//! - [`TriggerGate`]: combines the two checks
//! - [`DungeonEvent`]: an authored event with its trigger and actions
//!
//! ## Example Usage
//!
//! ```
//! use dungeon_events::core::{GameRng, GameState};
//! use dungeon_events::triggers::{
//!     Condition, ConditionContext, EventTrigger, Operator, TriggerGate, TriggerType,
//! };
//!
//! let mut state = GameState::new();
//! state.set_flag("lever_pulled", true);
//!
//! let trigger = EventTrigger::new(TriggerType::Step)
//!     .with_condition(Condition::flag("lever_pulled", Operator::Eq, true))
//!     .with_condition(Condition::level(Operator::Ge, 1));
//!
//! let mut rng = GameRng::new(42);
//! let mut ctx = ConditionContext::new(&state, &mut rng);
//! assert!(TriggerGate::check_conditions(&trigger, &mut ctx));
//! ```

mod condition;
mod event;
mod gate;
mod policy;

pub use condition::{
    Condition, ConditionContext, ConditionEvaluator, ConditionType, CustomConditionFn, Operator,
};
pub use event::{DungeonEvent, EventTrigger, EventType, TriggerData, TriggerType};
pub use gate::TriggerGate;
pub use policy::RepeatPolicy;
