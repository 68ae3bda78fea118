//! Action system: definitions, host ports, chain execution and linting.
//!
//! - `EventAction`: one id-addressed step with typed parameters
//! - `EventHost`: downstream systems the actions talk to
//! - `ActionInterpreter`: walks a chain and runs each action
//! - `lint_actions`: static checks editors run on authored chains
//!
//! ## Design Philosophy
//!
//! Actions that touch data the engine owns (flags, inventory, position)
//! mutate the game state directly. Everything else is delegated to the host
//! so the engine stays free of UI, audio and battle logic.

mod action;
mod host;
mod interpreter;
mod lint;

pub use action::{ActionKind, BranchAction, EventAction, FlagOperation, ItemOperation};
pub use host::{EventHost, LoggingHost};
pub use interpreter::{ActionInterpreter, BranchConditions, ChainContext};
pub use lint::{lint_actions, LintIssue};
