//! Action chain execution.
//!
//! The chain is a graph walk over an id-addressed arena, not a list
//! iteration. Starting from the first action in the list, the interpreter
//! follows `next_action_id` or the first matching branch until it reaches
//! an id that is not in the arena.
//!
//! Action conditions gate execution only: a gated-out action is skipped
//! but its successor is still followed.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::core::{
    ActionId, EngineConfig, EventId, EventRng, ExecutionResult, FlagValue, GameState,
    InventoryItem,
};
use crate::error::{EngineError, HostError};
use crate::triggers::{Condition, ConditionContext, ConditionEvaluator, CustomConditionFn, TriggerData};

use super::action::{ActionKind, EventAction, FlagOperation, ItemOperation};
use super::host::EventHost;

/// Named conditions referenced by branches.
#[derive(Clone, Debug, Default)]
pub struct BranchConditions {
    table: FxHashMap<String, Vec<Condition>>,
}

impl BranchConditions {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the conditions behind a branch id.
    pub fn register(&mut self, id: impl Into<String>, conditions: impl IntoIterator<Item = Condition>) {
        self.table.insert(id.into(), conditions.into_iter().collect());
    }

    /// Conditions registered for an id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&[Condition]> {
        self.table.get(id).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Everything a chain needs while it runs.
pub struct ChainContext<'a> {
    /// Event owning the chain (for logs and errors).
    pub event_id: &'a EventId,
    /// State mutated by the actions.
    pub state: &'a mut GameState,
    pub trigger_data: Option<&'a TriggerData>,
    pub rng: &'a mut dyn EventRng,
    pub host: &'a mut dyn EventHost,
    pub eval_custom: Option<&'a CustomConditionFn>,
    pub branches: &'a BranchConditions,
    pub config: &'a EngineConfig,
}

impl ChainContext<'_> {
    /// AND over a condition list against the current state.
    fn conditions_hold(&mut self, conditions: &[Condition]) -> bool {
        let mut ctx = ConditionContext::new(&*self.state, &mut *self.rng)
            .with_trigger_data(self.trigger_data)
            .with_custom_eval(self.eval_custom)
            .with_default_probability(self.config.default_probability);
        ConditionEvaluator::all(conditions, &mut ctx)
    }

    /// Unregistered branch ids always match.
    fn branch_matches(&mut self, condition_id: &str) -> bool {
        let branches = self.branches;
        match branches.get(condition_id) {
            Some(conditions) => self.conditions_hold(conditions),
            None => true,
        }
    }
}

/// Executes action chains.
pub struct ActionInterpreter;

impl ActionInterpreter {
    /// Run a chain from its first action.
    ///
    /// Returns the first `failed`/`cancelled` handler result, otherwise
    /// `success`. Without `max_chain_steps` an authored cycle never ends.
    pub fn execute_chain(
        actions: &[EventAction],
        ctx: &mut ChainContext<'_>,
    ) -> Result<ExecutionResult, EngineError> {
        let arena: FxHashMap<&str, &EventAction> = actions
            .iter()
            .map(|action| (action.id.as_str(), action))
            .collect();

        let mut current = actions.first().map(|action| action.id.as_str());
        let mut steps = 0usize;

        while let Some(id) = current {
            let Some(action) = arena.get(id).copied() else {
                debug!(event_id = %ctx.event_id, action_id = id, "chain reached unknown id, ending");
                break;
            };

            if let Some(limit) = ctx.config.max_chain_steps {
                if steps >= limit {
                    return Err(EngineError::StepLimitExceeded {
                        event_id: ctx.event_id.clone(),
                        limit,
                    });
                }
            }
            steps += 1;

            if action.conditions.is_empty() || ctx.conditions_hold(&action.conditions) {
                let result = Self::execute_action(action, ctx)?;
                if result.halts_chain() {
                    debug!(event_id = %ctx.event_id, action_id = id, %result, "chain halted");
                    return Ok(result);
                }
            } else {
                debug!(event_id = %ctx.event_id, action_id = id, "action gated out");
            }

            current = Self::successor(action, ctx);
        }

        Ok(ExecutionResult::Success)
    }

    /// First matching branch, otherwise the explicit successor.
    fn successor<'x>(action: &'x EventAction, ctx: &mut ChainContext<'_>) -> Option<&'x str> {
        action
            .branch_actions
            .iter()
            .find(|branch| ctx.branch_matches(&branch.condition_id))
            .map(|branch| branch.action_id.as_str())
            .or_else(|| action.next_action_id.as_ref().map(ActionId::as_str))
    }

    /// Run one action's effect.
    pub fn execute_action(
        action: &EventAction,
        ctx: &mut ChainContext<'_>,
    ) -> Result<ExecutionResult, EngineError> {
        let host_error = |source: HostError| EngineError::Host {
            action_id: action.id.clone(),
            source,
        };

        match &action.kind {
            ActionKind::Message { text, speaker } => ctx
                .host
                .show_message(text, speaker.as_deref())
                .map_err(host_error),

            ActionKind::Treasure { items } => {
                if items.iter().any(|item| item.count <= 0) {
                    debug!(action_id = %action.id, "treasure holds a non-positive count");
                    return Ok(ExecutionResult::Failed);
                }
                for item in items {
                    ctx.state.add_item(item.clone());
                }
                Ok(ExecutionResult::Success)
            }

            ActionKind::Flag { operation, key, value } => {
                Self::apply_flag(ctx.state, *operation, key, value.as_ref());
                Ok(ExecutionResult::Success)
            }

            ActionKind::Item { count, .. } if *count <= 0 => {
                debug!(action_id = %action.id, count, "item count must be positive");
                Ok(ExecutionResult::Failed)
            }

            ActionKind::Item { operation, item_id, name, count } => match operation {
                ItemOperation::Add => {
                    let name = name.clone().unwrap_or_else(|| item_id.clone());
                    ctx.state.add_item(InventoryItem::new(item_id.clone(), name, *count));
                    Ok(ExecutionResult::Success)
                }
                ItemOperation::Remove => {
                    if ctx.state.remove_item(item_id, *count) {
                        Ok(ExecutionResult::Success)
                    } else {
                        debug!(action_id = %action.id, item_id = item_id.as_str(), count, "not enough items to remove");
                        Ok(ExecutionResult::Failed)
                    }
                }
            },

            ActionKind::Heal { amount } => ctx.host.heal(*amount).map_err(host_error),

            ActionKind::Damage { amount } => ctx.host.damage(*amount).map_err(host_error),

            ActionKind::Warp { position } => {
                ctx.state.player_position = *position;
                ctx.host.on_warp(position).map_err(host_error)
            }

            ActionKind::Battle { encounter } => ctx.host.start_battle(encounter).map_err(host_error),

            ActionKind::Save { slot } => {
                let snapshot = ctx.state.to_snapshot_bytes()?;
                ctx.host
                    .save_game(slot.as_deref(), &snapshot)
                    .map_err(host_error)
            }

            ActionKind::Sound { sound, volume } => {
                ctx.host.play_sound(sound, *volume).map_err(host_error)
            }

            ActionKind::Unknown { type_name, .. } => {
                warn!(
                    event_id = %ctx.event_id,
                    action_id = %action.id,
                    action_type = type_name.as_str(),
                    "unknown action type, skipping"
                );
                Ok(ExecutionResult::Success)
            }
        }
    }

    fn apply_flag(state: &mut GameState, operation: FlagOperation, key: &str, value: Option<&FlagValue>) {
        match operation {
            FlagOperation::Set => {
                let value = value.cloned().unwrap_or(FlagValue::Bool(true));
                state.set_flag(key, value);
            }
            FlagOperation::Unset => {
                state.clear_flag(key);
            }
            FlagOperation::Toggle => {
                let truthy = state.flag(key).is_some_and(FlagValue::is_truthy);
                state.set_flag(key, !truthy);
            }
            FlagOperation::Increment => {
                let delta = value.and_then(FlagValue::as_number).unwrap_or(1.0);
                let current = state.flag(key).and_then(FlagValue::as_number).unwrap_or(0.0);
                state.set_flag(key, current + delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::LoggingHost;
    use crate::core::{GameRng, Position};
    use crate::triggers::Operator;

    /// Host that records what it was asked to do.
    #[derive(Default)]
    struct RecordingHost {
        calls: Vec<String>,
        battle_result: Option<ExecutionResult>,
        fail_sound: bool,
    }

    impl EventHost for RecordingHost {
        fn show_message(&mut self, text: &str, _speaker: Option<&str>) -> Result<ExecutionResult, HostError> {
            self.calls.push(format!("message:{text}"));
            Ok(ExecutionResult::Success)
        }

        fn start_battle(&mut self, encounter: &str) -> Result<ExecutionResult, HostError> {
            self.calls.push(format!("battle:{encounter}"));
            Ok(self.battle_result.unwrap_or(ExecutionResult::Success))
        }

        fn play_sound(&mut self, sound: &str, _volume: Option<f32>) -> Result<ExecutionResult, HostError> {
            if self.fail_sound {
                return Err(HostError::Unavailable("audio".into()));
            }
            self.calls.push(format!("sound:{sound}"));
            Ok(ExecutionResult::Success)
        }
    }

    struct Harness {
        event_id: EventId,
        state: GameState,
        rng: GameRng,
        host: RecordingHost,
        branches: BranchConditions,
        config: EngineConfig,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                event_id: EventId::new("test"),
                state: GameState::new(),
                rng: GameRng::new(42),
                host: RecordingHost::default(),
                branches: BranchConditions::new(),
                config: EngineConfig::default(),
            }
        }

        fn run(&mut self, actions: &[EventAction]) -> Result<ExecutionResult, EngineError> {
            let mut ctx = ChainContext {
                event_id: &self.event_id,
                state: &mut self.state,
                trigger_data: None,
                rng: &mut self.rng,
                host: &mut self.host,
                eval_custom: None,
                branches: &self.branches,
                config: &self.config,
            };
            ActionInterpreter::execute_chain(actions, &mut ctx)
        }
    }

    #[test]
    fn test_empty_chain_succeeds() {
        let mut harness = Harness::new();
        assert_eq!(harness.run(&[]).unwrap(), ExecutionResult::Success);
    }

    #[test]
    fn test_follows_pointers_not_list_order() {
        let mut harness = Harness::new();
        let actions = [
            EventAction::new("start", ActionKind::message("a")).then("end"),
            EventAction::new("middle", ActionKind::message("b")),
            EventAction::new("end", ActionKind::message("c")).then("middle"),
        ];

        harness.run(&actions).unwrap();
        assert_eq!(harness.host.calls, vec!["message:a", "message:c", "message:b"]);
    }

    #[test]
    fn test_dangling_pointer_ends_normally() {
        let mut harness = Harness::new();
        let actions = [EventAction::new("1", ActionKind::message("only")).then("404")];

        assert_eq!(harness.run(&actions).unwrap(), ExecutionResult::Success);
        assert_eq!(harness.host.calls.len(), 1);
    }

    #[test]
    fn test_gated_action_skipped_but_traversed() {
        let mut harness = Harness::new();
        let actions = [
            EventAction::new("1", ActionKind::message("locked"))
                .with_condition(Condition::flag_set("has_key"))
                .then("2"),
            EventAction::new("2", ActionKind::message("after")),
        ];

        harness.run(&actions).unwrap();
        assert_eq!(harness.host.calls, vec!["message:after"]);
    }

    #[test]
    fn test_failure_short_circuits() {
        let mut harness = Harness::new();
        harness.host.battle_result = Some(ExecutionResult::Cancelled);
        let actions = [
            EventAction::new("1", ActionKind::battle("goblins")).then("2"),
            EventAction::new("2", ActionKind::set_flag("won", true)),
        ];

        assert_eq!(harness.run(&actions).unwrap(), ExecutionResult::Cancelled);
        assert!(harness.state.flag("won").is_none());
    }

    #[test]
    fn test_host_error_propagates() {
        let mut harness = Harness::new();
        harness.host.fail_sound = true;
        let actions = [EventAction::new("boom", ActionKind::sound("explosion"))];

        let error = harness.run(&actions).unwrap_err();
        assert!(matches!(error, EngineError::Host { ref action_id, .. } if action_id.as_str() == "boom"));
    }

    #[test]
    fn test_unregistered_branch_matches_first() {
        let mut harness = Harness::new();
        let actions = [
            EventAction::new("1", ActionKind::message("fork"))
                .with_branch("left", "L")
                .with_branch("right", "R")
                .then("N"),
            EventAction::new("L", ActionKind::message("left")),
            EventAction::new("R", ActionKind::message("right")),
            EventAction::new("N", ActionKind::message("next")),
        ];

        harness.run(&actions).unwrap();
        assert_eq!(harness.host.calls, vec!["message:fork", "message:left"]);
    }

    #[test]
    fn test_registered_branch_conditions() {
        let mut harness = Harness::new();
        harness.branches.register("rich", [Condition::item("gold", Operator::Ge, 100)]);
        harness.branches.register("high_level", [Condition::level(Operator::Ge, 10)]);
        let actions = [
            EventAction::new("1", ActionKind::message("merchant"))
                .with_branch("rich", "buy")
                .with_branch("high_level", "quest")
                .then("bye"),
            EventAction::new("buy", ActionKind::message("buy")),
            EventAction::new("quest", ActionKind::message("quest")),
            EventAction::new("bye", ActionKind::message("bye")),
        ];

        harness.run(&actions).unwrap();
        assert_eq!(harness.host.calls, vec!["message:merchant", "message:bye"]);

        harness.host.calls.clear();
        harness.state.player_level = 12;
        harness.run(&actions).unwrap();
        assert_eq!(harness.host.calls, vec!["message:merchant", "message:quest"]);
    }

    #[test]
    fn test_step_limit_stops_cycles() {
        let mut harness = Harness::new();
        harness.config = EngineConfig::default().with_max_chain_steps(5);
        let actions = [
            EventAction::new("a", ActionKind::flag(FlagOperation::Increment, "laps")).then("b"),
            EventAction::new("b", ActionKind::message("loop")).then("a"),
        ];

        let error = harness.run(&actions).unwrap_err();
        assert!(matches!(error, EngineError::StepLimitExceeded { limit: 5, .. }));
        assert_eq!(harness.state.flag("laps"), Some(&FlagValue::Number(3.0)));
    }

    #[test]
    fn test_flag_operations() {
        let mut harness = Harness::new();
        harness.state.set_flag("counter", 2);
        let actions = [
            EventAction::new("1", ActionKind::flag(FlagOperation::Toggle, "lamp")).then("2"),
            EventAction::new("2", ActionKind::Flag {
                operation: FlagOperation::Increment,
                key: "counter".into(),
                value: Some(FlagValue::Number(3.0)),
            })
            .then("3"),
            EventAction::new("3", ActionKind::flag(FlagOperation::Set, "visited")).then("4"),
            EventAction::new("4", ActionKind::flag(FlagOperation::Unset, "counter_shadow")),
        ];

        harness.run(&actions).unwrap();
        assert_eq!(harness.state.flag("lamp"), Some(&FlagValue::Bool(true)));
        assert_eq!(harness.state.flag("counter"), Some(&FlagValue::Number(5.0)));
        assert_eq!(harness.state.flag("visited"), Some(&FlagValue::Bool(true)));
    }

    #[test]
    fn test_item_remove_insufficient_fails() {
        let mut harness = Harness::new();
        harness.state.add_item(InventoryItem::new("key", "Key", 1));
        let actions = [EventAction::new("1", ActionKind::remove_item("key", 2))];

        assert_eq!(harness.run(&actions).unwrap(), ExecutionResult::Failed);
        assert_eq!(harness.state.item_count("key"), 1);
    }

    #[test]
    fn test_non_positive_item_counts_fail() {
        let mut harness = Harness::new();
        harness.state.add_item(InventoryItem::new("key", "Key", 1));

        let remove_negative = [EventAction::new("1", ActionKind::remove_item("key", -3))];
        assert_eq!(harness.run(&remove_negative).unwrap(), ExecutionResult::Failed);
        assert_eq!(harness.state.item_count("key"), 1);

        let add_zero = [EventAction::new("1", ActionKind::add_item("torch", "Torch", 0))];
        assert_eq!(harness.run(&add_zero).unwrap(), ExecutionResult::Failed);
        assert!(harness.state.item("torch").is_none());

        let bad_treasure = [EventAction::new("1", ActionKind::treasure([
            InventoryItem::new("gold", "Gold", 10),
            InventoryItem::new("curse", "Curse", -1),
        ]))];
        assert_eq!(harness.run(&bad_treasure).unwrap(), ExecutionResult::Failed);
        assert_eq!(harness.state.item_count("gold"), 0);
    }

    #[test]
    fn test_treasure_and_warp() {
        let mut harness = Harness::new();
        let destination = Position::new(4, 9, 2);
        let actions = [
            EventAction::new("1", ActionKind::treasure([
                InventoryItem::new("gold", "Gold", 50),
                InventoryItem::new("gem", "Gem", 1),
            ]))
            .then("2"),
            EventAction::new("2", ActionKind::warp(destination)),
        ];

        harness.run(&actions).unwrap();
        assert_eq!(harness.state.item_count("gold"), 50);
        assert_eq!(harness.state.item_count("gem"), 1);
        assert_eq!(harness.state.player_position, destination);
    }

    #[test]
    fn test_unknown_action_is_noop() {
        let mut harness = Harness::new();
        let actions = [
            EventAction::new(
                "1",
                ActionKind::unknown("summon_party", serde_json::json!({ "size": 3 })),
            )
            .then("2"),
            EventAction::new("2", ActionKind::message("still here")),
        ];

        assert_eq!(harness.run(&actions).unwrap(), ExecutionResult::Success);
        assert_eq!(harness.host.calls, vec!["message:still here"]);
    }

    #[test]
    fn test_logging_host_handles_every_kind() {
        let event_id = EventId::new("all");
        let mut state = GameState::new();
        let mut rng = GameRng::new(1);
        let mut host = LoggingHost;
        let branches = BranchConditions::new();
        let config = EngineConfig::default();
        let mut ctx = ChainContext {
            event_id: &event_id,
            state: &mut state,
            trigger_data: None,
            rng: &mut rng,
            host: &mut host,
            eval_custom: None,
            branches: &branches,
            config: &config,
        };

        let actions = [
            EventAction::new("1", ActionKind::heal(5)).then("2"),
            EventAction::new("2", ActionKind::damage(3)).then("3"),
            EventAction::new("3", ActionKind::save(Some("slot1".into()))).then("4"),
            EventAction::new("4", ActionKind::sound("chime")),
        ];

        assert_eq!(
            ActionInterpreter::execute_chain(&actions, &mut ctx).unwrap(),
            ExecutionResult::Success
        );
    }
}
