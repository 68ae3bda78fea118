//! Event execution orchestrator.
//!
//! [`EventEngine`] owns one [`GameState`] and runs events against it:
//!
//! 1. Trigger conditions. Failing returns `failed` and records nothing.
//! 2. Repeat policy. Failing returns `cancelled` and records nothing.
//! 3. Action chain, inside the engine's only error boundary. A returned
//!    result is recorded in history. An error is logged, returns `failed`
//!    and records nothing.
//!
//! Mutating methods take `&mut self`, so calls are serialized by the borrow
//! checker. Hosts that share an engine across threads wrap it in a `Mutex`.

mod outcome;

pub use outcome::{EventOutcome, EventPhase};

use tracing::{debug, error, info_span};

use crate::actions::{ActionInterpreter, BranchConditions, ChainContext, EventHost, LoggingHost};
use crate::core::{
    Clock, EngineConfig, EventRng, ExecutionResult, GameRng, GameState, GameStatePatch,
    HistoryEntry, SystemClock,
};
use crate::error::EngineError;
use crate::triggers::{
    Condition, ConditionContext, CustomConditionFn, DungeonEvent, TriggerData, TriggerGate,
};

/// Runs dungeon events against an owned game state.
pub struct EventEngine {
    state: GameState,
    config: EngineConfig,
    rng: Box<dyn EventRng>,
    clock: Box<dyn Clock>,
    host: Box<dyn EventHost>,
    custom_conditions: Option<Box<CustomConditionFn>>,
    branch_conditions: BranchConditions,
}

impl EventEngine {
    /// Create an engine with a copy of `snapshot` and default collaborators.
    #[must_use]
    pub fn new(snapshot: &GameState) -> Self {
        Self::with_config(snapshot, EngineConfig::default())
    }

    /// Create an engine with custom configuration.
    #[must_use]
    pub fn with_config(snapshot: &GameState, config: EngineConfig) -> Self {
        Self {
            state: snapshot.clone(),
            rng: Box::new(GameRng::new(config.seed)),
            clock: Box::new(SystemClock),
            host: Box::new(LoggingHost),
            custom_conditions: None,
            branch_conditions: BranchConditions::new(),
            config,
        }
    }

    /// Replace the RNG used by `random` conditions.
    #[must_use]
    pub fn with_rng(mut self, rng: impl EventRng + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Replace the clock used for history and `daily` policies.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the host ports.
    #[must_use]
    pub fn with_host(mut self, host: impl EventHost + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    /// Install an evaluator for `custom` conditions.
    #[must_use]
    pub fn with_custom_conditions(
        mut self,
        eval: impl Fn(&Condition, &GameState, Option<&TriggerData>) -> bool + Send + 'static,
    ) -> Self {
        self.custom_conditions = Some(Box::new(eval));
        self
    }

    /// Register the conditions behind a branch `condition_id`.
    pub fn register_branch_condition(
        &mut self,
        id: impl Into<String>,
        conditions: impl IntoIterator<Item = Condition>,
    ) {
        self.branch_conditions.register(id, conditions);
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Copy of the current state. Changes to it do not reach the engine.
    #[must_use]
    pub fn game_state(&self) -> GameState {
        self.state.clone()
    }

    /// Shallow merge of top-level fields; see [`GameState::apply`].
    pub fn update_game_state(&mut self, patch: GameStatePatch) {
        self.state.apply(patch);
    }

    /// Run the trigger gate without executing or recording anything.
    pub fn can_trigger(&mut self, event: &DungeonEvent, trigger_data: Option<&TriggerData>) -> bool {
        self.check_trigger_conditions(event, trigger_data)
            && TriggerGate::check_repeat_policy(event, &self.state.event_history, self.clock.now())
    }

    /// Execute an event and return its result.
    pub fn execute_event(
        &mut self,
        event: &DungeonEvent,
        trigger_data: Option<&TriggerData>,
    ) -> ExecutionResult {
        self.execute_event_traced(event, trigger_data).result()
    }

    /// Execute an event and return which path it took.
    pub fn execute_event_traced(
        &mut self,
        event: &DungeonEvent,
        trigger_data: Option<&TriggerData>,
    ) -> EventOutcome {
        let span = info_span!("execute_event", event_id = %event.id);
        let _guard = span.enter();

        if !self.check_trigger_conditions(event, trigger_data) {
            debug!(phase = ?EventPhase::ConditionsChecked, "trigger conditions not met");
            return EventOutcome::TriggerBlocked;
        }

        let now = self.clock.now();
        if !TriggerGate::check_repeat_policy(event, &self.state.event_history, now) {
            debug!(phase = ?EventPhase::RepeatChecked, "repeat policy rejected event");
            return EventOutcome::PolicyRejected;
        }

        debug!(phase = ?EventPhase::Executing, actions = event.actions.len(), "running action chain");
        let outcome = match self.run_chain(event, trigger_data) {
            Ok(result) => EventOutcome::Completed(result),
            Err(err) => {
                error!(error = %err, "event execution aborted");
                EventOutcome::Aborted(err)
            }
        };

        if outcome.records_history() {
            let entry = HistoryEntry::new(event.id.clone(), self.clock.now(), outcome.result());
            self.state.record(entry);
        }

        debug!(phase = ?outcome.phase(), result = %outcome.result(), "event finished");
        outcome
    }

    fn check_trigger_conditions(
        &mut self,
        event: &DungeonEvent,
        trigger_data: Option<&TriggerData>,
    ) -> bool {
        let mut ctx = ConditionContext::new(&self.state, &mut *self.rng)
            .with_trigger_data(trigger_data)
            .with_custom_eval(self.custom_conditions.as_deref())
            .with_default_probability(self.config.default_probability);
        TriggerGate::check_conditions(&event.trigger, &mut ctx)
    }

    fn run_chain(
        &mut self,
        event: &DungeonEvent,
        trigger_data: Option<&TriggerData>,
    ) -> Result<ExecutionResult, EngineError> {
        let mut ctx = ChainContext {
            event_id: &event.id,
            state: &mut self.state,
            trigger_data,
            rng: &mut *self.rng,
            host: &mut *self.host,
            eval_custom: self.custom_conditions.as_deref(),
            branches: &self.branch_conditions,
            config: &self.config,
        };
        ActionInterpreter::execute_chain(&event.actions, &mut ctx)
    }
}
