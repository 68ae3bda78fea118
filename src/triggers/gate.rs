//! Trigger gate: condition check plus repeat-policy check.

use chrono::{DateTime, Utc};

use crate::core::HistoryEntry;

use super::condition::{ConditionContext, ConditionEvaluator};
use super::event::{DungeonEvent, EventTrigger};

/// Decides whether an event may fire.
///
/// Both checks are pure and never fail; they only answer yes or no.
pub struct TriggerGate;

impl TriggerGate {
    /// AND over the trigger's conditions (true if there are none).
    pub fn check_conditions(trigger: &EventTrigger, ctx: &mut ConditionContext) -> bool {
        ConditionEvaluator::all(&trigger.conditions, ctx)
    }

    /// Check the event's repeat policy against its prior executions.
    pub fn check_repeat_policy<'a>(
        event: &DungeonEvent,
        history: impl IntoIterator<Item = &'a HistoryEntry>,
        now: DateTime<Utc>,
    ) -> bool {
        event
            .trigger
            .repeat_policy
            .permits(event.id.as_str(), history, now)
    }
}
