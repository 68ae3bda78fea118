//! Dungeon event definitions.
//!
//! Events are authored in the map editor and placed on cells. The engine
//! only reads `id`, `trigger` and `actions`; the rest is editor metadata.

use serde::{Deserialize, Serialize};

use crate::actions::EventAction;
use crate::core::{EventId, Position};

use super::condition::Condition;
use super::policy::RepeatPolicy;

/// Editor category of an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Treasure,
    Npc,
    Trap,
    Door,
    Stairs,
    Shop,
    Heal,
    Battle,
    Message,
    #[default]
    Custom,
}

/// How the player sets an event off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    /// Player interacts with the cell.
    #[default]
    Interact,
    /// Player steps onto the cell.
    Step,
    /// Fires as soon as it can.
    Auto,
    /// Fires on an in-game clock tick.
    Time,
}

/// Gate deciding whether an event may fire.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTrigger {
    #[serde(rename = "type", default)]
    pub trigger_type: TriggerType,

    /// AND-combined; empty means always.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default)]
    pub repeat_policy: RepeatPolicy,
}

impl EventTrigger {
    /// Create a trigger with no conditions that fires once.
    pub fn new(trigger_type: TriggerType) -> Self {
        Self {
            trigger_type,
            conditions: Vec::new(),
            repeat_policy: RepeatPolicy::default(),
        }
    }

    /// Add a condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Set the repeat policy (builder pattern).
    #[must_use]
    pub fn with_repeat_policy(mut self, policy: RepeatPolicy) -> Self {
        self.repeat_policy = policy;
        self
    }
}

/// A dungeon event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DungeonEvent {
    pub id: EventId,

    #[serde(rename = "type", default)]
    pub event_type: EventType,

    #[serde(default)]
    pub trigger: EventTrigger,

    /// Action set; the first element is the chain entry point.
    #[serde(default)]
    pub actions: Vec<EventAction>,

    // === Editor metadata ===
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl DungeonEvent {
    /// Create an event with a default trigger and no actions.
    pub fn new(id: impl Into<EventId>, event_type: EventType) -> Self {
        Self {
            id: id.into(),
            event_type,
            trigger: EventTrigger::default(),
            actions: Vec::new(),
            name: String::new(),
            description: String::new(),
            enabled: true,
        }
    }

    /// Set the trigger (builder pattern).
    #[must_use]
    pub fn with_trigger(mut self, trigger: EventTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Append an action (builder pattern).
    #[must_use]
    pub fn with_action(mut self, action: EventAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Set the display name (builder pattern).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Data supplied by whatever set an event off.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TriggerData {
    /// Where the player was when the event fired.
    pub position: Option<Position>,
    /// Item used on the cell, for item-triggered events.
    pub item_id: Option<String>,
    /// Free-form tags for custom conditions.
    pub tags: Vec<String>,
}

impl TriggerData {
    /// Create empty trigger data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the position (builder pattern).
    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the used item (builder pattern).
    #[must_use]
    pub fn with_item(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    /// Add a tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Check if the data carries a tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
