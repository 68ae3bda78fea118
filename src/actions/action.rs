//! Action definitions.
//!
//! An action is one step of an event's chain. Actions are addressed by id
//! and linked by `next_action_id` or by branches, so the order of the
//! action list says nothing about execution order (apart from the first
//! element being the entry point).
//!
//! On the wire an action is `{id, type, params, ...}` with `params` opaque
//! until `type` is known. Known types decode into a typed [`ActionKind`].
//! Unknown types keep their raw params so newer editors can author actions
//! older engines skip, and so the action survives a save round-trip.

use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::core::{ActionId, FlagValue, InventoryItem, Position};
use crate::triggers::Condition;

/// What a flag action does to its key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagOperation {
    /// Store `value` (`true` if omitted).
    Set,
    /// Remove the flag.
    Unset,
    /// Store the negated truthiness of the current value.
    Toggle,
    /// Add `value` (1 if omitted) to a numeric flag.
    Increment,
}

/// What an item action does to the inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemOperation {
    Add,
    Remove,
}

fn one() -> i64 {
    1
}

/// Type tag plus typed parameters of an action.
///
/// Unknown type tags become [`ActionKind::Unknown`] and run as a no-op.
/// That variant only round-trips through [`EventAction`]'s own serde impls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "lowercase")]
pub enum ActionKind {
    /// Show text to the player.
    Message {
        #[serde(default)]
        text: String,
        #[serde(default)]
        speaker: Option<String>,
    },

    /// Grant a set of items.
    Treasure { items: Vec<InventoryItem> },

    /// Change a flag.
    Flag {
        operation: FlagOperation,
        key: String,
        #[serde(default)]
        value: Option<FlagValue>,
    },

    /// Add or remove an inventory item.
    #[serde(rename_all = "camelCase")]
    Item {
        operation: ItemOperation,
        item_id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default = "one")]
        count: i64,
    },

    /// Restore player health (host owns hit points).
    Heal { amount: i64 },

    /// Hurt the player (host owns hit points).
    Damage { amount: i64 },

    /// Move the player.
    Warp { position: Position },

    /// Start an encounter.
    Battle { encounter: String },

    /// Persist the game.
    Save {
        #[serde(default)]
        slot: Option<String>,
    },

    /// Play a sound effect.
    Sound {
        sound: String,
        #[serde(default)]
        volume: Option<f32>,
    },

    /// Any type tag this engine does not know.
    #[serde(skip)]
    Unknown { type_name: String, params: Value },
}

impl ActionKind {
    /// Type tags with a typed variant.
    pub const KNOWN_TYPES: &'static [&'static str] = &[
        "message", "treasure", "flag", "item", "heal", "damage", "warp", "battle", "save", "sound",
    ];

    /// Create a message action.
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message {
            text: text.into(),
            speaker: None,
        }
    }

    /// Create a treasure action.
    pub fn treasure(items: impl IntoIterator<Item = InventoryItem>) -> Self {
        Self::Treasure {
            items: items.into_iter().collect(),
        }
    }

    /// Create a set-flag action.
    pub fn set_flag(key: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        Self::Flag {
            operation: FlagOperation::Set,
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Create a flag action without a value.
    pub fn flag(operation: FlagOperation, key: impl Into<String>) -> Self {
        Self::Flag {
            operation,
            key: key.into(),
            value: None,
        }
    }

    /// Create an add-item action.
    pub fn add_item(item_id: impl Into<String>, name: impl Into<String>, count: i64) -> Self {
        Self::Item {
            operation: ItemOperation::Add,
            item_id: item_id.into(),
            name: Some(name.into()),
            count,
        }
    }

    /// Create a remove-item action.
    pub fn remove_item(item_id: impl Into<String>, count: i64) -> Self {
        Self::Item {
            operation: ItemOperation::Remove,
            item_id: item_id.into(),
            name: None,
            count,
        }
    }

    /// Create a heal action.
    pub fn heal(amount: i64) -> Self {
        Self::Heal { amount }
    }

    /// Create a damage action.
    pub fn damage(amount: i64) -> Self {
        Self::Damage { amount }
    }

    /// Create a warp action.
    pub fn warp(position: Position) -> Self {
        Self::Warp { position }
    }

    /// Create a battle action.
    pub fn battle(encounter: impl Into<String>) -> Self {
        Self::Battle {
            encounter: encounter.into(),
        }
    }

    /// Create a save action.
    pub fn save(slot: Option<String>) -> Self {
        Self::Save { slot }
    }

    /// Create a sound action.
    pub fn sound(sound: impl Into<String>) -> Self {
        Self::Sound {
            sound: sound.into(),
            volume: None,
        }
    }

    /// Create a placeholder for a type this engine does not know.
    pub fn unknown(type_name: impl Into<String>, params: Value) -> Self {
        Self::Unknown {
            type_name: type_name.into(),
            params,
        }
    }

    /// Type tag as authored.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Message { .. } => "message",
            Self::Treasure { .. } => "treasure",
            Self::Flag { .. } => "flag",
            Self::Item { .. } => "item",
            Self::Heal { .. } => "heal",
            Self::Damage { .. } => "damage",
            Self::Warp { .. } => "warp",
            Self::Battle { .. } => "battle",
            Self::Save { .. } => "save",
            Self::Sound { .. } => "sound",
            Self::Unknown { type_name, .. } => type_name,
        }
    }

    /// Decode a `type` tag and its raw params.
    pub fn from_parts(type_name: String, params: Value) -> Result<Self, serde_json::Error> {
        if !Self::KNOWN_TYPES.contains(&type_name.as_str()) {
            return Ok(Self::Unknown { type_name, params });
        }

        // Omitted params mean "all defaults"
        let params = match params {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let mut tagged = Map::new();
        tagged.insert("type".to_string(), Value::String(type_name));
        tagged.insert("params".to_string(), params);
        serde_json::from_value(Value::Object(tagged))
    }

    /// Split into a `type` tag and raw params.
    pub fn to_parts(&self) -> Result<(String, Value), serde_json::Error> {
        if let Self::Unknown { type_name, params } = self {
            return Ok((type_name.clone(), params.clone()));
        }

        let mut tagged = serde_json::to_value(self)?;
        let params = tagged.get_mut("params").map(Value::take).unwrap_or(Value::Null);
        Ok((self.type_name().to_string(), params))
    }
}

/// Conditional redirection of the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchAction {
    /// Branch condition to check.
    pub condition_id: String,
    /// Where to continue when it matches.
    pub action_id: ActionId,
}

/// One action in an event's chain.
#[derive(Clone, Debug, PartialEq)]
pub struct EventAction {
    pub id: ActionId,

    pub kind: ActionKind,

    /// Gate on executing this action. Traversal continues either way.
    pub conditions: Vec<Condition>,

    pub next_action_id: Option<ActionId>,

    /// Checked in order; the first match decides the successor.
    pub branch_actions: SmallVec<[BranchAction; 2]>,
}

/// Authored form of an [`EventAction`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventActionWire {
    id: ActionId,
    #[serde(rename = "type")]
    action_type: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    params: Value,
    #[serde(default)]
    conditions: Vec<Condition>,
    #[serde(default)]
    next_action_id: Option<ActionId>,
    #[serde(default)]
    branch_actions: SmallVec<[BranchAction; 2]>,
}

impl Serialize for EventAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let (action_type, params) = self
            .kind
            .to_parts()
            .map_err(<S::Error as ser::Error>::custom)?;
        let wire = EventActionWire {
            id: self.id.clone(),
            action_type,
            params,
            conditions: self.conditions.clone(),
            next_action_id: self.next_action_id.clone(),
            branch_actions: self.branch_actions.clone(),
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EventAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = EventActionWire::deserialize(deserializer)?;
        let kind = ActionKind::from_parts(wire.action_type, wire.params).map_err(|err| {
            <D::Error as de::Error>::custom(format_args!("action {}: {err}", wire.id))
        })?;

        Ok(EventAction {
            id: wire.id,
            kind,
            conditions: wire.conditions,
            next_action_id: wire.next_action_id,
            branch_actions: wire.branch_actions,
        })
    }
}

impl EventAction {
    /// Create an action with no successor.
    pub fn new(id: impl Into<ActionId>, kind: ActionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            conditions: Vec::new(),
            next_action_id: None,
            branch_actions: SmallVec::new(),
        }
    }

    /// Set the successor (builder pattern).
    #[must_use]
    pub fn then(mut self, next: impl Into<ActionId>) -> Self {
        self.next_action_id = Some(next.into());
        self
    }

    /// Add an execution gate (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a branch (builder pattern).
    #[must_use]
    pub fn with_branch(mut self, condition_id: impl Into<String>, action_id: impl Into<ActionId>) -> Self {
        self.branch_actions.push(BranchAction {
            condition_id: condition_id.into(),
            action_id: action_id.into(),
        });
        self
    }

    /// Every action id this action may continue to.
    pub fn successors(&self) -> impl Iterator<Item = &ActionId> {
        self.branch_actions
            .iter()
            .map(|branch| &branch.action_id)
            .chain(self.next_action_id.iter())
    }
}
