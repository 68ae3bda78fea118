//! Game state: the snapshot the event engine reads and mutates.
//!
//! ## GameState
//!
//! Plain data, no engine behavior:
//! - Flags (arbitrary key/value switches)
//! - Inventory (unique by item id)
//! - Player level and position
//! - In-game clock
//! - Event execution history (append-only)
//!
//! Uses `im` persistent data structures so the defensive copies handed out
//! by the engine are O(1).

use chrono::{DateTime, Utc};
use im::{HashMap as ImHashMap, Vector};
use serde::{Deserialize, Serialize};

use super::ids::EventId;
use super::result::ExecutionResult;
use super::value::FlagValue;

/// Player position on the dungeon map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub floor: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32, floor: i32) -> Self {
        Self { x, y, floor }
    }
}

/// An inventory entry. Entries are unique by `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub count: i64,
}

impl InventoryItem {
    /// Create a new inventory entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>, count: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            count,
        }
    }
}

/// One completed event execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub event_id: EventId,
    pub timestamp: DateTime<Utc>,
    pub result: ExecutionResult,
}

impl HistoryEntry {
    /// Create a new history entry.
    pub fn new(event_id: EventId, timestamp: DateTime<Utc>, result: ExecutionResult) -> Self {
        Self {
            event_id,
            timestamp,
            result,
        }
    }
}

/// Mutable snapshot of player and world data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Arbitrary key/value flags.
    pub flags: ImHashMap<String, FlagValue>,

    /// Items carried by the player.
    pub inventory: Vector<InventoryItem>,

    pub player_level: i64,

    pub player_position: Position,

    /// In-game clock.
    pub time: f64,

    /// Executions in the order they completed.
    pub event_history: Vector<HistoryEntry>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Create a fresh state: level 1 at the origin of floor 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flags: ImHashMap::new(),
            inventory: Vector::new(),
            player_level: 1,
            player_position: Position::new(0, 0, 1),
            time: 0.0,
            event_history: Vector::new(),
        }
    }

    // === Flags ===

    /// Get a flag value.
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<&FlagValue> {
        self.flags.get(key)
    }

    /// Set a flag value.
    pub fn set_flag(&mut self, key: impl Into<String>, value: impl Into<FlagValue>) {
        self.flags.insert(key.into(), value.into());
    }

    /// Remove a flag, returning its previous value.
    pub fn clear_flag(&mut self, key: &str) -> Option<FlagValue> {
        self.flags.remove(key)
    }

    // === Inventory ===

    /// Get an inventory entry by item id.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&InventoryItem> {
        self.inventory.iter().find(|item| item.id == id)
    }

    /// Count of an item; missing items count as 0.
    #[must_use]
    pub fn item_count(&self, id: &str) -> i64 {
        self.item(id).map_or(0, |item| item.count)
    }

    /// Add an item, merging into an existing entry with the same id.
    ///
    /// Returns false (and changes nothing) for a non-positive count.
    pub fn add_item(&mut self, item: InventoryItem) -> bool {
        if item.count <= 0 {
            return false;
        }
        match self.inventory.iter().position(|existing| existing.id == item.id) {
            Some(index) => {
                if let Some(existing) = self.inventory.get_mut(index) {
                    existing.count += item.count;
                }
            }
            None => self.inventory.push_back(item),
        }
        true
    }

    /// Remove `count` of an item.
    ///
    /// Returns false (and changes nothing) if `count` is not positive or
    /// fewer than `count` are held. An entry whose count reaches 0 is
    /// removed from the inventory.
    pub fn remove_item(&mut self, id: &str, count: i64) -> bool {
        if count <= 0 {
            return false;
        }
        let Some(index) = self.inventory.iter().position(|item| item.id == id) else {
            return false;
        };

        let remaining = match self.inventory.get_mut(index) {
            Some(item) if item.count >= count => {
                item.count -= count;
                item.count
            }
            _ => return false,
        };

        if remaining <= 0 {
            self.inventory.remove(index);
        }
        true
    }

    // === Clock ===

    /// Advance the in-game clock.
    pub fn advance_time(&mut self, delta: f64) {
        self.time += delta;
    }

    // === History ===

    /// Append a completed execution.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.event_history.push_back(entry);
    }

    /// History entries for one event.
    pub fn history_for<'a>(&'a self, event_id: &'a str) -> impl Iterator<Item = &'a HistoryEntry> + 'a {
        self.event_history
            .iter()
            .filter(move |entry| entry.event_id.as_str() == event_id)
    }

    /// Number of recorded executions of an event.
    #[must_use]
    pub fn history_count(&self, event_id: &str) -> usize {
        self.history_for(event_id).count()
    }

    // === Updates ===

    /// Shallow merge: every field present in `patch` replaces the current
    /// field wholesale. Supplying `flags` replaces the whole map.
    pub fn apply(&mut self, patch: GameStatePatch) {
        if let Some(flags) = patch.flags {
            self.flags = flags;
        }
        if let Some(inventory) = patch.inventory {
            self.inventory = inventory;
        }
        if let Some(level) = patch.player_level {
            self.player_level = level;
        }
        if let Some(position) = patch.player_position {
            self.player_position = position;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(history) = patch.event_history {
            self.event_history = history;
        }
    }

    // === Snapshots ===

    /// Serialize to a compact binary snapshot.
    pub fn to_snapshot_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Restore from a binary snapshot.
    pub fn from_snapshot_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// Partial update of top-level [`GameState`] fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStatePatch {
    pub flags: Option<ImHashMap<String, FlagValue>>,
    pub inventory: Option<Vector<InventoryItem>>,
    pub player_level: Option<i64>,
    pub player_position: Option<Position>,
    pub time: Option<f64>,
    pub event_history: Option<Vector<HistoryEntry>>,
}

impl GameStatePatch {
    /// Create an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ImHashMap<String, FlagValue>) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Replace the inventory.
    #[must_use]
    pub fn with_inventory(mut self, inventory: Vector<InventoryItem>) -> Self {
        self.inventory = Some(inventory);
        self
    }

    /// Replace the player level.
    #[must_use]
    pub fn with_player_level(mut self, level: i64) -> Self {
        self.player_level = Some(level);
        self
    }

    /// Replace the player position.
    #[must_use]
    pub fn with_player_position(mut self, position: Position) -> Self {
        self.player_position = Some(position);
        self
    }

    /// Replace the in-game clock.
    #[must_use]
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }
}
