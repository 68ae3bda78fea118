//! Identifiers for events and actions.
//!
//! Both are authored in the map editor as free-form strings. Actions are
//! addressed only by id, never by their position in an event's action list.
//!
//! ```
//! use dungeon_events::core::{ActionId, EventId};
//!
//! let action: ActionId = "open-door".into();
//! assert_eq!(action.as_str(), "open-door");
//!
//! let event = EventId::new("chest-01");
//! assert_eq!(format!("{}", event), "chest-01");
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a dungeon event.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    /// Create a new event ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of an action, unique within its owning event.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub String);

impl ActionId {
    /// Create a new action ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_from_strings() {
        let a: ActionId = "1".into();
        let b = ActionId::new(String::from("1"));
        assert_eq!(a, b);

        let e: EventId = String::from("trap").into();
        assert_eq!(e.as_str(), "trap");
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&ActionId::new("next")).unwrap();
        assert_eq!(json, "\"next\"");

        let id: EventId = serde_json::from_str("\"stairs\"").unwrap();
        assert_eq!(id, EventId::new("stairs"));
    }
}
