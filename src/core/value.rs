//! Flag values stored in the game state.
//!
//! Editors let designers attach arbitrary key/value flags to the world.
//! Values are restricted to a small tagged union so comparisons stay typed.
//!
//! ## FlagValue Types
//!
//! - `Bool`: switches (door opened, boss defeated)
//! - `Number`: counters and thresholds
//! - `Text`: names, quest stages
//!
//! ## Wire Formats
//!
//! Human-readable formats (editor JSON) carry the bare value, so `true`,
//! `3` and `"x"` map directly. Binary snapshots (bincode) cannot inspect
//! the input to pick a kind, so they carry an explicit variant tag.

use std::cmp::Ordering;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Value of a game flag.
#[derive(Clone, Debug, PartialEq)]
pub enum FlagValue {
    /// Boolean switch.
    Bool(bool),
    /// Numeric value (counters, thresholds).
    Number(f64),
    /// Text value.
    Text(String),
}

impl FlagValue {
    /// Get as bool if this is a Bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as number if this is a Number value.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FlagValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string reference if this is a Text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FlagValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Truthiness used by toggles: `false`, `0`, NaN and `""` are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            FlagValue::Bool(v) => *v,
            FlagValue::Number(v) => *v != 0.0 && !v.is_nan(),
            FlagValue::Text(s) => !s.is_empty(),
        }
    }

    /// Order two values of the same kind.
    ///
    /// Values of different kinds are unordered.
    #[must_use]
    pub fn compare(&self, other: &FlagValue) -> Option<Ordering> {
        match (self, other) {
            (FlagValue::Bool(a), FlagValue::Bool(b)) => Some(a.cmp(b)),
            (FlagValue::Number(a), FlagValue::Number(b)) => a.partial_cmp(b),
            (FlagValue::Text(a), FlagValue::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<bool> for FlagValue {
    fn from(v: bool) -> Self {
        FlagValue::Bool(v)
    }
}

impl From<f64> for FlagValue {
    fn from(v: f64) -> Self {
        FlagValue::Number(v)
    }
}

impl From<i64> for FlagValue {
    fn from(v: i64) -> Self {
        FlagValue::Number(v as f64)
    }
}

impl From<i32> for FlagValue {
    fn from(v: i32) -> Self {
        FlagValue::Number(f64::from(v))
    }
}

impl From<String> for FlagValue {
    fn from(v: String) -> Self {
        FlagValue::Text(v)
    }
}

impl From<&str> for FlagValue {
    fn from(v: &str) -> Self {
        FlagValue::Text(v.to_string())
    }
}

// Tagged form used by binary snapshots. Variant order is the wire format.
#[derive(Serialize)]
enum TaggedRef<'a> {
    Bool(bool),
    Number(f64),
    Text(&'a str),
}

#[derive(Deserialize)]
enum Tagged {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Serialize for FlagValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            return match self {
                FlagValue::Bool(v) => serializer.serialize_bool(*v),
                FlagValue::Number(v) => serializer.serialize_f64(*v),
                FlagValue::Text(s) => serializer.serialize_str(s),
            };
        }

        let tagged = match self {
            FlagValue::Bool(v) => TaggedRef::Bool(*v),
            FlagValue::Number(v) => TaggedRef::Number(*v),
            FlagValue::Text(s) => TaggedRef::Text(s),
        };
        tagged.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FlagValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            return deserializer.deserialize_any(FlagValueVisitor);
        }

        Ok(match Tagged::deserialize(deserializer)? {
            Tagged::Bool(v) => FlagValue::Bool(v),
            Tagged::Number(v) => FlagValue::Number(v),
            Tagged::Text(s) => FlagValue::Text(s),
        })
    }
}

struct FlagValueVisitor;

impl<'de> Visitor<'de> for FlagValueVisitor {
    type Value = FlagValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a boolean, number or string")
    }

    fn visit_bool<E>(self, value: bool) -> Result<FlagValue, E>
    where
        E: de::Error,
    {
        Ok(FlagValue::Bool(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<FlagValue, E>
    where
        E: de::Error,
    {
        Ok(FlagValue::Number(value as f64))
    }

    fn visit_u64<E>(self, value: u64) -> Result<FlagValue, E>
    where
        E: de::Error,
    {
        Ok(FlagValue::Number(value as f64))
    }

    fn visit_f64<E>(self, value: f64) -> Result<FlagValue, E>
    where
        E: de::Error,
    {
        Ok(FlagValue::Number(value))
    }

    fn visit_str<E>(self, value: &str) -> Result<FlagValue, E>
    where
        E: de::Error,
    {
        Ok(FlagValue::Text(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<FlagValue, E>
    where
        E: de::Error,
    {
        Ok(FlagValue::Text(value))
    }
}
