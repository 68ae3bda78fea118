//! Repeat policies.
//!
//! A repeat policy limits how often an event may fire, judged against the
//! execution history recorded in the game state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::HistoryEntry;

/// How often an event may fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RepeatPolicy {
    /// Only while the event has no history.
    #[default]
    Once,
    /// Every time.
    Always,
    /// While the event has fewer than `max_count` history entries.
    Count {
        #[serde(rename = "maxCount")]
        max_count: u32,
    },
    /// At most once per calendar day (UTC) of the wall clock.
    Daily,
}

impl RepeatPolicy {
    /// Create a count policy.
    pub fn count(max_count: u32) -> Self {
        Self::Count { max_count }
    }

    /// Check whether an event with this policy may fire now.
    pub fn permits<'a>(
        &self,
        event_id: &str,
        history: impl IntoIterator<Item = &'a HistoryEntry>,
        now: DateTime<Utc>,
    ) -> bool {
        let mut prior = history
            .into_iter()
            .filter(|entry| entry.event_id.as_str() == event_id);

        match *self {
            RepeatPolicy::Once => prior.next().is_none(),
            RepeatPolicy::Always => true,
            RepeatPolicy::Count { max_count } => prior.count() < max_count as usize,
            RepeatPolicy::Daily => {
                let today = now.date_naive();
                !prior.any(|entry| entry.timestamp.date_naive() == today)
            }
        }
    }
}
