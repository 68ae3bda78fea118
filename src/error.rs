//! Error types.
//!
//! Condition and policy checks never fail. Errors only arise while an action
//! chain runs, and the engine turns every one of them into a `failed` result.

use crate::core::{ActionId, EventId};

/// Error reported by a host port.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("host system unavailable: {0}")]
    Unavailable(String),

    #[error("host rejected the request: {0}")]
    Rejected(String),
}

/// Error raised while executing an action chain.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("action {action_id} failed in host: {source}")]
    Host {
        action_id: ActionId,
        #[source]
        source: HostError,
    },

    #[error("event {event_id} exceeded the chain step limit of {limit}")]
    StepLimitExceeded { event_id: EventId, limit: usize },

    #[error("failed to snapshot game state: {0}")]
    Snapshot(#[from] bincode::Error),
}
