//! Execution results shared by actions, chains and events.

use serde::{Deserialize, Serialize};

/// Result of running an action, an action chain or a whole event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionResult {
    /// Completed normally.
    Success,
    /// Could not complete.
    Failed,
    /// Aborted by the player or the host (e.g. fled from battle).
    Cancelled,
}

impl ExecutionResult {
    /// Check if this is a success.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == ExecutionResult::Success
    }

    /// Whether this result stops an action chain.
    #[must_use]
    pub fn halts_chain(self) -> bool {
        !self.is_success()
    }
}

impl std::fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExecutionResult::Success => "success",
            ExecutionResult::Failed => "failed",
            ExecutionResult::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}
