//! Outcomes of an event execution.
//!
//! Each terminal path is a variant with its own history side effect, so the
//! contract can be tested path by path:
//!
//! | Outcome            | Result                 | Recorded |
//! |--------------------|------------------------|----------|
//! | `TriggerBlocked`   | `failed`               | no       |
//! | `PolicyRejected`   | `cancelled`            | no       |
//! | `Completed(r)`     | `r`                    | yes      |
//! | `Aborted(error)`   | `failed`               | no       |

use crate::core::ExecutionResult;
use crate::error::EngineError;

/// Last stage an execution reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventPhase {
    ConditionsChecked,
    RepeatChecked,
    Executing,
    Completed,
}

/// How an execution ended.
#[derive(Debug)]
pub enum EventOutcome {
    /// Trigger conditions were not met.
    TriggerBlocked,
    /// The repeat policy refused another execution.
    PolicyRejected,
    /// The action chain ran and returned a result.
    Completed(ExecutionResult),
    /// The action chain raised an error.
    Aborted(EngineError),
}

impl EventOutcome {
    /// Result reported to the caller.
    #[must_use]
    pub fn result(&self) -> ExecutionResult {
        match self {
            EventOutcome::TriggerBlocked => ExecutionResult::Failed,
            EventOutcome::PolicyRejected => ExecutionResult::Cancelled,
            EventOutcome::Completed(result) => *result,
            EventOutcome::Aborted(_) => ExecutionResult::Failed,
        }
    }

    /// Whether this outcome appends to the event history.
    #[must_use]
    pub fn records_history(&self) -> bool {
        matches!(self, EventOutcome::Completed(_))
    }

    /// Last phase reached before the outcome was decided.
    #[must_use]
    pub fn phase(&self) -> EventPhase {
        match self {
            EventOutcome::TriggerBlocked => EventPhase::ConditionsChecked,
            EventOutcome::PolicyRejected => EventPhase::RepeatChecked,
            EventOutcome::Completed(_) => EventPhase::Completed,
            EventOutcome::Aborted(_) => EventPhase::Executing,
        }
    }

    /// The error, if the chain aborted.
    #[must_use]
    pub fn error(&self) -> Option<&EngineError> {
        match self {
            EventOutcome::Aborted(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventId;

    #[test]
    fn test_results_per_path() {
        assert_eq!(EventOutcome::TriggerBlocked.result(), ExecutionResult::Failed);
        assert_eq!(EventOutcome::PolicyRejected.result(), ExecutionResult::Cancelled);
        assert_eq!(
            EventOutcome::Completed(ExecutionResult::Cancelled).result(),
            ExecutionResult::Cancelled
        );

        let aborted = EventOutcome::Aborted(EngineError::StepLimitExceeded {
            event_id: EventId::new("x"),
            limit: 1,
        });
        assert_eq!(aborted.result(), ExecutionResult::Failed);
        assert!(aborted.error().is_some());
    }

    #[test]
    fn test_only_completed_records_history() {
        assert!(!EventOutcome::TriggerBlocked.records_history());
        assert!(!EventOutcome::PolicyRejected.records_history());
        assert!(EventOutcome::Completed(ExecutionResult::Failed).records_history());

        let aborted = EventOutcome::Aborted(EngineError::StepLimitExceeded {
            event_id: EventId::new("x"),
            limit: 1,
        });
        assert!(!aborted.records_history());
        assert_eq!(aborted.phase(), EventPhase::Executing);
    }

    #[test]
    fn test_phase_per_path() {
        assert_eq!(EventOutcome::TriggerBlocked.phase(), EventPhase::ConditionsChecked);
        assert_eq!(EventOutcome::PolicyRejected.phase(), EventPhase::RepeatChecked);
        assert_eq!(
            EventOutcome::Completed(ExecutionResult::Success).phase(),
            EventPhase::Completed
        );
    }
}
