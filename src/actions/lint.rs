//! Static checks over an action chain.
//!
//! The engine tolerates dangling pointers (the chain just ends) and has no
//! cycle protection unless a step limit is configured. Editors run this lint
//! to warn authors before an event ships.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::core::ActionId;

use super::action::EventAction;

/// A problem found in an action chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LintIssue {
    /// Two actions share an id; the later one shadows the earlier.
    DuplicateId(ActionId),
    /// A pointer names an id that is not in the list.
    DanglingPointer { from: ActionId, to: ActionId },
    /// No path from the entry action reaches this action.
    Unreachable(ActionId),
    /// Following pointers from `from` leads back to `to`.
    Cycle { from: ActionId, to: ActionId },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Lint an action list.
pub fn lint_actions(actions: &[EventAction]) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    let mut arena: FxHashMap<&str, &EventAction> = FxHashMap::default();

    for action in actions {
        if arena.insert(action.id.as_str(), action).is_some() {
            issues.push(LintIssue::DuplicateId(action.id.clone()));
        }
    }

    for action in actions {
        for target in action.successors() {
            if !arena.contains_key(target.as_str()) {
                issues.push(LintIssue::DanglingPointer {
                    from: action.id.clone(),
                    to: target.clone(),
                });
            }
        }
    }

    let mut marks: FxHashMap<&str, Mark> = FxHashMap::default();
    if let Some(entry) = actions.first() {
        visit(entry.id.as_str(), &arena, &mut marks, &mut issues);
    }

    let mut reported: FxHashSet<&str> = FxHashSet::default();
    for action in actions {
        let id = action.id.as_str();
        if !marks.contains_key(id) && reported.insert(id) {
            issues.push(LintIssue::Unreachable(action.id.clone()));
        }
    }

    issues
}

/// Depth-first walk from `entry`, reporting back edges as cycles.
///
/// Frames live on an explicit stack so chain length never grows the call stack.
fn visit<'a>(
    entry: &'a str,
    arena: &FxHashMap<&'a str, &'a EventAction>,
    marks: &mut FxHashMap<&'a str, Mark>,
    issues: &mut Vec<LintIssue>,
) {
    let Some(root) = arena.get(entry).copied() else {
        return;
    };
    marks.insert(root.id.as_str(), Mark::InProgress);
    let mut stack = vec![(root, root.successors())];

    while let Some(frame) = stack.last_mut() {
        let action = frame.0;
        let Some(target) = frame.1.next() else {
            marks.insert(action.id.as_str(), Mark::Done);
            stack.pop();
            continue;
        };

        let target_id = target.as_str();
        match marks.get(target_id) {
            Some(Mark::InProgress) => issues.push(LintIssue::Cycle {
                from: action.id.clone(),
                to: target.clone(),
            }),
            Some(Mark::Done) => {}
            None => {
                if let Some(next) = arena.get(target_id).copied() {
                    marks.insert(target_id, Mark::InProgress);
                    stack.push((next, next.successors()));
                }
            }
        }
    }
}
