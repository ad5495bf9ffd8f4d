// o2s_intentions/error - Intention graph violations
use crate::collection::IntentionId;

/// Structural violations of the intention graph.
///
/// These are internal errors raised by passes or builders that break the
/// graph's ownership rules; they are never user-facing diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntentionError {
    #[error("intention {id} does not exist")]
    Missing { id: IntentionId },

    #[error("intention {child} is not a child of {parent}")]
    NotAChild {
        child: IntentionId,
        parent: IntentionId,
    },

    #[error("intention {id} is a {found}, expected {expected}")]
    UnexpectedKind {
        id: IntentionId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("a {child} cannot be placed under a {parent}")]
    InvalidPlacement {
        child: &'static str,
        parent: &'static str,
    },

    #[error("intention {child} points at parent {parent} which does not list it")]
    DanglingParent {
        child: IntentionId,
        parent: IntentionId,
    },

    #[error("intention {id} has no parent and is not a file")]
    Orphaned { id: IntentionId },

    #[error("intention {parent} lists child {child} more than once")]
    DuplicateChild {
        parent: IntentionId,
        child: IntentionId,
    },
}
