//! Run lifecycle state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of one drawable run.
///
/// ```text
/// Idle ─init→ Initialized ─enqueue→ Queued ─execute→ Running ─process→ Draining ─…→ Done
///                  └───────────────execute (empty)──────────────────────────────────→ Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Constructed, not yet initialised.
    Idle,
    /// Sizing, seed and palette fixed.
    Initialized,
    /// At least one action enqueued.
    Queued,
    /// Background painted; ticks may run.
    Running,
    /// At least one tick has run and entries remain.
    Draining,
    /// Queue drained and completion signalled.
    Done,
}

impl RunState {
    /// Whether `self → next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use RunState::{Done, Draining, Idle, Initialized, Queued, Running};
        matches!(
            (self, next),
            (Idle, Initialized)
                | (Initialized | Queued, Queued | Running)
                | (Running | Draining, Draining | Done)
                | (Running, Running)
        )
    }

    /// Whether actions may still be enqueued.
    #[must_use]
    pub fn accepts_actions(self) -> bool {
        matches!(self, Self::Initialized | Self::Queued)
    }

    /// Whether the scheduler may tick.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Draining)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Initialized => "initialized",
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path() {
        let path = [
            RunState::Idle,
            RunState::Initialized,
            RunState::Queued,
            RunState::Running,
            RunState::Draining,
            RunState::Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!RunState::Idle.can_transition_to(RunState::Running));
        assert!(!RunState::Done.can_transition_to(RunState::Running));
        assert!(!RunState::Draining.can_transition_to(RunState::Queued));
        assert!(!RunState::Initialized.can_transition_to(RunState::Idle));
    }

    #[test]
    fn test_display() {
        assert_eq!(RunState::Draining.to_string(), "draining");
    }
}
