/// Worker session state definitions
///
/// A worker starts `Idle`, is `Running` for the duration of a `run` call, and
/// ends in `Succeeded` (frontier drained) or `Failed` (fatal error).
use std::fmt;

/// Represents the lifecycle state of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkerState {
    /// Constructed, `run` not yet called
    #[default]
    Idle,

    /// A session is in progress
    Running,

    // ===== Terminal States =====
    /// The frontier drained and every batch was delivered
    Succeeded,

    /// The session aborted on an invalid seed, fetch failure, or dispatch failure
    Failed,
}

impl WorkerState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Returns true if the state machine permits moving to `next`
    ///
    /// Terminal states may start a new session; a running session can only
    /// finish.
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Succeeded)
                | (Self::Running, Self::Failed)
                | (Self::Succeeded, Self::Running)
                | (Self::Failed, Self::Running)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
