/// Download job state definitions
///
/// This module defines every state a media download can be in while its
/// batch is running.
use std::fmt;

/// Represents the current state of one download job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    // ===== Active States =====
    /// Job was submitted and is waiting for a permit
    Pending,

    /// Job holds a permit and its request is on the wire
    InFlight,

    // ===== Terminal States =====
    /// Body was fetched and written to the target path
    Done,

    /// A file already existed at the target path
    Skipped,

    /// Request or write failed; siblings are unaffected
    Failed,

    /// Batch was cancelled before the job got a permit
    Cancelled,
}

impl JobState {
    /// Returns true if this is a terminal state (the batch barrier counts it)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if the job still needs work
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::InFlight)
    }

    /// Returns true if the target file is present after the job
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done | Self::Skipped)
    }

    /// Returns true if the job ended without producing a file
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    ///
    /// Pending may go to InFlight, Skipped or Cancelled; InFlight may go to
    /// Done, Failed or Cancelled. Terminal states never change.
    pub fn can_transition_to(&self, next: JobState) -> bool {
        match self {
            Self::Pending => matches!(next, Self::InFlight | Self::Skipped | Self::Cancelled),
            Self::InFlight => matches!(next, Self::Done | Self::Failed | Self::Cancelled),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InFlight => "in_flight",
            Self::Done => "done",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::InFlight,
            Self::Done,
            Self::Skipped,
            Self::Failed,
            Self::Cancelled,
        ]
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
