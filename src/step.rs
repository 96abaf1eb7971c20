//! Step-function status shared by the incremental algorithms
//!
//! The room generator and the WFC solver both advance one discrete step at a
//! time. A driver loop calls `step()` at whatever cadence it likes: in a
//! tight loop for tests, or paced for incremental visualization. Stopping
//! between steps leaves the already-finished work in a consistent state.

/// Result of advancing an algorithm by one step
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepStatus<E> {
    /// More steps are needed
    InProgress,
    /// The algorithm finished successfully
    Done,
    /// The algorithm stopped with an error and will not make progress
    Failed(E),
}

impl<E> StepStatus<E> {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, StepStatus::InProgress)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, StepStatus::Done)
    }
}
