// eshop-flow/src/core/control.rs

//! Flow signals returned by handlers and by whole pipeline runs.

/// Returned by each handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  /// Carry on with the next handler or step.
  Continue,
  /// Halt the run; nothing after this handler executes.
  Stop,
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step was either executed or legitimately skipped.
  Completed,
  /// A handler returned [`PipelineControl::Stop`].
  Stopped,
}
