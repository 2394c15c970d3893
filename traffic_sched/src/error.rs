use thiserror::Error;

/// Surfaced precondition violations and degenerate configurations. Everything
/// else (missing map entries, tie-breaks, out-of-range durations) is
/// recovered locally and never reaches the caller as an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("unsupported scheduling policy: {0}")]
    UnsupportedPolicy(String),

    #[error("no directions and an empty cycle order leave nothing to schedule")]
    EmptyPlan,

    #[error("invalid intersection state: {0}")]
    InvalidState(String),
}
