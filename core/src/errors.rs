use thiserror::Error;

/// Errors that can arise from the registry's mutating entry points.
///
/// All of these are validation failures, not system faults. None is retried by
/// the registry itself, and no partial mutation accompanies any of them.
/// `QuorumNotMet` may stop applying once more signatures arrive; re-invoking
/// `finalize` is the caller's job.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("deadline passed: submissions closed at {deadline}, received at {now}")]
    DeadlinePassed { deadline: i64, now: i64 },
    #[error("duplicate submission from {0}")]
    DuplicateSubmission(String),
    #[error("unauthorized: {0} is not the registry owner")]
    Unauthorized(String),
    #[error("already finalized")]
    AlreadyFinalized,
    #[error("quorum not met: {collected} of {required} signatures collected")]
    QuorumNotMet { collected: usize, required: usize },
}
