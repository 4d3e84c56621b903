use crate::handle::Handle;

/// Temporal safety violations, raised only by validation.
///
/// A violation means the instrumented program has already executed logic
/// whose outcome is undefined; the default violation action terminates the
/// process rather than returning this error to the caller.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ViolationError {
    #[error("object {handle} used after destruction")]
    UseAfterDestroy { handle: Handle },

    #[error("existence dependency of {dependent} broken: target {target} was destroyed")]
    TargetDestroyed { dependent: Handle, target: Handle },

    #[error(
        "content dependency of {dependent} stale: target {target} at version {current}, snapshot was {snapshot}"
    )]
    ContentModified {
        dependent: Handle,
        target: Handle,
        snapshot: u64,
        current: u64,
    },
}

impl ViolationError {
    /// The handle whose use triggered the violation.
    pub fn dependent(&self) -> Handle {
        match self {
            Self::UseAfterDestroy { handle } => *handle,
            Self::TargetDestroyed { dependent, .. } => *dependent,
            Self::ContentModified { dependent, .. } => *dependent,
        }
    }
}
