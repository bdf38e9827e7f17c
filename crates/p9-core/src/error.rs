use thiserror::Error;

pub type Result<T> = std::result::Result<T, MembraneError>;

/// Errors emitted by membrane and namespace operations.
///
/// Backend failures are reported separately as
/// [`crate::backend::ExecError`], propagated unchanged by
/// [`crate::Namespace::compute`].
#[derive(Debug, Error)]
pub enum MembraneError {
    /// A fixed-capacity list (children, objects, or rules) is full.  The
    /// failed insertion leaves the membrane unchanged.
    #[error("{kind} capacity of {capacity} exceeded")]
    CapacityExceeded {
        kind: &'static str,
        capacity: usize,
    },
    /// A structural precondition did not hold; always a caller bug.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
