//! Errors returned by the collection types.

/// Failure of a container operation.
///
/// Duplicate and null keys are not errors. They are tolerated in the raw
/// list and surfaced through the advisory flags instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// A mutating operation targeted a read-only container.
    #[error("cannot {operation}: collection is read-only")]
    ReadOnly { operation: &'static str },
    /// An indexed read named a key the container does not hold.
    #[error("key not found")]
    KeyNotFound,
}

pub type Result<T, E = CollectionError> = core::result::Result<T, E>;

/// Gate shared by every mutating container operation.
pub(crate) fn check_writable(read_only: bool, operation: &'static str) -> Result<()> {
    if read_only {
        log::debug!("rejected {operation} on read-only collection");
        return Err(CollectionError::ReadOnly { operation });
    }
    Ok(())
}
