use std::error::Error;
use std::io;

/// An error related to storage operations (reads, writes...).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    /// Error from the OS I/O layer.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An index refers to an object id that is not mapped to a term.
    #[error("The storage refers to the unknown object id {0}")]
    UnknownObjectId(u32),
    /// A writer panicked while holding the storage lock.
    #[error("The storage lock has been poisoned by a panicking writer")]
    Poisoned,
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl StorageError {
    /// Wraps an arbitrary error raised by a storage implementation.
    pub fn other(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::Other(error.into())
    }
}

impl From<StorageError> for io::Error {
    #[inline]
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Io(error) => error,
            StorageError::UnknownObjectId(_) => Self::new(io::ErrorKind::InvalidData, error),
            StorageError::Poisoned | StorageError::Other(_) => Self::other(error),
        }
    }
}
