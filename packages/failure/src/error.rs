//! Contract violations raised while building or querying error stacks

use crate::field::Key;
use thiserror::Error;

/// Boxed error accepted as the underlying cause of a [`Stack`](crate::Stack)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`StackError`]
pub type Result<T> = std::result::Result<T, StackError>;

/// Misuse of the stack API.
///
/// None of these describe a runtime condition worth recovering from: they
/// point at a caller bug. The `try_*` constructors and queries surface them
/// as values, the fail-fast forms log them and panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
    /// Neither an underlying error nor a single field was supplied
    #[error("failure: invalid Stack: no underlying error and no fields")]
    InvalidState,

    /// Two fields of one construction call declared the same key
    #[error("failure: duplicate error field key: {key}")]
    DuplicateKey {
        /// The repeated key
        key: Key,
    },

    /// The value stored under a key is not of the requested type
    #[error("failure: value for key={key} is not type={expected}")]
    TypeMismatch {
        /// Queried key
        key: Key,
        /// Name of the requested type
        expected: &'static str,
    },
}

impl StackError {
    /// Log the violation and panic; used by the fail-fast forms
    #[track_caller]
    pub(crate) fn raise(&self) -> ! {
        log::error!("{self}");
        panic!("{self}")
    }
}
