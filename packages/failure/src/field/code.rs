//! Application error codes

use super::{AsAny, Field, Key, Shape};
use std::fmt;
use std::sync::Arc;

/// Value usable as an application error code.
///
/// Implemented for every `Debug + Display + PartialEq` type, so string
/// constants and plain enums work out of the box.
pub trait ErrorCode: AsAny + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Whether `other` is the same code
    fn eq_code(&self, other: &dyn ErrorCode) -> bool;
}

impl<T> ErrorCode for T
where
    T: fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static,
{
    fn eq_code(&self, other: &dyn ErrorCode) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }
}

/// Field carrying an application error code, keyed by [`Key::CODE`]
#[derive(Clone)]
pub struct Code(Arc<dyn ErrorCode>);

impl Code {
    /// Wrap an application code
    pub fn new<C: ErrorCode>(code: C) -> Self {
        Self(Arc::new(code))
    }

    /// The wrapped code
    #[must_use]
    pub fn get(&self) -> &dyn ErrorCode {
        &*self.0
    }

    /// The wrapped code as a `C`, if it is one
    #[must_use]
    pub fn downcast_ref<C: ErrorCode>(&self) -> Option<&C> {
        self.get().as_any().downcast_ref::<C>()
    }

    /// Whether the wrapped code equals `code`
    #[must_use]
    pub fn is<C: ErrorCode>(&self, code: &C) -> bool {
        self.get().eq_code(code)
    }
}

impl PartialEq for Code {
    fn eq(&self, other: &Self) -> bool {
        self.get().eq_code(other.get())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Code").field(&self.0).finish()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Field for Code {
    fn key(&self) -> Key {
        Key::CODE
    }

    fn format_error(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }

    fn coerce(&self, shape: &mut Shape<'_>) -> bool {
        shape.fill_with(|| Arc::clone(&self.0))
    }
}
