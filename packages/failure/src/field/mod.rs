//! Metadata attachable to a [`Stack`](crate::Stack)
//!
//! A field declares its own [`Key`]; a stack stores at most one field per
//! key. The predefined kinds are [`Code`], [`Message`], [`Context`] and
//! [`CallStack`](crate::CallStack); applications add their own by
//! implementing [`Field`].

pub mod code;
pub mod context;
pub mod key;
pub mod message;
pub mod shape;

pub use code::{Code, ErrorCode};
pub use context::Context;
pub use key::Key;
pub use message::Message;
pub use shape::{Coerce, Shape};

use std::any::Any;
use std::fmt;

/// A group of fields handed to one stack constructor
pub type FieldGroup = Vec<Box<dyn Field>>;

/// Upcast to [`Any`], implemented for every sized `'static` type
pub trait AsAny: Any {
    /// View `self` as [`Any`]
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A self-identifying piece of error metadata.
///
/// ```rust,ignore
/// #[derive(Debug)]
/// struct RequestId(u64);
///
/// impl Field for RequestId {
///     fn key(&self) -> Key {
///         Key::new("http.request_id")
///     }
/// }
/// ```
pub trait Field: AsAny + fmt::Debug + Send + Sync + 'static {
    /// Identity of this field kind
    fn key(&self) -> Key;

    /// Render the field inside a stack's error text.
    ///
    /// Defaults to the `Debug` representation.
    fn format_error(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }

    /// Fill `shape` with a capability this field declares.
    ///
    /// Exact type matches are handled by the stack; override this only to
    /// hand out another view of the field, such as an `Arc<dyn Trait>`.
    fn coerce(&self, _shape: &mut Shape<'_>) -> bool {
        false
    }

    /// Fields contained in this one, searched after the stack's own fields
    fn nested(&self) -> Option<&dyn Coerce> {
        None
    }

    /// Box the field for a [`FieldGroup`]
    fn boxed(self) -> Box<dyn Field>
    where
        Self: Sized,
    {
        Box::new(self)
    }
}

impl dyn Field {
    /// Whether the field is a `T`
    #[must_use]
    pub fn is<T: Field>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// The field as a `T`, if it is one
    #[must_use]
    pub fn downcast_ref<T: Field>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Display adapter over [`Field::format_error`]
    #[must_use]
    pub fn display(&self) -> FieldDisplay<'_> {
        FieldDisplay(self)
    }
}

/// Returned by [`display`](trait.Field.html#method.display)
pub struct FieldDisplay<'a>(&'a dyn Field);

impl fmt::Display for FieldDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.format_error(f)
    }
}
