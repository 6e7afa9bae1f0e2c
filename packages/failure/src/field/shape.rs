//! Type-directed coercion of fields

use super::Field;
use std::any::Any;

/// A request for a value of one particular type.
///
/// A `Shape` wraps an `Option<T>` slot. Exact type matches are filled by the
/// stack itself; fields fill it through [`Field::coerce`] when they declare
/// a capability for `T` (usually an `Arc<dyn Trait>`).
pub struct Shape<'s> {
    slot: &'s mut dyn Any,
    exact: fn(&dyn Any, &mut dyn Any) -> bool,
}

impl<'s> Shape<'s> {
    /// Request a `T`, written into `slot` on success
    pub fn new<T: Clone + 'static>(slot: &'s mut Option<T>) -> Self {
        Self {
            slot,
            exact: fill_exact::<T>,
        }
    }

    /// Whether this shape asks for a `T`
    #[must_use]
    pub fn wants<T: 'static>(&self) -> bool {
        self.slot.is::<Option<T>>()
    }

    /// Fill the slot if it asks for a `T`
    pub fn fill<T: 'static>(&mut self, value: T) -> bool {
        self.fill_with(|| value)
    }

    /// Like [`fill`](Self::fill), building the value only when it is wanted
    pub fn fill_with<T: 'static>(&mut self, make: impl FnOnce() -> T) -> bool {
        match self.slot.downcast_mut::<Option<T>>() {
            Some(slot) => {
                *slot = Some(make());
                true
            }
            None => false,
        }
    }

    pub(crate) fn fill_exact(&mut self, field: &dyn Field) -> bool {
        (self.exact)(field.as_any(), &mut *self.slot)
    }
}

fn fill_exact<T: Clone + 'static>(value: &dyn Any, slot: &mut dyn Any) -> bool {
    match (value.downcast_ref::<T>(), slot.downcast_mut::<Option<T>>()) {
        (Some(value), Some(slot)) => {
            *slot = Some(value.clone());
            true
        }
        _ => false,
    }
}

/// Something that can answer a [`Shape`] request.
///
/// Implemented by [`Stack`](crate::Stack); compound fields expose one
/// through [`Field::nested`] so requests reach the fields they contain.
pub trait Coerce {
    /// Try to fill `shape`, returning whether it was filled
    fn coerce(&self, shape: &mut Shape<'_>) -> bool;
}
