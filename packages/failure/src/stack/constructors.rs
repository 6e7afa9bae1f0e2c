//! Stack constructors and accessors

use super::types::{Stack, StackInner, Underlying};
use crate::callstack::CallStack;
use crate::error::{BoxError, Result, StackError};
use crate::field::{Code, Coerce, Field, FieldGroup, Key, Shape};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;

impl Stack {
    /// Build a stack over `underlying` from groups of fields.
    ///
    /// Keys must be unique across all groups. Fails with
    /// [`StackError::InvalidState`] when there is neither an underlying error
    /// nor a field, and with [`StackError::DuplicateKey`] on the first
    /// repeated key.
    pub fn try_new(
        underlying: Option<BoxError>,
        groups: impl IntoIterator<Item = FieldGroup>,
    ) -> Result<Self> {
        Self::assemble(Underlying::from_option(underlying), groups)
    }

    /// Like [`try_new`](Self::try_new), hiding `underlying` from plain
    /// traversal.
    ///
    /// The error still shows up in the text of the stack and can be
    /// reached with [`force_unwrap_error`](Self::force_unwrap_error).
    pub fn try_new_opaque(
        underlying: BoxError,
        groups: impl IntoIterator<Item = FieldGroup>,
    ) -> Result<Self> {
        Self::assemble(Underlying::Opaque(underlying), groups)
    }

    /// Fail-fast form of [`try_new`](Self::try_new).
    ///
    /// # Panics
    ///
    /// On an empty stack or a duplicate key. Both are caller bugs.
    #[track_caller]
    pub fn new(underlying: Option<BoxError>, groups: impl IntoIterator<Item = FieldGroup>) -> Self {
        match Self::assemble(Underlying::from_option(underlying), groups) {
            Ok(stack) => stack,
            Err(e) => e.raise(),
        }
    }

    /// Fail-fast form of [`try_new_opaque`](Self::try_new_opaque).
    ///
    /// # Panics
    ///
    /// On a duplicate key.
    #[track_caller]
    pub fn new_opaque(underlying: BoxError, groups: impl IntoIterator<Item = FieldGroup>) -> Self {
        match Self::assemble(Underlying::Opaque(underlying), groups) {
            Ok(stack) => stack,
            Err(e) => e.raise(),
        }
    }

    pub(crate) fn assemble(
        underlying: Underlying,
        groups: impl IntoIterator<Item = FieldGroup>,
    ) -> Result<Self> {
        let groups: Vec<FieldGroup> = groups.into_iter().collect();
        let count: usize = groups.iter().map(Vec::len).sum();
        if underlying.is_none() && count == 0 {
            return Err(StackError::InvalidState);
        }

        let mut fields = HashMap::with_capacity(count);
        let mut order = Vec::with_capacity(count);
        for field in groups.into_iter().flatten() {
            let key = field.key();
            match fields.entry(key) {
                Entry::Occupied(_) => return Err(StackError::DuplicateKey { key }),
                Entry::Vacant(slot) => {
                    order.push(key);
                    slot.insert(field);
                }
            }
        }

        Ok(Self {
            inner: Arc::new(StackInner {
                underlying,
                fields,
                order,
            }),
        })
    }

    /// The underlying error, `None` for leaves and opaque stacks
    #[must_use]
    pub fn unwrap_error(&self) -> Option<&(dyn Error + 'static)> {
        match &self.inner.underlying {
            Underlying::Transparent(error) => Some(&**error as &(dyn Error + 'static)),
            Underlying::None | Underlying::Opaque(_) => None,
        }
    }

    /// The underlying error, ignoring opacity
    #[must_use]
    pub fn force_unwrap_error(&self) -> Option<&(dyn Error + 'static)> {
        self.inner.underlying.error()
    }

    /// Whether the underlying error is hidden from plain traversal
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        matches!(self.inner.underlying, Underlying::Opaque(_))
    }

    /// Field stored under `key` in this node only
    #[must_use]
    pub fn value(&self, key: Key) -> Option<&(dyn Field + 'static)> {
        self.inner.fields.get(&key).map(|field| &**field)
    }

    /// First field of this node whose type is exactly `T`
    #[must_use]
    pub fn field<T: Field>(&self) -> Option<&T> {
        self.inner
            .fields
            .values()
            .find_map(|field| (**field).downcast_ref::<T>())
    }

    /// Fields in attachment order
    pub fn fields(&self) -> impl Iterator<Item = (Key, &(dyn Field + 'static))> + '_ {
        self.inner
            .order
            .iter()
            .filter_map(|key| self.value(*key).map(|field| (*key, field)))
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    /// Whether the stack has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// The code attached to this node
    #[must_use]
    pub fn code(&self) -> Option<&Code> {
        self.value(Key::CODE)?.downcast_ref::<Code>()
    }

    /// The call stack attached to this node
    #[must_use]
    pub fn call_stack(&self) -> Option<&CallStack> {
        self.value(Key::CALL_STACK)?.downcast_ref::<CallStack>()
    }

    /// Coerce one of the fields into a `T`.
    ///
    /// A field matches when its type is exactly `T` or when it declares `T`
    /// as a capability through [`Field::coerce`]. Only when no field of this
    /// node matches are compound fields ([`Field::nested`]) searched. With
    /// several candidates the winner is unspecified.
    #[must_use]
    pub fn as_shape<T: Clone + 'static>(&self) -> Option<T> {
        let mut slot = None;
        let found = self.coerce(&mut Shape::new(&mut slot));
        if found {
            slot
        } else {
            None
        }
    }
}

impl Coerce for Stack {
    fn coerce(&self, shape: &mut Shape<'_>) -> bool {
        let fields = || self.inner.fields.values().map(|field| &**field);
        fields().any(|field| shape.fill_exact(field) || field.coerce(shape))
            || fields().any(|field| field.nested().is_some_and(|nested| nested.coerce(shape)))
    }
}
