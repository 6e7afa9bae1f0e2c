//! Field lookups across error chains
//!
//! [`value`] answers "what does the caller see": the field nearest to the
//! point of observation, following plain traversal. [`origin_value`]
//! answers "where did it start": the field attached closest to the root
//! cause, following forced traversal through opaque stacks.

use crate::callstack::CallStack;
use crate::chain::{chain, forced_chain};
use crate::error::{Result, StackError};
use crate::field::{Code, Context, ErrorCode, Field, Key, Message};
use crate::stack::Stack;
use std::any::type_name;
use std::error::Error;

/// Nearest field stored under `key`
#[must_use]
pub fn value<'a>(err: &'a (dyn Error + 'static), key: Key) -> Option<&'a (dyn Field + 'static)> {
    chain(err)
        .filter_map(|e| e.downcast_ref::<Stack>())
        .find_map(|stack| stack.value(key))
}

/// Field stored under `key` closest to the root cause
#[must_use]
pub fn origin_value<'a>(
    err: &'a (dyn Error + 'static),
    key: Key,
) -> Option<&'a (dyn Field + 'static)> {
    forced_chain(err)
        .filter_map(|e| e.downcast_ref::<Stack>())
        .filter_map(|stack| stack.value(key))
        .last()
}

/// [`value`] as a `V`.
///
/// # Panics
///
/// When the stored field is not a `V`: every field under one key is
/// expected to share a type.
#[must_use]
#[track_caller]
pub fn value_as<'a, V: Field>(err: &'a (dyn Error + 'static), key: Key) -> Option<&'a V> {
    match try_value_as(err, key) {
        Ok(found) => found,
        Err(e) => e.raise(),
    }
}

/// [`origin_value`] as a `V`.
///
/// # Panics
///
/// When the stored field is not a `V`.
#[must_use]
#[track_caller]
pub fn origin_value_as<'a, V: Field>(err: &'a (dyn Error + 'static), key: Key) -> Option<&'a V> {
    match try_origin_value_as(err, key) {
        Ok(found) => found,
        Err(e) => e.raise(),
    }
}

/// [`value`] as a `V`, reporting a field of another type as
/// [`StackError::TypeMismatch`]
pub fn try_value_as<'a, V: Field>(
    err: &'a (dyn Error + 'static),
    key: Key,
) -> Result<Option<&'a V>> {
    value(err, key).map(|field| downcast(field, key)).transpose()
}

/// [`origin_value`] as a `V`, reporting a field of another type as
/// [`StackError::TypeMismatch`]
pub fn try_origin_value_as<'a, V: Field>(
    err: &'a (dyn Error + 'static),
    key: Key,
) -> Result<Option<&'a V>> {
    origin_value(err, key).map(|field| downcast(field, key)).transpose()
}

fn downcast<'a, V: Field>(field: &'a (dyn Field + 'static), key: Key) -> Result<&'a V> {
    field.downcast_ref::<V>().ok_or(StackError::TypeMismatch {
        key,
        expected: type_name::<V>(),
    })
}

/// Nearest code
#[must_use]
#[track_caller]
pub fn code_of<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a Code> {
    value_as::<Code>(err, Key::CODE)
}

/// Nearest code as a `C`; `None` when it is absent or of another type
#[must_use]
#[track_caller]
pub fn code_as<'a, C: ErrorCode>(err: &'a (dyn Error + 'static)) -> Option<&'a C> {
    code_of(err)?.downcast_ref::<C>()
}

/// Whether the nearest code equals one of `codes`
#[must_use]
#[track_caller]
pub fn is<C: ErrorCode>(err: &(dyn Error + 'static), codes: &[C]) -> bool {
    code_of(err).is_some_and(|code| codes.iter().any(|c| code.is(c)))
}

/// Nearest message
#[must_use]
#[track_caller]
pub fn message_of<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a Message> {
    value_as::<Message>(err, Key::MESSAGE)
}

/// Nearest context
#[must_use]
#[track_caller]
pub fn context_of<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a Context> {
    value_as::<Context>(err, Key::CONTEXT)
}

/// Call stack closest to the root cause, the one of the original raise
#[must_use]
#[track_caller]
pub fn call_stack_of<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a CallStack> {
    origin_value_as::<CallStack>(err, Key::CALL_STACK)
}

/// First stack of the plain chain and the error beneath it
#[must_use]
pub fn pop_stack<'a>(
    err: &'a (dyn Error + 'static),
) -> Option<(&'a Stack, Option<&'a (dyn Error + 'static)>)> {
    chain(err)
        .find_map(|e| e.downcast_ref::<Stack>())
        .map(|stack| (stack, stack.unwrap_error()))
}
