//! Everyday constructors
//!
//! Every function here builds a [`Stack`] with the call site of its caller
//! attached, plus a [`Code`] where one is given. The free functions use
//! [`Config::DEFAULT`]; [`Failures`] applies a custom [`Config`].
//!
//! All of them panic when `fields` repeats a key, including the code and
//! call stack keys they fill themselves.

use crate::callstack::CallStack;
use crate::config::Config;
use crate::error::BoxError;
use crate::field::{Code, ErrorCode, Field, FieldGroup};
use crate::query::message_of;
use crate::stack::{Stack, Underlying};
use std::error::Error;

/// `skip` counts the frames between `assemble` and the caller to record
#[inline(never)]
#[track_caller]
pub(crate) fn assemble(
    config: &Config,
    underlying: Underlying,
    code: Option<Code>,
    fields: FieldGroup,
    skip: usize,
) -> Stack {
    let mut defaults: FieldGroup = Vec::with_capacity(2);
    if let Some(code) = code {
        defaults.push(code.boxed());
    }
    if config.capture_call_stack {
        defaults.push(CallStack::capture(skip + 1).boxed());
    }
    match Stack::assemble(underlying, [defaults, fields]) {
        Ok(stack) => stack,
        Err(e) => e.raise(),
    }
}

fn text(text: impl Into<String>) -> Underlying {
    Underlying::Transparent(BoxError::from(text.into()))
}

/// New leaf error with `code`
#[inline(never)]
#[track_caller]
pub fn new<C: ErrorCode>(code: C, fields: FieldGroup) -> Stack {
    assemble(&Config::DEFAULT, Underlying::None, Some(Code::new(code)), fields, 1)
}

/// Wrap `err` under a new `code`; the old code stays reachable below it
#[inline(never)]
#[track_caller]
pub fn translate<C: ErrorCode>(err: impl Into<BoxError>, code: C, fields: FieldGroup) -> Stack {
    let underlying = Underlying::Transparent(err.into());
    assemble(&Config::DEFAULT, underlying, Some(Code::new(code)), fields, 1)
}

/// Replace `err` by a new `code`, hiding `err` from plain traversal
#[inline(never)]
#[track_caller]
pub fn convert<C: ErrorCode>(err: impl Into<BoxError>, code: C, fields: FieldGroup) -> Stack {
    let underlying = Underlying::Opaque(err.into());
    assemble(&Config::DEFAULT, underlying, Some(Code::new(code)), fields, 1)
}

/// Add fields to `err` without changing its code
#[inline(never)]
#[track_caller]
pub fn wrap(err: impl Into<BoxError>, fields: FieldGroup) -> Stack {
    let underlying = Underlying::Transparent(err.into());
    assemble(&Config::DEFAULT, underlying, None, fields, 1)
}

/// Error from plain text, for situations no code describes
#[inline(never)]
#[track_caller]
pub fn error(message: impl Into<String>, fields: FieldGroup) -> Stack {
    assemble(&Config::DEFAULT, text(message), None, fields, 1)
}

/// Same as [`error`]
#[inline(never)]
#[track_caller]
pub fn unexpected(message: impl Into<String>, fields: FieldGroup) -> Stack {
    assemble(&Config::DEFAULT, text(message), None, fields, 1)
}

/// Hide `err` from plain traversal so its code and fields stop here
#[inline(never)]
#[track_caller]
pub fn opaque(err: impl Into<BoxError>, fields: FieldGroup) -> Stack {
    let underlying = Underlying::Opaque(err.into());
    assemble(&Config::DEFAULT, underlying, None, fields, 1)
}

/// Same as [`opaque`]
#[inline(never)]
#[track_caller]
pub fn mark_unexpected(err: impl Into<BoxError>, fields: FieldGroup) -> Stack {
    let underlying = Underlying::Opaque(err.into());
    assemble(&Config::DEFAULT, underlying, None, fields, 1)
}

/// Constructors bound to a [`Config`]
#[derive(Debug, Clone, Default)]
pub struct Failures {
    config: Config,
}

impl Failures {
    /// Factory applying `config`
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// The settings in use
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// See [`new`](fn@new)
    #[inline(never)]
    #[track_caller]
    pub fn new<C: ErrorCode>(&self, code: C, fields: FieldGroup) -> Stack {
        assemble(&self.config, Underlying::None, Some(Code::new(code)), fields, 1)
    }

    /// See [`translate`]
    #[inline(never)]
    #[track_caller]
    pub fn translate<C: ErrorCode>(
        &self,
        err: impl Into<BoxError>,
        code: C,
        fields: FieldGroup,
    ) -> Stack {
        let underlying = Underlying::Transparent(err.into());
        assemble(&self.config, underlying, Some(Code::new(code)), fields, 1)
    }

    /// See [`convert`]
    #[inline(never)]
    #[track_caller]
    pub fn convert<C: ErrorCode>(
        &self,
        err: impl Into<BoxError>,
        code: C,
        fields: FieldGroup,
    ) -> Stack {
        let underlying = Underlying::Opaque(err.into());
        assemble(&self.config, underlying, Some(Code::new(code)), fields, 1)
    }

    /// See [`wrap`]
    #[inline(never)]
    #[track_caller]
    pub fn wrap(&self, err: impl Into<BoxError>, fields: FieldGroup) -> Stack {
        let underlying = Underlying::Transparent(err.into());
        assemble(&self.config, underlying, None, fields, 1)
    }

    /// See [`error`](fn@error)
    #[inline(never)]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>, fields: FieldGroup) -> Stack {
        assemble(&self.config, text(message), None, fields, 1)
    }

    /// See [`opaque`]
    #[inline(never)]
    #[track_caller]
    pub fn opaque(&self, err: impl Into<BoxError>, fields: FieldGroup) -> Stack {
        let underlying = Underlying::Opaque(err.into());
        assemble(&self.config, underlying, None, fields, 1)
    }

    /// User-facing text for `err`: its nearest [`Message`](crate::Message),
    /// or the configured default message
    #[must_use]
    pub fn message_or_default(&self, err: &(dyn Error + 'static)) -> String {
        message_of(err).map_or_else(
            || self.config.default_message.to_string(),
            |message| message.as_str().to_string(),
        )
    }
}
