//! Settings for the [`Failures`](crate::Failures) factory

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How the [`Failures`](crate::Failures) factory builds and describes
/// errors.
///
/// Deserializes from any serde format; missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text shown to users for errors that carry no [`Message`](crate::Message)
    pub default_message: Cow<'static, str>,
    /// Whether new stacks record the call site
    pub capture_call_stack: bool,
}

impl Config {
    /// The built-in settings
    pub const DEFAULT: Self = Self {
        default_message: Cow::Borrowed(
            "An internal error has occurred. Please contact the developer.",
        ),
        capture_call_stack: true,
    };

    /// Replace the default user-facing message
    #[must_use]
    pub fn with_default_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.default_message = message.into();
        self
    }

    /// Turn call-site capture on or off
    #[must_use]
    pub fn with_call_stack(mut self, capture: bool) -> Self {
        self.capture_call_stack = capture;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
