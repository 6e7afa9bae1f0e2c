//! Human-readable error messages

use super::{Field, Key};
use std::fmt;

/// A message meant for the person reading the error, keyed by [`Key::MESSAGE`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message(String);

impl Message {
    /// Create a message
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Create a message from format arguments, see [`messagef!`](crate::messagef)
    #[must_use]
    pub fn format(args: fmt::Arguments<'_>) -> Self {
        Self(fmt::format(args))
    }

    /// The message text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl Field for Message {
    fn key(&self) -> Key {
        Key::MESSAGE
    }

    fn format_error(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "message({:?})", self.0)
    }
}
