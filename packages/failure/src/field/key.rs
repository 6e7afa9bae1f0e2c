//! Field identity

use std::fmt;

/// Identity of a field kind.
///
/// Keys are compared by name, so two field types sharing a name are the
/// same kind as far as a [`Stack`](crate::Stack) is concerned. Application
/// field kinds should namespace their names (`"billing.invoice_id"`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(&'static str);

impl Key {
    /// Key of [`Code`](crate::Code)
    pub const CODE: Key = Key("code");
    /// Key of [`Message`](crate::Message)
    pub const MESSAGE: Key = Key("message");
    /// Key of [`Context`](crate::Context)
    pub const CONTEXT: Key = Key("context");
    /// Key of [`CallStack`](crate::CallStack)
    pub const CALL_STACK: Key = Key("call_stack");

    /// Declare a new key
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Name the key was declared with
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
