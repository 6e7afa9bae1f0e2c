//! Display and Error implementations for Stack

use super::types::Stack;
use crate::field::Key;
use std::error::Error;
use std::fmt;

impl fmt::Display for Stack {
    /// `pkg::func(code=X)[field, field]: underlying`
    ///
    /// Sections are written in this fixed order whatever the attachment
    /// order was; absent sections are skipped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(call_stack) = self.value(Key::CALL_STACK) {
            call_stack.format_error(f)?;
        }
        if let Some(code) = self.value(Key::CODE) {
            f.write_str("(code=")?;
            code.format_error(f)?;
            f.write_str(")")?;
        }

        let mut others = self
            .fields()
            .filter(|(key, _)| *key != Key::CODE && *key != Key::CALL_STACK)
            .peekable();
        if others.peek().is_some() {
            f.write_str("[")?;
            for (i, (_, field)) in others.enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                field.format_error(f)?;
            }
            f.write_str("]")?;
        }

        if let Some(underlying) = self.force_unwrap_error() {
            write!(f, ": {underlying}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Fields<'a>(&'a Stack);

        impl fmt::Debug for Fields<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.0.fields()).finish()
            }
        }

        f.debug_struct("Stack")
            .field("fields", &Fields(self))
            .field("opaque", &self.is_opaque())
            .field("underlying", &self.force_unwrap_error())
            .finish()
    }
}

impl Error for Stack {
    /// Plain traversal: opaque stacks report no source
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.unwrap_error()
    }
}
