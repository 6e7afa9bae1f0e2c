//! Walking error chains
//!
//! A chain starts at some error and repeatedly steps to the error beneath
//! it. How one step is taken depends on what the current error is, decided
//! by [`Capability::of`]. Plain traversal stops at opaque stacks; forced
//! traversal walks through them.

use crate::stack::Stack;
use std::error::Error;
use std::io;
use std::iter::FusedIterator;

/// Which kind of traversal a step or chain performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Respect opaque stacks
    Plain,
    /// Walk through opaque stacks
    Forced,
}

/// How an error exposes the error beneath it, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// A [`Stack`]: its underlying error, subject to opacity
    Node,
    /// [`io::Error`]: its custom payload through `get_ref`, which its own
    /// `source` skips. The payload counts only when it is a [`Stack`] or has
    /// a source of its own
    CauseAccessor,
    /// Anything else: [`Error::source`]
    Source,
}

impl Capability {
    /// The capability used to step past `err`
    #[must_use]
    pub fn of(err: &(dyn Error + 'static)) -> Self {
        if err.is::<Stack>() {
            Self::Node
        } else if err.is::<io::Error>() {
            Self::CauseAccessor
        } else {
            Self::Source
        }
    }

    fn step<'a>(
        self,
        err: &'a (dyn Error + 'static),
        traversal: Traversal,
    ) -> Option<&'a (dyn Error + 'static)> {
        match self {
            Self::Node => {
                let stack = err.downcast_ref::<Stack>()?;
                match traversal {
                    Traversal::Plain => stack.unwrap_error(),
                    Traversal::Forced => stack.force_unwrap_error(),
                }
            }
            Self::CauseAccessor => {
                let io_error = err.downcast_ref::<io::Error>()?;
                let inner: &'a (dyn Error + 'static) = io_error.get_ref()?;
                // a payload that is only the error's own text is not a cause
                (inner.is::<Stack>() || inner.source().is_some()).then_some(inner)
            }
            Self::Source => err.source(),
        }
    }
}

/// The error beneath `err`, stopping at opaque stacks
#[must_use]
pub fn unwrap_once<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a (dyn Error + 'static)> {
    Capability::of(err).step(err, Traversal::Plain)
}

/// The error beneath `err`, walking through opaque stacks
#[must_use]
pub fn force_unwrap_once<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a (dyn Error + 'static)> {
    Capability::of(err).step(err, Traversal::Forced)
}

/// Iterator over an error chain, outermost first
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
    traversal: Traversal,
}

impl<'a> Chain<'a> {
    /// Chain starting at `err` itself
    #[must_use]
    pub fn new(err: &'a (dyn Error + 'static), traversal: Traversal) -> Self {
        Self {
            next: Some(err),
            traversal,
        }
    }

    /// The traversal this chain performs
    #[must_use]
    pub fn traversal(&self) -> Traversal {
        self.traversal
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = Capability::of(current).step(current, self.traversal);
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}

/// Plain chain starting at `err`
#[must_use]
pub fn chain<'a>(err: &'a (dyn Error + 'static)) -> Chain<'a> {
    Chain::new(err, Traversal::Plain)
}

/// Forced chain starting at `err`
#[must_use]
pub fn forced_chain<'a>(err: &'a (dyn Error + 'static)) -> Chain<'a> {
    Chain::new(err, Traversal::Forced)
}

/// Last error of the plain chain, `err` itself when nothing is beneath it
#[must_use]
pub fn cause_of<'a>(err: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    chain(err).last().unwrap_or(err)
}
