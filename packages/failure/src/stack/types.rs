//! Core stack types

use crate::error::BoxError;
use crate::field::{Field, Key};
use std::collections::HashMap;
use std::sync::Arc;

/// An error annotated with fields.
///
/// A `Stack` owns at most one underlying error and any number of fields,
/// one per [`Key`]. It never changes after construction; to add metadata,
/// wrap it in another `Stack`. Clones share the same node.
#[derive(Clone)]
pub struct Stack {
    pub(super) inner: Arc<StackInner>,
}

pub(super) struct StackInner {
    /// The wrapped error
    pub underlying: Underlying,
    /// Fields by key
    pub fields: HashMap<Key, Box<dyn Field>>,
    /// Keys in attachment order
    pub order: Vec<Key>,
}

/// How a stack holds its underlying error
#[derive(Debug)]
pub(crate) enum Underlying {
    /// Leaf node
    None,
    /// Visible to plain traversal
    Transparent(BoxError),
    /// Hidden from plain traversal, reachable by forced traversal
    Opaque(BoxError),
}

impl Underlying {
    pub(crate) fn from_option(error: Option<BoxError>) -> Self {
        error.map_or(Self::None, Self::Transparent)
    }

    pub(crate) fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The error regardless of opacity
    pub(crate) fn error(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::None => None,
            Self::Transparent(error) | Self::Opaque(error) => {
                Some(&**error as &(dyn std::error::Error + 'static))
            }
        }
    }
}
