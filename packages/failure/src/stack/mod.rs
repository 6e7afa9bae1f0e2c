//! The annotated error node

mod constructors;
mod display;
mod types;

pub use types::Stack;
pub(crate) use types::Underlying;
