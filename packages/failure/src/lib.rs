//! Errors annotated with codes, messages, context and call sites.
//!
//! A [`Stack`] wraps at most one underlying error and carries a set of
//! [`Field`]s. Stacks nest: every layer of a program that handles an error
//! can wrap it in a new stack describing what it was doing, without losing
//! what the layers below recorded.
//!
//! ```rust,ignore
//! use cryypt_failure::{fields, Context, Message, ResultExt};
//!
//! fn load(id: &str) -> Result<User, Stack> {
//!     let user = db::get(id).translate_err(
//!         "not_found",
//!         fields![Message::new("no such user"), Context::from([("id", id)])],
//!     )?;
//!     Ok(user)
//! }
//!
//! let err = load("42").unwrap_err();
//! assert!(cryypt_failure::is(&err, &["not_found"]));
//! println!("{}", err.detail());
//! ```
//!
//! Lookups follow the chain: [`value`] returns the field nearest to the
//! caller, [`origin_value`] the one closest to the root cause. An opaque
//! stack ([`opaque`], [`convert`]) stops plain traversal so codes and
//! fields below it do not leak to callers; [`forced_chain`] still sees
//! through it.

#![forbid(unsafe_code)]

pub mod build;
pub mod callstack;
pub mod chain;
pub mod config;
pub mod error;
pub mod ext;
pub mod field;
mod macros;
pub mod query;
pub mod report;
pub mod stack;

pub use build::{
    convert, error, mark_unexpected, new, opaque, translate, unexpected, wrap, Failures,
};
pub use callstack::{CallStack, Frame};
pub use chain::{
    cause_of, chain, force_unwrap_once, forced_chain, unwrap_once, Capability, Chain, Traversal,
};
pub use config::Config;
pub use error::{BoxError, Result, StackError};
pub use ext::{OptionExt, ResultExt};
pub use field::{
    AsAny, Code, Coerce, Context, ErrorCode, Field, FieldDisplay, FieldGroup, Key, Message,
    Shape,
};
pub use query::{
    call_stack_of, code_as, code_of, context_of, is, message_of, origin_value, origin_value_as,
    pop_stack, try_origin_value_as, try_value_as, value, value_as,
};
pub use report::{detail, Detail, Report};
pub use stack::Stack;
