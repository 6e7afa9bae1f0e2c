//! Multi-line and JSON diagnostics for error chains
//!
//! Both walk the forced chain, so opaque stacks are shown in full. They are
//! meant for logs and bug reports, never for end users.

use crate::callstack::{CallStack, Frame};
use crate::chain::forced_chain;
use crate::field::{Context, Key, Message};
use crate::query::origin_value;
use crate::stack::Stack;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

/// Detail dump of `err`, see [`Detail`]
#[must_use]
pub fn detail<'a>(err: &'a (dyn Error + 'static)) -> Detail<'a> {
    Detail(err)
}

impl Stack {
    /// Detail dump of this stack and everything beneath it
    #[must_use]
    pub fn detail(&self) -> Detail<'_> {
        Detail(self)
    }
}

/// Displays every node of a chain followed by the origin call stack:
///
/// ```text
/// [app::load] src/app.rs:42
///     code(not_found)
///     message("no such user")
///     error("connection reset")
/// [CallStack]
///     [app::load] src/app.rs:42
///     [app::main] src/main.rs:7
/// ```
pub struct Detail<'a>(&'a (dyn Error + 'static));

impl fmt::Display for Detail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for err in forced_chain(self.0) {
            let Some(stack) = err.downcast_ref::<Stack>() else {
                writeln!(f, "    error({:?})", err.to_string())?;
                continue;
            };
            if let Some(call_stack) = stack.call_stack() {
                writeln!(f, "{:#}", call_stack.head_frame())?;
            }
            for (key, field) in stack.fields() {
                match key {
                    Key::CALL_STACK => {}
                    Key::CODE => writeln!(f, "    code({})", field.display())?,
                    _ => writeln!(f, "    {}", field.display())?,
                }
            }
        }

        writeln!(f, "[CallStack]")?;
        for frame in origin_call_stack(self.0).map(CallStack::frames).unwrap_or_default() {
            writeln!(f, "    {frame:#}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Detail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn origin_call_stack<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a CallStack> {
    origin_value(err, Key::CALL_STACK)?.downcast_ref::<CallStack>()
}

/// JSON-ready view of an error chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// One entry per error of the forced chain, outermost first
    pub detail: Vec<Entry>,
    /// Frames of the origin call stack
    pub call_stack: Vec<FrameEntry>,
}

/// One error of a [`Report`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Call site of a stack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<FrameEntry>,
    /// Code of a stack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Message of a stack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Context of a stack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
    /// Any other field of a stack, by key name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
    /// Text of an error that is not a stack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_error: Option<String>,
}

/// A resolved frame of a [`Report`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameEntry {
    /// `pkg::func`
    pub func: String,
    /// `path:line`
    pub source: String,
}

impl From<&Frame> for FrameEntry {
    fn from(frame: &Frame) -> Self {
        Self {
            func: frame.qualified_func(),
            source: frame.to_string(),
        }
    }
}

impl Report {
    /// Collect the report for `err`
    #[must_use]
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let detail = forced_chain(err).map(entry).collect();
        let call_stack = origin_call_stack(err)
            .map(|cs| cs.frames().iter().map(FrameEntry::from).collect())
            .unwrap_or_default();
        Self { detail, call_stack }
    }

    /// Compact JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Indented JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn entry(err: &(dyn Error + 'static)) -> Entry {
    let Some(stack) = err.downcast_ref::<Stack>() else {
        return Entry {
            raw_error: Some(err.to_string()),
            ..Entry::default()
        };
    };

    let mut entry = Entry {
        frame: stack
            .call_stack()
            .map(|cs| FrameEntry::from(&cs.head_frame())),
        ..Entry::default()
    };
    for (key, field) in stack.fields() {
        if let Some(message) = field.downcast_ref::<Message>() {
            entry.message = Some(message.as_str().to_string());
        } else if let Some(context) = field.downcast_ref::<Context>() {
            entry.context = Some(context.to_map());
        } else if key == Key::CODE {
            entry.code = Some(field.display().to_string());
        } else if key != Key::CALL_STACK {
            entry.fields.insert(key.name().to_string(), field.display().to_string());
        }
    }
    entry
}
