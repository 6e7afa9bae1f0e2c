//! Call stack capture
//!
//! A [`CallStack`] records raw instruction pointers when it is captured and
//! resolves them to [`Frame`]s only when asked. Capturing is cheap and never
//! fails; resolving reads debug info and is reserved for display.

pub mod frame;

pub use frame::Frame;

use crate::field::{Field, Key};
use std::ffi::c_void;
use std::fmt;
use std::sync::Arc;

/// Frames searched for `capture` itself before giving up on skipping
const ANCHOR_SEARCH: usize = 16;

/// Stack of instruction pointers, innermost first
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CallStack {
    ips: Arc<[usize]>,
}

impl CallStack {
    /// Deepest stack recorded by [`capture`](Self::capture)
    pub const MAX_DEPTH: usize = 32;

    /// Capture the current thread's stack.
    ///
    /// With `skip == 0` the caller of `capture` is the head frame; every
    /// increment drops one more frame. At most [`MAX_DEPTH`](Self::MAX_DEPTH)
    /// frames are kept.
    #[inline(never)]
    #[must_use]
    pub fn capture(skip: usize) -> Self {
        let anchor = Self::capture as fn(usize) -> Self as usize;
        let limit = ANCHOR_SEARCH + skip + Self::MAX_DEPTH;

        let mut raw: Vec<(usize, usize)> = Vec::with_capacity(limit);
        backtrace::trace(|frame| {
            raw.push((frame.ip() as usize, frame.symbol_address() as usize));
            raw.len() < limit
        });

        let start = match find_anchor(&raw, anchor) {
            Some(pos) => pos + 1 + skip,
            None => {
                log::trace!(
                    "call stack anchor not found among {} frames, skip counted from the unwinder",
                    raw.len()
                );
                skip
            }
        };

        let available = raw.len().saturating_sub(start);
        if available > Self::MAX_DEPTH {
            log::trace!("call stack truncated from {available} to {} frames", Self::MAX_DEPTH);
        }

        raw.iter()
            .skip(start)
            .take(Self::MAX_DEPTH)
            .map(|&(ip, _)| ip)
            .collect::<Vec<_>>()
            .into()
    }

    /// Stack made of instruction pointers captured elsewhere
    pub fn from_ips(ips: impl Into<Vec<usize>>) -> Self {
        let ips: Vec<usize> = ips.into();
        ips.into()
    }

    /// Raw instruction pointers, innermost first
    #[must_use]
    pub fn ips(&self) -> &[usize] {
        &self.ips
    }

    /// Number of captured frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.ips.len()
    }

    /// Whether nothing was captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }

    /// Innermost frame, resolving only that one.
    ///
    /// Returns [`Frame::unknown`] for an empty stack.
    #[must_use]
    pub fn head_frame(&self) -> Frame {
        let Some(&ip) = self.ips.first() else {
            return Frame::unknown(0);
        };
        let mut head = None;
        backtrace::resolve(ip as *mut c_void, |symbol| {
            if head.is_none() {
                head = Some(frame_of(symbol, ip));
            }
        });
        head.unwrap_or_else(|| unresolved(ip))
    }

    /// All frames, innermost first.
    ///
    /// Inlined calls expand to one frame each; a pointer that cannot be
    /// resolved contributes a single [`Frame::unknown`].
    #[must_use]
    pub fn frames(&self) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(self.ips.len());
        for &ip in self.ips.iter() {
            let before = frames.len();
            backtrace::resolve(ip as *mut c_void, |symbol| frames.push(frame_of(symbol, ip)));
            if frames.len() == before {
                frames.push(unresolved(ip));
            }
        }
        frames
    }
}

impl From<Vec<usize>> for CallStack {
    fn from(ips: Vec<usize>) -> Self {
        Self { ips: ips.into() }
    }
}

fn find_anchor(raw: &[(usize, usize)], anchor: usize) -> Option<usize> {
    let window = &raw[..raw.len().min(ANCHOR_SEARCH)];
    window
        .iter()
        .position(|&(_, symbol)| symbol == anchor)
        .or_else(|| window.iter().position(|&(ip, _)| is_capture_symbol(ip)))
}

/// Fallback for unwinders that report no symbol address
fn is_capture_symbol(ip: usize) -> bool {
    let mut found = false;
    backtrace::resolve(ip as *mut c_void, |symbol| {
        if let Some(name) = symbol.name() {
            found |= format!("{name:#}").ends_with("CallStack::capture");
        }
    });
    found
}

fn frame_of(symbol: &backtrace::Symbol, ip: usize) -> Frame {
    let path = symbol
        .filename()
        .map_or_else(|| frame::UNKNOWN.to_string(), |path| path.display().to_string());
    let function = symbol
        .name()
        .map_or_else(|| frame::UNKNOWN.to_string(), |name| format!("{name:#}"));
    Frame::new(path, symbol.lineno().unwrap_or(0), function, ip)
}

fn unresolved(ip: usize) -> Frame {
    log::debug!("no symbol for instruction pointer {ip:#x}");
    Frame::unknown(ip)
}

impl fmt::Display for CallStack {
    /// `pkg::f: pkg::g: ...` from the innermost frame; the alternate form
    /// prints one `[pkg::func] path:line` per line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frames = self.frames();
        if f.alternate() {
            for frame in &frames {
                writeln!(f, "{frame:#}")?;
            }
            return Ok(());
        }
        for (i, frame) in frames.iter().enumerate() {
            if i > 0 {
                f.write_str(": ")?;
            }
            f.write_str(&frame.qualified_func())?;
        }
        Ok(())
    }
}

impl fmt::Debug for CallStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.frames().iter().map(|frame| format!("{frame}")))
            .finish()
    }
}

impl Field for CallStack {
    fn key(&self) -> Key {
        Key::CALL_STACK
    }

    fn format_error(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.head_frame().qualified_func())
    }
}
