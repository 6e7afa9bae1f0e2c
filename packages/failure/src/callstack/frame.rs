//! Resolved stack frames

use std::fmt;
use std::path::Path;

/// Placeholder used for anything that could not be resolved
pub(crate) const UNKNOWN: &str = "???";

/// One resolved location of a [`CallStack`](super::CallStack).
///
/// Package and short function name are derived from the demangled symbol
/// on demand. They are diagnostic text only: `pkg_path` is the module path
/// in front of the function, `func` is the function with its receiver type
/// and any trailing closure segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    path: String,
    line: u32,
    function: String,
    ip: usize,
}

impl Frame {
    /// Build a frame from already resolved parts
    pub fn new(path: impl Into<String>, line: u32, function: impl Into<String>, ip: usize) -> Self {
        let function: String = function.into();
        Self {
            path: path.into(),
            line,
            function: strip_hash(&function).to_string(),
            ip,
        }
    }

    /// Frame for an instruction pointer that could not be resolved
    #[must_use]
    pub fn unknown(ip: usize) -> Self {
        Self {
            path: UNKNOWN.to_string(),
            line: 0,
            function: UNKNOWN.to_string(),
            ip,
        }
    }

    /// Whether neither a file nor a function could be resolved
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.path == UNKNOWN && self.function == UNKNOWN
    }

    /// Full path of the source file
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Base name of the source file
    #[must_use]
    pub fn file(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.path)
    }

    /// Line number in the source file, 0 when unknown
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Fully qualified function name
    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Function name without its module path
    #[must_use]
    pub fn func(&self) -> &str {
        &self.function[split_function(&self.function).func_start..]
    }

    /// Module path of the function
    #[must_use]
    pub fn pkg_path(&self) -> &str {
        &self.function[..split_function(&self.function).pkg_end]
    }

    /// Last segment of [`pkg_path`](Self::pkg_path)
    #[must_use]
    pub fn pkg(&self) -> &str {
        let pkg_path = self.pkg_path();
        match separators(pkg_path).last() {
            Some(&sep) => &pkg_path[sep + 2..],
            None => pkg_path,
        }
    }

    /// `pkg::func`, or just `func` when there is no module path
    #[must_use]
    pub fn qualified_func(&self) -> String {
        match self.pkg() {
            "" => self.func().to_string(),
            pkg => format!("{pkg}::{}", self.func()),
        }
    }

    /// Instruction pointer the frame was resolved from
    #[must_use]
    pub fn ip(&self) -> usize {
        self.ip
    }
}

impl fmt::Display for Frame {
    /// `path:line`; the alternate form prefixes `[pkg::func]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "[{}] ", self.qualified_func())?;
        }
        write!(f, "{}:{}", self.path, self.line)
    }
}

struct Split {
    pkg_end: usize,
    func_start: usize,
}

fn split_function(name: &str) -> Split {
    let seps = separators(name);
    let start = |i: usize| if i == 0 { 0 } else { seps[i - 1] + 2 };
    let end = |i: usize| seps.get(i).copied().unwrap_or(name.len());
    let segment = |i: usize| &name[start(i)..end(i)];

    let mut idx = seps.len();
    while idx > 0 && segment(idx).starts_with('{') {
        idx -= 1;
    }
    if idx > 0 && is_receiver(segment(idx - 1)) {
        idx -= 1;
    }

    Split {
        pkg_end: if idx == 0 { 0 } else { seps[idx - 1] },
        func_start: start(idx),
    }
}

fn is_receiver(segment: &str) -> bool {
    segment.starts_with('<') || segment.chars().next().is_some_and(char::is_uppercase)
}

/// Byte offsets of `::` outside of `<...>`
fn separators(name: &str) -> Vec<usize> {
    let bytes = name.as_bytes();
    let mut depth = 0usize;
    let mut seps = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                seps.push(i);
                i += 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    seps
}

/// Drop the `::h0123456789abcdef` suffix of legacy mangled symbols
fn strip_hash(name: &str) -> &str {
    match name.rfind("::h") {
        Some(pos)
            if name.len() - pos == 19
                && name[pos + 3..].bytes().all(|b| b.is_ascii_hexdigit()) =>
        {
            &name[..pos]
        }
        _ => name,
    }
}
