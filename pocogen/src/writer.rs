//! Scoped text writer: an append-only buffer with an indentation depth
//!
//! Every line written through [`CodeWriter::write_line`] is prefixed with the
//! indentation unit repeated `depth` times. Multi-line fragments are
//! re-indented as a unit: their common leading whitespace is stripped first,
//! so template literals can be written at whatever nesting the Rust source
//! happens to have.
//!
//! ```
//! use pocogen::CodeWriter;
//!
//! let mut w = CodeWriter::new();
//! w.with_block("public class Person", |w| {
//!     w.write_line("public int Id { get; set; }");
//!     Ok::<_, pocogen::Error>(())
//! })
//! .unwrap();
//!
//! assert_eq!(
//!     w.as_str(),
//!     "public class Person\n{\n    public int Id { get; set; }\n}\n"
//! );
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::error::{Error, Result};

/// Indentation unit used by [`CodeWriter::new`]
pub const DEFAULT_INDENT_UNIT: &str = "    ";

/// In-memory accumulator of generated text for one destination
#[derive(Debug, Clone)]
pub struct CodeWriter {
    text: String,
    depth: usize,
    indent_unit: String,
}

impl CodeWriter {
    /// Create an empty writer indenting with four spaces
    pub fn new() -> Self {
        Self::with_indent_unit(DEFAULT_INDENT_UNIT)
    }

    /// Create an empty writer with a custom indentation unit
    pub fn with_indent_unit(indent_unit: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            depth: 0,
            indent_unit: indent_unit.into(),
        }
    }

    /// Current indentation depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    /// Text accumulated so far
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Write a line at the current depth.
    ///
    /// Text containing line breaks is treated as a fragment: a blank first
    /// and a blank last line are dropped, the common leading whitespace of
    /// the non-blank lines is stripped, and each remaining line is written at
    /// the current depth. Blank lines stay empty: empty text, like a
    /// whitespace-only line inside a fragment, is written as a bare line
    /// break at any depth.
    pub fn write_line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if text.contains('\n') {
            for line in dedent(text) {
                self.push_line(line);
            }
        } else {
            self.push_line(text.strip_suffix('\r').unwrap_or(text));
        }
        self
    }

    /// Write an empty line (no indentation)
    pub fn blank_line(&mut self) -> &mut Self {
        self.push_line("");
        self
    }

    pub fn increase_indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    /// Decrease the depth by one; fails at depth zero.
    pub fn decrease_indent(&mut self) -> Result<&mut Self> {
        if self.depth == 0 {
            return Err(Error::InvalidIndentState { depth: self.depth });
        }
        self.depth -= 1;
        Ok(self)
    }

    /// Indent one level until the returned guard is dropped.
    ///
    /// The depth is restored to its value at this call on every exit path,
    /// whatever the guarded code did to it in between.
    pub fn indented(&mut self) -> IndentGuard<'_> {
        let restore_to = self.depth;
        self.depth += 1;
        IndentGuard {
            writer: self,
            restore_to,
        }
    }

    /// Write `header`, then `{`, run `body` one level deeper, then `}`.
    pub fn with_block<T, E>(
        &mut self,
        header: impl AsRef<str>,
        body: impl FnOnce(&mut CodeWriter) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let header = header.as_ref();
        if !header.is_empty() {
            self.write_line(header);
        }
        self.with_indented_section("{", "}", body)
    }

    /// Write `open`, run `body` one level deeper, then write `close`.
    ///
    /// Empty `open`/`close` texts are skipped rather than written as blank
    /// lines. On error the closing text is not written, but the depth is
    /// still restored.
    pub fn with_indented_section<T, E>(
        &mut self,
        open: impl AsRef<str>,
        close: impl AsRef<str>,
        body: impl FnOnce(&mut CodeWriter) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let open = open.as_ref();
        if !open.is_empty() {
            self.write_line(open);
        }

        let value = {
            let mut guard = self.indented();
            body(&mut guard)?
        };

        let close = close.as_ref();
        if !close.is_empty() {
            self.write_line(close);
        }
        Ok(value)
    }

    fn push_line(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.depth {
                self.text.push_str(&self.indent_unit);
            }
            self.text.push_str(line);
        }
        self.text.push('\n');
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CodeWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Restores the writer's depth when dropped (see [`CodeWriter::indented`])
pub struct IndentGuard<'a> {
    writer: &'a mut CodeWriter,
    restore_to: usize,
}

impl Deref for IndentGuard<'_> {
    type Target = CodeWriter;

    fn deref(&self) -> &CodeWriter {
        self.writer
    }
}

impl DerefMut for IndentGuard<'_> {
    fn deref_mut(&mut self) -> &mut CodeWriter {
        self.writer
    }
}

impl Drop for IndentGuard<'_> {
    fn drop(&mut self) {
        self.writer.depth = self.restore_to;
    }
}

/// Split a multi-line fragment into lines with common indentation removed.
///
/// Whitespace-only lines come back empty. A whitespace-only first or last
/// line is dropped, which lets callers open and close literals on their own
/// lines.
pub fn dedent(fragment: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = fragment
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    if lines.first().is_some_and(|l| is_blank(l)) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| is_blank(l)) {
        lines.pop();
    }

    let common = lines
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| leading_whitespace(l))
        .reduce(common_prefix)
        .map_or(0, str::len);

    lines
        .into_iter()
        .map(|l| if is_blank(l) { "" } else { &l[common..] })
        .collect()
}

fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

fn leading_whitespace(line: &str) -> &str {
    let len = line.bytes().take_while(|b| *b == b' ' || *b == b'\t').count();
    &line[..len]
}

// Both sides are ASCII whitespace, so a byte count is a valid char boundary.
fn common_prefix<'s>(a: &'s str, b: &'s str) -> &'s str {
    let len = a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count();
    &a[..len]
}
