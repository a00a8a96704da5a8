//! Brace-aware block tokenizer
//!
//! Splits actor script text into top-level statements and nested `{ ... }`
//! groups in a single left-to-right scan, then selects the statements that
//! run without any game state ("immediate" statements).

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

/// Guard headers whose bodies run as soon as the level opens.
static IMMEDIATE_GUARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^if\s*\(\s*(created|playerenters)\s*\)$").unwrap()
});

/// One tokenized unit of script text
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A statement, trimmed, without its terminating `;`
    Statement(String),
    /// A braced group and the statement text that introduced it
    Group { header: String, body: Vec<Block> },
}

struct Frame {
    header: String,
    body: Vec<Block>,
}

struct Scanner {
    root: Vec<Block>,
    stack: Vec<Frame>,
    pending: String,
    /// The last statement was ended by a newline rather than `;`, so it may
    /// still turn out to be the header of a group opened on the next line.
    open_line: bool,
}

impl Scanner {
    fn new() -> Self {
        Self {
            root: Vec::new(),
            stack: Vec::new(),
            pending: String::new(),
            open_line: false,
        }
    }

    fn current(&mut self) -> &mut Vec<Block> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.body,
            None => &mut self.root,
        }
    }

    fn flush(&mut self, by_newline: bool) {
        let text = self.pending.trim().to_string();
        self.pending.clear();
        if text.is_empty() {
            return;
        }
        self.current().push(Block::Statement(text));
        self.open_line = by_newline;
    }

    fn open_group(&mut self) {
        let mut header = self.pending.trim().to_string();
        self.pending.clear();
        if header.is_empty() && self.open_line {
            if let Some(Block::Statement(prev)) = self.current().pop() {
                header = prev;
            }
        }
        self.open_line = false;
        self.stack.push(Frame { header, body: Vec::new() });
    }

    fn close_group(&mut self, offset: usize) {
        self.flush(false);
        self.open_line = false;
        let Some(frame) = self.stack.pop() else {
            warn!(offset, "unmatched closing brace in script");
            return;
        };
        self.current().push(Block::Group { header: frame.header, body: frame.body });
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush(false);
        if !self.stack.is_empty() {
            debug!(depth = self.stack.len(), "closing unterminated script groups");
        }
        while !self.stack.is_empty() {
            self.close_group(0);
        }
        self.root
    }
}

/// Tokenize script text into statements and nested groups.
pub fn find_blocks(src: &str) -> Vec<Block> {
    let mut scanner = Scanner::new();
    let mut chars = src.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                // Line comment: drop everything up to the newline
                while let Some(&(_, next)) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '"' => {
                scanner.pending.push(c);
                while let Some((_, next)) = chars.next() {
                    scanner.pending.push(next);
                    if next == '\\' {
                        if let Some((_, escaped)) = chars.next() {
                            scanner.pending.push(escaped);
                        }
                    } else if next == '"' {
                        break;
                    }
                }
            }
            ';' => scanner.flush(false),
            '\n' => scanner.flush(true),
            '{' => scanner.open_group(),
            '}' => scanner.close_group(offset),
            _ => scanner.pending.push(c),
        }
    }

    scanner.finish()
}

/// Whether a group header guards code that runs without game state.
pub fn is_immediate_guard(header: &str) -> bool {
    IMMEDIATE_GUARD.is_match(header.trim())
}

/// Statements that execute as soon as the level is opened: every top-level
/// statement, plus the direct statements of `if (created)` and
/// `if (playerenters)` groups. Nested groups are never immediate.
pub fn find_immediates(src: &str) -> Vec<String> {
    let mut found = Vec::new();
    for block in find_blocks(src) {
        match block {
            Block::Statement(text) => found.push(text),
            Block::Group { header, body } if is_immediate_guard(&header) => {
                found.extend(body.into_iter().filter_map(|b| match b {
                    Block::Statement(text) => Some(text),
                    Block::Group { .. } => None,
                }));
            }
            Block::Group { .. } => {}
        }
    }
    found
}
