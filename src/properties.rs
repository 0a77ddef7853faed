//! Editable `.properties` files
//!
//! Loads a flat key/value file into an ordered line list, lets callers change
//! individual keys, and writes the whole file back. Lines that were not
//! touched (comments, blank lines, other entries, continuation layout) are
//! written back byte-for-byte.
//!
//! Files are treated as ISO-8859-1: every byte maps to one `char`, so any
//! input survives a load/store cycle unchanged. Generated lines only contain
//! printable ASCII; everything else is written as `\uXXXX`.

use std::path::Path;
use tracing::debug;

use crate::error::{ModpruneError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: String,
    value: String,
    /// Original physical text including line terminators; `None` once modified
    raw: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Comment or blank line, kept as read
    Verbatim(String),
    Entry(Entry),
}

/// Ordered, comment-preserving property store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFile {
    lines: Vec<Line>,
    newline: &'static str,
}

impl Default for PropertyFile {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            newline: "\n",
        }
    }
}

impl PropertyFile {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from `path`.
    ///
    /// A missing file yields an empty store; any other read failure is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => {
                let file = Self::parse(&bytes);
                debug!("Loaded {} properties from {:?}", file.len(), path);
                Ok(file)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No properties at {:?}, starting empty", path);
                Ok(Self::new())
            }
            Err(e) => Err(ModpruneError::read_properties(path, e)),
        }
    }

    /// Write the whole store to `path`
    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_bytes())
            .map_err(|e| ModpruneError::write_properties(path, e))?;
        debug!("Stored {} properties to {:?}", self.len(), path);
        Ok(())
    }

    /// Parse file content
    pub fn parse(bytes: &[u8]) -> Self {
        let text: String = bytes.iter().map(|&b| char::from(b)).collect();
        let physical = split_lines(&text);
        let newline = physical
            .iter()
            .find_map(|line| line_terminator(line))
            .unwrap_or("\n");

        let mut lines = Vec::new();
        let mut iter = physical.into_iter();
        while let Some(first) = iter.next() {
            let content = strip_terminator(first);
            let trimmed = content.trim_start_matches(is_blank);
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                lines.push(Line::Verbatim(first.to_string()));
                continue;
            }

            let mut raw = first.to_string();
            let mut logical = trimmed.to_string();
            while continues(&logical) {
                logical.pop();
                match iter.next() {
                    Some(next) => {
                        raw.push_str(next);
                        logical.push_str(strip_terminator(next).trim_start_matches(is_blank));
                    }
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            lines.push(Line::Entry(Entry {
                key,
                value,
                raw: Some(raw),
            }));
        }

        Self { lines, newline }
    }

    /// Serialize the store.
    ///
    /// Untouched lines are emitted as read; changed entries as `key=value`.
    /// An unterminated entry ending in a continuation backslash is rewritten
    /// when another line follows it, so the next line is not absorbed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            let followed = i + 1 < self.lines.len();
            let text = match line {
                Line::Verbatim(text) => text.clone(),
                Line::Entry(entry) => match &entry.raw {
                    Some(raw) if !(followed && dangles(raw)) => raw.clone(),
                    _ => self.render(entry),
                },
            };
            if !out.is_empty() && !out.ends_with(['\n', '\r']) {
                out.push_str(self.newline);
            }
            out.push_str(&text);
        }
        out.chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
            .collect()
    }

    /// Value of `key`; the last entry wins when the key repeats
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries()
            .filter(|entry| entry.key == key)
            .last()
            .map(|entry| entry.value.as_str())
    }

    /// Set `key` to `value`.
    ///
    /// The last existing entry keeps its position and earlier duplicates are
    /// dropped; a new key is appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        let Some(last) = self
            .lines
            .iter()
            .rposition(|line| matches!(line, Line::Entry(entry) if entry.key == key))
        else {
            self.lines.push(Line::Entry(Entry {
                key,
                value,
                raw: None,
            }));
            return;
        };

        if let Line::Entry(entry) = &mut self.lines[last] {
            if entry.value != value {
                entry.value = value;
                entry.raw = None;
            }
        }

        let mut position = 0;
        self.lines.retain(|line| {
            let shadowed =
                position < last && matches!(line, Line::Entry(entry) if entry.key == key);
            position += 1;
            !shadowed
        });
    }

    /// Remove every entry named `key`, returning the value in force
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let previous = self.get(key).map(str::to_string);
        self.lines
            .retain(|line| !matches!(line, Line::Entry(entry) if entry.key == key));
        previous
    }

    /// Keys in file order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries().map(|entry| entry.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn render(&self, entry: &Entry) -> String {
        format!(
            "{}={}{}",
            escape(&entry.key, true),
            escape(&entry.value, false),
            self.newline
        )
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry(entry) => Some(entry),
            Line::Verbatim(_) => None,
        })
    }
}

// ============================================================================
// Parsing Helpers
// ============================================================================

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Split into physical lines, each keeping its terminator
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..=i]);
                start = i + 1;
            }
            b'\r' => {
                let end = if bytes.get(i + 1) == Some(&b'\n') { i + 1 } else { i };
                lines.push(&text[start..=end]);
                i = end;
                start = end + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn line_terminator(line: &str) -> Option<&'static str> {
    if line.ends_with("\r\n") {
        Some("\r\n")
    } else if line.ends_with('\n') {
        Some("\n")
    } else if line.ends_with('\r') {
        Some("\r")
    } else {
        None
    }
}

fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// A logical line continues when it ends with an odd number of backslashes
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Unterminated raw text whose final backslash would join the next line
fn dangles(raw: &str) -> bool {
    line_terminator(raw).is_none() && continues(raw)
}

fn split_entry(logical: &str) -> (String, String) {
    let chars: Vec<char> = logical.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '=' | ':' => break,
            c if is_blank(c) => break,
            _ => i += 1,
        }
    }
    let key_end = i.min(chars.len());

    let mut j = key_end;
    while j < chars.len() && is_blank(chars[j]) {
        j += 1;
    }
    if j < chars.len() && matches!(chars[j], '=' | ':') {
        j += 1;
        while j < chars.len() && is_blank(chars[j]) {
            j += 1;
        }
    }

    let key: String = chars[..key_end].iter().collect();
    let value: String = chars[j..].iter().collect();
    (unescape(&key), unescape(&value))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut units: Vec<u16> = Vec::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'u') {
            chars.next();
            let hex: String = chars.clone().take(4).collect();
            if hex.len() == 4 {
                if let Ok(unit) = u16::from_str_radix(&hex, 16) {
                    for _ in 0..4 {
                        chars.next();
                    }
                    units.push(unit);
                    continue;
                }
            }
            flush_units(&mut units, &mut out);
            out.push('u');
            continue;
        }

        flush_units(&mut units, &mut out);
        if c == '\\' {
            match chars.next() {
                Some('t') => out.push('\t'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('f') => out.push('\x0c'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    flush_units(&mut units, &mut out);
    out
}

fn flush_units(units: &mut Vec<u16>, out: &mut String) {
    if units.is_empty() {
        return;
    }
    out.extend(
        char::decode_utf16(units.drain(..)).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
}

fn escape(s: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '=' | ':' | '#' | '!' if is_key => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
