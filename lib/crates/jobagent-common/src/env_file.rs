//! Line-preserving `.env` document.
//!
//! The file is `KEY=value` per line with `#` comments and blank lines. Edits
//! keep every untouched line byte-for-byte, so rewriting a file the user has
//! annotated only changes the assignments that actually differ.
//!
//! Key matching is exact: a line belongs to `ENGINE_DIR` only if the name
//! between the start of the line (after an optional `export`) and the `=` is
//! exactly `ENGINE_DIR`. `MODEL_ENGINE_DIR=` and `ENGINE_DIR_OLD=` never match.

#![allow(clippy::expect_used)] // Regex patterns are compile-time constants

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

static ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+)?([A-Za-z_][A-Za-z0-9_]*)=(.*)$").expect("valid regex")
});

/// Errors raised when editing an [`EnvDocument`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvFileError {
    #[error("invalid .env key '{0}': must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidKey(String),

    #[error("value for {key} spans multiple lines")]
    MultilineValue { key: String },
}

/// What an edit did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// A new assignment line was appended.
    Inserted,
    /// An existing assignment was rewritten with a different value.
    Updated,
    /// The document already held this exact assignment (or the key, for
    /// insert-only edits).
    Unchanged,
}

/// An ordered list of `.env` lines with key-aware editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvDocument {
    lines: Vec<String>,
}

impl EnvDocument {
    /// Empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse file contents. Never fails: lines that are not assignments are
    /// kept verbatim.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(String::from).collect(),
        }
    }

    /// Returns `true` if any line assigns `key`, even to an empty value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.lines.iter().any(|l| key_of(l) == Some(key))
    }

    /// Value of the last assignment to `key`, unquoted.
    ///
    /// The last assignment wins, as it would when the file is sourced.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.lines
            .iter()
            .rev()
            .find_map(|l| {
                let caps = ASSIGNMENT_RE.captures(l)?;
                (caps.get(1)?.as_str() == key).then(|| caps.get(2).map_or("", |m| m.as_str()))
            })
            .map(unquote)
    }

    /// Set `key` to `value`: every existing assignment line for the key is
    /// rewritten in place, or a new line is appended when none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is not a valid variable name or `value`
    /// contains a newline.
    pub fn upsert(&mut self, key: &str, value: &str) -> Result<Edit, EnvFileError> {
        let line = assignment(key, value)?;
        let mut found = false;
        let mut changed = false;
        for existing in &mut self.lines {
            if key_of(existing) == Some(key) {
                found = true;
                if *existing != line {
                    existing.clone_from(&line);
                    changed = true;
                }
            }
        }
        if !found {
            self.lines.push(line);
            return Ok(Edit::Inserted);
        }
        Ok(if changed { Edit::Updated } else { Edit::Unchanged })
    }

    /// Append `key=value` only when the key is not assigned anywhere yet.
    /// An existing assignment, including an empty one, is left alone.
    ///
    /// # Errors
    ///
    /// Same as [`EnvDocument::upsert`].
    pub fn insert_if_missing(&mut self, key: &str, value: &str) -> Result<Edit, EnvFileError> {
        let line = assignment(key, value)?;
        if self.contains_key(key) {
            return Ok(Edit::Unchanged);
        }
        self.lines.push(line);
        Ok(Edit::Inserted)
    }

    /// Returns `true` if a line equal to `marker` (ignoring surrounding
    /// whitespace) is present.
    #[must_use]
    pub fn has_marker(&self, marker: &str) -> bool {
        self.lines.iter().any(|l| l.trim() == marker)
    }

    /// Append `marker` followed by `body` unless the marker is already present.
    ///
    /// Returns `true` if the block was appended.
    pub fn append_block_once(&mut self, marker: &str, body: &[&str]) -> bool {
        if self.has_marker(marker) {
            return false;
        }
        if self.lines.last().is_some_and(|l| !l.trim().is_empty()) {
            self.lines.push(String::new());
        }
        self.lines.push(marker.to_string());
        self.lines.extend(body.iter().map(|l| (*l).to_string()));
        true
    }

    /// Serialize back to file contents, newline-terminated.
    #[must_use]
    pub fn render(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

fn key_of(line: &str) -> Option<&str> {
    ASSIGNMENT_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn assignment(key: &str, value: &str) -> Result<String, EnvFileError> {
    if !KEY_RE.is_match(key) {
        return Err(EnvFileError::InvalidKey(key.to_string()));
    }
    if value.contains('\n') || value.contains('\r') {
        return Err(EnvFileError::MultilineValue {
            key: key.to_string(),
        });
    }
    Ok(format!("{key}={}", quote(value)))
}

fn is_bare(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_./:@%+,-=".contains(c)
}

/// Double-quote values that would otherwise be split or expanded.
///
/// Escapes only `"`, `\` and `$`, the set dotenv readers accept inside
/// double quotes. A backtick stays literal.
fn quote(value: &str) -> String {
    if value.chars().all(is_bare) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn unquote(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        let mut out = String::with_capacity(raw.len());
        let mut chars = raw[1..raw.len() - 1].chars();
        while let Some(c) = chars.next() {
            if c == '\\'
                && let Some(next) = chars.next()
            {
                out.push(next);
            } else {
                out.push(c);
            }
        }
        return out;
    }
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].to_string();
    }
    // Unquoted: an inline comment starts at whitespace followed by '#'.
    match raw.find(" #").or_else(|| raw.find("\t#")) {
        Some(idx) => raw[..idx].trim_end().to_string(),
        None => raw.to_string(),
    }
}
