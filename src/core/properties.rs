//! Ordered properties file.
//!
//! Reads and writes the flat, section-less `key=value` format used by
//! `ambari.properties`. Entry order is preserved across a load/store cycle:
//! updated keys stay where they are, new keys go to the end.
//!
//! Escapes follow `java.util.Properties`: `\\`, `\n`, `\r`, `\t` and `\f`
//! anywhere, `\=`, `\:` and `\ ` in keys, and `\ ` for a boundary space in
//! values. Any other escaped character stands for itself.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{PropertiesError, Result};

/// An ordered set of properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

impl Properties {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load properties from disk.
    ///
    /// # Errors
    ///
    /// Returns `PropertiesError::NotFound` if the file doesn't exist, or
    /// `PropertiesError::Read` if it cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading properties");

        if !path.exists() {
            return Err(PropertiesError::NotFound(path.to_path_buf()).into());
        }
        let contents = fs::read_to_string(path).map_err(|source| PropertiesError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let properties = Self::parse(&contents);
        debug!(entries = properties.len(), "properties loaded");
        Ok(properties)
    }

    /// Parse properties from a string.
    ///
    /// Blank lines and lines starting with `#` or `!` are skipped. The first
    /// unescaped `=` or `:` separates key from value.
    pub fn parse(contents: &str) -> Self {
        let mut properties = Self::new();

        for line in contents.lines() {
            let line = line.trim_start_matches(is_blank);
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let (key, value) = match find_separator(line) {
                Some(idx) => (&line[..idx], &line[idx + 1..]),
                None => (line, ""),
            };
            properties.set(unescape(trim_unescaped(key)), unescape(trim_unescaped(value)));
        }

        properties
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `key`, treating an empty value as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Value for `key`, or `default` when unset or empty.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_non_empty(key).unwrap_or(default)
    }

    /// Whether `key` is present (even with an empty value).
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Set `key` to `value`.
    ///
    /// Existing keys keep their position; new keys are appended. Returns
    /// `true` if the property set changed.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) if *existing == value => false,
            Some((_, existing)) => {
                *existing = value;
                true
            }
            None => {
                self.entries.push((key, value));
                true
            }
        }
    }

    /// Remove `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Drop every key not present in `keep`.
    pub fn retain_keys<V>(&mut self, keep: &BTreeMap<String, V>) {
        self.entries.retain(|(k, _)| keep.contains_key(k));
    }

    /// Keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// All entries in file order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to `key=value` lines.
    pub fn to_properties_string(&self) -> String {
        let mut output = String::new();
        for (key, value) in &self.entries {
            output.push_str(&escape_key(key));
            output.push('=');
            output.push_str(&escape_value(value));
            output.push('\n');
        }
        output
    }

    /// Write properties to `path`, backing up the previous file into the
    /// system temp directory first.
    ///
    /// # Errors
    ///
    /// Returns `PropertiesError::Write` if the file cannot be written. A failed
    /// backup is logged and does not abort the write.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        self.store_with_backup_dir(path, std::env::temp_dir())
    }

    /// Write properties to `path`, backing up the previous file into
    /// `backup_dir`.
    pub fn store_with_backup_dir(
        &self,
        path: impl AsRef<Path>,
        backup_dir: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();

        if path.exists() {
            if let Err(e) = backup_file(path, backup_dir.as_ref()) {
                warn!(path = %path.display(), error = %e, "could not back up properties file");
            }
        }

        debug!(path = %path.display(), entries = self.len(), "storing properties");
        fs::write(path, self.to_properties_string()).map_err(|source| PropertiesError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }
}

/// Copy `path` into `backup_dir` as `<name>.<n>`.
///
/// `n` is one more than the number of entries in `backup_dir` whose name
/// starts with the file name, so the highest number is the latest backup.
pub fn backup_file(path: &Path, backup_dir: &Path) -> std::io::Result<PathBuf> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let existing = fs::read_dir(backup_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(&name))
        .count();

    let target = backup_dir.join(format!("{}.{}", name, existing + 1));
    fs::copy(path, &target)?;
    debug!(backup = %target.display(), "backed up properties file");
    Ok(target)
}

/// Whitespace `java.util.Properties` ignores around keys and values.
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Byte offset of the first `=` or `:` not preceded by an escape.
fn find_separator(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '=' | ':' => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Trim blanks on both sides, keeping a trailing blank that is escaped.
fn trim_unescaped(text: &str) -> &str {
    let text = text.trim_start_matches(is_blank);
    let trimmed = text.trim_end_matches(is_blank);
    let backslashes = trimmed.chars().rev().take_while(|&c| c == '\\').count();
    if backslashes % 2 == 1 && trimmed.len() < text.len() {
        // Escaped blanks are single-byte
        &text[..trimmed.len() + 1]
    } else {
        trimmed
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(c) if hex.len() == 4 => {
                        out.push(c);
                        chars.nth(3);
                    }
                    _ => out.push('u'),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}

fn escape_common(c: char, out: &mut String) -> bool {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\x0c' => out.push_str("\\f"),
        _ => return false,
    }
    true
}

fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (idx, c) in key.chars().enumerate() {
        if escape_common(c, &mut out) {
            continue;
        }
        match c {
            '=' | ':' | ' ' => out.push('\\'),
            '#' | '!' if idx == 0 => out.push('\\'),
            _ => {}
        }
        out.push(c);
    }
    out
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let last = value.chars().count().saturating_sub(1);
    for (idx, c) in value.chars().enumerate() {
        if escape_common(c, &mut out) {
            continue;
        }
        if c == ' ' && (idx == 0 || idx == last) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
