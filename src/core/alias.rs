//! Password alias references.
//!
//! A secret property may hold either the secret itself or a reference of the
//! form `${alias=<name>}` pointing into the credential store.

use std::fmt;

const ALIAS_PREFIX: &str = "${alias=";
const ALIAS_SUFFIX: char = '}';

/// A secret property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretValue {
    /// The secret (or a path to it) stored as-is.
    Literal(String),
    /// A credential store alias.
    AliasRef(String),
}

impl SecretValue {
    /// Classify a raw property value.
    pub fn parse(text: &str) -> Self {
        match decode(text) {
            Some(alias) => Self::AliasRef(alias.to_string()),
            None => Self::Literal(text.to_string()),
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Self::AliasRef(_))
    }

    /// Alias name, if this is a reference.
    pub fn alias(&self) -> Option<&str> {
        match self {
            Self::AliasRef(alias) => Some(alias),
            Self::Literal(_) => None,
        }
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.write_str(value),
            Self::AliasRef(alias) => f.write_str(&encode(alias)),
        }
    }
}

/// Wrap an alias name as `${alias=<alias>}`.
pub fn encode(alias: &str) -> String {
    format!("{}{}{}", ALIAS_PREFIX, alias, ALIAS_SUFFIX)
}

/// Whether `text` starts with a well-formed alias reference.
///
/// Only the start of the string is checked: `${alias=a.b}tail` is accepted.
pub fn is_alias(text: &str) -> bool {
    let Some(rest) = text.strip_prefix(ALIAS_PREFIX) else {
        return false;
    };
    let ident_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'.')
        .count();
    ident_len > 0 && rest[ident_len..].starts_with(ALIAS_SUFFIX)
}

/// Extract the alias name from an alias reference.
///
/// Drops the prefix and the final character. Returns `None` unless
/// [`is_alias`] holds.
pub fn decode(text: &str) -> Option<&str> {
    if !is_alias(text) {
        return None;
    }
    let mut chars = text[ALIAS_PREFIX.len()..].chars();
    chars.next_back();
    Some(chars.as_str())
}
