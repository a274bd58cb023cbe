//! Bounds checks between untrusted configuration text and object construction.
//!
//! A configuration document is potentially attacker-influenced input, so every
//! scalar a memento handler stores passes through a [`SecurityPolicy`] first.
//! Constraints are keyed `"<type>::<field>"`; the raw text of a numeric field is
//! checked separately under `"<type>::<field>(text)"` before it is parsed.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// Raw text of a numeric field never needs more than this.
pub const NUMERIC_TEXT_MAX: usize = 32;
/// Longest token a boolean field accepts (`"false"`).
pub const BOOLEAN_TEXT_MAX: usize = 5;
/// Enumerated tokens such as levels, streams and periods.
pub const TOKEN_TEXT_MAX: usize = 16;
pub const NAME_TEXT_MAX: usize = 256;
pub const PATTERN_TEXT_MAX: usize = 1024;
pub const PATH_TEXT_MAX: usize = 4096;
pub const PROPERTY_TEXT_MAX: usize = 4096;

/// A single registered bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Inclusive integer range.
    Integer { min: i64, max: i64 },
    /// Maximum length in bytes.
    Text { max_len: usize },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer { min, max } => write!(f, "in [{min}, {max}]"),
            Self::Text { max_len } => write!(f, "at most {max_len} bytes"),
        }
    }
}

/// Key under which the raw text of a numeric field is length-checked.
#[must_use]
pub fn text_key(key: &str) -> String {
    format!("{key}(text)")
}

/// Registry of constraints; holds no state besides the registered bounds.
#[derive(Debug, Clone, Default)]
pub struct SecurityPolicy {
    integers: HashMap<String, (i64, i64)>,
    texts: HashMap<String, usize>,
}

impl SecurityPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins: mementos sharing a field name may register it more than once.
    pub fn set_integer(&mut self, key: impl Into<String>, min: i64, max: i64) {
        self.integers.insert(key.into(), (min, max));
    }

    pub fn set_text(&mut self, key: impl Into<String>, max_len: usize) {
        self.texts.insert(key.into(), max_len);
    }

    /// Registers both stages of a numeric field: raw text length and parsed range.
    pub fn set_numeric(&mut self, key: &str, min: i64, max: i64) {
        self.set_text(text_key(key), NUMERIC_TEXT_MAX);
        self.set_integer(key, min, max);
    }

    /// Registers a boolean field's token length.
    pub fn set_boolean(&mut self, key: &str) {
        self.set_text(key, BOOLEAN_TEXT_MAX);
    }

    #[must_use]
    pub fn constraint(&self, key: &str) -> Option<Constraint> {
        if let Some(&(min, max)) = self.integers.get(key) {
            return Some(Constraint::Integer { min, max });
        }
        self.texts
            .get(key)
            .map(|&max_len| Constraint::Text { max_len })
    }

    /// Returns `value` unchanged when it lies within the registered range.
    ///
    /// # Errors
    /// `Validation` when out of range, `UnregisteredConstraint` when `key` was never registered.
    pub fn validate_integer(&self, key: &str, value: i64) -> Result<i64> {
        let &(min, max) = self
            .integers
            .get(key)
            .ok_or_else(|| Error::UnregisteredConstraint {
                key: key.to_string(),
            })?;
        if value < min || value > max {
            return Err(Error::validation(
                key,
                value,
                Constraint::Integer { min, max },
            ));
        }
        Ok(value)
    }

    /// Returns `value` unchanged when its byte length is within the registered maximum.
    ///
    /// # Errors
    /// `Validation` when too long, `UnregisteredConstraint` when `key` was never registered.
    pub fn validate_text<'a>(&self, key: &str, value: &'a str) -> Result<&'a str> {
        let &max_len = self
            .texts
            .get(key)
            .ok_or_else(|| Error::UnregisteredConstraint {
                key: key.to_string(),
            })?;
        if value.len() > max_len {
            return Err(Error::validation(key, value, Constraint::Text { max_len }));
        }
        Ok(value)
    }

    /// Validated owned copy of a text field.
    ///
    /// # Errors
    /// See [`Self::validate_text`].
    pub fn text(&self, key: &str, value: &str) -> Result<String> {
        self.validate_text(key, value).map(ToString::to_string)
    }

    /// Two-stage numeric parse: text length first, then the parsed value's range.
    ///
    /// # Errors
    /// Either stage's `Validation` error, or `InvalidValue` when the text is not an integer.
    pub fn integer(&self, key: &str, value: &str) -> Result<i64> {
        let raw = self.validate_text(&text_key(key), value)?.trim();
        let parsed = raw
            .parse::<i64>()
            .map_err(|_| Error::invalid(key, raw, "not an integer"))?;
        self.validate_integer(key, parsed)
    }

    /// Booleans are validated text, then a strict case-insensitive token match.
    ///
    /// # Errors
    /// `Validation` when the token is too long, `InvalidValue` for any other token.
    pub fn boolean(&self, key: &str, value: &str) -> Result<bool> {
        let raw = self.validate_text(key, value.trim())?;
        parse_bool(raw).ok_or_else(|| Error::invalid(key, raw, "expected true or false"))
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    match token.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_is_checked_before_parsing() {
        let mut policy = SecurityPolicy::new();
        policy.set_numeric("numbered_file_roller::max_index", 1, 1000);
        let long = "1".repeat(NUMERIC_TEXT_MAX + 1);
        let err = policy
            .integer("numbered_file_roller::max_index", &long)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation { ref key, .. } if key == "numbered_file_roller::max_index(text)"
        ));
    }

    #[test]
    fn boolean_rejects_unknown_tokens() {
        let mut policy = SecurityPolicy::new();
        policy.set_boolean("file_writer::flush");
        assert!(policy.boolean("file_writer::flush", "TRUE").unwrap());
        assert!(!policy.boolean("file_writer::flush", "Off").unwrap());
        assert!(matches!(
            policy.boolean("file_writer::flush", "maybe"),
            Err(Error::InvalidValue { .. })
        ));
    }
}
