//! Unified error type for every stage of a configuration run.
//!
//! A configuration run is all-or-nothing, so each variant carries enough context
//! (key, owning type, offending value) to be fixed from the message alone.

use crate::security::Constraint;

/// Values longer than this are cut in messages so a hostile document can't flood the status channel.
const MAX_REPORTED_VALUE: usize = 64;

/// Error type for loomlog operations.
#[derive(Debug)]
pub enum Error {
    /// A block's type tag has no registered factory.
    UnknownType { tag: String },
    /// A value violated the bounds registered in the security policy.
    Validation {
        key: String,
        value: String,
        constraint: Constraint,
    },
    /// A handler validated a key nobody registered a constraint for.
    UnregisteredConstraint { key: String },
    /// A factory found a mandatory field unset.
    RequiredField { owner: String, field: String },
    /// A nested block produced an object its parent has no use for.
    Wiring { parent: String, offered: String },
    /// A take-once slot was read after its content had already moved out.
    SlotConsumed { owner: String, slot: String },
    /// Within bounds, but not a legal token for the field.
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    /// Document syntax error reported by a format reader.
    Parse {
        format: &'static str,
        line: usize,
        column: usize,
        message: String,
    },
    /// Document nesting exceeded the configured maximum depth.
    NestingTooDeep { depth: u32, max: u32 },
    /// A serializer or formatter could not encode an event.
    Serialize(String),
    /// I/O error.
    Io(std::io::Error),
}

impl Error {
    pub(crate) fn validation(key: &str, value: impl ToString, constraint: Constraint) -> Self {
        Self::Validation {
            key: key.to_string(),
            value: shorten(&value.to_string()),
            constraint,
        }
    }

    pub(crate) fn required(owner: &str, field: &str) -> Self {
        Self::RequiredField {
            owner: owner.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: shorten(value),
            reason: reason.into(),
        }
    }

    pub(crate) fn wiring(parent: &str, offered: &str) -> Self {
        Self::Wiring {
            parent: parent.to_string(),
            offered: offered.to_string(),
        }
    }
}

fn shorten(value: &str) -> String {
    if value.len() <= MAX_REPORTED_VALUE {
        return value.to_string();
    }
    let mut end = MAX_REPORTED_VALUE;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &value[..end])
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownType { tag } => write!(f, "no such configurable type: '{tag}'"),
            Self::Validation {
                key,
                value,
                constraint,
            } => write!(f, "invalid value '{value}' for {key}: must be {constraint}"),
            Self::UnregisteredConstraint { key } => {
                write!(f, "no security constraint registered for {key}")
            }
            Self::RequiredField { owner, field } => {
                write!(f, "{owner}: required field '{field}' was not set")
            }
            Self::Wiring { parent, offered } => {
                write!(f, "{parent} does not know how to use a nested {offered}")
            }
            Self::SlotConsumed { owner, slot } => {
                write!(f, "{owner}: '{slot}' was already taken")
            }
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value '{value}' for {key}: {reason}")
            }
            Self::Parse {
                format,
                line,
                column,
                message,
            } => write!(f, "{format} parse error at {line}:{column}: {message}"),
            Self::NestingTooDeep { depth, max } => {
                write!(f, "configuration nested {depth} levels deep (max {max})")
            }
            Self::Serialize(msg) => write!(f, "serialization failed: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Shorthand used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_values_are_shortened() {
        let err = Error::invalid("file_writer::file_name", &"x".repeat(500), "too long");
        let msg = err.to_string();
        assert!(msg.contains("..."));
        assert!(msg.len() < 200);
    }

    #[test]
    fn shorten_respects_char_boundaries() {
        let value = "é".repeat(40);
        let short = shorten(&value);
        assert!(short.ends_with("..."));
    }
}
