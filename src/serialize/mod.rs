//! Encoding events into frames for message-oriented writers.

use crate::error::{Error, Result};
use crate::logger::LogEvent;
use chrono::SecondsFormat;
use serde::Serialize;
use ulid::Ulid;

pub trait Serializer: Send + Sync {
    /// `formatted` is the owning writer's formatter output for `event`.
    ///
    /// # Errors
    /// `Serialize` when the frame cannot be encoded.
    fn serialize(&self, event: &LogEvent, formatted: &str) -> Result<Vec<u8>>;

    fn type_name(&self) -> &'static str;
}

/// One flat object per frame.
#[derive(Debug, Serialize)]
struct JsonFrame<'a> {
    id: String,
    ts: String,
    level: &'a str,
    logger: &'a str,
    message: &'a str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, event: &LogEvent, formatted: &str) -> Result<Vec<u8>> {
        let frame = JsonFrame {
            id: Ulid::new().to_string(),
            ts: event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, false),
            level: event.level.as_str(),
            logger: event.logger_display(),
            message: formatted.trim_end_matches('\n'),
        };
        serde_json::to_vec(&frame).map_err(|e| Error::Serialize(format!("JSON frame: {e}")))
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// The formatted text as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSerializer;

impl Serializer for TextSerializer {
    fn serialize(&self, _event: &LogEvent, formatted: &str) -> Result<Vec<u8>> {
        Ok(formatted.as_bytes().to_vec())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
