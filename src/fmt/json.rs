//! One JSON object per event, for log shippers that parse rather than grep.

use super::Formatter;
use crate::logger::LogEvent;
use serde::Serialize;

/// Which clock the `ts` field is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZone {
    #[default]
    Local,
    Utc,
}

impl std::str::FromStr for TimeZone {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "utc" => Ok(Self::Utc),
            _ => Err(crate::Error::invalid(
                "json_formatter::time_zone",
                s,
                "expected local or utc",
            )),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonLine<'a> {
    ts: String,
    level: &'a str,
    logger: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread: Option<&'a str>,
    msg: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pretty: bool,
    time_zone: TimeZone,
}

impl JsonFormatter {
    #[must_use]
    pub const fn new(pretty: bool, time_zone: TimeZone) -> Self {
        Self { pretty, time_zone }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, event: &LogEvent) -> String {
        let ts = match self.time_zone {
            TimeZone::Local => event.timestamp.to_rfc3339(),
            TimeZone::Utc => event.timestamp.with_timezone(&chrono::Utc).to_rfc3339(),
        };
        let line = JsonLine {
            ts,
            level: event.level.as_str(),
            logger: event.logger_display(),
            thread: event.thread.as_deref(),
            msg: &event.message,
        };
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&line)
        } else {
            serde_json::to_string(&line)
        };
        // Plain string fields cannot fail to serialize
        let mut out = rendered.unwrap_or_default();
        out.push('\n');
        out
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    #[test]
    fn compact_line_is_parseable() {
        let formatter = JsonFormatter::new(false, TimeZone::Utc);
        let line = formatter.format(&LogEvent::new("db", Level::Error, "down"));
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["level"], "error");
        assert_eq!(value["logger"], "db");
        assert_eq!(value["msg"], "down");
    }
}
