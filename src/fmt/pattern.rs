//! `%`-token layouts such as `"%d %p [%c] %m%n"`.

use super::Formatter;
use crate::logger::LogEvent;
use std::fmt::Write;

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Known tokens; unknown `%x` sequences pass through as literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternToken {
    Message,
    Newline,
    Level,
    Logger,
    Thread,
    /// strftime format for the event's local timestamp.
    Date(String),
}

/// Parsing into segments once avoids re-scanning the pattern on every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    Literal(String),
    Token(PatternToken),
}

/// Parsed once, rendered per event.
#[derive(Debug, Clone)]
pub struct PatternFormatter {
    pattern: String,
    segments: Vec<PatternSegment>,
}

impl PatternFormatter {
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            segments: Self::parse(pattern),
        }
    }

    #[must_use]
    pub fn parse(pattern: &str) -> Vec<PatternSegment> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let chars: Vec<char> = pattern.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            if chars[i] != '%' || i + 1 >= chars.len() {
                current.push(chars[i]);
                i += 1;
                continue;
            }

            let token = match chars[i + 1] {
                'm' => Some(PatternToken::Message),
                'n' => Some(PatternToken::Newline),
                'p' => Some(PatternToken::Level),
                'c' => Some(PatternToken::Logger),
                't' => Some(PatternToken::Thread),
                'd' => Some(PatternToken::Date(DEFAULT_DATE_FORMAT.to_string())),
                '%' => {
                    current.push('%');
                    i += 2;
                    continue;
                }
                _ => None,
            };

            let Some(mut token) = token else {
                current.push(chars[i]);
                i += 1;
                continue;
            };
            i += 2;

            // %d{...} carries its own strftime format
            if matches!(token, PatternToken::Date(_))
                && chars.get(i) == Some(&'{')
                && let Some(len) = chars[i..].iter().position(|&c| c == '}')
            {
                token = PatternToken::Date(chars[i + 1..i + len].iter().collect());
                i += len + 1;
            }

            if !current.is_empty() {
                segments.push(PatternSegment::Literal(std::mem::take(&mut current)));
            }
            segments.push(PatternSegment::Token(token));
        }

        if !current.is_empty() {
            segments.push(PatternSegment::Literal(current));
        }
        segments
    }

    #[must_use]
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }
}

impl Formatter for PatternFormatter {
    fn format(&self, event: &LogEvent) -> String {
        let mut out = String::with_capacity(self.pattern.len() + event.message.len());
        for segment in &self.segments {
            match segment {
                PatternSegment::Literal(text) => out.push_str(text),
                PatternSegment::Token(PatternToken::Message) => out.push_str(&event.message),
                PatternSegment::Token(PatternToken::Newline) => out.push('\n'),
                PatternSegment::Token(PatternToken::Level) => {
                    out.push_str(&event.level.as_str().to_uppercase());
                }
                PatternSegment::Token(PatternToken::Logger) => {
                    out.push_str(event.logger_display());
                }
                PatternSegment::Token(PatternToken::Thread) => {
                    out.push_str(event.thread.as_deref().unwrap_or("-"));
                }
                PatternSegment::Token(PatternToken::Date(format)) => {
                    // A bad strftime spec truncates the date instead of panicking mid-write
                    let _ = write!(out, "{}", event.timestamp.format(format));
                }
            }
        }
        out
    }

    fn pattern(&self) -> Option<&str> {
        Some(&self.pattern)
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
    fn message_and_newline() {
        let formatter = PatternFormatter::new("%m%n");
        let event = LogEvent::new("app", Level::Info, "hello");
        assert_eq!(formatter.format(&event), "hello\n");
    }

    #[test]
    fn unknown_tokens_stay_literal() {
        let formatter = PatternFormatter::new("%q %p %%");
        let event = LogEvent::new("", Level::Warn, "x");
        assert_eq!(formatter.format(&event), "%q WARN %");
    }

    #[test]
    fn custom_date_format() {
        let segments = PatternFormatter::parse("%d{%Y}|%c");
        assert_eq!(
            segments,
            vec![
                PatternSegment::Token(PatternToken::Date("%Y".to_string())),
                PatternSegment::Literal("|".to_string()),
                PatternSegment::Token(PatternToken::Logger),
            ]
        );
    }

    #[test]
    fn trailing_percent_is_literal() {
        let formatter = PatternFormatter::new("100%");
        let event = LogEvent::new("", Level::Info, "");
        assert_eq!(formatter.format(&event), "100%");
    }
}
