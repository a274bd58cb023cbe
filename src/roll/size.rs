//! Size strings like `"500M"` or `"1GB"` converted to and from raw byte counts.

use super::FileRollTrigger;
use crate::logger::LogEvent;
use std::fs;
use std::path::Path;

/// `"10MB"`, `"1G"`, `"512k"`, or a plain byte count. Binary multiples.
#[must_use]
pub fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim().to_uppercase();
    let (num_str, multiplier): (&str, u64) = if s.ends_with("GB") || s.ends_with('G') {
        (
            s.trim_end_matches("GB").trim_end_matches('G'),
            1024 * 1024 * 1024,
        )
    } else if s.ends_with("MB") || s.ends_with('M') {
        (s.trim_end_matches("MB").trim_end_matches('M'), 1024 * 1024)
    } else if s.ends_with("KB") || s.ends_with('K') {
        (s.trim_end_matches("KB").trim_end_matches('K'), 1024)
    } else {
        (s.trim_end_matches('B'), 1)
    };

    let num_str = num_str.trim();
    if let Ok(whole) = num_str.parse::<u64>() {
        return whole.checked_mul(multiplier);
    }
    let fractional = num_str.parse::<f64>().ok()?;
    if !fractional.is_finite() || fractional < 0.0 {
        return None;
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let bytes = (fractional * multiplier as f64) as u64;
    Some(bytes)
}

/// Raw byte counts are unreadable in diagnostics.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let bytes_f = bytes as f64;

    if bytes >= 1024 * 1024 * 1024 {
        format!("{:.2} GB", bytes_f / (1024.0 * 1024.0 * 1024.0))
    } else if bytes >= 1024 * 1024 {
        format!("{:.2} MB", bytes_f / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.2} KB", bytes_f / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

/// Fires once the active file has reached `max_size` bytes.
#[derive(Debug, Clone)]
pub struct SizeFileRollTrigger {
    max_size: u64,
}

impl SizeFileRollTrigger {
    #[must_use]
    pub const fn new(max_size: u64) -> Self {
        Self { max_size }
    }

    #[must_use]
    pub const fn max_size(&self) -> u64 {
        self.max_size
    }
}

impl FileRollTrigger for SizeFileRollTrigger {
    fn is_triggered(&self, active: &Path, _event: &LogEvent) -> bool {
        fs::metadata(active).is_ok_and(|meta| meta.len() >= self.max_size)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
