//! Rolls at calendar boundaries. Knows its own schedule, so it doubles as the trigger.

use super::{FileRollTrigger, FileRoller};
use crate::compress::FileCompressor;
use crate::error::{Error, Result};
use crate::internal;
use crate::logger::LogEvent;
use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    /// strftime suffix used when the configuration names none.
    #[must_use]
    pub const fn default_pattern(self) -> &'static str {
        match self {
            Self::Minute => "%Y-%m-%d-%H-%M",
            Self::Hour => "%Y-%m-%d-%H",
            Self::Day | Self::Week => "%Y-%m-%d",
            Self::Month => "%Y-%m",
            Self::Year => "%Y",
        }
    }

    /// Start of the period containing `at`.
    #[must_use]
    pub fn start(self, at: NaiveDateTime) -> NaiveDateTime {
        let midnight = |date: NaiveDate| date.and_hms_opt(0, 0, 0).unwrap_or(at);
        match self {
            Self::Minute => at
                .with_second(0)
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(at),
            Self::Hour => at
                .with_minute(0)
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(at),
            Self::Day => midnight(at.date()),
            Self::Week => midnight(
                at.date() - TimeDelta::days(i64::from(at.weekday().num_days_from_monday())),
            ),
            Self::Month => midnight(at.date().with_day(1).unwrap_or(at.date())),
            Self::Year => midnight(
                NaiveDate::from_ymd_opt(at.year(), 1, 1).unwrap_or(at.date()),
            ),
        }
    }

    /// Start of the period after the one starting at `start`.
    #[must_use]
    pub fn next(self, start: NaiveDateTime) -> NaiveDateTime {
        match self {
            Self::Minute => start + TimeDelta::minutes(1),
            Self::Hour => start + TimeDelta::hours(1),
            Self::Day => start + TimeDelta::days(1),
            Self::Week => start + TimeDelta::weeks(1),
            Self::Month => start
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDateTime::MAX),
            Self::Year => start
                .checked_add_months(Months::new(12))
                .unwrap_or(NaiveDateTime::MAX),
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minute" => Ok(Self::Minute),
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(Error::invalid(
                "time_file_roller::period",
                s,
                "expected minute, hour, day, week, month or year",
            )),
        }
    }
}

/// Suffix patterns must render with chrono and stay inside the active file's directory.
///
/// # Errors
/// `InvalidValue` under `key` for an empty pattern, a path separator, or a specifier
/// chrono does not know.
pub fn check_file_name_pattern(key: &str, pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        return Err(Error::invalid(key, pattern, "must not be empty"));
    }
    if pattern.contains(['/', '\\']) {
        return Err(Error::invalid(key, pattern, "must not contain a path separator"));
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(Error::invalid(key, pattern, "not a valid strftime pattern"));
    }
    Ok(())
}

#[derive(Debug)]
pub struct TimeFileRoller {
    period: Period,
    max_history: u32,
    file_name_pattern: String,
    compressor: Option<Arc<dyn FileCompressor>>,
    current: Mutex<NaiveDateTime>,
}

impl TimeFileRoller {
    #[must_use]
    pub fn new(
        period: Period,
        max_history: u32,
        file_name_pattern: Option<String>,
        compressor: Option<Arc<dyn FileCompressor>>,
    ) -> Self {
        Self {
            period,
            max_history,
            file_name_pattern: file_name_pattern
                .unwrap_or_else(|| period.default_pattern().to_string()),
            compressor,
            current: Mutex::new(period.start(Local::now().naive_local())),
        }
    }

    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }

    #[must_use]
    pub const fn max_history(&self) -> u32 {
        self.max_history
    }

    fn rolled_name(&self, active: &Path, start: NaiveDateTime) -> PathBuf {
        let mut suffix = String::new();
        let _ = write!(suffix, "{}", start.format(&self.file_name_pattern));
        PathBuf::from(format!("{}.{suffix}", active.display()))
    }

    /// Rolled siblings of `active`, newest first.
    fn history(active: &Path) -> Result<Vec<PathBuf>> {
        let Some(file_name) = active.file_name().and_then(|n| n.to_str()) else {
            return Ok(Vec::new());
        };
        let prefix = format!("{file_name}.");
        let dir = active
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut rolled: Vec<(SystemTime, PathBuf)> = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if name.to_str().is_some_and(|n| n.starts_with(&prefix)) {
                let modified = entry.metadata()?.modified()?;
                rolled.push((modified, entry.path()));
            }
        }
        rolled.sort_by(|a, b| b.cmp(a));
        Ok(rolled.into_iter().map(|(_, path)| path).collect())
    }
}

impl FileRoller for TimeFileRoller {
    fn roll(&self, active: &Path) -> Result<()> {
        let finished = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            let finished = *current;
            *current = self.period.start(Local::now().naive_local());
            finished
        };

        if active.exists() {
            fs::rename(active, self.rolled_name(active, finished))?;
        }

        let history = Self::history(active)?;
        if let Some(compressor) = &self.compressor {
            let position = compressor.min_index().max(1) as usize - 1;
            if let Some(candidate) = history.get(position)
                && !candidate
                    .extension()
                    .is_some_and(|ext| ext == compressor.extension())
            {
                compressor.compress(candidate)?;
            }
        }
        for stale in history.iter().skip(self.max_history as usize) {
            internal::debug("ROLL", &format!("Pruning {}", stale.display()));
            fs::remove_file(stale)?;
        }
        Ok(())
    }

    fn as_trigger(&self) -> Option<&dyn FileRollTrigger> {
        Some(self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl FileRollTrigger for TimeFileRoller {
    fn is_triggered(&self, _active: &Path, event: &LogEvent) -> bool {
        let current = *self.current.lock().unwrap_or_else(PoisonError::into_inner);
        event.timestamp.naive_local() >= self.period.next(current)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-05-16 is a Thursday
        let start = Period::Week.start(at("2024-05-16 13:45:10"));
        assert_eq!(start, at("2024-05-13 00:00:00"));
        assert_eq!(Period::Week.next(start), at("2024-05-20 00:00:00"));
    }

    #[test]
    fn month_rolls_over_year_end() {
        let start = Period::Month.start(at("2023-12-31 23:59:59"));
        assert_eq!(start, at("2023-12-01 00:00:00"));
        assert_eq!(Period::Month.next(start), at("2024-01-01 00:00:00"));
    }

    #[test]
    fn suffix_patterns_are_checked() {
        let key = "time_file_roller::file_name_pattern";
        assert!(check_file_name_pattern(key, "%Y-%m-%d").is_ok());
        for bad in ["", "%Q", "%Y/%m", "..\\%d"] {
            match check_file_name_pattern(key, bad) {
                Err(Error::InvalidValue { key: k, .. }) => assert_eq!(k, key),
                other => panic!("{bad:?} accepted: {other:?}"),
            }
        }
    }

    #[test]
    fn period_names() {
        assert_eq!("Hour".parse::<Period>().unwrap(), Period::Hour);
        assert!("fortnight".parse::<Period>().is_err());
    }
}
