use std::sync::LazyLock;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime};
use regex::Regex;

use crate::{Error, Result};

static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*(am|pm)$").expect("clock pattern is valid")
});

/// Separators accepted between the two ends of a time range, tried in order.
const RANGE_SEPARATORS: [&str; 4] = [" - ", "-", "\u{2013}", "\u{2014}"];

/// Wall-clock time parsed from a 12-hour string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hours: u8,
    pub minutes: u8,
}

impl ClockTime {
    pub const fn minutes_since_midnight(self) -> u16 {
        self.hours as u16 * 60 + self.minutes as u16
    }

    pub fn to_naive_time(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(u32::from(self.hours), u32::from(self.minutes), 0)
    }
}

/// Parses `1:30pm`, `1:30 PM`, `12:05 am` and the like.
pub fn parse_time(text: &str) -> Result<ClockTime> {
    let trimmed = text.trim();
    let caps = CLOCK_RE
        .captures(trimmed)
        .ok_or_else(|| Error::Format(trimmed.to_string()))?;

    let mut hours: u8 = caps[1]
        .parse()
        .map_err(|_| Error::Format(trimmed.to_string()))?;
    let minutes: u8 = caps[2]
        .parse()
        .map_err(|_| Error::Format(trimmed.to_string()))?;
    if hours > 12 || minutes > 59 {
        return Err(Error::Format(trimmed.to_string()));
    }

    let pm = caps[3].eq_ignore_ascii_case("pm");
    if pm && hours < 12 {
        hours += 12;
    } else if !pm && hours == 12 {
        hours = 0;
    }

    Ok(ClockTime { hours, minutes })
}

/// Maps a day code to 0 (Sunday) through 6 (Saturday).
pub fn day_code_to_index(code: char) -> Option<u8> {
    match code.to_ascii_uppercase() {
        'U' => Some(0),
        'M' => Some(1),
        'T' => Some(2),
        'W' => Some(3),
        'R' => Some(4),
        'F' => Some(5),
        'S' => Some(6),
        _ => None,
    }
}

/// Day codes of a `days` string, with unrecognized characters counted rather than kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDays {
    pub days: Vec<u8>,
    pub unknown: usize,
}

pub fn parse_days(days: &str) -> ParsedDays {
    let mut parsed = ParsedDays::default();
    for code in days.chars().filter(|c| !c.is_whitespace()) {
        match day_code_to_index(code) {
            Some(day) => parsed.days.push(day),
            None => parsed.unknown += 1,
        }
    }
    parsed
}

/// Splits `start-end` on the first recognized separator.
pub fn split_time_range(time: &str) -> Option<(&str, &str)> {
    RANGE_SEPARATORS.iter().find_map(|sep| {
        let (start, end) = time.split_once(sep)?;
        let (start, end) = (start.trim(), end.trim());
        (!start.is_empty() && !end.is_empty()).then_some((start, end))
    })
}

/// Parses a full range such as `9:30 am - 10:20 am`. The end must be after the start.
pub fn parse_time_range(time: &str) -> Result<(ClockTime, ClockTime)> {
    let (start, end) = split_time_range(time).ok_or_else(|| Error::Format(time.to_string()))?;
    let start = parse_time(start)?;
    let end = parse_time(end)?;
    if end <= start {
        return Err(Error::Format(time.to_string()));
    }
    Ok((start, end))
}

/// Date of weekday `day_index` (0 = Sunday) in the Sunday-based week containing `today`.
pub fn resolve_weekday_date(day_index: u8, today: NaiveDate) -> NaiveDate {
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
    week_start + Duration::days(i64::from(day_index))
}

/// Same as [`resolve_weekday_date`] against the local calendar's current week.
pub fn current_week_date(day_index: u8) -> NaiveDate {
    resolve_weekday_date(day_index, Local::now().date_naive())
}
