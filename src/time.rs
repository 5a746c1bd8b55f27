//! Clock times and intervals.
//!
//! # Time Model
//! All times are minutes since midnight of the festival day. Sheet data
//! stores them as `HH:MM` strings, with `-` or an empty cell meaning
//! "not scheduled".
//!
//! Intervals are half-open `[start, end)`: a session ending at 11:00 and
//! another starting at 11:00 do not overlap unless a buffer is required.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlannerError;

/// Default placement grid (minutes).
pub const SNAP_MINUTES: i32 = 5;

/// Largest hour accepted in a time cell. Late-night slots may be written
/// past midnight (`25:30`).
pub const MAX_HOUR: i32 = 47;

/// Placeholder written for "no time".
pub const NO_TIME: &str = "-";

/// A wall-clock time, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClockTime(i32);

impl ClockTime {
    /// Creates a time from minutes since midnight.
    pub const fn from_minutes(minutes: i32) -> Self {
        Self(minutes)
    }

    /// Creates a time from hours and minutes.
    pub const fn hm(hours: i32, minutes: i32) -> Self {
        Self(hours * 60 + minutes)
    }

    /// Parses a sheet cell. Empty, `-`, strings without `:` and hours
    /// above [`MAX_HOUR`] are `None`.
    ///
    /// Non-numeric parts count as zero, so `"10:"` is 10:00. Seconds are
    /// ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let t = s.trim();
        if t.is_empty() || t == NO_TIME {
            return None;
        }
        let (hours, _) = clock_parts(t)?;
        if hours.is_some_and(|h| !(0..=MAX_HOUR).contains(&h)) {
            return None;
        }
        Some(Self(time_to_minutes(t)))
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(self) -> i32 {
        self.0
    }

    /// Adds a number of minutes.
    #[inline]
    pub fn plus(self, minutes: i32) -> Self {
        Self(self.0.saturating_add(minutes))
    }

    /// Rounds to the nearest multiple of `grid` minutes.
    pub fn snapped(self, grid: i32) -> Self {
        Self(snap(self.0, grid))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0.div_euclid(60);
        let m = self.0.rem_euclid(60);
        write!(f, "{h:02}:{m:02}")
    }
}

impl FromStr for ClockTime {
    type Err = PlannerError;

    /// Strict parse: both parts must be numbers and minutes must be < 60.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let (h, m) = t
            .split_once(':')
            .ok_or_else(|| PlannerError::InvalidTime(s.to_string()))?;
        let h: i32 = h
            .trim()
            .parse()
            .map_err(|_| PlannerError::InvalidTime(s.to_string()))?;
        let m: i32 = m
            .trim()
            .parse()
            .map_err(|_| PlannerError::InvalidTime(s.to_string()))?;
        if !(0..=MAX_HOUR).contains(&h) || !(0..60).contains(&m) {
            return Err(PlannerError::InvalidTime(s.to_string()));
        }
        Ok(Self::hm(h, m))
    }
}

/// Hour and minute fields of a `HH:MM[:SS]` string. `None` without `:`.
fn clock_parts(s: &str) -> Option<(Option<i32>, Option<i32>)> {
    let t = s.trim();
    if !t.contains(':') {
        return None;
    }
    let mut parts = t.split(':').map(|p| p.trim().parse::<i32>().ok());
    Some((parts.next().flatten(), parts.next().flatten()))
}

/// Converts `HH:MM` (or `HH:MM:SS`) to minutes since midnight.
///
/// Lenient: anything without a `:` is 0. Unparsable parts, hours outside
/// `0..=MAX_HOUR` and minutes outside `0..60` count as 0.
pub fn time_to_minutes(s: &str) -> i32 {
    let Some((h, m)) = clock_parts(s) else {
        return 0;
    };
    let h = h.filter(|h| (0..=MAX_HOUR).contains(h)).unwrap_or(0);
    let m = m.filter(|m| (0..60).contains(m)).unwrap_or(0);
    h * 60 + m
}

/// Formats minutes as `HH:MM`, rounding minutes to the snap grid.
///
/// A minute part that rounds up to 60 rolls into the next hour.
pub fn minutes_to_time(total_minutes: i32) -> String {
    let mut h = total_minutes.div_euclid(60);
    let mut m = snap(total_minutes.rem_euclid(60), SNAP_MINUTES);
    if m == 60 {
        m = 0;
        h += 1;
    }
    format!("{h:02}:{m:02}")
}

/// End time of a session as a sheet string. `-` if start is empty or `-`.
pub fn calculate_end_time(start: &str, duration_minutes: i32) -> String {
    let s = start.trim();
    if s.is_empty() || s == NO_TIME {
        return NO_TIME.to_string();
    }
    minutes_to_time(time_to_minutes(s).saturating_add(duration_minutes))
}

/// Rounds to the nearest multiple of `grid` (half rounds up).
pub fn snap(minutes: i32, grid: i32) -> i32 {
    if grid <= 1 {
        return minutes;
    }
    minutes.saturating_add(grid / 2).div_euclid(grid) * grid
}

/// Overlap test on raw minute bounds with a buffer.
///
/// `true` when the intervals come closer than `buffer` minutes.
#[inline]
pub fn check_overlap(start_a: i32, end_a: i32, start_b: i32, end_b: i32, buffer: i32) -> bool {
    start_a < end_b.saturating_add(buffer) && end_a.saturating_add(buffer) > start_b
}

/// A time interval [start, end) in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Interval start (inclusive).
    pub start: i32,
    /// Interval end (exclusive).
    pub end: i32,
}

impl Interval {
    /// Creates a new interval.
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Interval starting at `start` lasting `duration` minutes.
    pub fn from_start(start: ClockTime, duration: i32) -> Self {
        Self::new(start.minutes(), start.minutes().saturating_add(duration))
    }

    /// Length in minutes.
    #[inline]
    pub fn duration(&self) -> i32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether a minute falls inside.
    #[inline]
    pub fn contains(&self, minute: i32) -> bool {
        minute >= self.start && minute < self.end
    }

    /// Whether two intervals overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.overlaps_with_buffer(other, 0)
    }

    /// Whether two intervals come closer than `buffer` minutes.
    pub fn overlaps_with_buffer(&self, other: &Self, buffer: i32) -> bool {
        check_overlap(self.start, self.end, other.start, other.end, buffer)
    }

    /// Whether `other` lies completely inside this interval.
    pub fn covers(&self, other: &Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Minutes shared by two intervals.
    pub fn overlap_minutes(&self, other: &Self) -> i32 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        end.saturating_sub(start).max(0)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}–{}",
            ClockTime::from_minutes(self.start),
            ClockTime::from_minutes(self.end)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_minutes() {
        assert_eq!(time_to_minutes("10:30"), 630);
        assert_eq!(time_to_minutes(" 09:05 "), 545);
        assert_eq!(time_to_minutes("10:"), 600);
        assert_eq!(time_to_minutes("x:30"), 30);
        assert_eq!(time_to_minutes("1030"), 0);
        assert_eq!(time_to_minutes(""), 0);
        // time-formatted sheet cells carry seconds
        assert_eq!(time_to_minutes("10:30:00"), 630);
        assert_eq!(time_to_minutes("25:30"), 1530);
    }

    #[test]
    fn test_time_to_minutes_out_of_range() {
        assert_eq!(time_to_minutes("99999999:00"), 0);
        assert_eq!(time_to_minutes("-3:15"), 15);
        assert_eq!(time_to_minutes("10:75"), 600);
        assert_eq!(ClockTime::parse("99999999:00"), None);
        assert_eq!(ClockTime::parse("48:00"), None);
        assert!("99999999:00".parse::<ClockTime>().is_err());
        assert_eq!(calculate_end_time("10:00", i32::MAX), minutes_to_time(i32::MAX));
    }

    #[test]
    fn test_minutes_to_time_snaps() {
        assert_eq!(minutes_to_time(630), "10:30");
        assert_eq!(minutes_to_time(632), "10:30");
        assert_eq!(minutes_to_time(633), "10:35");
        // 10:58 rounds to 11:00, not 10:60
        assert_eq!(minutes_to_time(658), "11:00");
        assert_eq!(minutes_to_time(0), "00:00");
    }

    #[test]
    fn test_calculate_end_time() {
        assert_eq!(calculate_end_time("10:00", 45), "10:45");
        assert_eq!(calculate_end_time("23:30", 60), "24:30");
        assert_eq!(calculate_end_time("-", 60), "-");
        assert_eq!(calculate_end_time("", 60), "-");
    }

    #[test]
    fn test_clock_time_parse() {
        assert_eq!(ClockTime::parse("14:15"), Some(ClockTime::hm(14, 15)));
        assert_eq!(ClockTime::parse("-"), None);
        assert_eq!(ClockTime::parse(""), None);
        assert_eq!(ClockTime::parse("noon"), None);
        assert_eq!(ClockTime::parse("09:15:00"), Some(ClockTime::hm(9, 15)));
        assert_eq!(ClockTime::hm(9, 5).to_string(), "09:05");
    }

    #[test]
    fn test_clock_time_from_str_strict() {
        assert_eq!("08:45".parse::<ClockTime>().unwrap(), ClockTime::hm(8, 45));
        assert!("8:75".parse::<ClockTime>().is_err());
        assert!("ab:cd".parse::<ClockTime>().is_err());
        assert!("0845".parse::<ClockTime>().is_err());
    }

    #[test]
    fn test_snap() {
        assert_eq!(snap(12, 5), 10);
        assert_eq!(snap(13, 5), 15);
        assert_eq!(snap(7, 15), 0);
        assert_eq!(snap(8, 15), 15);
        assert_eq!(snap(17, 1), 17);
        assert_eq!(ClockTime::hm(10, 3).snapped(5), ClockTime::hm(10, 5));
    }

    #[test]
    fn test_interval_overlap() {
        let a = Interval::new(600, 660);
        let b = Interval::new(630, 700);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let c = Interval::new(660, 720); // touching
        assert!(!a.overlaps(&c));
        assert!(a.overlaps_with_buffer(&c, 10));
        assert!(!a.overlaps_with_buffer(&Interval::new(670, 720), 10));
        assert!(a.overlaps_with_buffer(&Interval::new(669, 720), 10));
    }

    #[test]
    fn test_interval_helpers() {
        let day = Interval::new(540, 1320);
        let s = Interval::from_start(ClockTime::hm(10, 0), 90);
        assert_eq!(s.duration(), 90);
        assert!(day.covers(&s));
        assert!(!s.covers(&day));
        assert_eq!(s.overlap_minutes(&Interval::new(660, 720)), 30);
        assert_eq!(s.overlap_minutes(&Interval::new(800, 900)), 0);
        assert!(s.contains(600));
        assert!(!s.contains(690));
        assert_eq!(s.to_string(), "10:00–11:30");
    }

    #[test]
    fn test_interval_saturates() {
        let huge = Interval::from_start(ClockTime::hm(10, 0), i32::MAX);
        assert_eq!(huge.end, i32::MAX);
        assert!(huge.overlaps_with_buffer(&Interval::new(700, 760), 30));
        assert_eq!(huge.overlap_minutes(&Interval::new(700, 760)), 60);
        assert_eq!(ClockTime::from_minutes(i32::MAX).plus(5).minutes(), i32::MAX);
    }
}
