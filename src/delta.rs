//! Canonical signed durations.
//!
//! [`TsDelta`] is a span of (days, seconds, microseconds), normalized the
//! same way as a civil-time difference: `0 <= seconds < 86_400` and
//! `0 <= microseconds < 1_000_000`, with the sign carried by the day count.
//! A delta may remember the timestamp it was computed relative to (its
//! *origin*), which is only used to re-derive the end timestamp or an
//! ACT/ACT year fraction and never takes part in equality.
//!
//! Durations carrying a months component are a separate concern: months are
//! not reducible to days without a reference point, so month-bearing parse
//! results go through the [`FromMonths`] constructor contract instead of
//! `TsDelta`. [`MonthsDelta`] is the crate's own months-capable type.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::{Result, TsError};
use crate::ts::Ts;

const MICROS_PER_SECOND: i128 = 1_000_000;
const SECONDS_PER_DAY: i128 = 86_400;
const MICROS_PER_DAY: i128 = MICROS_PER_SECOND * SECONDS_PER_DAY;

/// A normalized duration of days, seconds and microseconds.
///
/// # Examples
///
/// ```rust
/// use tslice::{Ts, TsDelta};
///
/// let diff = Ts::parse(20211221)? - Ts::parse(20211212)?;
/// assert_eq!(diff.to_string(), "9d");
/// assert_eq!(diff.origin(), Some(Ts::parse(20211212)?));
/// # Ok::<(), tslice::TsError>(())
/// ```
#[derive(Clone, Copy)]
pub struct TsDelta {
    days: i64,
    seconds: i64,
    microseconds: i64,
    origin: Option<Ts>,
}

impl TsDelta {
    /// Build a duration from possibly unnormalized parts.
    pub fn new(days: i64, seconds: i64, microseconds: i64) -> Self {
        let total = days as i128 * MICROS_PER_DAY
            + seconds as i128 * MICROS_PER_SECOND
            + microseconds as i128;
        Self::from_total_micros(total)
    }

    /// The zero duration.
    pub fn zero() -> Self {
        Self::from_total_micros(0)
    }

    fn from_total_micros(total: i128) -> Self {
        let microseconds = total.rem_euclid(MICROS_PER_SECOND);
        let rest = total.div_euclid(MICROS_PER_SECOND);
        let seconds = rest.rem_euclid(SECONDS_PER_DAY);
        let days = rest.div_euclid(SECONDS_PER_DAY);
        Self {
            days: days as i64,
            seconds: seconds as i64,
            microseconds: microseconds as i64,
            origin: None,
        }
    }

    /// Build a duration from fractional parts; fractions cascade into the
    /// next smaller field (`0.5` days becomes `43200` seconds).
    pub fn from_fractional(days: f64, seconds: f64, microseconds: f64) -> Self {
        let total = days * (MICROS_PER_DAY as f64)
            + seconds * (MICROS_PER_SECOND as f64)
            + microseconds;
        Self::from_total_micros(total.round() as i128)
    }

    pub(crate) fn from_chrono(delta: TimeDelta) -> Self {
        let micros = delta
            .num_microseconds()
            .unwrap_or_else(|| delta.num_milliseconds().saturating_mul(1_000));
        Self::from_total_micros(micros as i128)
    }

    pub(crate) fn to_chrono(&self) -> TimeDelta {
        TimeDelta::days(self.days)
            + TimeDelta::seconds(self.seconds)
            + TimeDelta::microseconds(self.microseconds)
    }

    /// Attach the timestamp this duration was computed relative to.
    pub fn with_origin(mut self, origin: Ts) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn microseconds(&self) -> i64 {
        self.microseconds
    }

    /// The origin timestamp, if any.
    pub fn origin(&self) -> Option<Ts> {
        self.origin
    }

    /// `origin + self`, when an origin is recorded.
    pub fn end(&self) -> Option<Ts> {
        self.origin.map(|o| o + *self)
    }

    fn total_micros(&self) -> i128 {
        self.days as i128 * MICROS_PER_DAY
            + self.seconds as i128 * MICROS_PER_SECOND
            + self.microseconds as i128
    }

    /// The whole span in (possibly fractional) seconds.
    pub fn total_seconds(&self) -> f64 {
        self.total_micros() as f64 / MICROS_PER_SECOND as f64
    }

    /// The span as a fraction of a year.
    ///
    /// With an origin this is the ACT/ACT day count between the origin and
    /// the end; without one, a `365.25`-day year approximation.
    pub fn year_fraction(&self) -> f64 {
        match self.origin {
            None => self.total_seconds() / 86_400.0 / 365.25,
            Some(origin) => actact(origin.naive(), (origin + *self).naive()),
        }
    }
}

fn year_end(year: i32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .map(|d| d.and_time(NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MIN)
}

fn year_start(year: i32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|d| d.and_time(NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MIN)
}

fn seconds_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let delta = end - start;
    delta
        .num_microseconds()
        .map(|us| us as f64 / 1e6)
        .unwrap_or(delta.num_milliseconds() as f64 / 1e3)
}

/// ACT/ACT day-count fraction between two datetimes.
fn actact(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let (s, e) = (start.year(), end.year());
    if e == s {
        let total = seconds_between(year_end(s - 1), year_end(s));
        return seconds_between(start, end) / total;
    }
    let mut yf = (e - s - 1) as f64;
    // the first day counts
    let start = start - TimeDelta::days(1);
    yf += actact(start - TimeDelta::days(1), year_end(s));
    yf += actact(year_start(e), end);
    yf
}

impl PartialEq for TsDelta {
    fn eq(&self, other: &Self) -> bool {
        self.total_micros() == other.total_micros()
    }
}

impl Eq for TsDelta {}

impl PartialOrd for TsDelta {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TsDelta {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_micros().cmp(&other.total_micros())
    }
}

impl std::ops::Add for TsDelta {
    type Output = TsDelta;

    fn add(self, other: TsDelta) -> TsDelta {
        Self::from_total_micros(self.total_micros() + other.total_micros())
    }
}

impl std::ops::Sub for TsDelta {
    type Output = TsDelta;

    fn sub(self, other: TsDelta) -> TsDelta {
        Self::from_total_micros(self.total_micros() - other.total_micros())
    }
}

impl std::ops::Neg for TsDelta {
    type Output = TsDelta;

    fn neg(self) -> TsDelta {
        Self::from_total_micros(-self.total_micros())
    }
}

impl std::ops::Mul<i64> for TsDelta {
    type Output = TsDelta;

    fn mul(self, factor: i64) -> TsDelta {
        Self::from_total_micros(self.total_micros() * factor as i128)
    }
}

impl std::ops::Mul<f64> for TsDelta {
    type Output = TsDelta;

    fn mul(self, factor: f64) -> TsDelta {
        Self::from_total_micros((self.total_micros() as f64 * factor).round() as i128)
    }
}

impl std::ops::Div<i64> for TsDelta {
    type Output = TsDelta;

    fn div(self, divisor: i64) -> TsDelta {
        Self::from_total_micros(self.total_micros() / divisor as i128)
    }
}

impl std::ops::Div<f64> for TsDelta {
    type Output = TsDelta;

    fn div(self, divisor: f64) -> TsDelta {
        Self::from_total_micros((self.total_micros() as f64 / divisor).round() as i128)
    }
}

impl FromStr for TsDelta {
    type Err = TsError;

    fn from_str(s: &str) -> Result<Self> {
        crate::parse::parse_duration(s)
    }
}

impl fmt::Display for TsDelta {
    /// Compact canonical form: `9d`, `2h` as `7200s`, mixed spans like
    /// `-1d86399s`. The output parses back to an equal duration.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days != 0 {
            write!(f, "{}d", self.days)?;
        }
        if self.seconds != 0 {
            write!(f, "{}s", self.seconds)?;
        }
        if self.microseconds != 0 {
            write!(f, "{}\u{03bc}s", self.microseconds)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TsDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            Some(origin) => write!(f, "TsDelta({:?}, origin={origin:?})", self.to_string()),
            None => write!(f, "TsDelta({:?})", self.to_string()),
        }
    }
}

/// Constructor contract for month-bearing durations.
///
/// [`parse_duration_with`](crate::parse_duration_with) invokes this when the
/// parsed text carries a nonzero months total; plain
/// [`parse_duration`](crate::parse_duration) rejects such input instead.
pub trait FromMonths: Sized {
    fn from_parts(days: i64, seconds: i64, microseconds: i64, months: i64) -> Self;
}

/// A duration with a non-reducible months component.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MonthsDelta {
    delta: TsDelta,
    months: i64,
}

impl MonthsDelta {
    pub fn months(&self) -> i64 {
        self.months
    }

    pub fn days(&self) -> i64 {
        self.delta.days()
    }

    pub fn seconds(&self) -> i64 {
        self.delta.seconds()
    }

    pub fn microseconds(&self) -> i64 {
        self.delta.microseconds()
    }

    /// The day/second/microsecond portion, without the months.
    pub fn delta(&self) -> TsDelta {
        self.delta
    }
}

impl FromMonths for MonthsDelta {
    fn from_parts(days: i64, seconds: i64, microseconds: i64, months: i64) -> Self {
        Self {
            delta: TsDelta::new(days, seconds, microseconds),
            months,
        }
    }
}

impl fmt::Display for MonthsDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.months != 0 {
            write!(f, "{}m", self.months)?;
        }
        write!(f, "{}", self.delta)
    }
}

impl fmt::Debug for MonthsDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MonthsDelta({:?})", self.to_string())
    }
}
