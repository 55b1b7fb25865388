//! Canonical civil timestamp.
//!
//! [`Ts`] is a moment in civil time: calendar date and wall-clock time down
//! to microseconds, an optional fixed UTC offset, and a `fold` flag that
//! disambiguates repeated local times during clock transitions. Values are
//! immutable once constructed and totally ordered: date first, then
//! time-of-day, then the timezone-normalized instant.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::delta::TsDelta;
use crate::error::{Result, TsError};
use crate::value::Value;

/// A canonical timestamp.
///
/// # Examples
///
/// ```rust
/// use tslice::Ts;
///
/// let ts = Ts::parse(20201013.012345)?;
/// assert_eq!(ts.year(), 2020);
/// assert_eq!(ts.hour(), 1);
/// assert_eq!(ts.as_float(), 20201013.012345);
/// # Ok::<(), tslice::TsError>(())
/// ```
#[derive(Clone, Copy)]
pub struct Ts {
    dt: NaiveDateTime,
    offset: Option<FixedOffset>,
    fold: u8,
}

impl Ts {
    /// Create a timestamp at midnight of the given calendar date.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        Self::from_parts(year, month, day, 0, 0, 0, 0, None, 0)
    }

    /// Create a timestamp with full date and time fields.
    pub fn with_time(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
    ) -> Result<Self> {
        Self::from_parts(year, month, day, hour, minute, second, microsecond, None, 0)
    }

    /// Create a timestamp from all component fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
        offset: Option<FixedOffset>,
        fold: u8,
    ) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            TsError::Timestamp(format!("{year:04}-{month:02}-{day:02}"))
        })?;
        let dt = date
            .and_hms_micro_opt(hour, minute, second, microsecond)
            .ok_or_else(|| {
                TsError::Timestamp(format!("{hour:02}:{minute:02}:{second:02}.{microsecond:06}"))
            })?;
        Ok(Self { dt, offset, fold })
    }

    /// The current local date and time.
    pub fn now() -> Self {
        Self {
            dt: chrono::Local::now().naive_local(),
            offset: None,
            fold: 0,
        }
    }

    /// Midnight of the current local date.
    pub fn today() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    /// Parse any timestamp-like value, equivalent to
    /// [`parse_timestamp`](crate::parse_timestamp) on a single item.
    pub fn parse(item: impl Into<Value>) -> Result<Self> {
        crate::parse::parse_timestamp(Some(&item.into()), None)
    }

    /// Midnight of the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            dt: date.and_time(NaiveTime::MIN),
            offset: None,
            fold: 0,
        }
    }

    /// Wrap a naive datetime without an offset.
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self {
            dt,
            offset: None,
            fold: 0,
        }
    }

    /// Attach a fixed UTC offset.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the fold disambiguation flag.
    pub fn with_fold(mut self, fold: u8) -> Self {
        self.fold = fold;
        self
    }

    pub fn year(&self) -> i32 {
        self.dt.year()
    }

    pub fn month(&self) -> u32 {
        self.dt.month()
    }

    pub fn day(&self) -> u32 {
        self.dt.day()
    }

    pub fn hour(&self) -> u32 {
        self.dt.hour()
    }

    pub fn minute(&self) -> u32 {
        self.dt.minute()
    }

    pub fn second(&self) -> u32 {
        self.dt.second()
    }

    pub fn microsecond(&self) -> u32 {
        self.dt.nanosecond() / 1_000
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    pub fn fold(&self) -> u8 {
        self.fold
    }

    /// The date portion.
    pub fn date(&self) -> NaiveDate {
        self.dt.date()
    }

    /// The underlying naive datetime (offset ignored).
    pub fn naive(&self) -> NaiveDateTime {
        self.dt
    }

    /// Numeric `YYYYMMDD.hhmmss` encoding.
    pub fn as_float(&self) -> f64 {
        let text = format!(
            "{:04}{:02}{:02}.{:02}{:02}{:02}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        );
        text.parse().unwrap_or(f64::NAN)
    }

    /// Numeric `YYYYMMDD` encoding.
    pub fn as_int(&self) -> i64 {
        self.year() as i64 * 10_000 + self.month() as i64 * 100 + self.day() as i64
    }

    /// The UTC-normalized instant used as the final ordering tie-break.
    fn instant(&self) -> NaiveDateTime {
        match self.offset {
            Some(off) => self.dt - TimeDelta::seconds(off.local_minus_utc() as i64),
            None => self.dt,
        }
    }

    fn has_time(&self) -> bool {
        self.hour() != 0 || self.minute() != 0 || self.second() != 0
    }
}

impl PartialEq for Ts {
    fn eq(&self, other: &Self) -> bool {
        self.dt == other.dt && self.instant() == other.instant()
    }
}

impl Eq for Ts {}

impl PartialOrd for Ts {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ts {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.dt.date(), self.dt.time(), self.instant()).cmp(&(
            other.dt.date(),
            other.dt.time(),
            other.instant(),
        ))
    }
}

impl std::ops::Sub for Ts {
    type Output = TsDelta;

    /// Difference between two timestamps; the result records the right-hand
    /// operand as its origin.
    fn sub(self, other: Ts) -> TsDelta {
        TsDelta::from_chrono(self.instant() - other.instant()).with_origin(other)
    }
}

impl std::ops::Add<TsDelta> for Ts {
    type Output = Ts;

    fn add(self, delta: TsDelta) -> Ts {
        Ts {
            dt: self.dt + delta.to_chrono(),
            offset: self.offset,
            fold: self.fold,
        }
    }
}

impl std::ops::Sub<TsDelta> for Ts {
    type Output = Ts;

    fn sub(self, delta: TsDelta) -> Ts {
        Ts {
            dt: self.dt - delta.to_chrono(),
            offset: self.offset,
            fold: self.fold,
        }
    }
}

impl FromStr for Ts {
    type Err = TsError;

    fn from_str(s: &str) -> Result<Self> {
        crate::parse::parse_timestamp(Some(&Value::Str(s.to_string())), None)
    }
}

impl fmt::Display for Ts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02}:{:02}",
            self.date(),
            self.hour(),
            self.minute(),
            self.second()
        )?;
        if self.microsecond() != 0 {
            write!(f, ".{:06}", self.microsecond())?;
        }
        if let Some(off) = self.offset {
            write!(f, "{off}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Ts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.microsecond() != 0 || self.offset.is_some() || self.fold != 0 {
            return write!(f, "Ts({:?})", self.to_string());
        }
        if self.has_time() {
            return write!(
                f,
                "Ts({}.{:02}{:02}{:02})",
                self.as_int(),
                self.hour(),
                self.minute(),
                self.second()
            );
        }
        write!(f, "Ts({})", self.as_int())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_by_date_then_time() {
        let a = Ts::new(2021, 12, 12).unwrap();
        let b = Ts::with_time(2021, 12, 12, 0, 0, 1, 0).unwrap();
        let c = Ts::new(2021, 12, 13).unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_float_and_int_encodings() {
        let ts = Ts::with_time(2020, 10, 13, 1, 23, 45, 0).unwrap();
        assert_eq!(ts.as_float(), 20201013.012345);
        assert_eq!(ts.as_int(), 20201013);
    }

    #[test]
    fn test_difference_carries_origin() {
        let a = Ts::new(2021, 12, 21).unwrap();
        let b = Ts::new(2021, 12, 12).unwrap();
        let diff = a - b;
        assert_eq!(diff.days(), 9);
        assert_eq!(diff.origin(), Some(b));
        assert_eq!(b + diff, a);
    }

    #[test]
    fn test_debug_forms() {
        let plain = Ts::new(2021, 12, 12).unwrap();
        assert_eq!(format!("{plain:?}"), "Ts(20211212)");

        let timed = Ts::with_time(2021, 12, 12, 1, 2, 3, 0).unwrap();
        assert_eq!(format!("{timed:?}"), "Ts(20211212.010203)");

        let micro = Ts::with_time(2021, 12, 12, 1, 2, 3, 4).unwrap();
        assert_eq!(format!("{micro:?}"), "Ts(\"2021-12-12 01:02:03.000004\")");
    }

    #[test]
    fn test_offset_breaks_tie_after_wall_time() {
        let east = FixedOffset::east_opt(3600).unwrap();
        let plain = Ts::with_time(2021, 6, 1, 12, 0, 0, 0).unwrap();
        let shifted = plain.with_offset(east);
        // Same wall-clock reading, earlier instant: ordered after the
        // offset-bearing value only via the instant tie-break.
        assert_ne!(plain, shifted);
        assert!(shifted < plain);
    }

    #[test]
    fn test_invalid_date_rejected() {
        assert!(Ts::new(2021, 2, 30).is_err());
        assert!(Ts::with_time(2021, 2, 1, 25, 0, 0, 0).is_err());
    }
}
