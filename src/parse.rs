//! Flexible timestamp and duration parsing.
//!
//! [`parse_timestamp`] turns any timestamp-like [`Value`] into a [`Ts`]:
//! `None` means "now" (or a caller default), floats encode `YYYYMMDD.hhmmss`,
//! integers encode `YYYYMMDD`, and strings are sniffed against a fixed set
//! of date formats. [`parse_duration`] reads compound duration text such as
//! `"-1y2m3d4h"` or `"2 hours 4 minutes"`.

use once_cell::sync::OnceCell;

use crate::delta::{FromMonths, TsDelta};
use crate::error::{Result, TsError};
use crate::ts::Ts;
use crate::value::{Castable, Value};

/// Parse a timestamp-like value.
///
/// With `item` absent the current time is returned, unless `default` is
/// given, in which case the default is parsed instead. Unparsable input
/// fails with [`TsError::Timestamp`]; nothing is silently defaulted beyond
/// the `None` handling.
///
/// # Examples
///
/// ```rust
/// use tslice::{parse_timestamp, Ts, Value};
///
/// let a = parse_timestamp(Some(&Value::from("2020-10-13")), None)?;
/// let b = parse_timestamp(Some(&Value::from(20201013)), None)?;
/// assert_eq!(a, b);
///
/// let c = parse_timestamp(Some(&Value::from(20201013.012345)), None)?;
/// assert_eq!(c.hour(), 1);
/// assert_eq!(c.date(), a.date());
/// # Ok::<(), tslice::TsError>(())
/// ```
pub fn parse_timestamp(item: Option<&Value>, default: Option<&Value>) -> Result<Ts> {
    let item = match item {
        None => {
            return match default {
                Some(d) => parse_timestamp(Some(d), None),
                None => Ok(Ts::now()),
            };
        }
        Some(item) => item,
    };

    match item {
        Value::Ts(t) => Ok(*t),
        Value::Date(d) => Ok(Ts::from_date(*d)),
        Value::Float(f) => parse_float(*f),
        Value::Int(i) => parse_text(&i.to_string()),
        Value::Str(s) => parse_text(s),
        Value::Json(j) => match Value::from_json_scalar(j) {
            Some(scalar) => parse_timestamp(Some(&scalar), default),
            None => Err(TsError::Timestamp(item.to_string())),
        },
        Value::Delta(_) => Err(TsError::Timestamp(item.to_string())),
    }
}

/// Parse a value that carries its own conversion capability.
///
/// Capabilities are consulted in priority order (`cast_ts`,
/// `cast_timestamp`, `cast_date`, `cast_datetime`); the first one present
/// wins, and its failure propagates. A value with no capability falls back
/// to free-form parsing of its display form.
pub fn parse_castable<T>(item: &T, default: Option<&Value>) -> Result<Ts>
where
    T: Castable + std::fmt::Display,
{
    if let Some(ts) = item.cast_ts() {
        return ts;
    }
    if let Some(ts) = item.cast_timestamp() {
        return ts;
    }
    if let Some(date) = item.cast_date() {
        return Ok(Ts::from_date(date?));
    }
    if let Some(dt) = item.cast_datetime() {
        return Ok(Ts::from_datetime(dt?));
    }
    parse_timestamp(Some(&Value::Str(item.to_string())), default)
}

/// Read a float as `YYYYMMDD.hhmmss`: eight date digits before the point,
/// the fraction left-padded/truncated to six time digits.
fn parse_float(f: f64) -> Result<Ts> {
    let text = format!("{f}");
    let (date, time) = text.split_once('.').unwrap_or((text.as_str(), ""));
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TsError::Timestamp(text.clone()));
    }
    let mut time = time.to_string();
    while time.len() < 6 {
        time.push('0');
    }
    let iso = format!(
        "{}-{}-{} {}:{}:{}",
        &date[0..4],
        &date[4..6],
        &date[6..8],
        &time[0..2],
        &time[2..4],
        &time[4..6]
    );
    parse_text(&iso)
}

static FORMAT_WARNING: OnceCell<()> = OnceCell::new();

/// Parse free-form date text by format sniffing.
///
/// The separator decides the layout: `-` means ISO year-first (with or
/// without a time-of-day), `.` means `DD.MM.YYYY`, `/` means `MM/DD/YYYY`,
/// exactly eight digits mean `YYYYMMDD`, anything else is tried as compact
/// ISO. This is a fixed-format fallback rather than a full natural-language
/// date parser, hence the one-time warning.
fn parse_text(text: &str) -> Result<Ts> {
    FORMAT_WARNING.get_or_init(|| {
        log::warn!(
            "datetime parsing is limited to fixed formats; \
             precision may be degraded for free-form input"
        );
    });

    let text = text.trim();
    let fail = || TsError::Timestamp(text.to_string());

    if text.contains('-') {
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
            return Ok(Ts::from_datetime(dt.naive_local()).with_offset(*dt.offset()));
        }
        for format in [
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M",
        ] {
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(text, format) {
                return Ok(Ts::from_datetime(dt));
            }
        }
        return chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Ts::from_date)
            .map_err(|_| fail());
    }

    if text.contains('.') {
        return chrono::NaiveDate::parse_from_str(text, "%d.%m.%Y")
            .map(Ts::from_date)
            .map_err(|_| fail());
    }

    if text.contains('/') {
        return chrono::NaiveDate::parse_from_str(text, "%m/%d/%Y")
            .map(Ts::from_date)
            .map_err(|_| fail());
    }

    if text.len() == 8 && text.bytes().all(|b| b.is_ascii_digit()) {
        return chrono::NaiveDate::parse_from_str(text, "%Y%m%d")
            .map(Ts::from_date)
            .map_err(|_| fail());
    }

    for format in ["%Y%m%dT%H%M%S", "%Y%m%d%H%M%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(text, format) {
            return Ok(Ts::from_datetime(dt));
        }
    }
    Err(fail())
}

/// Long unit names normalize to single-letter codes before scanning.
/// Minutes use `i` so they cannot collide with months' `m`.
const SYNONYMS: &[(&str, &str)] = &[
    ("and", ""),
    ("_", ""),
    (",", ""),
    (" ", ""),
    ("years", "y"),
    ("quarters", "q"),
    ("months", "m"),
    ("weeks", "w"),
    ("days", "d"),
    ("hours", "h"),
    ("minutes", "i"),
    ("seconds", "s"),
    ("sec", "s"),
    ("microseconds", "\u{03bc}"),
    ("\u{00b5}s", "\u{03bc}"),
    ("\u{03bc}s", "\u{03bc}"),
];

const UNITS: [char; 9] = ['y', 'q', 'm', 'w', 'd', 'h', 'i', 's', '\u{03bc}'];

/// Signed, possibly fractional numeric token: optional sign, digits, at
/// most one decimal point.
fn parse_token(input: &str, token: &str) -> Result<f64> {
    let fail = || TsError::Duration {
        input: input.to_string(),
        token: token.to_string(),
    };

    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    if unsigned.is_empty()
        || !unsigned.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        || unsigned.bytes().filter(|&b| b == b'.').count() > 1
    {
        return Err(fail());
    }
    token.parse::<f64>().map_err(|_| fail())
}

fn parse_parts(input: &str) -> Result<(TsDelta, i64)> {
    let mut text = input.to_lowercase();
    for (name, code) in SYNONYMS {
        text = text.replace(name, code);
    }

    let mut amounts = [0.0_f64; 9];
    for (slot, unit) in amounts.iter_mut().zip(UNITS) {
        if let Some(at) = text.find(unit) {
            let token = text[..at].to_string();
            text = text[at + unit.len_utf8()..].to_string();
            *slot = parse_token(input, &token)?;
        }
    }
    if !text.is_empty() {
        return Err(TsError::Duration {
            input: input.to_string(),
            token: text,
        });
    }

    let [y, q, m, w, d, h, i, s, micro] = amounts;
    let months = m + 3.0 * q + 12.0 * y;
    if months.fract() != 0.0 {
        return Err(TsError::Duration {
            input: input.to_string(),
            token: format!("{months} months"),
        });
    }
    let seconds = (h * 60.0 + i) * 60.0 + s;
    let delta = TsDelta::from_fractional(d + 7.0 * w, seconds, micro);
    Ok((delta, months as i64))
}

/// Parse compound duration text into a [`TsDelta`].
///
/// Accepts forms like `"9d"`, `"-1y2m3d4h"`, `"2 hours 4 Minutes 8 Sec"`.
/// Text with a nonzero months total fails with [`TsError::Months`]; use
/// [`parse_duration_with`] for month-bearing durations.
///
/// # Examples
///
/// ```rust
/// use tslice::parse_duration;
///
/// let d = parse_duration("2 hours 4 Minutes 8 Sec")?;
/// assert_eq!(d.days(), 0);
/// assert_eq!(d.seconds(), 7448);
/// # Ok::<(), tslice::TsError>(())
/// ```
pub fn parse_duration(text: &str) -> Result<TsDelta> {
    let (delta, months) = parse_parts(text)?;
    if months != 0 {
        return Err(TsError::Months(months));
    }
    Ok(delta)
}

/// Parse compound duration text into a months-capable duration type.
///
/// The months total (`months + 3*quarters + 12*years`) is handed to
/// [`FromMonths::from_parts`] together with the normalized day, second and
/// microsecond components.
///
/// # Examples
///
/// ```rust
/// use tslice::{parse_duration_with, MonthsDelta};
///
/// let d: MonthsDelta = parse_duration_with("1y 3quarters 1m")?;
/// assert_eq!(d.months(), 22);
/// # Ok::<(), tslice::TsError>(())
/// ```
pub fn parse_duration_with<M: FromMonths>(text: &str) -> Result<M> {
    let (delta, months) = parse_parts(text)?;
    Ok(M::from_parts(
        delta.days(),
        delta.seconds(),
        delta.microseconds(),
        months,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::MonthsDelta;

    fn ts(item: impl Into<Value>) -> Ts {
        parse_timestamp(Some(&item.into()), None).unwrap()
    }

    #[test]
    fn test_equivalent_encodings() {
        let from_str = ts("2020-10-13");
        let from_int = ts(20201013);
        let from_float = ts(20201013.012345);
        assert_eq!(from_str, from_int);
        assert_eq!(from_float.date(), from_str.date());
        assert_eq!(
            (from_float.hour(), from_float.minute(), from_float.second()),
            (1, 23, 45)
        );
    }

    #[test]
    fn test_float_fraction_pads_right() {
        let t = ts(20201013.1234);
        assert_eq!((t.hour(), t.minute(), t.second()), (12, 34, 0));
    }

    #[test]
    fn test_format_sniffing() {
        assert_eq!(ts("13.10.2020"), ts("2020-10-13"));
        assert_eq!(ts("10/13/2020"), ts("2020-10-13"));
        assert_eq!(ts("20201013"), ts("2020-10-13"));
        assert_eq!(ts("2020-10-13 01:23:45"), ts(20201013.012345));
        assert_eq!(ts("2020-10-13T01:23:45"), ts(20201013.012345));
    }

    #[test]
    fn test_offset_bearing_text() {
        let t = ts("2020-10-13T01:23:45+01:00");
        assert_eq!(t.hour(), 1);
        assert!(t.offset().is_some());
    }

    #[test]
    fn test_none_uses_default() {
        let fallback = Value::from("2020-10-13");
        let t = parse_timestamp(None, Some(&fallback)).unwrap();
        assert_eq!(t, ts("2020-10-13"));
    }

    #[test]
    fn test_unparsable_text_fails() {
        assert!(parse_timestamp(Some(&Value::from("not a date")), None).is_err());
        assert!(parse_timestamp(Some(&Value::from("99.99.9999")), None).is_err());
        assert!(parse_timestamp(Some(&Value::from(123.0)), None).is_err());
    }

    #[test]
    fn test_duration_compound_text() {
        let d = parse_duration("2 hours 4 Minutes 8 Sec").unwrap();
        assert_eq!(d.days(), 0);
        assert_eq!(d.seconds(), 7448);

        let d = parse_duration("-1y2m3d4h");
        assert!(d.is_err(), "month-bearing text needs parse_duration_with");

        let d = parse_duration("3d4h").unwrap();
        assert_eq!(d.days(), 3);
        assert_eq!(d.seconds(), 4 * 3600);
    }

    #[test]
    fn test_duration_signs_and_fractions() {
        let d = parse_duration("-2d").unwrap();
        assert_eq!(d.days(), -2);

        let d = parse_duration("+1w").unwrap();
        assert_eq!(d.days(), 7);

        let d = parse_duration("0.5d").unwrap();
        assert_eq!(d.days(), 0);
        assert_eq!(d.seconds(), 43_200);
    }

    #[test]
    fn test_duration_months_contract() {
        let m: MonthsDelta = parse_duration_with("1y 3quarters 1m").unwrap();
        assert_eq!(m.months(), 22);
        assert_eq!((m.days(), m.seconds(), m.microseconds()), (0, 0, 0));

        match parse_duration("2m") {
            Err(TsError::Months(n)) => assert_eq!(n, 2),
            other => panic!("expected months error, got {other:?}"),
        }
    }

    #[test]
    fn test_duration_rejects_leftovers() {
        match parse_duration("3dx") {
            Err(TsError::Duration { token, .. }) => assert_eq!(token, "x"),
            other => panic!("expected duration error, got {other:?}"),
        }
        assert!(parse_duration("ad").is_err());
    }

    #[test]
    fn test_empty_duration_is_zero() {
        assert_eq!(parse_duration("").unwrap(), TsDelta::zero());
    }
}
