//! Loosely-typed values.
//!
//! [`Value`] is the element, bound and key type of the collections: a small
//! enum over the timestamp-like kinds callers actually slice with (integers,
//! floats, strings, timestamps, dates, durations) plus a `Json` kind for
//! payloads read from the directory store. Mixed kinds in one collection are
//! allowed; comparisons only happen after both sides have been coerced to
//! the same kind by a [`Caster`](crate::Caster).
//!
//! Custom types opt into timestamp conversion through the [`Castable`]
//! capability trait instead of field probing: implement whichever of the
//! four accessors applies and leave the rest defaulted.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::delta::TsDelta;
use crate::error::{Result, TsError};
use crate::ts::Ts;

/// Timestamp-conversion capabilities, checked in priority order
/// `cast_ts`, `cast_timestamp`, `cast_date`, `cast_datetime`; the first
/// implemented accessor wins. `Some(Err(..))` means the capability exists
/// but its configured source failed to convert, which propagates.
pub trait Castable {
    fn cast_ts(&self) -> Option<Result<Ts>> {
        None
    }

    fn cast_timestamp(&self) -> Option<Result<Ts>> {
        None
    }

    fn cast_date(&self) -> Option<Result<NaiveDate>> {
        None
    }

    fn cast_datetime(&self) -> Option<Result<NaiveDateTime>> {
        None
    }
}

/// A loosely-typed element, bound or key.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Ts(Ts),
    Date(NaiveDate),
    Delta(TsDelta),
    Json(serde_json::Value),
}

impl Value {
    /// Kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Ts(_) => "ts",
            Value::Date(_) => "date",
            Value::Delta(_) => "delta",
            Value::Json(_) => "json",
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Truthiness in the loose sense: zero numbers, empty strings and JSON
    /// null/false are falsy, everything else truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Ts(_) | Value::Date(_) => true,
            Value::Delta(d) => *d != TsDelta::zero(),
            Value::Json(j) => match j {
                serde_json::Value::Null => false,
                serde_json::Value::Bool(b) => *b,
                serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
                serde_json::Value::String(s) => !s.is_empty(),
                serde_json::Value::Array(a) => !a.is_empty(),
                serde_json::Value::Object(o) => !o.is_empty(),
            },
        }
    }

    /// Unwrap a JSON scalar into the matching native kind, when there is one.
    pub(crate) fn from_json_scalar(json: &serde_json::Value) -> Option<Value> {
        match json {
            serde_json::Value::String(s) => Some(Value::Str(s.clone())),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Value::Int(i))
                } else {
                    n.as_f64().map(Value::Float)
                }
            }
            _ => None,
        }
    }

    fn arithmetic(op: &'static str, lhs: &Value, rhs: &Value) -> TsError {
        TsError::Arithmetic {
            op,
            lhs: lhs.kind(),
            rhs: rhs.kind(),
        }
    }

    pub fn try_add(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
            (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 + b)),
            (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a + *b as f64)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
            (Value::Ts(t), Value::Delta(d)) => Ok(Value::Ts(*t + *d)),
            (Value::Delta(d), Value::Ts(t)) => Ok(Value::Ts(*t + *d)),
            (Value::Delta(a), Value::Delta(b)) => Ok(Value::Delta(*a + *b)),
            _ => Err(Self::arithmetic("+", self, rhs)),
        }
    }

    pub fn try_sub(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a - b)),
            (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 - b)),
            (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a - *b as f64)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
            (Value::Ts(a), Value::Ts(b)) => Ok(Value::Delta(*a - *b)),
            (Value::Ts(t), Value::Delta(d)) => Ok(Value::Ts(*t - *d)),
            (Value::Delta(a), Value::Delta(b)) => Ok(Value::Delta(*a - *b)),
            _ => Err(Self::arithmetic("-", self, rhs)),
        }
    }

    pub fn try_mul(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a * b)),
            (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 * b)),
            (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a * *b as f64)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
            (Value::Str(s), Value::Int(n)) => Ok(Value::Str(s.repeat((*n).max(0) as usize))),
            (Value::Delta(d), Value::Int(n)) => Ok(Value::Delta(*d * *n)),
            (Value::Delta(d), Value::Float(x)) => Ok(Value::Delta(*d * *x)),
            _ => Err(Self::arithmetic("*", self, rhs)),
        }
    }

    pub fn try_div(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Float(*a as f64 / *b as f64)),
            (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 / b)),
            (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a / *b as f64)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a / b)),
            (Value::Delta(d), Value::Int(n)) => Ok(Value::Delta(*d / *n)),
            (Value::Delta(d), Value::Float(x)) => Ok(Value::Delta(*d / *x)),
            (Value::Delta(a), Value::Delta(b)) => {
                Ok(Value::Float(a.total_seconds() / b.total_seconds()))
            }
            _ => Err(Self::arithmetic("/", self, rhs)),
        }
    }

    pub fn try_floordiv(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.div_euclid(*b))),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float((a / b).floor())),
            (Value::Int(a), Value::Float(b)) => Ok(Value::Float((*a as f64 / b).floor())),
            (Value::Float(a), Value::Int(b)) => Ok(Value::Float((a / *b as f64).floor())),
            (Value::Delta(d), Value::Int(n)) => Ok(Value::Delta(*d / *n)),
            _ => Err(Self::arithmetic("//", self, rhs)),
        }
    }

    pub fn try_rem(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.rem_euclid(*b))),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b * (a / b).floor())),
            (Value::Int(a), Value::Float(b)) => {
                let a = *a as f64;
                Ok(Value::Float(a - b * (a / b).floor()))
            }
            (Value::Float(a), Value::Int(b)) => {
                let b = *b as f64;
                Ok(Value::Float(a - b * (a / b).floor()))
            }
            _ => Err(Self::arithmetic("%", self, rhs)),
        }
    }

    pub fn try_neg(&self) -> Result<Value> {
        match self {
            Value::Int(i) => Ok(Value::Int(-i)),
            Value::Float(f) => Ok(Value::Float(-f)),
            Value::Delta(d) => Ok(Value::Delta(-*d)),
            _ => Err(Self::arithmetic("-", self, self)),
        }
    }

    pub fn try_abs(&self) -> Result<Value> {
        match self {
            Value::Int(i) => Ok(Value::Int(i.abs())),
            Value::Float(f) => Ok(Value::Float(f.abs())),
            Value::Delta(d) => Ok(Value::Delta(if *d < TsDelta::zero() { -*d } else { *d })),
            _ => Err(Self::arithmetic("abs", self, self)),
        }
    }

    pub fn try_invert(&self) -> Result<Value> {
        match self {
            Value::Int(i) => Ok(Value::Int(!i)),
            _ => Err(Self::arithmetic("~", self, self)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Ts(a), Value::Ts(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Delta(a), Value::Delta(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    /// Ordering exists within a kind (and across `Int`/`Float` numerically);
    /// values of unrelated kinds are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
            (Value::Ts(a), Value::Ts(b)) => a.partial_cmp(b),
            (Value::Date(a), Value::Date(b)) => a.partial_cmp(b),
            (Value::Delta(a), Value::Delta(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            // Debug formatting keeps a trailing `.0`, matching the string
            // form expected by the string-coercion target.
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Ts(t) => write!(f, "{t}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Delta(d) => write!(f, "{d}"),
            Value::Json(j) => write!(f, "{j}"),
        }
    }
}

impl fmt::Debug for Value {
    /// Mirrors `Display` except strings keep their quotes, so collections
    /// print unambiguously.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Ts(t) => write!(f, "{t:?}"),
            Value::Delta(d) => write!(f, "{d:?}"),
            other => write!(f, "{other}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Ts> for Value {
    fn from(v: Ts) -> Self {
        Value::Ts(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<TsDelta> for Value {
    fn from(v: TsDelta) -> Self {
        Value::Delta(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_equality_crosses_kinds() {
        assert_eq!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Int(1), Value::Str("1".into()));
        assert_eq!(Value::Float(1.1), Value::Float(1.1));
    }

    #[test]
    fn test_ordering_within_kind_only() {
        assert!(Value::Float(1.0) < Value::Float(1.1));
        assert!(Value::Int(1) < Value::Float(1.5));
        assert!(Value::Str("2024-12-24".into()) < Value::Str("2024-12-31".into()));
        assert!(
            Value::Str("a".into())
                .partial_cmp(&Value::Int(1))
                .is_none()
        );
    }

    #[test]
    fn test_distributive_arithmetic_kinds() {
        assert_eq!(
            Value::Int(2).try_mul(&Value::Int(3)).unwrap(),
            Value::Int(6)
        );
        assert_eq!(
            Value::Int(1).try_div(&Value::Int(2)).unwrap(),
            Value::Float(0.5)
        );
        assert_eq!(
            Value::Int(-7).try_floordiv(&Value::Int(2)).unwrap(),
            Value::Int(-4)
        );
        assert_eq!(
            Value::Int(-7).try_rem(&Value::Int(2)).unwrap(),
            Value::Int(1)
        );
        assert_eq!(Value::Int(5).try_invert().unwrap(), Value::Int(-6));
        assert!(Value::Str("a".into()).try_sub(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_ts_delta_arithmetic() {
        let a = Ts::new(2021, 12, 21).unwrap();
        let b = Ts::new(2021, 12, 12).unwrap();
        let diff = Value::Ts(a).try_sub(&Value::Ts(b)).unwrap();
        assert_eq!(diff, Value::Delta(TsDelta::new(9, 0, 0)));
        let back = Value::Ts(b).try_add(&diff).unwrap();
        assert_eq!(back, Value::Ts(a));
    }

    #[test]
    fn test_float_display_keeps_decimal_point() {
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(20201013.1234).to_string(), "20201013.1234");
    }
}
