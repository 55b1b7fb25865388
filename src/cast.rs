//! Type-directed coercion.
//!
//! A [`Caster`] pairs a target kind with an optional default and converts
//! arbitrary values into that kind for comparison purposes. Filters build
//! one caster per slice bound; the target comes from the *bound's* kind,
//! never from any declared element type, which is what lets heterogeneous
//! collections compare against whatever bounds the caller supplies.

use crate::delta::TsDelta;
use crate::error::{Result, TsError};
use crate::parse::{parse_duration, parse_timestamp};
use crate::value::Value;

/// Comparison kind a value can be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Full timestamp via the flexible parser.
    Timestamp,
    /// Date portion of the parsed timestamp.
    Date,
    Int,
    Float,
    Str,
    Delta,
}

/// A coercion functor: `(target kind, default fallback)`.
///
/// Stateless beyond that pair; construct one per filter call.
///
/// # Examples
///
/// ```rust
/// use tslice::{Caster, Value};
///
/// let bound = Value::from("2024-12-24");
/// let caster = Caster::for_value(&bound);
/// let key = caster.cast(&Value::from("2024-12-24"))?;
/// assert_eq!(key, bound);
/// # Ok::<(), tslice::TsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Caster {
    target: Option<Target>,
    default: Option<Value>,
}

impl Caster {
    pub fn new(target: Option<Target>, default: Option<Value>) -> Self {
        Self { target, default }
    }

    /// Derive the target kind from a slice bound or equality key.
    pub fn for_value(bound: &Value) -> Self {
        let target = match bound {
            Value::Int(_) => Target::Int,
            Value::Float(_) => Target::Float,
            Value::Str(_) => Target::Str,
            Value::Ts(_) => Target::Timestamp,
            Value::Date(_) => Target::Date,
            Value::Delta(_) => Target::Delta,
            Value::Json(j) => match Value::from_json_scalar(j) {
                Some(scalar) => return Self::for_value(&scalar),
                None => Target::Str,
            },
        };
        Self::new(Some(target), None)
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    /// Convert `value` into the target kind.
    ///
    /// An unspecified target behaves like [`Target::Timestamp`]. Conversion
    /// failures are the underlying parser's errors, never swallowed.
    pub fn cast(&self, value: &Value) -> Result<Value> {
        // JSON scalars participate as their native kind.
        let unwrapped;
        let value = match value {
            Value::Json(j) => match Value::from_json_scalar(j) {
                Some(scalar) => {
                    unwrapped = scalar;
                    &unwrapped
                }
                None => value,
            },
            _ => value,
        };

        match self.target {
            None | Some(Target::Timestamp) => {
                parse_timestamp(Some(value), self.default.as_ref()).map(Value::Ts)
            }
            Some(Target::Date) => parse_timestamp(Some(value), self.default.as_ref())
                .map(|ts| Value::Date(ts.date())),
            Some(Target::Float) => cast_float(value).map(Value::Float),
            Some(Target::Int) => cast_int(value).map(Value::Int),
            Some(Target::Str) => Ok(Value::Str(value.to_string())),
            Some(Target::Delta) => cast_delta(value).map(Value::Delta),
        }
    }
}

fn cast_err(value: &Value, target: &'static str) -> TsError {
    TsError::Cast {
        value: format!("{value:?}"),
        target,
    }
}

fn cast_float(value: &Value) -> Result<f64> {
    match value {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        Value::Str(s) => s.parse().map_err(|_| cast_err(value, "float")),
        Value::Ts(t) => Ok(t.as_float()),
        Value::Delta(d) => Ok(d.year_fraction()),
        _ => Err(cast_err(value, "float")),
    }
}

fn cast_int(value: &Value) -> Result<i64> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::Float(f) => Ok(f.trunc() as i64),
        Value::Str(s) => s.parse().map_err(|_| cast_err(value, "int")),
        Value::Ts(t) => Ok(t.as_int()),
        _ => Err(cast_err(value, "int")),
    }
}

fn cast_delta(value: &Value) -> Result<TsDelta> {
    match value {
        Value::Delta(d) => Ok(*d),
        Value::Str(s) => parse_duration(s),
        Value::Int(days) => Ok(TsDelta::new(*days, 0, 0)),
        Value::Float(days) => Ok(TsDelta::from_fractional(*days, 0.0, 0.0)),
        _ => Err(cast_err(value, "delta")),
    }
}
