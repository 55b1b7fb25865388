//! Generic records with conversion configuration.
//!
//! [`TsRecord`] is a string-keyed bag of loosely-typed fields plus a
//! separate map from conversion capability to field name. Configuring
//! `"ts" -> "created"` makes the record usable anywhere a timestamp-like
//! value is expected: the [`Castable`] implementation parses the configured
//! field on demand.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Result, TsError};
use crate::parse::parse_timestamp;
use crate::ts::Ts;
use crate::value::{Castable, Value};

/// A record pairing generic fields with conversion configuration.
///
/// # Examples
///
/// ```rust
/// use tslice::{parse_castable, TsRecord, Value};
///
/// let record = TsRecord::new()
///     .with_field("name", "My Name")
///     .with_field("filed", "20121124")
///     .with_cast("ts", "filed")
///     .with_cast("str", "name");
///
/// let ts = parse_castable(&record, None)?;
/// assert_eq!(ts.as_int(), 20121124);
/// assert_eq!(record.to_string(), "My Name");
/// # Ok::<(), tslice::TsError>(())
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct TsRecord {
    fields: Vec<(String, Value)>,
    casts: Vec<(String, String)>,
}

impl TsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field; a replaced field keeps its original position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(field) => field.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Configure a conversion capability to read from a field.
    ///
    /// Recognized capabilities: `ts`, `timestamp`, `date`, `datetime`,
    /// `bool`, `int`, `float`, `str`, `delta`.
    pub fn set_cast(&mut self, capability: impl Into<String>, field: impl Into<String>) {
        let capability = capability.into();
        let field = field.into();
        match self.casts.iter_mut().find(|(c, _)| *c == capability) {
            Some(cast) => cast.1 = field,
            None => self.casts.push((capability, field)),
        }
    }

    pub fn with_cast(mut self, capability: impl Into<String>, field: impl Into<String>) -> Self {
        self.set_cast(capability, field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// The field a capability is configured to read, if any.
    fn cast_source(&self, capability: &str) -> Option<&Value> {
        let field = self.casts.iter().find(|(c, _)| c == capability)?;
        self.get(&field.1)
    }

    /// Iterate the generic fields (conversion config excluded).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Truthiness of the configured `bool` field; false when unconfigured.
    pub fn as_bool(&self) -> bool {
        self.cast_source("bool").is_some_and(Value::is_truthy)
    }

    /// Integer reading of the configured `int` field; zero when
    /// unconfigured.
    pub fn as_int(&self) -> Result<i64> {
        match self.cast_source("int") {
            None => Ok(0),
            Some(Value::Int(i)) => Ok(*i),
            Some(Value::Float(f)) => Ok(f.trunc() as i64),
            Some(Value::Str(s)) => s.parse().map_err(|_| TsError::Cast {
                value: s.clone(),
                target: "int",
            }),
            Some(other) => Err(TsError::Cast {
                value: format!("{other:?}"),
                target: "int",
            }),
        }
    }

    /// Float reading of the configured `float` field; falls back to the
    /// integer reading when unconfigured.
    pub fn as_float(&self) -> Result<f64> {
        match self.cast_source("float") {
            None => Ok(self.as_int()? as f64),
            Some(Value::Int(i)) => Ok(*i as f64),
            Some(Value::Float(f)) => Ok(*f),
            Some(Value::Str(s)) => s.parse().map_err(|_| TsError::Cast {
                value: s.clone(),
                target: "float",
            }),
            Some(other) => Err(TsError::Cast {
                value: format!("{other:?}"),
                target: "float",
            }),
        }
    }

    /// The configured `delta` field parsed as a duration.
    pub fn as_delta(&self) -> Option<Result<crate::TsDelta>> {
        let source = self.cast_source("delta")?;
        Some(match source {
            Value::Delta(d) => Ok(*d),
            other => crate::parse_duration(&other.to_string()),
        })
    }

    /// The generic fields as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), json_of(value)))
            .collect();
        serde_json::Value::Object(map)
    }

    /// Rebuild a record from a JSON object; scalars become native kinds,
    /// everything else stays JSON. Conversion config is not serialized.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let object = json.as_object().ok_or_else(|| TsError::Cast {
            value: json.to_string(),
            target: "record",
        })?;
        let mut record = TsRecord::new();
        for (name, value) in object {
            let value =
                Value::from_json_scalar(value).unwrap_or_else(|| Value::Json(value.clone()));
            record.set(name.clone(), value);
        }
        Ok(record)
    }

    fn parse_field(&self, capability: &str) -> Option<Result<Ts>> {
        let source = self.cast_source(capability)?;
        Some(parse_timestamp(Some(source), None))
    }
}

fn json_of(value: &Value) -> serde_json::Value {
    match value {
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Value::from(*f),
        Value::Str(s) => serde_json::Value::from(s.clone()),
        Value::Json(j) => j.clone(),
        other => serde_json::Value::from(other.to_string()),
    }
}

impl Castable for TsRecord {
    fn cast_ts(&self) -> Option<Result<Ts>> {
        self.parse_field("ts")
    }

    fn cast_timestamp(&self) -> Option<Result<Ts>> {
        self.parse_field("timestamp")
    }

    fn cast_date(&self) -> Option<Result<NaiveDate>> {
        Some(self.parse_field("date")?.map(|ts| ts.date()))
    }

    fn cast_datetime(&self) -> Option<Result<NaiveDateTime>> {
        Some(self.parse_field("datetime")?.map(|ts| ts.naive()))
    }
}

impl fmt::Display for TsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cast_source("str") {
            Some(value) => write!(f, "{value}"),
            None => write!(f, "{self:?}"),
        }
    }
}

impl fmt::Debug for TsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TsRecord(")?;
        let mut first = true;
        for (name, value) in &self.fields {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{name}={value:?}")?;
        }
        for (capability, field) in &self.casts {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{capability}->{field}")?;
        }
        write!(f, ")")
    }
}
