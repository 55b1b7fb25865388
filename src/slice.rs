//! Slice requests over timestamp-indexed collections.
//!
//! A [`TsSlice`] carries optional start/stop bounds and an optional step,
//! all loosely typed. Integer bounds select plain positional slicing, the
//! escape hatch for conventional index access, while non-integer bounds
//! trigger the coerced half-open range filter implemented by the
//! collections.

use crate::error::{Result, TsError};
use crate::value::Value;

/// A slice request: `start..stop` with an optional step.
///
/// # Examples
///
/// ```rust
/// use tslice::{TsList, TsSlice};
///
/// let list: TsList = [1.0, 1.1, 1.2, 1.3, 1.4].into_iter().collect();
/// let mid = list.slice(&TsSlice::between(1.0, 1.3))?;
/// assert_eq!(mid, [1.0, 1.1, 1.2].into_iter().collect());
/// # Ok::<(), tslice::TsError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TsSlice {
    pub start: Option<Value>,
    pub stop: Option<Value>,
    pub step: Option<Value>,
}

impl TsSlice {
    /// The full slice `[:]`.
    pub fn all() -> Self {
        Self::default()
    }

    /// Both bounds: start inclusive, stop exclusive.
    pub fn between(start: impl Into<Value>, stop: impl Into<Value>) -> Self {
        Self {
            start: Some(start.into()),
            stop: Some(stop.into()),
            step: None,
        }
    }

    /// Lower bound only.
    pub fn since(start: impl Into<Value>) -> Self {
        Self {
            start: Some(start.into()),
            stop: None,
            step: None,
        }
    }

    /// Upper bound only.
    pub fn until(stop: impl Into<Value>) -> Self {
        Self {
            stop: Some(stop.into()),
            start: None,
            step: None,
        }
    }

    /// Set an integer step.
    pub fn by(mut self, step: i64) -> Self {
        self.step = Some(Value::Int(step));
        self
    }

    /// Set an arbitrary step value. Anything but an integer is rejected at
    /// filter time.
    pub fn with_step(mut self, step: impl Into<Value>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Whether either bound is an integer, which routes the whole slice
    /// through plain positional semantics.
    pub(crate) fn has_int_bound(&self) -> bool {
        self.start.as_ref().is_some_and(Value::is_int)
            || self.stop.as_ref().is_some_and(Value::is_int)
    }

    pub(crate) fn step_as_int(&self) -> Result<Option<i64>> {
        match &self.step {
            None => Ok(None),
            Some(Value::Int(step)) => Ok(Some(*step)),
            Some(other) => Err(TsError::Step(other.kind())),
        }
    }
}

pub(crate) fn int_bound(bound: &Option<Value>) -> Result<Option<i64>> {
    match bound {
        None => Ok(None),
        Some(Value::Int(i)) => Ok(Some(*i)),
        Some(other) => Err(TsError::Index(other.kind())),
    }
}

/// Positional slicing with standard sequence semantics: negative indices
/// count from the tail, out-of-range bounds clamp, a negative step walks
/// backwards.
pub(crate) fn positional<T: Clone>(
    items: &[T],
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
) -> Result<Vec<T>> {
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(TsError::ZeroStep);
    }
    let len = items.len() as i64;

    let adjust = |bound: i64| if bound < 0 { bound + len } else { bound };
    let (mut index, limit) = if step > 0 {
        let start = start.map_or(0, |b| adjust(b).clamp(0, len));
        let stop = stop.map_or(len, |b| adjust(b).clamp(0, len));
        (start, stop)
    } else {
        let start = start.map_or(len - 1, |b| adjust(b).clamp(-1, len - 1));
        let stop = stop.map_or(-1, |b| adjust(b).clamp(-1, len - 1));
        (start, stop)
    };

    let mut out = Vec::new();
    while (step > 0 && index < limit) || (step < 0 && index > limit) {
        out.push(items[index as usize].clone());
        index += step;
    }
    Ok(out)
}
