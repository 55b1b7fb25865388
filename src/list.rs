//! Timestamp-filtered sequence.
//!
//! [`TsList`] is an ordered sequence of loosely-typed values enhanced by two
//! features over a plain vector:
//!
//! 1. filtering by slices whose bounds differ from integers, in which every
//!    element is coerced to the bound's kind before comparison;
//! 2. distributive transfer of operations to the elements, so multiplying a
//!    list by two doubles each element instead of repeating the list.

use std::cmp::Ordering;
use std::fmt;

use crate::cast::Caster;
use crate::error::Result;
use crate::slice::{int_bound, positional, TsSlice};
use crate::value::Value;

/// An ordered sequence filterable by timestamp-like slices.
///
/// Duplicates and mixed element kinds are permitted; element order is
/// insertion order, never sorted. Filters return a new list and leave the
/// input untouched.
///
/// # Examples
///
/// ```rust
/// use tslice::{TsList, TsSlice, Value};
///
/// let list: TsList = [1.0, 1.1, 1.2, 1.3, 1.4].into_iter().collect();
///
/// // half-open range filter: 1.0 included, 1.3 excluded
/// let mid = list.slice(&TsSlice::between(1.0, 1.3))?;
/// assert_eq!(mid.len(), 3);
///
/// // equality filter: every element equal to the key after coercion
/// let hits = list.select(&Value::from(1.1))?;
/// assert_eq!(hits.len(), 1);
/// # Ok::<(), tslice::TsError>(())
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct TsList {
    items: Vec<Value>,
}

/// Right-hand operand of a distributive binary operation: either a scalar
/// to distribute against every element, or another sequence, which selects
/// concatenation instead.
#[derive(Clone, Copy)]
pub enum Operand<'a> {
    Item(&'a Value),
    Seq(&'a TsList),
}

impl<'a> From<&'a Value> for Operand<'a> {
    fn from(value: &'a Value) -> Self {
        Operand::Item(value)
    }
}

impl<'a> From<&'a TsList> for Operand<'a> {
    fn from(list: &'a TsList) -> Self {
        Operand::Seq(list)
    }
}

impl TsList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: impl Into<Value>) {
        self.items.push(item.into());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Positional element access; negative indices count from the tail.
    pub fn get(&self, index: i64) -> Option<&Value> {
        let len = self.items.len() as i64;
        let index = if index < 0 { index + len } else { index };
        if (0..len).contains(&index) {
            self.items.get(index as usize)
        } else {
            None
        }
    }

    /// Equality filter: the sub-list of elements whose coerced value equals
    /// `key`. The coercion target is `key`'s kind. An element that fails to
    /// coerce fails the whole filter; a miss is just an empty list.
    pub fn select(&self, key: &Value) -> Result<TsList> {
        let caster = Caster::for_value(key);
        let mut out = Vec::new();
        for item in &self.items {
            if caster.cast(item)? == *key {
                out.push(item.clone());
            }
        }
        Ok(out.into())
    }

    /// Range filter.
    ///
    /// An integer bound routes the whole slice through plain positional
    /// semantics. Otherwise elements are kept when
    /// `start <= cast_start(v)` and `cast_stop(v) < stop` (start
    /// inclusive, stop exclusive), with one caster per bound, each derived
    /// independently from that bound's kind. An integer step then re-slices
    /// the filtered result: positive steps anchor at the first element,
    /// negative steps at the last. Non-integer steps are an error.
    pub fn slice(&self, slice: &TsSlice) -> Result<TsList> {
        if slice.has_int_bound() {
            let start = int_bound(&slice.start)?;
            let stop = int_bound(&slice.stop)?;
            let step = slice.step_as_int()?;
            return Ok(positional(&self.items, start, stop, step)?.into());
        }

        let filtered = match (&slice.start, &slice.stop) {
            (Some(start), Some(stop)) => {
                let cast_start = Caster::for_value(start);
                let cast_stop = Caster::for_value(stop);
                let mut out = Vec::new();
                for item in &self.items {
                    if le(start, &cast_start.cast(item)?) && lt(&cast_stop.cast(item)?, stop) {
                        out.push(item.clone());
                    }
                }
                out
            }
            (Some(start), None) => {
                let caster = Caster::for_value(start);
                let mut out = Vec::new();
                for item in &self.items {
                    if le(start, &caster.cast(item)?) {
                        out.push(item.clone());
                    }
                }
                out
            }
            (None, Some(stop)) => {
                let caster = Caster::for_value(stop);
                let mut out = Vec::new();
                for item in &self.items {
                    if lt(&caster.cast(item)?, stop) {
                        out.push(item.clone());
                    }
                }
                out
            }
            (None, None) => self.items.clone(),
        };

        match slice.step_as_int()? {
            None => Ok(filtered.into()),
            // reversing anchors at the tail, not a computed start
            Some(step) if step < 0 => {
                Ok(positional(&filtered, Some(-1), None, Some(step))?.into())
            }
            Some(step) => Ok(positional(&filtered, Some(0), None, Some(step))?.into()),
        }
    }

    /// Apply a unary operation to every element.
    pub fn map_unary(&self, op: impl Fn(&Value) -> Result<Value>) -> Result<TsList> {
        self.items.iter().map(op).collect()
    }

    /// Apply a binary operation element-wise against a scalar operand, or
    /// concatenate when the operand is itself a sequence.
    pub fn map_binary_or_concat<'a>(
        &self,
        rhs: impl Into<Operand<'a>>,
        op: impl Fn(&Value, &Value) -> Result<Value>,
    ) -> Result<TsList> {
        match rhs.into() {
            Operand::Seq(other) => Ok(self.concat(other)),
            Operand::Item(value) => self.map_unary(|item| op(item, value)),
        }
    }

    /// Concatenate two sequences.
    pub fn concat(&self, other: &TsList) -> TsList {
        let mut items = self.items.clone();
        items.extend(other.items.iter().cloned());
        items.into()
    }

    /// Distribute addition, or concatenate when given a sequence.
    pub fn add<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<TsList> {
        self.map_binary_or_concat(rhs, Value::try_add)
    }

    /// Distribute subtraction. Subtracting a sequence negates every
    /// element, concatenates, and negates again, preserving both signed
    /// distribution and concatenation semantics symmetrically.
    pub fn sub<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<TsList> {
        match rhs.into() {
            Operand::Seq(other) => self.neg()?.concat(other).neg(),
            Operand::Item(value) => self.map_unary(|item| item.try_sub(value)),
        }
    }

    pub fn mul(&self, rhs: &Value) -> Result<TsList> {
        self.map_unary(|item| item.try_mul(rhs))
    }

    pub fn div(&self, rhs: &Value) -> Result<TsList> {
        self.map_unary(|item| item.try_div(rhs))
    }

    pub fn floordiv(&self, rhs: &Value) -> Result<TsList> {
        self.map_unary(|item| item.try_floordiv(rhs))
    }

    pub fn rem(&self, rhs: &Value) -> Result<TsList> {
        self.map_unary(|item| item.try_rem(rhs))
    }

    pub fn neg(&self) -> Result<TsList> {
        self.map_unary(Value::try_neg)
    }

    pub fn abs(&self) -> Result<TsList> {
        self.map_unary(Value::try_abs)
    }

    pub fn invert(&self) -> Result<TsList> {
        self.map_unary(Value::try_invert)
    }

    /// Call a function on every element and collect the results: the
    /// sequence analogue of calling each contained item.
    pub fn apply(&self, op: impl Fn(&Value) -> Result<Value>) -> Result<TsList> {
        self.map_unary(op)
    }
}

fn le(a: &Value, b: &Value) -> bool {
    matches!(a.partial_cmp(b), Some(Ordering::Less | Ordering::Equal))
}

fn lt(a: &Value, b: &Value) -> bool {
    matches!(a.partial_cmp(b), Some(Ordering::Less))
}

impl From<Vec<Value>> for TsList {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl<V: Into<Value>> FromIterator<V> for TsList {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<V: Into<Value>> Extend<V> for TsList {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        self.items.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for TsList {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a TsList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for TsList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TsList([")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item:?}")?;
        }
        write!(f, "])")
    }
}

impl fmt::Debug for TsList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
