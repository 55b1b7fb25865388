//! Timestamp-filtered mapping.
//!
//! [`TsDict`] is an insertion-ordered mapping whose keys can be filtered by
//! timestamp-like slices: slicing operates on the keys as an ordered
//! sequence and rebuilds the corresponding key→value mapping.

use std::fmt;

use crate::cast::Caster;
use crate::error::{Result, TsError};
use crate::list::TsList;
use crate::slice::TsSlice;
use crate::value::Value;

/// An insertion-ordered mapping filterable by timestamp-like slices.
///
/// # Examples
///
/// ```rust
/// use tslice::{TsDict, TsSlice, Value};
///
/// let mut dict = TsDict::new();
/// dict.insert("2024-12-24", Value::from("Christmas Eve"));
/// dict.insert("2024-12-31", Value::from("New Years Eve"));
///
/// let all = dict.slice(&TsSlice::all())?;
/// assert_eq!(all.len(), 2);
///
/// dict.remove(&Value::from("2024-12-24"));
/// let rest = dict.slice(&TsSlice::all())?;
/// assert_eq!(rest.keys(), [Value::from("2024-12-31")].into_iter().collect());
/// # Ok::<(), tslice::TsError>(())
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct TsDict {
    entries: Vec<(Value, Value)>,
}

impl TsDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Direct lookup by exact key equality.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Direct lookup, failing with [`TsError::KeyNotFound`] on a miss.
    pub fn try_get(&self, key: &Value) -> Result<&Value> {
        self.get(key)
            .ok_or_else(|| TsError::KeyNotFound(format!("{key:?}")))
    }

    /// Positional value access; negative indices count from the tail.
    pub fn get_at(&self, index: i64) -> Option<&Value> {
        let len = self.entries.len() as i64;
        let index = if index < 0 { index + len } else { index };
        if (0..len).contains(&index) {
            self.entries.get(index as usize).map(|(_, v)| v)
        } else {
            None
        }
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let at = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(at).1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The keys, in insertion order, as a filterable sequence.
    pub fn keys(&self) -> TsList {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<&Value> {
        self.entries.iter().map(|(_, v)| v).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Range filter over the keys; the result maps the surviving keys to
    /// their values, in filtered key order.
    pub fn slice(&self, slice: &TsSlice) -> Result<TsDict> {
        let keys = self.keys().slice(slice)?;
        let mut out = TsDict::new();
        for key in &keys {
            if let Some(value) = self.get(key) {
                out.insert(key.clone(), value.clone());
            }
        }
        Ok(out)
    }

    /// Equality filter over the keys.
    ///
    /// Direct key membership is checked first, the cheaper and more
    /// precise path; only a miss falls back to the coerced-equality
    /// scan. The sequence variant deliberately has no such shortcut.
    pub fn select(&self, key: &Value) -> Result<TsDict> {
        if let Some(value) = self.get(key) {
            let mut out = TsDict::new();
            out.insert(key.clone(), value.clone());
            return Ok(out);
        }

        let caster = Caster::for_value(key);
        let mut out = TsDict::new();
        for (k, v) in &self.entries {
            if caster.cast(k)? == *key {
                out.insert(k.clone(), v.clone());
            }
        }
        Ok(out)
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for TsDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = TsDict::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

impl<K: Into<Value>, V: Into<Value>> Extend<(K, V)> for TsDict {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for TsDict {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for TsDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TsDict({{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k:?}: {v:?}")?;
        }
        write!(f, "}})")
    }
}

impl fmt::Debug for TsDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenths() -> TsDict {
        [
            (1.0, "a"),
            (1.1, "b"),
            (1.2, "c"),
            (1.3, "d"),
            (1.4, "e"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_direct_lookup() {
        let dict = tenths();
        assert_eq!(dict.get(&Value::from(1.3)), Some(&Value::from("d")));
        assert!(dict.try_get(&Value::from(9.9)).is_err());
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut dict = tenths();
        dict.insert(1.1, "B");
        assert_eq!(dict.keys(), [1.0, 1.1, 1.2, 1.3, 1.4].into_iter().collect());
        assert_eq!(dict.get(&Value::from(1.1)), Some(&Value::from("B")));
    }

    #[test]
    fn test_slice_projects_keys() {
        let dict = tenths();
        let out = dict.slice(&TsSlice::between(1.0, 1.3)).unwrap();
        assert_eq!(out.keys(), [1.0, 1.1, 1.2].into_iter().collect());
        assert_eq!(out.values(), vec![&Value::from("a"), &Value::from("b"), &Value::from("c")]);
    }

    #[test]
    fn test_slice_with_step() {
        let dict = tenths();
        let out = dict.slice(&TsSlice::between(1.1, 1.5).by(2)).unwrap();
        assert_eq!(out.keys(), [1.1, 1.3].into_iter().collect());
    }

    #[test]
    fn test_select_prefers_direct_membership() {
        let dict = tenths();
        let out = dict.select(&Value::from(1.1)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.get(&Value::from(1.1)), Some(&Value::from("b")));
    }

    #[test]
    fn test_select_falls_back_to_coerced_scan() {
        let dict: TsDict = [("2024-12-24", "eve"), ("2024-12-31", "nye")]
            .into_iter()
            .collect();
        // an exact-kind miss that still matches after coercion
        let key = Value::Ts(crate::Ts::new(2024, 12, 24).unwrap());
        let out = dict.select(&key).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            out.values(),
            vec![&Value::from("eve")]
        );
    }

    #[test]
    fn test_positional_access() {
        let dict = tenths();
        assert_eq!(dict.get_at(0), Some(&Value::from("a")));
        assert_eq!(dict.get_at(-1), Some(&Value::from("e")));
        assert_eq!(dict.get_at(9), None);
    }

    #[test]
    fn test_empty_slice_of_empty_dict() {
        let dict = TsDict::new();
        assert!(dict.slice(&TsSlice::all()).unwrap().is_empty());
    }

    #[test]
    fn test_display_form() {
        let dict: TsDict = [(1.0, "a")].into_iter().collect();
        assert_eq!(dict.to_string(), "TsDict({1.0: \"a\"})");
    }
}
