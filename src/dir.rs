//! Directory-backed store.
//!
//! [`TsDir`] maps a filesystem directory onto the mapping-variant slicing
//! contract: keys are the visible file names, sorted lexicographically
//! (which, for zero-padded date-like names, is chronological order) and
//! values are the JSON-decoded file contents. Nothing is cached: every read
//! goes back to disk, every write lands directly in a file. Hidden
//! (`.`-prefixed) files hold directory-level attributes and never appear in
//! key enumeration.
//!
//! Reporting of guarded failures (writes on a read-only store, move/remove
//! problems) is policy-driven by [`Verbosity`]: swallow, warn via `log`, or
//! escalate as a hard error. Lookup misses and parse failures always
//! surface regardless of the policy.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dict::TsDict;
use crate::error::{Result, TsError};
use crate::list::TsList;
use crate::slice::TsSlice;
use crate::ts::Ts;
use crate::value::Value;

/// Failure-reporting policy for guarded store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Swallow guarded failures silently.
    Silent,
    /// Report guarded failures through `log::warn!` and continue.
    #[default]
    Warn,
    /// Escalate guarded failures as errors.
    Strict,
}

/// A directory behaving like a [`TsDict`].
///
/// # Examples
///
/// ```rust,no_run
/// use tslice::{TsDir, TsSlice};
/// use serde_json::json;
///
/// let store = TsDir::create("data/events")?;
/// store.insert("2024-12-24", &json!({"name": "Christmas Eve"}))?;
/// store.insert("2024-12-31", &json!({"name": "New Years Eve"}))?;
///
/// let december = store.slice(&TsSlice::between("2024-12-01", "2025-01-01"))?;
/// assert_eq!(december.len(), 2);
/// # Ok::<(), tslice::TsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TsDir {
    path: PathBuf,
    read_only: bool,
    verbosity: Verbosity,
}

impl TsDir {
    /// Open a read-only view of a directory. The directory does not have to
    /// exist yet; a missing one simply has no keys.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() && !path.is_dir() {
            return Err(TsError::NotADirectory(path.display().to_string()));
        }
        Ok(Self {
            path,
            read_only: true,
            verbosity: Verbosity::default(),
        })
    }

    /// Open a writable store, creating the directory if needed.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let mut dir = Self::open(path)?;
        dir.read_only = false;
        if !dir.path.exists() {
            std::fs::create_dir_all(&dir.path)?;
        }
        Ok(dir)
    }

    /// Open a directory relative to the user's home directory.
    pub fn from_home(path: impl AsRef<Path>) -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            TsError::NotADirectory("home directory is not available".to_string())
        })?;
        Self::open(home.join(path.as_ref()))
    }

    /// Turn this handle writable, creating the directory if needed.
    pub fn writable(mut self) -> Result<Self> {
        self.read_only = false;
        if !self.path.exists() {
            std::fs::create_dir_all(&self.path)?;
        }
        Ok(self)
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Name of the directory.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Path of the directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Route a guarded failure through the verbosity policy.
    fn report(&self, err: TsError) -> Result<()> {
        match self.verbosity {
            Verbosity::Strict => Err(err),
            Verbosity::Warn => {
                log::warn!("{err}");
                Ok(())
            }
            Verbosity::Silent => Ok(()),
        }
    }

    /// `Ok(true)` when writing may proceed; `Ok(false)` when the policy
    /// swallowed the attempt.
    fn writer_guard(&self) -> Result<bool> {
        if !self.read_only {
            return Ok(true);
        }
        self.report(TsError::ReadOnly(self.path.display().to_string()))?;
        Ok(false)
    }

    /// Visible file names, sorted, as a filterable key sequence.
    pub fn keys(&self) -> Result<TsList> {
        let mut names = Vec::new();
        if self.path.exists() {
            for entry in std::fs::read_dir(&self.path)? {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().to_string();
                if entry.path().is_file() && !name.starts_with('.') {
                    names.push(name);
                }
            }
        }
        names.sort();
        Ok(names.into_iter().collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.keys()?.is_empty())
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self
            .keys()?
            .iter()
            .any(|k| matches!(k, Value::Str(s) if s == key)))
    }

    fn read_json(&self, file_name: &str) -> Result<serde_json::Value> {
        let text = std::fs::read_to_string(self.path.join(file_name)).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                TsError::KeyNotFound(file_name.to_string())
            } else {
                TsError::Io(err)
            }
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    fn write_json(&self, file_name: &str, value: &serde_json::Value) -> Result<()> {
        if !self.writer_guard()? {
            return Ok(());
        }
        let text = serde_json::to_string_pretty(value)?;
        std::fs::write(self.path.join(file_name), text)?;
        Ok(())
    }

    /// Read one entry. Every call re-reads from disk.
    pub fn get(&self, key: &str) -> Result<serde_json::Value> {
        self.read_json(key)
    }

    /// Read one entry, or return `default` when the key is absent.
    pub fn get_or(&self, key: &str, default: serde_json::Value) -> Result<serde_json::Value> {
        match self.get(key) {
            Err(TsError::KeyNotFound(_)) => Ok(default),
            other => other,
        }
    }

    /// Positional entry access over the sorted keys.
    pub fn get_at(&self, index: i64) -> Result<serde_json::Value> {
        let keys = self.keys()?;
        let key = keys
            .get(index)
            .ok_or_else(|| TsError::KeyNotFound(index.to_string()))?;
        self.read_json(&key.to_string())
    }

    /// Every value, in sorted key order. Each call re-reads every file.
    pub fn values(&self) -> Result<Vec<serde_json::Value>> {
        self.items()
            .map(|items| items.into_iter().map(|(_, v)| v).collect())
    }

    /// Every `(key, value)` pair, in sorted key order.
    pub fn items(&self) -> Result<Vec<(String, serde_json::Value)>> {
        let mut out = Vec::new();
        for key in &self.keys()? {
            let key = key.to_string();
            let value = self.read_json(&key)?;
            out.push((key, value));
        }
        Ok(out)
    }

    /// Write one entry as pretty-printed JSON, overwriting any old value.
    pub fn insert(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        self.write_json(key, value)
    }

    /// Write one entry keyed by the current timestamp (whole seconds);
    /// returns the generated key.
    pub fn insert_now(&self, value: &serde_json::Value) -> Result<String> {
        let now = Ts::now();
        let key = format!(
            "{} {:02}:{:02}:{:02}",
            now.date(),
            now.hour(),
            now.minute(),
            now.second()
        );
        self.insert(&key, value)?;
        Ok(key)
    }

    /// Insert every pair of an iterator.
    pub fn update<K, I>(&self, pairs: I) -> Result<()>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, serde_json::Value)>,
    {
        for (key, value) in pairs {
            self.insert(key.as_ref(), &value)?;
        }
        Ok(())
    }

    /// Insert only when the key is absent.
    pub fn set_default(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        if !self.contains(key)? {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Delete one entry; deleting a missing key is not an error.
    pub fn remove_key(&self, key: &str) -> Result<()> {
        if !self.writer_guard()? {
            return Ok(());
        }
        let file = self.path.join(key);
        if file.exists() {
            std::fs::remove_file(file)?;
        }
        Ok(())
    }

    /// Delete every entry whose key falls in the slice.
    pub fn remove_range(&self, slice: &TsSlice) -> Result<()> {
        for key in &self.keys()?.slice(slice)? {
            self.remove_key(&key.to_string())?;
        }
        Ok(())
    }

    /// Read and delete one entry.
    pub fn pop(&self, key: &str) -> Result<serde_json::Value> {
        let value = self.get(key)?;
        self.remove_key(key)?;
        Ok(value)
    }

    /// Range filter over the keys; reads the matching files into a
    /// key→value mapping in filtered key order.
    pub fn slice(&self, slice: &TsSlice) -> Result<TsDict> {
        let keys = self.keys()?.slice(slice)?;
        let mut out = TsDict::new();
        for key in &keys {
            let value = self.read_json(&key.to_string())?;
            out.insert(key.clone(), Value::Json(value));
        }
        Ok(out)
    }

    /// Equality filter over the keys: a direct hit maps that single entry,
    /// a miss falls back to the coerced-equality scan.
    pub fn select(&self, key: &Value) -> Result<TsDict> {
        let keys = self.keys()?;
        let matched = if keys.iter().any(|k| k == key) {
            [key.clone()].into_iter().collect::<TsList>()
        } else {
            keys.select(key)?
        };
        let mut out = TsDict::new();
        for k in &matched {
            let value = self.read_json(&k.to_string())?;
            out.insert(k.clone(), Value::Json(value));
        }
        Ok(out)
    }

    /// Read a directory-level attribute stored in a hidden file.
    pub fn attr(&self, name: &str) -> Result<serde_json::Value> {
        self.read_json(&format!(".{name}")).map_err(|err| match err {
            TsError::KeyNotFound(_) => TsError::AttrNotFound(name.to_string()),
            other => other,
        })
    }

    /// Write a directory-level attribute.
    pub fn set_attr(&self, name: &str, value: &serde_json::Value) -> Result<()> {
        self.write_json(&format!(".{name}"), value)
    }

    /// Delete a directory-level attribute.
    pub fn remove_attr(&self, name: &str) -> Result<()> {
        if !self.writer_guard()? {
            return Ok(());
        }
        let file = self.path.join(format!(".{name}"));
        if file.exists() {
            std::fs::remove_file(file)?;
        }
        Ok(())
    }

    /// A child store for a subdirectory, inheriting this store's settings.
    /// Writable stores create the subdirectory on demand.
    pub fn child(&self, name: impl AsRef<Path>) -> Result<TsDir> {
        let child = Self {
            path: self.path.join(name.as_ref()),
            read_only: self.read_only,
            verbosity: self.verbosity,
        };
        if child.path.exists() && !child.path.is_dir() {
            return Err(TsError::NotADirectory(child.path.display().to_string()));
        }
        if !child.path.exists() && !child.read_only {
            std::fs::create_dir_all(&child.path)?;
        }
        Ok(child)
    }

    /// Child stores for every existing subdirectory.
    pub fn subdirs(&self) -> Result<Vec<TsDir>> {
        let mut dirs = Vec::new();
        if self.path.exists() {
            let mut paths: Vec<_> = std::fs::read_dir(&self.path)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect();
            paths.sort();
            for path in paths {
                if let Some(name) = path.file_name() {
                    dirs.push(self.child(name)?);
                }
            }
        }
        Ok(dirs)
    }

    /// Move the whole directory. On a guarded failure (read-only store, or
    /// a rename the policy swallowed) the returned handle still points at
    /// the original path.
    pub fn move_to(&self, target: impl AsRef<Path>) -> Result<TsDir> {
        if !self.writer_guard()? {
            return Ok(self.clone());
        }
        let target = target.as_ref().to_path_buf();
        if let Err(err) = std::fs::rename(&self.path, &target) {
            self.report(TsError::Io(err))?;
            return Ok(self.clone());
        }
        Ok(Self {
            path: target,
            read_only: self.read_only,
            verbosity: self.verbosity,
        })
    }

    /// Recursively delete the directory itself.
    pub fn remove(&self) -> Result<()> {
        if !self.writer_guard()? {
            return Ok(());
        }
        if let Err(err) = std::fs::remove_dir_all(&self.path) {
            self.report(TsError::Io(err))?;
        }
        Ok(())
    }

    /// Recursively delete one subdirectory.
    pub fn remove_subdir(&self, name: impl AsRef<Path>) -> Result<()> {
        if !self.writer_guard()? {
            return Ok(());
        }
        if let Err(err) = std::fs::remove_dir_all(self.path.join(name.as_ref())) {
            self.report(TsError::Io(err))?;
        }
        Ok(())
    }

    /// Render a visual tree of this directory.
    pub fn tree(&self) -> Result<String> {
        crate::tree::tree(&self.path)
    }
}

impl std::fmt::Display for TsDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TsDir({:?})", self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> (tempfile::TempDir, TsDir) {
        let root = tempfile::tempdir().expect("tempdir");
        let dir = TsDir::create(root.path().join("TESTDIR")).expect("create");
        (root, dir)
    }

    #[test]
    fn test_keys_sorted_and_hidden_excluded() {
        let (_root, dir) = store();
        dir.insert("2024-12-31", &json!({"name": "New Years Eve"}))
            .unwrap();
        dir.insert("2024-12-24", &json!({"name": "Christmas Eve"}))
            .unwrap();
        dir.set_attr("owner", &json!("calendar")).unwrap();

        let keys = dir.keys().unwrap();
        assert_eq!(
            keys,
            ["2024-12-24", "2024-12-31"].into_iter().collect()
        );
    }

    #[test]
    fn test_reads_are_uncached(){
        let (_root, dir) = store();
        dir.insert("k", &json!(1)).unwrap();
        assert_eq!(dir.get("k").unwrap(), json!(1));
        std::fs::write(dir.path().join("k"), "2").unwrap();
        assert_eq!(dir.get("k").unwrap(), json!(2));
    }

    #[test]
    fn test_slice_and_delete_scenario() {
        let (_root, dir) = store();
        dir.insert("2024-12-24", &json!({"name": "Christmas Eve"}))
            .unwrap();
        dir.insert("2024-12-31", &json!({"name": "New Years Eve"}))
            .unwrap();

        let all = dir.slice(&TsSlice::all()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(
            all.keys(),
            ["2024-12-24", "2024-12-31"].into_iter().collect()
        );

        dir.remove_key("2024-12-24").unwrap();
        let rest = dir.slice(&TsSlice::all()).unwrap();
        assert_eq!(
            rest.keys(),
            ["2024-12-31"].into_iter().collect()
        );
    }

    #[test]
    fn test_string_bounds_filter_keys() {
        let (_root, dir) = store();
        for key in ["2024-12-24", "2024-12-26", "2024-12-31"] {
            dir.insert(key, &json!({"at": key})).unwrap();
        }
        let out = dir
            .slice(&TsSlice::between("2024-12-25", "2024-12-31"))
            .unwrap();
        assert_eq!(out.keys(), ["2024-12-26"].into_iter().collect());
    }

    #[test]
    fn test_select_direct_and_filtered() {
        let (_root, dir) = store();
        dir.insert("2024-12-24", &json!("eve")).unwrap();
        dir.insert("2024-12-31", &json!("nye")).unwrap();

        let direct = dir.select(&Value::from("2024-12-24")).unwrap();
        assert_eq!(direct.len(), 1);

        let coerced = dir
            .select(&Value::Ts(Ts::new(2024, 12, 31).unwrap()))
            .unwrap();
        assert_eq!(coerced.len(), 1);
        assert_eq!(
            coerced.values(),
            vec![&Value::Json(json!("nye"))]
        );
    }

    #[test]
    fn test_attributes_round_trip() {
        let (_root, dir) = store();
        dir.set_attr("note", &json!({"kept": true})).unwrap();
        assert_eq!(dir.attr("note").unwrap(), json!({"kept": true}));
        assert!(matches!(
            dir.attr("missing"),
            Err(TsError::AttrNotFound(_))
        ));
        dir.remove_attr("note").unwrap();
        assert!(dir.attr("note").is_err());
    }

    #[test]
    fn test_read_only_policy() {
        let (_root, dir) = store();
        dir.insert("k", &json!(1)).unwrap();

        let frozen = TsDir::open(dir.path()).unwrap();
        // default Warn policy: the write is skipped, not an error
        frozen.insert("k", &json!(2)).unwrap();
        assert_eq!(frozen.get("k").unwrap(), json!(1));

        let strict = TsDir::open(dir.path())
            .unwrap()
            .with_verbosity(Verbosity::Strict);
        assert!(matches!(
            strict.insert("k", &json!(2)),
            Err(TsError::ReadOnly(_))
        ));

        let silent = TsDir::open(dir.path())
            .unwrap()
            .with_verbosity(Verbosity::Silent);
        silent.remove_key("k").unwrap();
        assert_eq!(dir.get("k").unwrap(), json!(1));
    }

    #[test]
    fn test_children_and_subdirs() {
        let (_root, dir) = store();
        let sub1 = dir.child("SUBDIR1").unwrap();
        let sub2 = dir.child("SUBDIR2").unwrap();
        sub1.insert("2024-12-25", &json!({"name": "1st Christmas Day"}))
            .unwrap();
        sub2.insert("2024-12-24", &json!({"name": "Christmas Eve"}))
            .unwrap();

        let subs = dir.subdirs().unwrap();
        let names: Vec<String> = subs.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["SUBDIR1", "SUBDIR2"]);
    }

    #[test]
    fn test_move_and_remove() {
        let (root, dir) = store();
        dir.insert("k", &json!(1)).unwrap();

        let target = root.path().join("MOVED");
        let moved = dir.move_to(&target).unwrap();
        assert_eq!(moved.name(), "MOVED");
        assert_eq!(moved.get("k").unwrap(), json!(1));
        assert!(!dir.path().exists());

        moved.remove().unwrap();
        assert!(!moved.path().exists());
        // removing again: policy-swallowed under the default Warn
        moved.remove().unwrap();
    }

    #[test]
    fn test_pop_and_defaults() {
        let (_root, dir) = store();
        dir.insert("k", &json!(1)).unwrap();
        dir.set_default("k", &json!(9)).unwrap();
        assert_eq!(dir.get("k").unwrap(), json!(1));

        assert_eq!(dir.pop("k").unwrap(), json!(1));
        assert!(matches!(dir.get("k"), Err(TsError::KeyNotFound(_))));
        assert_eq!(dir.get_or("k", json!("fallback")).unwrap(), json!("fallback"));
    }

    #[test]
    fn test_tree_rendering() {
        let (_root, dir) = store();
        let sub = dir.child("SUB").unwrap();
        sub.insert("2024-12-25", &json!(1)).unwrap();
        sub.insert("2024-12-26", &json!(2)).unwrap();

        let rendered = dir.tree().unwrap();
        assert_eq!(
            rendered,
            "TESTDIR\n\u{2514}\u{2500} SUB [2024-12-25 ... 2024-12-26] (2)"
        );
    }
}
