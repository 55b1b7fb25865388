//! Visual directory trees.
//!
//! Renders a directory hierarchy one subdirectory per line, each annotated
//! with the lexicographic range and count of its visible entries, which,
//! for zero-padded date-like file names, reads as the covered time span.

use std::path::Path;

use crate::error::Result;

const LINE_LIMIT: usize = 1_000;

/// Render a visual tree of the directory at `path`.
///
/// Hidden (`.`-prefixed) entries are ignored. A missing path renders as an
/// empty string. Output looks like:
///
/// ```text
/// TESTDIR
/// ├─ SUBDIR1 [2024-12-25 ... 2024-12-26] (2)
/// └─ SUBDIR2 [2024-12-24 ... 2024-12-31] (2)
/// ```
pub fn tree(path: &Path) -> Result<String> {
    if !path.exists() {
        return Ok(String::new());
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_uppercase())
        .unwrap_or_default();
    let mut lines = vec![format!("{name}{}", summary(path)?)];
    walk(path, "", &mut lines)?;
    if lines.len() > LINE_LIMIT {
        lines.truncate(LINE_LIMIT);
        lines.push(format!("... line limit, {LINE_LIMIT}, reached"));
    }
    Ok(lines.join("\n"))
}

/// `[min ... max] (count)` over the visible files of one directory.
fn summary(dir: &Path) -> Result<String> {
    let mut names: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if !entry.path().is_dir() && !name.starts_with('.') {
            names.push(name);
        }
    }
    if names.is_empty() {
        return Ok(String::new());
    }
    names.sort();
    Ok(format!(
        " [{} ... {}] ({})",
        names[0],
        names[names.len() - 1],
        names.len()
    ))
}

fn walk(dir: &Path, prefix: &str, lines: &mut Vec<String>) -> Result<()> {
    const SPACE: &str = "   ";
    const BRANCH: &str = "\u{2502}  ";
    const TEE: &str = "\u{251c}\u{2500} ";
    const LAST: &str = "\u{2514}\u{2500} ";

    let mut subdirs: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.path())
        .collect();
    subdirs.sort();

    let width = subdirs
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().chars().count())
        .max()
        .unwrap_or(0);

    let count = subdirs.len();
    for (i, sub) in subdirs.iter().enumerate() {
        let pointer = if i + 1 == count { LAST } else { TEE };
        let name = sub
            .file_name()
            .map(|n| n.to_string_lossy().to_uppercase())
            .unwrap_or_default();
        lines.push(format!(
            "{prefix}{pointer}{name:<width$}{}",
            summary(sub)?
        ));
        let extension = if i + 1 == count { SPACE } else { BRANCH };
        walk(sub, &format!("{prefix}{extension}"), lines)?;
    }
    Ok(())
}
