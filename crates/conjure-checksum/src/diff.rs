use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::set::FileChecksum;

/// How a path differs between the original and updated sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffKind {
    /// Present only in the updated set.
    Added,
    /// Present only in the original set.
    Removed,
    /// A file in both sets whose digests differ.
    ContentChanged { original: String, updated: String },
    /// A file in the original set and a directory in the updated set.
    FileToDirectory,
    /// A directory in the original set and a file in the updated set.
    DirectoryToFile,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    pub kind: DiffKind,
}

impl fmt::Display for FileDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiffKind::Added => write!(f, "{}: did not exist before, now exists", self.path),
            DiffKind::Removed => write!(f, "{}: existed before, no longer exists", self.path),
            DiffKind::ContentChanged { original, updated } => write!(
                f,
                "{}: checksum changed from {original} to {updated}",
                self.path
            ),
            DiffKind::FileToDirectory => {
                write!(f, "{}: previously a file but is now a directory", self.path)
            }
            DiffKind::DirectoryToFile => {
                write!(f, "{}: previously a directory but is now a file", self.path)
            }
        }
    }
}

/// Differences between two checksum sets, sorted by path.
///
/// Renders one line per entry with [`Display`](fmt::Display).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChecksumsDiff {
    diffs: Vec<FileDiff>,
}

impl ChecksumsDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileDiff> {
        self.diffs.iter()
    }
}

impl<'a> IntoIterator for &'a ChecksumsDiff {
    type Item = &'a FileDiff;
    type IntoIter = std::slice::Iter<'a, FileDiff>;

    fn into_iter(self) -> Self::IntoIter {
        self.diffs.iter()
    }
}

impl fmt::Display for ChecksumsDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diff) in self.diffs.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{diff}")?;
        }
        Ok(())
    }
}

pub(crate) fn compute(
    original: &BTreeMap<String, FileChecksum>,
    updated: &BTreeMap<String, FileChecksum>,
) -> ChecksumsDiff {
    let paths = original
        .keys()
        .chain(updated.keys())
        .collect::<BTreeSet<_>>();

    let diffs = paths
        .into_iter()
        .filter_map(|path| {
            let kind = match (original.get(path), updated.get(path)) {
                (None, Some(_)) => DiffKind::Added,
                (Some(_), None) => DiffKind::Removed,
                (Some(before), Some(after)) => compare(before, after)?,
                (None, None) => return None,
            };
            Some(FileDiff {
                path: path.clone(),
                kind,
            })
        })
        .collect();

    ChecksumsDiff { diffs }
}

fn compare(before: &FileChecksum, after: &FileChecksum) -> Option<DiffKind> {
    match (before.is_dir, after.is_dir) {
        (false, true) => Some(DiffKind::FileToDirectory),
        (true, false) => Some(DiffKind::DirectoryToFile),
        (true, true) => None,
        (false, false) if before.sha256 == after.sha256 => None,
        (false, false) => Some(DiffKind::ContentChanged {
            original: before.sha256.clone().unwrap_or_default(),
            updated: after.sha256.clone().unwrap_or_default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entries(items: &[FileChecksum]) -> BTreeMap<String, FileChecksum> {
        items
            .iter()
            .map(|item| (item.path.clone(), item.clone()))
            .collect()
    }

    #[test]
    fn identical_sets_have_no_diff() {
        let set = entries(&[FileChecksum::file("a.go", "aa"), FileChecksum::dir("pkg")]);
        assert!(compute(&set, &set).is_empty());
    }

    #[test]
    fn classifies_every_kind() {
        let original = entries(&[
            FileChecksum::file("changed.go", "11"),
            FileChecksum::file("flip-to-dir", "22"),
            FileChecksum::dir("flip-to-file"),
            FileChecksum::file("removed.go", "33"),
        ]);
        let updated = entries(&[
            FileChecksum::file("added.go", "44"),
            FileChecksum::file("changed.go", "55"),
            FileChecksum::dir("flip-to-dir"),
            FileChecksum::file("flip-to-file", "66"),
        ]);

        let diff = compute(&original, &updated);
        let kinds = diff
            .iter()
            .map(|d| (d.path.as_str(), d.kind.clone()))
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                ("added.go", DiffKind::Added),
                (
                    "changed.go",
                    DiffKind::ContentChanged {
                        original: "11".to_string(),
                        updated: "55".to_string()
                    }
                ),
                ("flip-to-dir", DiffKind::FileToDirectory),
                ("flip-to-file", DiffKind::DirectoryToFile),
                ("removed.go", DiffKind::Removed),
            ]
        );
    }

    #[test]
    fn renders_one_line_per_entry() {
        let original = entries(&[FileChecksum::file("a.go", "11"), FileChecksum::file("b.go", "22")]);
        let updated = entries(&[FileChecksum::file("a.go", "12"), FileChecksum::file("c.go", "33")]);

        assert_eq!(
            compute(&original, &updated).to_string(),
            "a.go: checksum changed from 11 to 12\nb.go: existed before, no longer exists\nc.go: did not exist before, now exists"
        );
    }
}
