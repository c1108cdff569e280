use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path};

use sha2::{Digest, Sha256};

use crate::diff::{self, ChecksumsDiff};
use crate::error::ChecksumError;
use crate::output_file::OutputFile;

/// Checksum record for one path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileChecksum {
    /// Path relative to the set root, `/`-separated.
    pub path: String,
    pub is_dir: bool,
    /// Hex SHA-256 of the content. Always `None` for directories.
    pub sha256: Option<String>,
}

impl FileChecksum {
    #[must_use]
    pub fn file(path: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
            sha256: Some(sha256.into()),
        }
    }

    #[must_use]
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
            sha256: None,
        }
    }
}

/// Checksums for a set of paths under one root, ordered by path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChecksumSet {
    checksums: BTreeMap<String, FileChecksum>,
}

impl ChecksumSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checksums.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checksums.is_empty()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FileChecksum> {
        self.checksums.get(path)
    }

    /// Entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = &FileChecksum> {
        self.checksums.values()
    }

    pub fn insert(&mut self, checksum: FileChecksum) {
        self.checksums.insert(checksum.path.clone(), checksum);
    }

    /// Checksum the in-memory rendering of `files`, keyed relative to `root`.
    ///
    /// # Errors
    ///
    /// Fails if a file is outside `root` or its render closure fails.
    pub fn from_rendered(files: &[OutputFile], root: &Path) -> Result<Self, ChecksumError> {
        let mut set = Self::new();
        for file in files {
            let rel = relative_path(file.abs_path(), root)?;
            let content = file.render().map_err(|source| ChecksumError::Render {
                path: file.abs_path().to_path_buf(),
                source,
            })?;
            set.insert(FileChecksum::file(rel, sha256_hex(&content)));
        }
        Ok(set)
    }

    /// Checksum the on-disk counterparts of `files`, keyed relative to `root`.
    ///
    /// Files that do not exist are skipped: their absence shows up when this
    /// set is diffed against a rendered set. A directory found where a file is
    /// expected is recorded as a directory entry.
    ///
    /// # Errors
    ///
    /// Fails if a file is outside `root`, or if a path exists (or cannot be
    /// inspected) but cannot be read.
    pub fn from_disk(files: &[OutputFile], root: &Path) -> Result<Self, ChecksumError> {
        let mut set = Self::new();
        for file in files {
            let path = file.abs_path();
            let rel = relative_path(path, root)?;
            let metadata = match fs::metadata(path) {
                Ok(metadata) => metadata,
                Err(error) if error.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "skipping file missing on disk");
                    continue;
                }
                Err(source) => {
                    return Err(ChecksumError::Io {
                        path: path.to_path_buf(),
                        source,
                    });
                }
            };

            if metadata.is_dir() {
                set.insert(FileChecksum::dir(rel));
                continue;
            }
            set.insert(FileChecksum::file(rel, sha256_file(path)?));
        }
        Ok(set)
    }

    /// Checksum every file and directory below `root`.
    ///
    /// A `root` that does not exist yields an empty set.
    ///
    /// # Errors
    ///
    /// Fails if any entry below `root` cannot be listed or read.
    pub fn for_directory(root: &Path) -> Result<Self, ChecksumError> {
        let mut set = Self::new();
        if !root.exists() {
            return Ok(set);
        }
        walk(root, root, &mut set)?;
        Ok(set)
    }

    /// Compare `self` (the original) with `updated`.
    #[must_use]
    pub fn diff(&self, updated: &Self) -> ChecksumsDiff {
        diff::compute(&self.checksums, &updated.checksums)
    }
}

fn walk(dir: &Path, root: &Path, set: &mut ChecksumSet) -> Result<(), ChecksumError> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ChecksumError::Io { path, source }
    };

    let mut entries = fs::read_dir(dir)
        .map_err(io_error(dir))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error(dir))?;
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        let path = entry.path();
        let rel = relative_path(&path, root)?;
        if fs::metadata(&path).map_err(io_error(&path))?.is_dir() {
            set.insert(FileChecksum::dir(rel));
            walk(&path, root, set)?;
        } else {
            set.insert(FileChecksum::file(rel, sha256_file(&path)?));
        }
    }
    Ok(())
}

/// `/`-separated path of `path` relative to `root`.
fn relative_path(path: &Path, root: &Path) -> Result<String, ChecksumError> {
    let outside = || ChecksumError::OutsideRoot {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    };
    let rel = path.strip_prefix(root).map_err(|_| outside())?;

    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return Err(outside()),
        }
    }
    if parts.is_empty() {
        return Err(outside());
    }
    Ok(parts.join("/"))
}

/// Hex SHA-256 of in-memory content.
#[must_use]
pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Hex SHA-256 of a file, streamed through the same hasher as [`sha256_hex`].
fn sha256_file(path: &Path) -> Result<String, ChecksumError> {
    let to_error = |source| ChecksumError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(to_error)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(to_error)?;
    Ok(hex::encode(hasher.finalize()))
}
