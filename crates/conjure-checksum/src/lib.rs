//! # conjure-checksum
//!
//! Content-addressed snapshots of generated files and the diff between two
//! snapshots.
//!
//! A [`ChecksumSet`] maps root-relative paths to SHA-256 digests. It can be
//! built from [`OutputFile`]s rendered in memory
//! ([`ChecksumSet::from_rendered`]), from the same files as they exist on
//! disk ([`ChecksumSet::from_disk`]), or from a whole directory tree
//! ([`ChecksumSet::for_directory`]). [`ChecksumSet::diff`] produces a
//! [`ChecksumsDiff`] sorted by path.

mod diff;
mod error;
mod output_file;
mod set;

pub use diff::{ChecksumsDiff, DiffKind, FileDiff};
pub use error::{ChecksumError, RenderError};
pub use output_file::OutputFile;
pub use set::{ChecksumSet, FileChecksum, sha256_hex};
