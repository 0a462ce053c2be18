//! Hashing utilities for project fingerprints.
//!
//! This module provides:
//! - `ContentHash`: a full 64-character SHA-256 hex digest
//! - `hash_tree()`: deterministic hash of the files under a set of roots
//! - `hash_file()`: single file hashing
//! - `hash_bytes()`: arbitrary byte hashing

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

/// A full 64-character SHA256 hash.
///
/// # Format
///
/// The hash is a lowercase hexadecimal string (64 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Error during tree hashing.
#[derive(Debug, thiserror::Error)]
pub enum TreeHashError {
  #[error("failed to walk {root}: {message}")]
  WalkDir { root: String, message: String },

  #[error("failed to read file {path}: {message}")]
  ReadFile { path: String, message: String },
}

/// Compute a deterministic hash of the files under `roots`.
///
/// The hash covers each file's path and contents (not metadata). Roots that
/// do not exist contribute nothing; a root that is a file is hashed directly.
/// Any entry whose path starts with one of `skip` is ignored, together with
/// its descendants.
///
/// Entries are sorted by path for determinism.
pub fn hash_tree(roots: &[PathBuf], skip: &[PathBuf]) -> Result<ContentHash, TreeHashError> {
  let mut entries: Vec<(String, String)> = Vec::new();

  for root in roots {
    if !root.exists() {
      continue;
    }

    let walker = WalkDir::new(root)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|e| !skip.iter().any(|s| e.path().starts_with(s)));

    for entry in walker {
      let entry = entry.map_err(|e| TreeHashError::WalkDir {
        root: root.display().to_string(),
        message: e.to_string(),
      })?;

      if !entry.file_type().is_file() {
        continue;
      }

      let path = entry.path().to_string_lossy().to_string();
      let content_hash = hash_file(entry.path())?;
      entries.push((path.clone(), format!("F:{}:{}", path, content_hash.0)));
    }
  }

  // Roots may overlap, so sort and drop repeats
  entries.sort_by(|a, b| a.0.cmp(&b.0));
  entries.dedup_by(|a, b| a.0 == b.0);

  let mut hasher = Sha256::new();
  for (_, entry_hash) in entries {
    hasher.update(entry_hash.as_bytes());
    hasher.update(b"\n");
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}

/// Hash a file's contents.
pub fn hash_file(path: &Path) -> Result<ContentHash, TreeHashError> {
  let mut file = fs::File::open(path).map_err(|e| TreeHashError::ReadFile {
    path: path.display().to_string(),
    message: e.to_string(),
  })?;

  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];

  loop {
    let bytes_read = file.read(&mut buffer).map_err(|e| TreeHashError::ReadFile {
      path: path.display().to_string(),
      message: e.to_string(),
    })?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}

/// Hash arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Sha256::new();
  hasher.update(data);
  ContentHash(hex::encode(hasher.finalize()))
}
