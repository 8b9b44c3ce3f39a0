//! File System Abstraction
//!
//! The scanner, merge stage and pipeline all access the disk through the
//! `FileSystem` trait so the core logic can run against `MockFileSystem`
//! in tests instead of a real directory tree.

use std::path::{Path, PathBuf};

use crate::error::DistminResult;

/// A single entry reported by `list_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Abstract file system interface
pub trait FileSystem {
    /// Read file content
    fn read_to_string(&self, path: &Path) -> DistminResult<String>;

    /// Write file content, creating parent directories as needed
    fn write(&self, path: &Path, content: &str) -> DistminResult<()>;

    /// Copy a file, creating parent directories for the destination
    fn copy(&self, from: &Path, to: &Path) -> DistminResult<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is an existing directory
    fn is_dir(&self, path: &Path) -> bool;

    /// List entries of a directory in the underlying listing order
    fn list_dir(&self, path: &Path) -> DistminResult<Vec<DirEntry>>;

    /// Remove a file
    fn remove_file(&self, path: &Path) -> DistminResult<()>;

    /// Recursively delete a directory; a missing directory is not an error
    fn remove_dir_all(&self, path: &Path) -> DistminResult<()>;
}

/// Local file system implementation
///
/// Writes go through a tempfile + rename so a partially written file never
/// lands in the output tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

impl FileSystem for LocalFs {
    fn read_to_string(&self, path: &Path) -> DistminResult<String> {
        std::fs::read_to_string(path).map_err(Into::into)
    }

    fn write(&self, path: &Path, content: &str) -> DistminResult<()> {
        let parent = parent_dir(path);
        std::fs::create_dir_all(&parent)?;

        let tmp = tempfile::NamedTempFile::new_in(&parent)?;
        std::fs::write(tmp.path(), content)?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> DistminResult<()> {
        std::fs::create_dir_all(parent_dir(to))?;
        std::fs::copy(from, to)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, path: &Path) -> DistminResult<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        Ok(entries)
    }

    fn remove_file(&self, path: &Path) -> DistminResult<()> {
        std::fs::remove_file(path).map_err(Into::into)
    }

    fn remove_dir_all(&self, path: &Path) -> DistminResult<()> {
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_dir_all(path).map_err(Into::into)
    }
}

/// Mock file system for testing
///
/// Holds file contents in a `BTreeMap` keyed by path, so directory listings
/// come back in a deterministic order. Directories exist implicitly whenever
/// a file lives below them.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockFileSystem {
    pub files: std::sync::Arc<std::sync::Mutex<std::collections::BTreeMap<PathBuf, String>>>,
}

#[cfg(test)]
impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: &str, content: &str) {
        let mut files = self.files.lock().unwrap();
        files.insert(PathBuf::from(path), content.to_string());
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        let files = self.files.lock().unwrap();
        files.get(Path::new(path)).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        let files = self.files.lock().unwrap();
        files.keys().cloned().collect()
    }

    fn not_found(path: &Path) -> crate::error::DistminError {
        crate::error::DistminError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no such file or directory: {}", path.display()),
        ))
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> DistminResult<String> {
        let files = self.files.lock().unwrap();
        files
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    fn write(&self, path: &Path, content: &str) -> DistminResult<()> {
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> DistminResult<()> {
        let content = self.read_to_string(from)?;
        self.write(to, &content)
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path) || files.keys().any(|k| k.starts_with(path) && k != path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.keys().any(|k| k.starts_with(path) && k != path)
    }

    fn list_dir(&self, path: &Path) -> DistminResult<Vec<DirEntry>> {
        if !self.is_dir(path) {
            return Err(Self::not_found(path));
        }
        let files = self.files.lock().unwrap();
        let mut entries: Vec<DirEntry> = Vec::new();
        for key in files.keys() {
            let Ok(rest) = key.strip_prefix(path) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            let name = first.as_os_str().to_string_lossy().into_owned();
            if entries.iter().any(|e| e.name == name) {
                continue;
            }
            entries.push(DirEntry {
                name,
                is_dir: components.next().is_some(),
            });
        }
        Ok(entries)
    }

    fn remove_file(&self, path: &Path) -> DistminResult<()> {
        let mut files = self.files.lock().unwrap();
        files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(path))
    }

    fn remove_dir_all(&self, path: &Path) -> DistminResult<()> {
        let mut files = self.files.lock().unwrap();
        files.retain(|k, _| !k.starts_with(path));
        Ok(())
    }
}
