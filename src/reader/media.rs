//! Temporary storage for pictures extracted from a source document.

use crate::error::Result;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A run-scoped directory holding extracted pictures.
///
/// The directory is removed by [`cleanup`](Self::cleanup), or when the
/// workspace is dropped.
#[derive(Debug)]
pub struct MediaWorkspace {
    dir: Option<TempDir>,
    root: PathBuf,
    files: Vec<PathBuf>,
    names: HashSet<String>,
}

impl MediaWorkspace {
    /// Create a new empty workspace under the system temp directory.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("docdeck-media-").tempdir()?;
        let root = dir.path().to_path_buf();
        log::debug!("created media workspace {}", root.display());
        Ok(Self {
            dir: Some(dir),
            root,
            files: Vec::new(),
            names: HashSet::new(),
        })
    }

    /// Directory the files live in.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Files stored so far, in storage order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Check if the directory has been removed.
    pub fn is_cleaned_up(&self) -> bool {
        self.dir.is_none()
    }

    /// Write a file into the workspace and return its path.
    ///
    /// Only the final component of `name` is used; clashing names get a
    /// numeric suffix.
    pub fn store(&mut self, name: &str, data: &[u8]) -> Result<PathBuf> {
        let base = Path::new(name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("image{}", self.files.len() + 1));
        let file_name = self.unique_name(&base);

        let path = self.root.join(&file_name);
        fs::write(&path, data)?;
        self.names.insert(file_name);
        self.files.push(path.clone());
        Ok(path)
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.names.contains(base) {
            return base.to_string();
        }
        let (stem, ext) = match base.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{}", ext)),
            None => (base, String::new()),
        };
        (2..)
            .map(|n| format!("{}_{}{}", stem, n, ext))
            .find(|candidate| !self.names.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Remove the directory and everything in it. Calling this twice is a
    /// no-op.
    pub fn cleanup(&mut self) -> Result<()> {
        if let Some(dir) = self.dir.take() {
            dir.close()?;
            log::debug!("removed media workspace {}", self.root.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_cleanup() {
        let mut media = MediaWorkspace::new().unwrap();
        let root = media.path().to_path_buf();
        let path = media.store("word/media/image1.png", b"data").unwrap();

        assert_eq!(path, root.join("image1.png"));
        assert_eq!(fs::read(&path).unwrap(), b"data");
        assert_eq!(media.files().len(), 1);

        media.cleanup().unwrap();
        assert!(media.is_cleaned_up());
        assert!(!root.exists());
        media.cleanup().unwrap();
    }

    #[test]
    fn test_name_clash_gets_suffix() {
        let mut media = MediaWorkspace::new().unwrap();
        let a = media.store("a/pic.png", b"1").unwrap();
        let b = media.store("b/pic.png", b"2").unwrap();
        assert_ne!(a, b);
        assert!(b.ends_with("pic_2.png"));
    }

    #[test]
    fn test_drop_removes_directory() {
        let root = {
            let mut media = MediaWorkspace::new().unwrap();
            media.store("x.bin", b"x").unwrap();
            media.path().to_path_buf()
        };
        assert!(!root.exists());
    }
}
