//! Filesystem access used while resolving a config
//!
//! The resolver never touches `std::fs` directly; everything goes through a
//! [`ConfigHost`] so embedders can resolve configs against virtual or
//! remote file trees.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Filesystem capability handed to the resolver
pub trait ConfigHost {
    /// Read a file as UTF-8 text
    fn read_file(&self, path: &Path) -> io::Result<String>;

    fn file_exists(&self, path: &Path) -> bool;

    fn directory_exists(&self, path: &Path) -> bool;

    /// List every file below `root`.
    ///
    /// Within a directory files come before subdirectories and names are
    /// sorted. A subdirectory is only entered when `descend` returns true
    /// for it. An error is returned only when `root` itself cannot be read.
    fn read_directory(
        &self,
        root: &Path,
        descend: &dyn Fn(&Path) -> bool,
    ) -> io::Result<Vec<PathBuf>>;

    fn use_case_sensitive_file_names(&self) -> bool;
}

/// [`ConfigHost`] backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsHost;

impl FsHost {
    pub fn new() -> Self {
        Self
    }

    fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    }
}

impl ConfigHost for FsHost {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_directory(
        &self,
        root: &Path,
        descend: &dyn Fn(&Path) -> bool,
    ) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by(Self::files_first)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !entry.file_type().is_dir() || descend(entry.path())
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        files.push(entry.into_path());
                    }
                }
                Err(e) if e.depth() == 0 => {
                    let fallback = format!("cannot read '{}'", root.display());
                    return Err(e.into_io_error().unwrap_or_else(|| io::Error::other(fallback)));
                }
                Err(e) => warn!("Skipping unreadable entry: {}", e),
            }
        }

        Ok(files)
    }

    fn use_case_sensitive_file_names(&self) -> bool {
        !cfg!(any(target_os = "windows", target_os = "macos"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_read_directory_lists_files_before_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "b.ts");
        touch(temp_dir.path(), "a/z.ts");
        touch(temp_dir.path(), "c.ts");

        let files = FsHost.read_directory(temp_dir.path(), &|_| true).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(temp_dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("b.ts"),
                PathBuf::from("c.ts"),
                PathBuf::from("a/z.ts")
            ]
        );
    }

    #[test]
    fn test_read_directory_respects_descend() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "keep/a.ts");
        touch(temp_dir.path(), "skip/b.ts");

        let files = FsHost
            .read_directory(temp_dir.path(), &|dir| !dir.ends_with("skip"))
            .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep/a.ts"));
    }

    #[test]
    fn test_read_directory_missing_root_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = FsHost.read_directory(&temp_dir.path().join("missing"), &|_| true);
        assert!(result.is_err());
    }

    #[test]
    fn test_exists_checks() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "tsconfig.json");

        assert!(FsHost.file_exists(&temp_dir.path().join("tsconfig.json")));
        assert!(!FsHost.file_exists(temp_dir.path()));
        assert!(FsHost.directory_exists(temp_dir.path()));
    }
}
