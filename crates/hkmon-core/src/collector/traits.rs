//! Filesystem access seam for the collectors.
//!
//! Collectors read `/proc` and `/sys` through `FileSystem`, so tests can
//! substitute an in-memory tree for the live kernel files.

use std::io;
use std::path::{Path, PathBuf};

/// The read-only operations the collectors need from a filesystem.
pub trait FileSystem: Send + Sync {
    /// Whole file as UTF-8. Kernel pseudo-files are small and are read in
    /// one go so each sample is taken at a single point.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn exists(&self, path: &Path) -> bool;

    /// Full paths of the directory's entries, in no particular order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// The live filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        RealFs
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crate_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn test_real_fs_reads_manifest() {
        let manifest = crate_dir().join("Cargo.toml");
        let content = RealFs::new().read_to_string(&manifest).unwrap();
        assert!(content.contains("name = \"hkmon-core\""));
    }

    #[test]
    fn test_real_fs_exists() {
        let fs = RealFs::new();
        assert!(fs.exists(&crate_dir().join("src/lib.rs")));
        assert!(!fs.exists(Path::new("/definitely/not/here/hkmon")));
    }

    #[test]
    fn test_real_fs_lists_sources() {
        let entries = RealFs::new().read_dir(&crate_dir().join("src")).unwrap();
        assert!(entries.iter().any(|p| p.ends_with("lib.rs")));
        assert!(entries.iter().any(|p| p.ends_with("collector")));
    }

    #[test]
    fn test_real_fs_missing_dir() {
        let err = RealFs::new()
            .read_dir(Path::new("/definitely/not/here/hkmon"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
