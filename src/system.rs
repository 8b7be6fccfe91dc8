use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A directory entry as seen by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Abstraction for File System interactions.
/// This allows us to test rename runs (including I/O faults) without touching a real project.
pub trait FileSystemOps {
    /// List the direct children of a directory, sorted by file name.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>>;

    /// Read a whole file.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace a file's contents in one step (temp file + rename).
    fn write_file_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Rename a file or directory. Callers check for conflicts first.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Check if a file or directory exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a directory (following symlinks).
    fn is_dir(&self, path: &Path) -> bool;

    /// Resolve a directory to a stable identity, used to avoid scanning it twice.
    fn canonicalize(&self, path: &Path) -> PathBuf;

    /// Whether two paths name the same file, e.g. a case-only rename on a case-insensitive volume.
    fn is_same_entry(&self, a: &Path, b: &Path) -> bool;
}

/// The real file system (Production).
pub struct RealFileSystem;

impl FileSystemOps for RealFileSystem {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let walker = WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name();

        let mut entries = Vec::new();
        for entry in walker {
            let entry = entry?;
            let path = entry.into_path();
            let is_dir = path.is_dir();
            entries.push(DirEntryInfo { path, is_dir });
        }
        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_file_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
        let tmp_path = parent.join(format!(".{}.vsrename.tmp", file_name.to_string_lossy()));

        let permissions = std::fs::metadata(path)?.permissions();
        // rename(2) ignores the target's mode, so honor it here
        if permissions.readonly() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "file is read-only"));
        }
        std::fs::write(&tmp_path, contents)?;
        std::fs::set_permissions(&tmp_path, permissions)?;

        if let Err(e) = std::fs::rename(&tmp_path, path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling symlink still counts as taken
        path.symlink_metadata().is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }

    #[cfg(unix)]
    fn is_same_entry(&self, a: &Path, b: &Path) -> bool {
        use std::os::unix::fs::MetadataExt;
        match (a.symlink_metadata(), b.symlink_metadata()) {
            (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
            _ => false,
        }
    }

    #[cfg(not(unix))]
    fn is_same_entry(&self, a: &Path, b: &Path) -> bool {
        // Resolves through the file handle, so it reports the on-disk spelling
        match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
            (Ok(ca), Ok(cb)) => ca == cb,
            _ => false,
        }
    }
}
