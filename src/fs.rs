//! Filesystem helpers
//!
//! Small wrappers over file metadata and file creation that report failures
//! as distinct error variants instead of raw IO errors.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use thiserror::Error;

/// Categories of disk errors for user-friendly messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// Disk is full or quota exceeded
    DiskFull,
    /// Permission denied (read or write)
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// Other IO error
    Other,
}

impl DiskErrorKind {
    /// Get a user-friendly message for this error kind
    pub fn user_message(&self) -> &'static str {
        match self {
            DiskErrorKind::DiskFull => "disk full",
            DiskErrorKind::PermissionDenied => "permission denied",
            DiskErrorKind::NotFound => "file or directory not found",
            DiskErrorKind::Other => "I/O error",
        }
    }
}

/// Categorize an IO error into a user-friendly category
pub fn categorize_io_error(e: &std::io::Error) -> DiskErrorKind {
    match e.kind() {
        ErrorKind::StorageFull | ErrorKind::WriteZero => DiskErrorKind::DiskFull,
        ErrorKind::PermissionDenied => DiskErrorKind::PermissionDenied,
        ErrorKind::NotFound => DiskErrorKind::NotFound,
        _ => {
            #[cfg(unix)]
            {
                if let Some(os_error) = e.raw_os_error() {
                    // ENOSPC
                    if os_error == 28 || is_quota_exceeded(os_error) {
                        return DiskErrorKind::DiskFull;
                    }
                    // EACCES
                    if os_error == 13 {
                        return DiskErrorKind::PermissionDenied;
                    }
                }
            }
            DiskErrorKind::Other
        }
    }
}

/// EDQUOT differs per platform
#[cfg(unix)]
fn is_quota_exceeded(os_error: i32) -> bool {
    #[cfg(target_os = "macos")]
    {
        os_error == 69
    }
    #[cfg(not(target_os = "macos"))]
    {
        os_error == 122
    }
}

/// Failure of one of the filesystem helpers
#[derive(Debug, Error)]
pub enum FsError {
    /// The file whose age was requested does not exist
    #[error("{}: no such file or directory", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The parent directory is missing and creating it was not requested
    #[error("{}: parent directory {} does not exist", .path.display(), .parent.display())]
    MissingParent { path: PathBuf, parent: PathBuf },

    /// Any other IO failure
    #[error("{}: {}", .path.display(), .kind.user_message())]
    Io {
        path: PathBuf,
        kind: DiskErrorKind,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        FsError::Io {
            path: path.to_path_buf(),
            kind: categorize_io_error(&source),
            source,
        }
    }
}

/// Time elapsed since the file was last modified
///
/// A modification time in the future gives an age of zero.
pub fn file_age(path: impl AsRef<Path>) -> Result<Duration, FsError> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => FsError::NotFound {
            path: path.to_path_buf(),
            source: e,
        },
        _ => FsError::io(path, e),
    })?;
    let modified = metadata.modified().map_err(|e| FsError::io(path, e))?;

    Ok(SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO))
}

/// Create an empty file if it does not already exist
///
/// Existing files are left untouched. With `create_dirs`, any missing parent
/// directories are created first; without it a missing parent is an error.
pub fn touch(path: impl AsRef<Path>, create_dirs: bool) -> Result<(), FsError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            if !create_dirs {
                return Err(FsError::MissingParent {
                    path: path.to_path_buf(),
                    parent: parent.to_path_buf(),
                });
            }
            fs::create_dir_all(parent).map_err(|e| FsError::io(parent, e))?;
            tracing::debug!("Created directory {}", parent.display());
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| FsError::io(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_file_age_of_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fresh");
        fs::File::create(&path).unwrap();

        let age = file_age(&path).unwrap();
        assert!(age < Duration::from_secs(60));
    }

    #[test]
    fn test_file_age_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let err = file_age(temp_dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
    }

    #[test]
    fn test_file_age_empty_path() {
        assert!(matches!(file_age(""), Err(FsError::NotFound { .. })));
    }

    #[test]
    fn test_touch_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test_file");

        touch(&path, false).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_touch_fails_without_create_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing_subdir").join("file");

        let err = touch(&path, false).unwrap_err();
        assert!(matches!(err, FsError::MissingParent { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_touch_creates_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing_subdir").join("deeper").join("file");

        touch(&path, true).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_touch_keeps_existing_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("existing");
        fs::File::create(&path)
            .unwrap()
            .write_all(b"keep me")
            .unwrap();

        touch(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn test_touch_on_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = touch(temp_dir.path(), false).unwrap_err();
        assert!(matches!(err, FsError::Io { .. }));
    }

    #[test]
    fn test_touch_under_regular_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let plain = temp_dir.path().join("plain");
        fs::File::create(&plain).unwrap();

        for create_dirs in [false, true] {
            let err = touch(plain.join("child"), create_dirs).unwrap_err();
            assert!(matches!(err, FsError::Io { .. }), "create_dirs {}", create_dirs);
        }
        assert!(plain.is_file());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_categorize_linux_errno() {
        // EDQUOT
        let e = std::io::Error::from_raw_os_error(122);
        assert_eq!(categorize_io_error(&e), DiskErrorKind::DiskFull);
        // ESRMNT shares macOS's EDQUOT number
        let e = std::io::Error::from_raw_os_error(69);
        assert_eq!(categorize_io_error(&e), DiskErrorKind::Other);
    }

    #[test]
    fn test_categorize_io_error() {
        let e = std::io::Error::new(ErrorKind::NotFound, "gone");
        assert_eq!(categorize_io_error(&e), DiskErrorKind::NotFound);
        let e = std::io::Error::new(ErrorKind::PermissionDenied, "no");
        assert_eq!(categorize_io_error(&e), DiskErrorKind::PermissionDenied);
        let e = std::io::Error::new(ErrorKind::Other, "?");
        assert_eq!(categorize_io_error(&e), DiskErrorKind::Other);
    }
}
