//! Error types for file operations.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for file operations.
#[derive(Debug)]
pub struct FileError {
    /// The kind of error that occurred.
    kind: FileErrorKind,
    /// The path involved in the error, if any.
    path: Option<PathBuf>,
    /// The underlying source error, if any.
    source: Option<io::Error>,
}

/// The kind of file error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrorKind {
    /// File or directory not found.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path or filename.
    InvalidPath,
    /// Invalid data or encoding (e.g. malformed INI).
    InvalidData,
    /// An unknown or unclassified error occurred.
    Other,
}

impl FileError {
    /// Creates a new file error.
    pub fn new(kind: FileErrorKind, path: Option<PathBuf>, source: Option<io::Error>) -> Self {
        Self { kind, path, source }
    }

    /// Creates a file error from an I/O error and path.
    pub fn from_io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        Self {
            kind: FileErrorKind::from(err.kind()),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Creates a "not found" error for the given path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(FileErrorKind::NotFound, Some(path.into()), None)
    }

    /// Creates an "invalid data" error tied to a path, with a message.
    pub fn invalid_data(path: impl Into<PathBuf>, message: &str) -> Self {
        Self::new(
            FileErrorKind::InvalidData,
            Some(path.into()),
            Some(io::Error::new(io::ErrorKind::InvalidData, message)),
        )
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> FileErrorKind {
        self.kind
    }

    /// Returns the path involved in the error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Returns true if this error indicates the file was not found.
    pub fn is_not_found(&self) -> bool {
        self.kind == FileErrorKind::NotFound
    }
}

impl From<io::ErrorKind> for FileErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => FileErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => FileErrorKind::PermissionDenied,
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidFilename => {
                FileErrorKind::InvalidPath
            }
            io::ErrorKind::InvalidData => FileErrorKind::InvalidData,
            _ => FileErrorKind::Other,
        }
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", self.kind, path.display()),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileErrorKind::NotFound => write!(f, "file not found"),
            FileErrorKind::PermissionDenied => write!(f, "permission denied"),
            FileErrorKind::InvalidPath => write!(f, "invalid path"),
            FileErrorKind::InvalidData => write!(f, "invalid data"),
            FileErrorKind::Other => write!(f, "file error"),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<io::Error> for FileError {
    fn from(err: io::Error) -> Self {
        Self {
            kind: FileErrorKind::from(err.kind()),
            path: None,
            source: Some(err),
        }
    }
}

/// A specialized Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FileError::not_found("/path/to/settings.ini");
        assert_eq!(err.to_string(), "file not found: /path/to/settings.ini");
    }

    #[test]
    fn test_from_io_error_with_path() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "test");
        let err = FileError::from_io(io_err, "/restricted");
        assert_eq!(err.kind(), FileErrorKind::PermissionDenied);
        assert_eq!(
            err.path().map(|p| p.display().to_string()),
            Some("/restricted".to_string())
        );
        assert!(!err.is_not_found());
    }
}
