//! Convenience functions for the file operations the shell performs.

use std::fs;
use std::path::Path;

use super::error::{FileError, FileResult};

/// Reads the entire contents of a file as a string.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read, or is not
/// valid UTF-8.
pub fn read_text(path: impl AsRef<Path>) -> FileResult<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| FileError::from_io(e, path))
}

/// Writes a string to a file atomically.
///
/// The contents land in a temporary sibling file which is then renamed over
/// the target, so the target is never observed half-written. An existing
/// file is left untouched if any step fails.
pub fn atomic_write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> FileResult<()> {
    let path = path.as_ref();
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    fs::write(&tmp, contents.as_ref()).map_err(|e| FileError::from_io(e, &tmp))?;
    if let Err(e) = fs::rename(&tmp, path) {
        fs::remove_file(&tmp).ok();
        return Err(FileError::from_io(e, path));
    }
    Ok(())
}
