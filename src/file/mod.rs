//! File I/O plumbing shared by the settings store and log sinks.

mod error;
mod operations;

pub use error::{FileError, FileErrorKind, FileResult};
pub use operations::{atomic_write, read_text};
