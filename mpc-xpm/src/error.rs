//! Error types for XPM program output

use std::io;
use std::path::PathBuf;

/// Errors that can occur when writing an XPM program
#[derive(Debug, thiserror::Error)]
pub enum XpmError {
    /// XML serialization failed
    #[error("failed to serialize program: {0}")]
    Serialize(String),

    /// Program already holds the maximum number of instruments
    #[error("too many instruments ({0})")]
    TooManyInstruments(usize),

    /// Writing the program file failed
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
