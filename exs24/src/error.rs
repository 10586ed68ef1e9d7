//! Error types for EXS24 decoding

use std::io;

/// Errors that can occur when decoding an EXS24 instrument
#[derive(Debug, thiserror::Error)]
pub enum ExsError {
    /// Buffer too small to hold the container header
    #[error("file too small to be an EXS instrument ({0} bytes)")]
    TooSmall(usize),

    /// Header magic is none of the four recognized markers
    #[error("not an exs file (magic {0:?})")]
    NotExs([u8; 4]),

    /// Zone chunk shorter than the minimum record size
    #[error("invalid zone chunk size {size} at offset {offset}")]
    InvalidZoneChunkSize { offset: usize, size: u32 },

    /// Sample chunk size is not one of the known layouts
    #[error("invalid sample chunk size {size} at offset {offset}")]
    InvalidSampleChunkSize { offset: usize, size: u32 },

    /// A record extends past the end of the buffer
    #[error("unexpected end of file reading {what} at offset {offset}")]
    UnexpectedEof { what: &'static str, offset: usize },

    /// IO error while reading the file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
