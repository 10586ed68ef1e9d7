//! EXS24 sample metadata

/// Sample metadata record
///
/// Audio data is never read; the file is located by `file_name` through a
/// separate filesystem index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    pub id: u32,
    /// Display name
    pub name: String,
    /// Length in frames
    pub length: i32,
    /// Sample rate in Hz
    pub rate: i32,
    pub bit_depth: u8,
    pub sample_type: i32,
    /// Directory stored at save time (informational only)
    pub path: String,
    /// On-disk file name, whitespace trimmed
    pub file_name: String,
}
