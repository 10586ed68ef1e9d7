//! Conversion errors

use std::io;
use std::path::PathBuf;

use exs24::ExsError;
use mpc_xpm::XpmError;

/// Errors raised while converting EXS instruments
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// No zone produced an instrument
    #[error("{0}: no instruments found")]
    NoInstruments(String),

    /// The instrument has no usable group
    #[error("{0}: no groups found")]
    NoGroups(String),

    /// More key-range clusters than a program can hold
    #[error("{name}: too many instruments ({count})")]
    TooManyInstruments { name: String, count: usize },

    /// Referenced sample is not in the sample index
    #[error("no sample found for {0}")]
    SampleNotFound(String),

    /// An earlier file in the batch already claims this output directory
    #[error("{name}: output name already used by {}", first.display())]
    DuplicateName { name: String, first: PathBuf },

    /// The search path holds no EXS files
    #[error("no .exs files found in {}", .0.display())]
    NoExsFiles(PathBuf),

    #[error("failed to decode EXS file: {0}")]
    Exs(#[from] ExsError),

    #[error(transparent)]
    Xpm(#[from] XpmError),

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
