//! exs2xpm library
//!
//! Converts decoded EXS24 instruments into MPC programs: value conversion,
//! key-range projection onto keygroup or drum programs, sample discovery and
//! batch driving. The `exs2xpm` binary is a thin CLI over these functions.

pub mod batch;
pub mod config;
pub mod error;
pub mod info;
pub mod project;
pub mod samples;
pub mod units;

pub use batch::{
    BatchReport, ConvertOptions, Converted, Failure, convert_all, convert_file, find_exs_files,
    write_program,
};
pub use config::ConvertConfig;
pub use error::{ConvertError, Result};
pub use info::{InfoOptions, render as render_info};
pub use project::{Projection, project};
pub use samples::{SampleCopy, SampleIndex};
