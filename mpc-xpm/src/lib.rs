//! MPC-XPM: Akai MPC program (`.xpm`) schema and writer
//!
//! An XPM file is an XML document with an `MPCVObject` root holding a
//! `Version` block and a `Program`. The program owns up to 128 instruments,
//! each with an audio route, an LFO and a list of sample layers.
//!
//! Two program layouts are supported:
//!
//! - **Keygroup**: every instrument spans a `LowNote..=HighNote` key range
//! - **Drum**: every instrument is one pad, with a 128-entry pad-to-note map
//!
//! Numeric parameters are written as fixed six-decimal strings and flags as
//! `True`/`False`, matching what the MPC software produces.
//!
//! # Usage
//!
//! ```
//! use mpc_xpm::{Layer, MpcvObject, ProgramType};
//!
//! # fn main() -> Result<(), mpc_xpm::XpmError> {
//! let mut xpm = MpcvObject::new(ProgramType::Keygroup, "Piano");
//! let mut instrument = xpm.program.new_instrument(1);
//! instrument.low_note = 48;
//! instrument.high_note = 60;
//! let mut layer = Layer::new(1);
//! layer.sample_file = "Piano C3.WAV".to_string();
//! instrument.layers.layer.push(layer);
//! xpm.program.push_instrument(instrument)?;
//! xpm.program.num_keygroups = xpm.program.instrument_count();
//!
//! let xml = xpm.to_xml_string()?;
//! assert!(xml.contains("<LowNote>48</LowNote>"));
//! assert!(xml.contains("<SampleFile>Piano C3.WAV</SampleFile>"));
//! # Ok(())
//! # }
//! ```

mod error;
mod format;
mod program;
mod template;

pub use error::XpmError;
pub use program::{
    AudioRoute, Instrument, Instruments, Layer, Layers, Lfo, LfoReset, MpcvObject, PadGroup, PadGroupMap,
    PadNote, PadNoteMap, Program, ProgramType, Version,
};
pub use template::program_pads_json;

// =============================================================================
// Constants
// =============================================================================

/// Instrument slots in one program
pub const MAX_INSTRUMENTS: usize = 128;

/// Pads (and MIDI notes) addressed by a drum program
pub const PAD_COUNT: usize = 128;

/// Value of `File_Version` in the version block
pub const FILE_VERSION: &str = "2.1";

/// Value of `Application` in the version block
pub const APPLICATION: &str = "MPC-V";

/// Value of `Application_Version` in the version block
pub const APPLICATION_VERSION: &str = "2.11.3.5";

/// Value of `Platform` in the version block
pub const PLATFORM: &str = "Linux";

/// Slice index meaning "whole sample"
pub const SLICE_INDEX_WHOLE: i32 = 129;
