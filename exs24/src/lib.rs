//! EXS24: Logic Pro EXS24 sampler instrument decoder
//!
//! This crate decodes the chunked binary EXS24 container into a semantic model
//! of zones, groups, samples and global parameters, then derives the
//! structures a program converter needs: round-robin chains, key-range zone
//! clusters, the set of active groups and a drum-vs-keygroup classification.
//!
//! # Container Overview
//!
//! An EXS24 file is a flat run of chunks. Every chunk starts with a 12-byte
//! header (`signature`, `size`, `magic`); the chunk type lives in bits 24..28
//! of the signature. Chunks are laid out `size + 84` bytes apart:
//!
//! - Header chunk: carries the endianness magic at file offset 16
//! - Zone chunks: key/velocity mapping of one sample
//! - Group chunks: envelopes, filter and round-robin linkage
//! - Sample chunks: sample metadata and on-disk file name
//! - Params chunk: sparse key/value table of instrument-wide settings
//!
//! All multi-byte integers use the endianness announced by the magic.
//!
//! # Usage
//!
//! ```ignore
//! use exs24::load_exs;
//!
//! let instrument = load_exs("Piano.exs")?;
//! println!("{}: {} zones", instrument.name, instrument.zones.len());
//! for cluster in instrument.cluster_zones_by_key_range(4) {
//!     println!("{}-{}: {} zones", cluster.key_low, cluster.key_high, cluster.zones.len());
//! }
//! ```

mod aggregate;
mod classify;
mod error;
mod module;
mod parser;
mod sequence;
mod writer;

pub use aggregate::ZoneCluster;
pub use classify::{DrumHeuristic, ProgramClassifier, ProgramKind};
pub use error::ExsError;
pub use module::{
    Endian, Envelope, Group, Instrument, LoopFlags, ModSlot, Params, Sample, Zone, ZoneFlags,
};
pub use parser::{Chunk, ChunkKind, ChunkReader, decode_string, instrument_name, load_exs, parse_exs};
pub use sequence::{assign_sequence_numbers, resolve_sequences};
pub use writer::ExsWriter;

// =============================================================================
// Container Constants
// =============================================================================

/// Big-endian magic markers
pub const MAGIC_BIG_ENDIAN: [&[u8; 4]; 2] = [b"SOBT", b"SOBJ"];

/// Little-endian magic markers
pub const MAGIC_LITTLE_ENDIAN: [&[u8; 4]; 2] = [b"TBOS", b"JBOS"];

/// File offset of the endianness magic
pub const MAGIC_OFFSET: usize = 16;

/// File offset of the header size word used for size-expansion detection
pub const EXPANSION_SIZE_OFFSET: usize = 24;

/// Header size above which the file is size-expanded
pub const SIZE_EXPANDED_THRESHOLD: u32 = 0x8000;

/// Bytes needed to read both container header records
pub const MIN_FILE_SIZE: usize = 40;

/// Length of the signature/size/magic chunk header
pub const CHUNK_HEADER_LEN: usize = 12;

/// Distance added to a chunk's size to reach the next chunk
pub const CHUNK_STRIDE: usize = 84;

// =============================================================================
// Record Constants
// =============================================================================

/// Smallest zone chunk size accepted
pub const MIN_ZONE_CHUNK_SIZE: u32 = 110;

/// The only sample chunk sizes accepted
pub const SAMPLE_CHUNK_SIZES: [u32; 3] = [336, 592, 600];

/// Bytes spanned by a zone record
pub const ZONE_RECORD_LEN: usize = 196;

/// Bytes spanned by a group record
pub const GROUP_RECORD_LEN: usize = 200;

/// Bytes spanned by a sample record, up to the end of the file name field
pub const SAMPLE_RECORD_LEN: usize = 676;

/// Bytes spanned by a params record
pub const PARAMS_RECORD_LEN: usize = 388;

/// Key/value slots in the params table
pub const PARAM_SLOTS: usize = 100;

/// Modulation matrix slots addressed by the params table
pub const MOD_SLOTS: usize = 10;

/// Sentinel for "no group" / "no sample" / "not in a round-robin chain"
pub const UNSET_INDEX: i32 = -1;
