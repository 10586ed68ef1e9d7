//! EXS24 container parser

use std::path::Path;

use tracing::{debug, trace};

use crate::error::ExsError;
use crate::module::{Endian, Instrument};
use crate::sequence::{assign_sequence_numbers, resolve_sequences};
use crate::{
    CHUNK_HEADER_LEN, CHUNK_STRIDE, EXPANSION_SIZE_OFFSET, MAGIC_OFFSET, MIN_FILE_SIZE,
    SIZE_EXPANDED_THRESHOLD,
};

mod group;
mod helpers;
mod params;
mod sample;
mod zone;

pub use helpers::decode_string;
pub(crate) use helpers::Record;

use group::parse_group;
use params::parse_params;
use sample::parse_sample;
use zone::parse_zone;

/// Chunk type carried in bits 24..28 of the signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Header,
    Zone,
    Group,
    Sample,
    Params,
    Unknown(u8),
}

impl ChunkKind {
    pub fn from_signature(signature: u32) -> Self {
        match ((signature & 0x0F00_0000) >> 24) as u8 {
            0 => Self::Header,
            1 => Self::Zone,
            2 => Self::Group,
            3 => Self::Sample,
            4 => Self::Params,
            other => Self::Unknown(other),
        }
    }

    /// Value stored in the signature's type field
    pub fn code(self) -> u8 {
        match self {
            Self::Header => 0,
            Self::Zone => 1,
            Self::Group => 2,
            Self::Sample => 3,
            Self::Params => 4,
            Self::Unknown(code) => code,
        }
    }
}

/// A chunk header and its position in the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Byte offset of the chunk start
    pub offset: usize,
    pub signature: u32,
    /// Declared size, excluding the 84-byte stride overhead
    pub size: u32,
    pub magic: [u8; 4],
    pub kind: ChunkKind,
}

/// Walks chunk headers at `size + 84` byte steps
///
/// Iteration stops once fewer than 84 bytes remain after the cursor.
pub struct ChunkReader<'a> {
    data: &'a [u8],
    endian: Endian,
    offset: usize,
    failed: bool,
}

impl<'a> ChunkReader<'a> {
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            endian,
            offset: 0,
            failed: false,
        }
    }

    fn read_header(&self) -> Result<Chunk, ExsError> {
        let record = Record::new(self.data, self.offset, self.endian, "chunk header");
        record.require(CHUNK_HEADER_LEN)?;
        let signature = record.u32(0)?;
        let mut magic = [0u8; 4];
        magic.copy_from_slice(record.bytes(8, 4)?);
        Ok(Chunk {
            offset: self.offset,
            signature,
            size: record.u32(4)?,
            magic,
            kind: ChunkKind::from_signature(signature),
        })
    }
}

impl Iterator for ChunkReader<'_> {
    type Item = Result<Chunk, ExsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset.saturating_add(CHUNK_STRIDE) >= self.data.len() {
            return None;
        }
        match self.read_header() {
            Ok(chunk) => {
                self.offset = self
                    .offset
                    .saturating_add(chunk.size as usize)
                    .saturating_add(CHUNK_STRIDE);
                Some(Ok(chunk))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Read the endianness magic and the size-expansion flag from the header
fn parse_header(data: &[u8]) -> Result<(Endian, bool), ExsError> {
    if data.len() < MIN_FILE_SIZE {
        return Err(ExsError::TooSmall(data.len()));
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&data[MAGIC_OFFSET..MAGIC_OFFSET + 4]);
    let endian = Endian::from_magic(&magic).ok_or(ExsError::NotExs(magic))?;

    let size = Record::new(data, 0, endian, "header").u32(EXPANSION_SIZE_OFFSET)?;
    Ok((endian, size > SIZE_EXPANDED_THRESHOLD))
}

/// Decode an EXS24 instrument from raw bytes
///
/// # Arguments
/// * `data` - Raw file bytes
/// * `name` - Instrument name (normally the file stem)
///
/// # Errors
/// Unknown magic, a zone or sample chunk with an invalid size, or a record
/// running past the end of the buffer. Unknown chunk types are skipped.
pub fn parse_exs(data: &[u8], name: &str) -> Result<Instrument, ExsError> {
    let (endian, size_expanded) = parse_header(data)?;
    debug!(name, ?endian, size_expanded, "decoding EXS instrument");

    let mut instrument = Instrument {
        name: name.to_string(),
        endian,
        size_expanded,
        size: data.len(),
        ..Default::default()
    };

    for chunk in ChunkReader::new(data, endian) {
        let chunk = chunk?;
        trace!(offset = chunk.offset, size = chunk.size, kind = ?chunk.kind, "chunk");
        match chunk.kind {
            ChunkKind::Header => {}
            ChunkKind::Zone => {
                let zone = parse_zone(data, &chunk, endian)?;
                debug!(
                    zone = %zone.name,
                    key_low = zone.key_low,
                    key_high = zone.key_high,
                    sample = zone.sample_index,
                    "zone"
                );
                instrument.zones.push(zone);
            }
            ChunkKind::Group => instrument.groups.push(parse_group(data, &chunk, endian)?),
            ChunkKind::Sample => instrument.samples.push(parse_sample(data, &chunk, endian)?),
            ChunkKind::Params => instrument.params = Some(parse_params(data, &chunk, endian)?),
            ChunkKind::Unknown(code) => trace!(code, "skipping unknown chunk"),
        }
    }

    instrument.sequences = resolve_sequences(&instrument.groups);
    assign_sequence_numbers(&mut instrument.groups, &instrument.sequences);

    debug!(
        name,
        groups = instrument.groups.len(),
        zones = instrument.zones.len(),
        samples = instrument.samples.len(),
        sequences = instrument.sequences.len(),
        "decoded EXS instrument"
    );
    Ok(instrument)
}

/// Instrument name for a path: the file name with a trailing `.exs` removed (any case)
pub fn instrument_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.len().checked_sub(4) {
        Some(split)
            if file_name.is_char_boundary(split)
                && file_name[split..].eq_ignore_ascii_case(".exs") =>
        {
            file_name[..split].to_string()
        }
        _ => file_name,
    }
}

/// Read and decode an EXS24 file
pub fn load_exs(path: impl AsRef<Path>) -> Result<Instrument, ExsError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    parse_exs(&data, &instrument_name(path))
}
