//! Sample chunk decoding

use tracing::debug;

use crate::error::ExsError;
use crate::module::{Endian, Sample};
use crate::parser::{Chunk, Record};
use crate::{SAMPLE_CHUNK_SIZES, SAMPLE_RECORD_LEN};

/// Offset of the 256-byte file name field
const FILE_NAME_OFFSET: usize = 420;

/// Decode the sample record at the chunk start
///
/// Short 336-byte chunks end where the file name field would begin; the
/// display name stands in for the file name there.
pub(crate) fn parse_sample(data: &[u8], chunk: &Chunk, endian: Endian) -> Result<Sample, ExsError> {
    if !SAMPLE_CHUNK_SIZES.contains(&chunk.size) {
        return Err(ExsError::InvalidSampleChunkSize {
            offset: chunk.offset,
            size: chunk.size,
        });
    }

    let r = Record::new(data, chunk.offset, endian, "sample");
    r.require(FILE_NAME_OFFSET)?;

    let name = r.string(20, 64)?;
    let carries_file_name = chunk.size as usize + crate::CHUNK_STRIDE >= SAMPLE_RECORD_LEN;
    let file_name = if carries_file_name {
        r.require(SAMPLE_RECORD_LEN)?;
        r.string(FILE_NAME_OFFSET, 256)?.trim().to_string()
    } else {
        debug!(sample = %name, "short sample chunk, using display name as file name");
        name.trim().to_string()
    };

    Ok(Sample {
        id: r.u32(8)?,
        length: r.i32(88)?,
        rate: r.i32(92)?,
        bit_depth: r.u8(96)?,
        sample_type: r.i32(112)?,
        path: r.string(164, 256)?,
        file_name,
        name,
    })
}
